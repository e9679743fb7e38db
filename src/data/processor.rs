//! Data Processor Module
//! Filter state and the Polars queries the charts are built from.

use super::loader::columns::{CLASS, LAUNCH_SITE, PAYLOAD_MASS};
use super::loader::LaunchDataset;
use polars::prelude::*;
use std::fmt;

/// Site selector value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SiteSelection {
    #[default]
    All,
    Site(String),
}

impl fmt::Display for SiteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteSelection::All => write!(f, "ALL"),
            SiteSelection::Site(site) => write!(f, "{site}"),
        }
    }
}

/// The two user-selected values that gate which rows feed the charts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub site: SiteSelection,
    /// Inclusive payload interval in kg.
    pub payload: (i64, i64),
}

impl FilterState {
    pub fn new(site: SiteSelection, payload: (i64, i64)) -> Self {
        Self { site, payload }
    }
}

/// Success rate for one launch site.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteRate {
    pub site: String,
    pub success_rate: f64,
}

/// Stateless queries over the cleaned launch records.
pub struct DataProcessor;

impl DataProcessor {
    /// Rows with payload in the inclusive range and, unless `ALL`, at the selected site.
    pub fn filter_launches(
        dataset: &LaunchDataset,
        filter: &FilterState,
    ) -> PolarsResult<DataFrame> {
        let (low, high) = filter.payload;
        let mut predicate = col(PAYLOAD_MASS)
            .gt_eq(lit(low as f64))
            .and(col(PAYLOAD_MASS).lt_eq(lit(high as f64)));
        if let SiteSelection::Site(site) = &filter.site {
            predicate = predicate.and(col(LAUNCH_SITE).eq(lit(site.as_str())));
        }

        dataset
            .get_dataframe()
            .clone()
            .lazy()
            .filter(predicate)
            .collect()
    }

    /// Mean success class per launch site, sorted by site name.
    pub fn success_rate_by_site(dataset: &LaunchDataset) -> PolarsResult<Vec<SiteRate>> {
        let rates = dataset
            .get_dataframe()
            .clone()
            .lazy()
            .group_by([col(LAUNCH_SITE)])
            .agg([col(CLASS)
                .cast(DataType::Float64)
                .mean()
                .alias("success_rate")])
            .sort([LAUNCH_SITE], SortMultipleOptions::default())
            .collect()?;

        let sites = rates.column(LAUNCH_SITE)?.str()?;
        let values = rates.column("success_rate")?.f64()?;

        Ok(sites
            .into_iter()
            .zip(values)
            .filter_map(|(site, rate)| {
                Some(SiteRate {
                    site: site?.to_string(),
                    success_rate: rate?,
                })
            })
            .collect())
    }

    /// Mean success class for one site; `None` when the site has no launches.
    pub fn success_rate_for_site(dataset: &LaunchDataset, site: &str) -> PolarsResult<Option<f64>> {
        let classes = dataset
            .get_dataframe()
            .clone()
            .lazy()
            .filter(col(LAUNCH_SITE).eq(lit(site)))
            .select([col(CLASS).cast(DataType::Float64)])
            .collect()?;

        let values: Vec<f64> = classes.column(CLASS)?.f64()?.into_iter().flatten().collect();
        if values.is_empty() {
            return Ok(None);
        }
        Ok(Some(values.iter().sum::<f64>() / values.len() as f64))
    }

    /// First `n` rows rendered as strings, with column headers.
    pub fn preview(dataset: &LaunchDataset, n: usize) -> (Vec<String>, Vec<Vec<String>>) {
        let head = dataset.get_dataframe().head(Some(n));
        let headers = head
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let rows = (0..head.height())
            .map(|i| {
                head.get_columns()
                    .iter()
                    .map(|column| match column.get(i) {
                        Ok(val) if !val.is_null() => val.to_string().trim_matches('"').to_string(),
                        _ => String::new(),
                    })
                    .collect()
            })
            .collect();

        (headers, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::{dataset_from_csv, SAMPLE_CSV};

    const THREE_LAUNCHES: &str = "PayloadMass,LaunchSite,BoosterVersion,Class\n\
                                  1000,A,F9,1\n\
                                  2000,A,F9,1\n\
                                  3000,B,F9,0\n";

    #[test]
    fn rates_by_site_follow_mean_class() {
        let dataset = dataset_from_csv(THREE_LAUNCHES);
        let rates = DataProcessor::success_rate_by_site(&dataset).unwrap();

        assert_eq!(
            rates,
            vec![
                SiteRate {
                    site: "A".to_string(),
                    success_rate: 1.0
                },
                SiteRate {
                    site: "B".to_string(),
                    success_rate: 0.0
                },
            ]
        );
    }

    #[test]
    fn rate_for_single_site() {
        let dataset = dataset_from_csv(SAMPLE_CSV);
        let rate = DataProcessor::success_rate_for_site(&dataset, "CCAFS SLC 40")
            .unwrap()
            .unwrap();
        assert!((rate - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(
            DataProcessor::success_rate_for_site(&dataset, "Boca Chica").unwrap(),
            None
        );
    }

    #[test]
    fn filter_is_inclusive_on_both_ends() {
        let dataset = dataset_from_csv(SAMPLE_CSV);
        let filter = FilterState::new(SiteSelection::All, (525, 3170));
        let rows = DataProcessor::filter_launches(&dataset, &filter).unwrap();
        // 525, 677, 3170
        assert_eq!(rows.height(), 3);
    }

    #[test]
    fn filter_by_site_intersects_payload_range() {
        let dataset = dataset_from_csv(SAMPLE_CSV);
        let filter = FilterState::new(SiteSelection::Site("CCAFS SLC 40".into()), (0, 1000));
        let rows = DataProcessor::filter_launches(&dataset, &filter).unwrap();
        assert_eq!(rows.height(), 2);
    }

    #[test]
    fn preview_renders_first_rows() {
        let dataset = dataset_from_csv(SAMPLE_CSV);
        let (headers, rows) = DataProcessor::preview(&dataset, 5);

        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].len(), headers.len());
        let site_idx = headers.iter().position(|h| h == LAUNCH_SITE).unwrap();
        assert_eq!(rows[0][site_idx], "CCAFS SLC 40");
    }

    #[test]
    fn site_selection_displays_all() {
        assert_eq!(SiteSelection::All.to_string(), "ALL");
        assert_eq!(SiteSelection::Site("KSC".into()).to_string(), "KSC");
    }
}
