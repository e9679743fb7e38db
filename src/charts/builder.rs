//! Chart Spec Builder Module
//! Turns the filtered launch records into pie and scatter chart specifications.

use crate::data::columns::{BOOSTER_VERSION, CLASS, PAYLOAD_MASS};
use crate::data::{DataProcessor, FilterState, LaunchDataset, SiteSelection};
use polars::prelude::*;
use std::collections::BTreeMap;
use thiserror::Error;

/// Donut hole as a fraction of the pie radius.
pub const PIE_HOLE: f64 = 0.3;

pub const SCATTER_TITLE: &str = "Payload Mass vs. Launch Outcome";
pub const SCATTER_X_LABEL: &str = "Payload Mass (kg)";
pub const SCATTER_Y_LABEL: &str = "Launch Outcome";
const UNKNOWN_BOOSTER: &str = "Unknown";

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("No launches recorded for site {0}")]
    UnknownSite(String),
    #[error("No launches match the current filters")]
    EmptySelection,
    #[error("Every slice is zero, nothing to draw")]
    ZeroTotal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    /// Raw success rate behind the slice.
    pub value: f64,
    /// Share of the whole pie; all fractions sum to 1.
    pub fraction: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieChartSpec {
    pub title: String,
    pub hole: f64,
    pub slices: Vec<PieSlice>,
}

/// All points for one booster version.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub booster_version: String,
    /// `[payload mass, class]`
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub y_ticks: Vec<(f64, String)>,
    pub series: Vec<ScatterSeries>,
}

impl ScatterChartSpec {
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    /// Tick label for an outcome axis value, empty between ticks.
    pub fn y_tick_label(&self, value: f64) -> String {
        self.y_ticks
            .iter()
            .find(|(tick, _)| (tick - value).abs() < 1e-6)
            .map(|(_, label)| label.clone())
            .unwrap_or_default()
    }

    /// Smallest and largest payload across all series.
    pub fn x_extent(&self) -> Option<(f64, f64)> {
        let mut xs = self.series.iter().flat_map(|s| s.points.iter().map(|p| p[0]));
        let first = xs.next()?;
        Some(xs.fold((first, first), |(lo, hi), x| (lo.min(x), hi.max(x))))
    }
}

/// Builds chart specifications from the dataset and the current filter.
pub struct ChartSpecBuilder;

impl ChartSpecBuilder {
    /// Success rate by site for `ALL`, otherwise a success/failure split for one site.
    pub fn pie_chart(
        dataset: &LaunchDataset,
        site: &SiteSelection,
    ) -> Result<PieChartSpec, ChartError> {
        let (title, labelled) = match site {
            SiteSelection::All => {
                let rates = DataProcessor::success_rate_by_site(dataset)?;
                (
                    "Success Rate by Launch Site".to_string(),
                    rates
                        .into_iter()
                        .map(|r| (r.site, r.success_rate))
                        .collect::<Vec<_>>(),
                )
            }
            SiteSelection::Site(name) => {
                let rate = DataProcessor::success_rate_for_site(dataset, name)?
                    .ok_or_else(|| ChartError::UnknownSite(name.clone()))?;
                (
                    format!("Success Rate for {name}"),
                    vec![
                        ("Success".to_string(), rate),
                        ("Failure".to_string(), 1.0 - rate),
                    ],
                )
            }
        };

        let total: f64 = labelled.iter().map(|(_, v)| v).sum();
        if total <= 0.0 {
            return Err(ChartError::ZeroTotal);
        }

        let slices = labelled
            .into_iter()
            .map(|(label, value)| PieSlice {
                label,
                value,
                fraction: value / total,
            })
            .collect();

        Ok(PieChartSpec {
            title,
            hole: PIE_HOLE,
            slices,
        })
    }

    /// Payload vs outcome for the filtered rows, one series per booster version.
    pub fn scatter_chart(
        dataset: &LaunchDataset,
        filter: &FilterState,
    ) -> Result<ScatterChartSpec, ChartError> {
        let filtered = DataProcessor::filter_launches(dataset, filter)?;
        if filtered.height() == 0 {
            return Err(ChartError::EmptySelection);
        }

        let payload = filtered.column(PAYLOAD_MASS)?.f64()?;
        let class = filtered.column(CLASS)?.cast(&DataType::Float64)?;
        let class = class.f64()?;
        let booster = filtered.column(BOOSTER_VERSION)?.str()?;

        let mut by_booster: BTreeMap<String, Vec<[f64; 2]>> = BTreeMap::new();
        for ((x, y), version) in payload.into_iter().zip(class).zip(booster) {
            if let (Some(x), Some(y)) = (x, y) {
                by_booster
                    .entry(version.unwrap_or(UNKNOWN_BOOSTER).to_string())
                    .or_default()
                    .push([x, y]);
            }
        }

        Ok(ScatterChartSpec {
            title: SCATTER_TITLE.to_string(),
            x_label: SCATTER_X_LABEL.to_string(),
            y_label: SCATTER_Y_LABEL.to_string(),
            y_ticks: vec![(0.0, "Failure".to_string()), (1.0, "Success".to_string())],
            series: by_booster
                .into_iter()
                .map(|(booster_version, points)| ScatterSeries {
                    booster_version,
                    points,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::{dataset_from_csv, SAMPLE_CSV};
    use proptest::prelude::*;

    const THREE_LAUNCHES: &str = "PayloadMass,LaunchSite,BoosterVersion,Class\n\
                                  1000,A,F9,1\n\
                                  2000,A,F9,1\n\
                                  3000,B,F9,0\n";

    fn fraction_sum(spec: &PieChartSpec) -> f64 {
        spec.slices.iter().map(|s| s.fraction).sum()
    }

    #[test]
    fn all_sites_pie_shows_rate_per_site() {
        let dataset = dataset_from_csv(THREE_LAUNCHES);
        let pie = ChartSpecBuilder::pie_chart(&dataset, &SiteSelection::All).unwrap();

        assert_eq!(pie.title, "Success Rate by Launch Site");
        assert_eq!(pie.hole, PIE_HOLE);
        let values: Vec<(&str, f64)> = pie
            .slices
            .iter()
            .map(|s| (s.label.as_str(), s.value))
            .collect();
        assert_eq!(values, vec![("A", 1.0), ("B", 0.0)]);
        assert!((fraction_sum(&pie) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn single_site_pie_splits_success_and_failure() {
        let dataset = dataset_from_csv(SAMPLE_CSV);
        let site = SiteSelection::Site("CCAFS SLC 40".to_string());
        let pie = ChartSpecBuilder::pie_chart(&dataset, &site).unwrap();

        assert_eq!(pie.title, "Success Rate for CCAFS SLC 40");
        assert_eq!(pie.slices[0].label, "Success");
        assert_eq!(pie.slices[1].label, "Failure");
        assert!((pie.slices[0].value - 1.0 / 3.0).abs() < 1e-9);
        assert!((fraction_sum(&pie) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_site_is_a_chart_error() {
        let dataset = dataset_from_csv(SAMPLE_CSV);
        let site = SiteSelection::Site("Boca Chica".to_string());
        assert!(matches!(
            ChartSpecBuilder::pie_chart(&dataset, &site),
            Err(ChartError::UnknownSite(_))
        ));
    }

    #[test]
    fn all_failures_have_nothing_to_draw() {
        let dataset = dataset_from_csv("PayloadMass,LaunchSite,Class\n100,A,0\n200,B,0\n");
        assert!(matches!(
            ChartSpecBuilder::pie_chart(&dataset, &SiteSelection::All),
            Err(ChartError::ZeroTotal)
        ));
    }

    #[test]
    fn scatter_groups_by_booster_and_labels_outcomes() {
        let dataset = dataset_from_csv(SAMPLE_CSV);
        let filter = FilterState::new(SiteSelection::All, (0, 10_000));
        let scatter = ChartSpecBuilder::scatter_chart(&dataset, &filter).unwrap();

        assert_eq!(scatter.point_count(), 6);
        let boosters: Vec<&str> = scatter
            .series
            .iter()
            .map(|s| s.booster_version.as_str())
            .collect();
        assert_eq!(boosters, vec!["Falcon 9", "Falcon 9 B5", "Falcon 9 FT"]);
        assert_eq!(scatter.y_tick_label(0.0), "Failure");
        assert_eq!(scatter.y_tick_label(1.0), "Success");
        assert_eq!(scatter.y_tick_label(0.5), "");
        assert_eq!(scatter.x_extent(), Some((500.0, 9600.0)));
    }

    #[test]
    fn scatter_without_matches_is_a_chart_error() {
        let dataset = dataset_from_csv(SAMPLE_CSV);
        let filter = FilterState::new(SiteSelection::All, (12_000, 15_000));
        assert!(matches!(
            ChartSpecBuilder::scatter_chart(&dataset, &filter),
            Err(ChartError::EmptySelection)
        ));
    }

    #[test]
    fn scatter_without_booster_column_is_a_chart_error() {
        let dataset = dataset_from_csv("PayloadMass,LaunchSite,Class\n100,A,1\n");
        let filter = FilterState::new(SiteSelection::All, (0, 1000));
        assert!(matches!(
            ChartSpecBuilder::scatter_chart(&dataset, &filter),
            Err(ChartError::PolarsError(_))
        ));
    }

    proptest! {
        #[test]
        fn scatter_counts_match_filter(
            rows in prop::collection::vec(
                (0u32..12_000, prop::sample::select(vec!["A", "B", "C"]), 0u8..2),
                1..40,
            ),
            low in 0i64..6_000,
            width in 0i64..8_000,
            site in prop::sample::select(vec!["ALL", "A", "B"]),
        ) {
            let mut csv = String::from("PayloadMass,LaunchSite,BoosterVersion,Class\n");
            for (payload, launch_site, class) in &rows {
                csv.push_str(&format!("{payload},{launch_site},F9,{class}\n"));
            }
            let dataset = dataset_from_csv(&csv);

            let high = low + width;
            let selection = if site == "ALL" {
                SiteSelection::All
            } else {
                SiteSelection::Site(site.to_string())
            };
            let expected = rows
                .iter()
                .filter(|(p, _, _)| (*p as i64) >= low && (*p as i64) <= high)
                .filter(|(_, s, _)| site == "ALL" || *s == site)
                .count();

            let filter = FilterState::new(selection.clone(), (low, high));
            match ChartSpecBuilder::scatter_chart(&dataset, &filter) {
                Ok(spec) => prop_assert_eq!(spec.point_count(), expected),
                Err(ChartError::EmptySelection) => prop_assert_eq!(expected, 0),
                Err(e) => prop_assert!(false, "unexpected error: {}", e),
            }

            if let Ok(pie) = ChartSpecBuilder::pie_chart(&dataset, &selection) {
                let sum: f64 = pie.slices.iter().map(|s| s.fraction).sum();
                prop_assert!((sum - 1.0).abs() < 1e-9);
            }
        }
    }
}
