//! Dashboard State
//! Load state machine and the views derived from dataset + filter.

use crate::charts::{ChartError, ChartSpecBuilder, PieChartSpec, ScatterChartSpec};
use crate::data::{DataProcessor, FilterState, LaunchDataset, LoadError, SiteSelection};
use crate::stats::{DatasetSummary, PayloadRange, StatsCalculator};
use std::sync::Arc;

pub const NO_DATA_MESSAGE: &str =
    "No valid data available after cleaning. Please check your dataset.";
const PREVIEW_ROWS: usize = 5;

/// Both chart specs for one filter state. Each chart fails on its own.
pub struct DerivedViews {
    pub pie: Result<PieChartSpec, ChartError>,
    pub scatter: Result<ScatterChartSpec, ChartError>,
}

impl DerivedViews {
    pub fn compute(dataset: &LaunchDataset, filter: &FilterState) -> Self {
        let pie = ChartSpecBuilder::pie_chart(dataset, &filter.site);
        if let Err(e) = &pie {
            tracing::warn!(site = %filter.site, error = %e, "pie chart unavailable");
        }

        let scatter = ChartSpecBuilder::scatter_chart(dataset, filter);
        if let Err(e) = &scatter {
            tracing::warn!(
                site = %filter.site,
                low = filter.payload.0,
                high = filter.payload.1,
                error = %e,
                "scatter chart unavailable"
            );
        }

        Self { pie, scatter }
    }
}

/// Everything shown once a non-empty dataset is loaded.
pub struct LoadedDashboard {
    pub dataset: Arc<LaunchDataset>,
    pub sites: Vec<String>,
    pub range: PayloadRange,
    pub summary: DatasetSummary,
    pub preview: (Vec<String>, Vec<Vec<String>>),
    pub filter: FilterState,
    pub views: DerivedViews,
}

impl LoadedDashboard {
    /// Build the dashboard for `dataset`, keeping `previous` filter values that
    /// still make sense for the new data.
    pub fn new(dataset: Arc<LaunchDataset>, previous: Option<&FilterState>) -> Self {
        let range = StatsCalculator::payload_range(&dataset.payload_values());
        if let Some(reason) = range.fallback {
            tracing::warn!(%reason, "payload range fell back to fixed bounds");
        }

        let sites = dataset.launch_sites();
        let filter = Self::carry_filter(previous, &sites, &range);
        let summary = StatsCalculator::summarize(&dataset, &range);
        let preview = DataProcessor::preview(&dataset, PREVIEW_ROWS);
        let views = DerivedViews::compute(&dataset, &filter);

        Self {
            dataset,
            sites,
            range,
            summary,
            preview,
            filter,
            views,
        }
    }

    fn carry_filter(
        previous: Option<&FilterState>,
        sites: &[String],
        range: &PayloadRange,
    ) -> FilterState {
        let Some(previous) = previous else {
            return FilterState::new(SiteSelection::All, range.defaults());
        };

        let site = match &previous.site {
            SiteSelection::Site(name) if !sites.contains(name) => SiteSelection::All,
            other => other.clone(),
        };
        let low = previous.payload.0.clamp(range.min, range.max);
        let high = previous.payload.1.clamp(low, range.max);
        FilterState::new(site, (low, high))
    }

    /// Apply a new filter; recomputes the derived views only when it changed.
    pub fn set_filter(&mut self, filter: FilterState) -> bool {
        if filter == self.filter {
            return false;
        }
        tracing::debug!(site = %filter.site, payload = ?filter.payload, "filter changed");
        self.views = DerivedViews::compute(&self.dataset, &filter);
        self.filter = filter;
        true
    }
}

/// not-loaded -> loaded-empty (terminal) | loaded-nonempty (interactive)
pub enum DashboardState {
    Loading,
    Empty { load_error: Option<String> },
    Ready(Box<LoadedDashboard>),
}

impl DashboardState {
    pub fn from_load(
        result: Result<Arc<LaunchDataset>, LoadError>,
        previous: Option<&FilterState>,
    ) -> Self {
        match result {
            Ok(dataset) if dataset.is_empty() => {
                tracing::error!("{NO_DATA_MESSAGE}");
                DashboardState::Empty { load_error: None }
            }
            Ok(dataset) => {
                tracing::info!(rows = dataset.get_row_count(), "launch records loaded");
                DashboardState::Ready(Box::new(LoadedDashboard::new(dataset, previous)))
            }
            Err(e) => {
                tracing::error!(error = %e, "error loading data");
                DashboardState::Empty {
                    load_error: Some(format!("Error loading data: {e}")),
                }
            }
        }
    }

    pub fn filter(&self) -> Option<&FilterState> {
        match self {
            DashboardState::Ready(loaded) => Some(&loaded.filter),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::{dataset_from_csv, SAMPLE_CSV};
    use crate::stats::FallbackReason;

    fn sample() -> Arc<LaunchDataset> {
        Arc::new(dataset_from_csv(SAMPLE_CSV))
    }

    #[test]
    fn empty_dataset_halts_before_views() {
        let empty = dataset_from_csv("PayloadMass,LaunchSite,Class\nabc,A,1\n");
        let state = DashboardState::from_load(Ok(Arc::new(empty)), None);

        assert!(matches!(state, DashboardState::Empty { load_error: None }));
        assert!(state.filter().is_none());
    }

    #[test]
    fn load_error_is_reported_and_halts() {
        let state = DashboardState::from_load(Err(LoadError::MissingColumn("class")), None);
        match state {
            DashboardState::Empty {
                load_error: Some(message),
            } => assert!(message.starts_with("Error loading data:")),
            _ => panic!("expected empty state with error"),
        }
    }

    #[test]
    fn ready_state_starts_with_all_sites_and_default_range() {
        let state = DashboardState::from_load(Ok(sample()), None);
        let DashboardState::Ready(loaded) = state else {
            panic!("expected ready state");
        };

        assert_eq!(loaded.filter.site, SiteSelection::All);
        assert_eq!(loaded.filter.payload, loaded.range.defaults());
        assert_eq!(loaded.sites.len(), 3);
        assert!(loaded.views.pie.is_ok());
        assert!(loaded.views.scatter.is_ok());
        assert_eq!(loaded.preview.1.len(), 5);
    }

    #[test]
    fn filter_change_recomputes_views() {
        let mut loaded = LoadedDashboard::new(sample(), None);

        let same = loaded.filter.clone();
        assert!(!loaded.set_filter(same));

        let narrowed = FilterState::new(SiteSelection::Site("KSC LC 39A".into()), (0, 10_100));
        assert!(loaded.set_filter(narrowed));
        let scatter = loaded.views.scatter.as_ref().unwrap();
        assert_eq!(scatter.point_count(), 2);
        let pie = loaded.views.pie.as_ref().unwrap();
        assert_eq!(pie.title, "Success Rate for KSC LC 39A");
    }

    #[test]
    fn failing_chart_leaves_the_other_intact() {
        let mut loaded = LoadedDashboard::new(sample(), None);
        loaded.set_filter(FilterState::new(SiteSelection::All, (10_000, 10_100)));

        assert!(matches!(
            loaded.views.scatter,
            Err(ChartError::EmptySelection)
        ));
        assert!(loaded.views.pie.is_ok());
    }

    #[test]
    fn refresh_keeps_valid_filter_and_drops_vanished_site() {
        let previous = FilterState::new(SiteSelection::Site("Boca Chica".into()), (-50, 50_000));
        let loaded = LoadedDashboard::new(sample(), Some(&previous));

        assert_eq!(loaded.filter.site, SiteSelection::All);
        assert_eq!(loaded.filter.payload, (loaded.range.min, loaded.range.max));

        let kept = FilterState::new(SiteSelection::Site("VAFB SLC 4E".into()), (100, 900));
        let loaded = LoadedDashboard::new(sample(), Some(&kept));
        assert_eq!(loaded.filter, kept);
    }

    #[test]
    fn degenerate_payloads_are_flagged() {
        let dataset = dataset_from_csv("PayloadMass,LaunchSite,BoosterVersion,Class\n500,A,F9,1\n500,B,F9,0\n");
        let loaded = LoadedDashboard::new(Arc::new(dataset), None);
        assert_eq!(loaded.range.fallback, Some(FallbackReason::SingleValue));
        assert_eq!(loaded.filter.payload, (2_000, 8_000));
    }
}
