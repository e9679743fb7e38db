//! Statistics Calculator Module
//! Payload slider bounds and dataset summary figures.

use crate::data::LaunchDataset;
use statrs::statistics::Statistics;
use std::fmt;

/// Padding added around the observed payload extremes, in kg.
pub const PAYLOAD_PADDING: f64 = 500.0;
/// Hard ceiling for the payload slider, in kg.
pub const PAYLOAD_CEILING: i64 = 20_000;

/// Bounds and defaults used when the payload distribution is unusable.
pub const FALLBACK_RANGE: (i64, i64, i64, i64) = (0, 10_000, 2_000, 8_000);

/// Why the fallback range replaced the computed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    NoPayloads,
    SingleValue,
    InvertedBounds,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FallbackReason::NoPayloads => "no payload values",
            FallbackReason::SingleValue => "only one distinct payload value",
            FallbackReason::InvertedBounds => "payload bounds collapse after clamping",
        };
        f.write_str(text)
    }
}

/// Payload slider bounds plus the initial selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadRange {
    pub min: i64,
    pub max: i64,
    pub default_low: i64,
    pub default_high: i64,
    /// Set when the fixed fallback was used instead of the data.
    pub fallback: Option<FallbackReason>,
}

impl PayloadRange {
    pub fn fallback(reason: FallbackReason) -> Self {
        let (min, max, default_low, default_high) = FALLBACK_RANGE;
        Self {
            min,
            max,
            default_low,
            default_high,
            fallback: Some(reason),
        }
    }

    pub fn defaults(&self) -> (i64, i64) {
        (self.default_low, self.default_high)
    }
}

/// Headline figures for the summary panel.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    pub total_launches: usize,
    pub payload_min: i64,
    pub payload_max: i64,
    pub success_rate: f64,
}

impl DatasetSummary {
    pub fn success_rate_text(&self) -> String {
        format!("{:.1}%", self.success_rate * 100.0)
    }

    pub fn payload_range_text(&self) -> String {
        format!("{} kg to {} kg", self.payload_min, self.payload_max)
    }
}

/// Handles the few statistics the dashboard needs.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Slider bounds padded around the observed payloads, defaults at the 10th/90th
    /// percentiles. Degenerate input yields the flagged fallback range.
    pub fn payload_range(payloads: &[f64]) -> PayloadRange {
        let mut sorted: Vec<f64> = payloads.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return PayloadRange::fallback(FallbackReason::NoPayloads);
        }
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let observed_min = Statistics::min(sorted.iter());
        let observed_max = Statistics::max(sorted.iter());
        if observed_min == observed_max {
            return PayloadRange::fallback(FallbackReason::SingleValue);
        }

        let min = ((observed_min - PAYLOAD_PADDING) as i64).max(0);
        let max = ((observed_max + PAYLOAD_PADDING) as i64).min(PAYLOAD_CEILING);
        if min >= max {
            return PayloadRange::fallback(FallbackReason::InvertedBounds);
        }

        let default_low = (Self::percentile(&sorted, 10.0) as i64).clamp(min, max);
        let default_high = (Self::percentile(&sorted, 90.0) as i64).clamp(default_low, max);

        PayloadRange {
            min,
            max,
            default_low,
            default_high,
            fallback: None,
        }
    }

    pub fn summarize(dataset: &LaunchDataset, range: &PayloadRange) -> DatasetSummary {
        let classes = dataset.class_values();
        let success_rate = if classes.is_empty() {
            0.0
        } else {
            Statistics::mean(classes.iter())
        };

        DatasetSummary {
            total_launches: dataset.get_row_count(),
            payload_min: range.min,
            payload_max: range.max,
            success_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::{dataset_from_csv, SAMPLE_CSV};
    use proptest::prelude::*;

    #[test]
    fn percentile_matches_numpy_linear() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert!((StatsCalculator::percentile(&sorted, 10.0) - 1.3).abs() < 1e-12);
        assert_eq!(StatsCalculator::percentile(&sorted, 50.0), 2.5);
        assert_eq!(StatsCalculator::percentile(&sorted, 100.0), 4.0);
    }

    #[test]
    fn range_pads_and_clamps() {
        let payloads = [
            300.0, 1000.0, 1500.0, 2000.0, 2500.0, 3000.0, 3500.0, 4000.0, 4500.0, 5000.0,
            19_800.0,
        ];
        let range = StatsCalculator::payload_range(&payloads);

        assert_eq!(range.min, 0);
        assert_eq!(range.max, 20_000);
        assert_eq!(range.fallback, None);
        assert_eq!(range.defaults(), (1000, 5000));
    }

    #[test]
    fn single_value_falls_back() {
        let range = StatsCalculator::payload_range(&[5000.0, 5000.0, 5000.0]);
        assert_eq!(range, PayloadRange::fallback(FallbackReason::SingleValue));
        assert_eq!(
            (range.min, range.max, range.default_low, range.default_high),
            FALLBACK_RANGE
        );
    }

    #[test]
    fn no_payloads_fall_back() {
        let range = StatsCalculator::payload_range(&[]);
        assert_eq!(range.fallback, Some(FallbackReason::NoPayloads));
    }

    #[test]
    fn heavy_payloads_collapse_to_fallback() {
        let range = StatsCalculator::payload_range(&[25_000.0, 26_000.0]);
        assert_eq!(range.fallback, Some(FallbackReason::InvertedBounds));
    }

    #[test]
    fn summary_reports_rate_and_bounds() {
        let dataset = dataset_from_csv(SAMPLE_CSV);
        let range = StatsCalculator::payload_range(&dataset.payload_values());
        let summary = StatsCalculator::summarize(&dataset, &range);

        assert_eq!(summary.total_launches, 6);
        assert_eq!(summary.payload_range_text(), "0 kg to 10100 kg");
        assert_eq!(summary.success_rate_text(), "50.0%");
    }

    proptest! {
        #[test]
        fn range_is_always_ordered(payloads in prop::collection::vec(0.0f64..30_000.0, 0..60)) {
            let range = StatsCalculator::payload_range(&payloads);
            prop_assert!(range.min < range.max);
            prop_assert!(range.min <= range.default_low);
            prop_assert!(range.default_low <= range.default_high);
            prop_assert!(range.default_high <= range.max);
        }
    }
}
