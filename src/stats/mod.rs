//! Stats module - payload range and summary calculations

mod calculator;

pub use calculator::{DatasetSummary, FallbackReason, PayloadRange, StatsCalculator};
