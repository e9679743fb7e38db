//! Data module - launch record loading, caching and filtering

mod cache;
mod loader;
mod processor;

pub use cache::DashboardContext;
pub use loader::{
    columns, load_dataset, source_for, LaunchDataset, LoadError, DEFAULT_SOURCE_URL,
};
pub use processor::{DataProcessor, FilterState, SiteSelection};
