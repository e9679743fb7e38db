//! Launch Records Loader Module
//! Fetches the launch CSV, parses it with Polars and cleans it into canonical columns.

use polars::prelude::*;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Public launch records published with the course material.
pub const DEFAULT_SOURCE_URL: &str = "https://cf-courses-data.s3.us.cloud-object-storage.appdomain.cloud/IBM-DS0321EN-SkillsNetwork/datasets/dataset_part_2.csv";

/// Canonical column names after cleaning.
pub mod columns {
    pub const PAYLOAD_MASS: &str = "Payload mass";
    pub const LAUNCH_SITE: &str = "Launch site";
    pub const LAUNCH_OUTCOME: &str = "Launch outcome";
    pub const BOOSTER_VERSION: &str = "Version Booster";
    pub const CLASS: &str = "class";
}

use columns::*;

/// Source column name -> canonical column name.
const COLUMN_RENAMES: [(&str, &str); 5] = [
    ("PayloadMass", PAYLOAD_MASS),
    ("LaunchSite", LAUNCH_SITE),
    ("Outcome", LAUNCH_OUTCOME),
    ("BoosterVersion", BOOSTER_VERSION),
    ("Class", CLASS),
];

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to read {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Missing required column `{0}`")]
    MissingColumn(&'static str),
}

/// Somewhere launch records can be read from.
pub trait CsvSource: Send + Sync {
    /// Human readable origin, used in logs and the status line.
    fn describe(&self) -> String;

    /// Raw CSV bytes.
    fn fetch(&self) -> Result<Vec<u8>, LoadError>;
}

/// Reads the CSV over HTTP(S) with a blocking client.
pub struct HttpSource {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl CsvSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        let fetch_err = |source| LoadError::Fetch {
            url: self.url.clone(),
            source,
        };

        let response = self
            .client
            .get(&self.url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(fetch_err)?;
        let bytes = response.bytes().map_err(fetch_err)?;
        Ok(bytes.to_vec())
    }
}

/// Reads the CSV from a local file.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CsvSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        std::fs::read(&self.path).map_err(|source| LoadError::File {
            path: self.path.clone(),
            source,
        })
    }
}

/// HTTP(S) URLs are fetched over the network, anything else is read as a file path.
pub fn source_for(location: &str) -> Arc<dyn CsvSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Arc::new(HttpSource::new(location))
    } else {
        Arc::new(FileSource::new(location))
    }
}

/// Cleaned launch records. Cheap to clone; never mutated after construction.
#[derive(Clone, Default)]
pub struct LaunchDataset {
    df: DataFrame,
}

impl LaunchDataset {
    pub fn new(df: DataFrame) -> Self {
        Self { df }
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Get the number of launch records.
    pub fn get_row_count(&self) -> usize {
        self.df.height()
    }

    /// Get a reference to the cleaned DataFrame.
    pub fn get_dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// All payload masses, in row order.
    pub fn payload_values(&self) -> Vec<f64> {
        self.df
            .column(PAYLOAD_MASS)
            .ok()
            .and_then(|col| col.f64().ok().map(|ca| ca.into_iter().flatten().collect()))
            .unwrap_or_default()
    }

    /// All success classes as floats, in row order.
    pub fn class_values(&self) -> Vec<f64> {
        self.df
            .column(CLASS)
            .ok()
            .and_then(|col| col.cast(&DataType::Float64).ok())
            .and_then(|col| col.f64().ok().map(|ca| ca.into_iter().flatten().collect()))
            .unwrap_or_default()
    }

    /// Sorted distinct launch sites.
    pub fn launch_sites(&self) -> Vec<String> {
        let Ok(sites) = self.df.column(LAUNCH_SITE).and_then(|col| col.str()) else {
            return Vec::new();
        };
        let mut sites: Vec<String> = sites.into_iter().flatten().map(str::to_string).collect();
        sites.sort();
        sites.dedup();
        sites
    }
}

/// Parse CSV bytes with a header row. Malformed cells become null instead of failing.
pub fn parse_csv(bytes: Vec<u8>) -> Result<DataFrame, LoadError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()?;
    Ok(df)
}

/// Rename to canonical columns, derive `class` when absent, coerce payload mass to
/// numeric and drop every row without a payload or a binary class.
pub fn clean(mut df: DataFrame) -> Result<DataFrame, LoadError> {
    for (source, canonical) in COLUMN_RENAMES {
        if df.get_column_index(source).is_some() && df.get_column_index(canonical).is_none() {
            df.rename(source, canonical.into())?;
        }
    }
    // `rename` leaves the cached schema on the old names, which the lazy plan reads.
    df.clear_schema();

    if df.get_column_index(PAYLOAD_MASS).is_none() {
        return Err(LoadError::MissingColumn(PAYLOAD_MASS));
    }
    let has_class = df.get_column_index(CLASS).is_some();
    if !has_class && df.get_column_index(LAUNCH_OUTCOME).is_none() {
        return Err(LoadError::MissingColumn(LAUNCH_OUTCOME));
    }

    // Text payload cells may carry padding, e.g. " 500 ".
    let payload = if df.column(PAYLOAD_MASS)?.dtype() == &DataType::String {
        col(PAYLOAD_MASS).str().strip_chars(lit(" \t"))
    } else {
        col(PAYLOAD_MASS)
    };

    let mut lazy = df.lazy();
    if !has_class {
        lazy = lazy.with_column(
            col(LAUNCH_OUTCOME)
                .cast(DataType::String)
                .str()
                .contains_literal(lit("Success"))
                .fill_null(lit(false))
                .cast(DataType::Int32)
                .alias(CLASS),
        );
    }

    let payload_ok = col(PAYLOAD_MASS)
        .is_not_null()
        .and(col(PAYLOAD_MASS).is_not_nan());
    let class_ok = col(CLASS).eq(lit(0.0)).or(col(CLASS).eq(lit(1.0)));

    let cleaned = lazy
        .with_columns([
            payload.cast(DataType::Float64),
            col(CLASS).cast(DataType::Float64),
        ])
        .filter(payload_ok.and(class_ok))
        .with_column(col(CLASS).cast(DataType::Int32))
        .collect()?;

    Ok(cleaned)
}

/// Fetch, parse and clean. The caller decides what an error means for the UI.
pub fn load_dataset(source: &dyn CsvSource) -> Result<LaunchDataset, LoadError> {
    let bytes = source.fetch()?;
    let raw = parse_csv(bytes)?;
    let raw_rows = raw.height();
    let cleaned = clean(raw)?;
    tracing::debug!(
        raw_rows,
        kept_rows = cleaned.height(),
        "cleaned launch records"
    );
    Ok(LaunchDataset::new(cleaned))
}
