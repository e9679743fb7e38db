//! Dashboard Configuration
//! Optional `dashboard.json` in the working directory; every field has a default.

use crate::data::DEFAULT_SOURCE_URL;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "dashboard.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Runtime settings for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Where the launch records CSV is fetched from.
    pub source_url: String,
    /// Seconds a loaded dataset stays fresh before it is fetched again.
    pub cache_ttl_secs: u64,
    pub export_width: u32,
    pub export_height: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            cache_ttl_secs: 3600,
            export_width: 1200,
            export_height: 800,
        }
    }
}

impl DashboardConfig {
    /// Load config from `path`, falling back to defaults when the file is absent.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn export_size(&self) -> (u32, u32) {
        (self.export_width.max(200), self.export_height.max(200))
    }
}
