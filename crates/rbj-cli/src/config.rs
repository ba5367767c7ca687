//! Optional TOML configuration file.
//!
//! ```toml
//! [batch_job]
//! database = "C:\\gis\\topo.gdb"
//! creator = "gis-team"
//! group_name = "Nightly checks"
//! version = "10.8"
//!
//! [conversion]
//! lenient_columns = false
//! strict_specials = true
//! ```
//!
//! Command-line flags take precedence over values from the file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub batch_job: BatchJobConfig,
    pub conversion: ConversionConfig,
}

/// Batch job metadata defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchJobConfig {
    pub database: Option<String>,
    pub creator: Option<String>,
    pub group_name: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConversionConfig {
    pub lenient_columns: bool,
    pub strict_specials: bool,
}

/// Load the configuration file, or defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let content =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("parse config {}", path.display()))?;
    info!(path = %path.display(), "loaded config");
    Ok(config)
}
