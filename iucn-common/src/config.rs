//! Configuration loading and input root resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the input root directory
pub const INPUT_DIR_ENV: &str = "IUCN_INPUT_DIR";

/// Environment variable naming the TOML config file
pub const CONFIG_FILE_ENV: &str = "IUCN_CONFIG";

/// Optional settings read from a TOML file
///
/// ```toml
/// input_dir = "/data/redlist/exports"
/// log_filter = "iucn_import=info"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportConfig {
    /// Directory whose subdirectories hold the per-dataset exports
    pub input_dir: Option<PathBuf>,
    /// `tracing_subscriber::EnvFilter` directive used when RUST_LOG is unset
    pub log_filter: Option<String>,
}

impl ImportConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }
}

/// Input root resolution, highest priority first:
/// 1. Command-line argument (clap also fills this from `IUCN_INPUT_DIR`)
/// 2. TOML config file `input_dir`
/// 3. Process working directory
pub fn resolve_input_dir(cli_arg: Option<&Path>, config: &ImportConfig) -> Result<PathBuf> {
    if let Some(path) = cli_arg {
        return Ok(path.to_path_buf());
    }

    if let Some(path) = &config.input_dir {
        return Ok(path.clone());
    }

    Ok(std::env::current_dir()?)
}
