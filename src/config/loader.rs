// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::DEFAULT_LOG_FILTER;
use crate::config::validation::validate_config;
use crate::errors::ConfigError;
use crate::registry::ResolutionPolicy;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Engine configuration.
///
/// Loaded from YAML or TOML; the format is chosen by file extension. Every
/// field is optional.
///
/// # Fields
/// * `resolution_policy` - How the element registry treats tags claimed by
///   several element types (`first_match` or `strict`)
/// * `log_filter` - `tracing` env-filter directive used when `RUST_LOG` is unset
/// * `resource_dirs` - Directories registered as extra resource bundles, searched
///   after the bundled resources in the order given
///
/// # Example
/// ```yaml
/// resolution_policy: strict
/// log_filter: "flowwood=debug"
/// resource_dirs:
///   - ./schemas
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub resolution_policy: ResolutionPolicy,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default)]
    pub resource_dirs: Vec<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            resolution_policy: ResolutionPolicy::default(),
            log_filter: default_log_filter(),
            resource_dirs: Vec::new(),
        }
    }
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

/// Load a config from a YAML (`.yaml`, `.yml`) or TOML (`.toml`) file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<EngineConfig, ConfigError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match extension.as_str() {
        "yaml" | "yml" => Ok(serde_yaml::from_str(&content)?),
        "toml" => Ok(toml::from_str(&content)?),
        other => Err(ConfigError::UnsupportedFormat(other.to_string())),
    }
}

/// Load a config and check that it can be applied.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<EngineConfig, ConfigError> {
    let cfg = load_config(path)?;
    validate_config(&cfg)?;
    Ok(cfg)
}
