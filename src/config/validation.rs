// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Checks that a loaded [`EngineConfig`] can be applied before anything uses it.

use crate::config::EngineConfig;
use crate::errors::ConfigError;

/// Reject an empty log filter and resource directories that do not exist.
pub fn validate_config(config: &EngineConfig) -> Result<(), ConfigError> {
    if config.log_filter.trim().is_empty() {
        return Err(ConfigError::EmptyLogFilter);
    }

    if let Some(dir) = config.resource_dirs.iter().find(|dir| !dir.is_dir()) {
        return Err(ConfigError::MissingResourceDir(dir.clone()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_config() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        std::fs::write(&file, "not a directory").unwrap();

        let cases = vec![
            ("defaults", EngineConfig::default(), true),
            (
                "blank filter",
                EngineConfig {
                    log_filter: "  ".to_string(),
                    ..EngineConfig::default()
                },
                false,
            ),
            (
                "existing dir",
                EngineConfig {
                    resource_dirs: vec![dir.path().to_path_buf()],
                    ..EngineConfig::default()
                },
                true,
            ),
            (
                "file instead of dir",
                EngineConfig {
                    resource_dirs: vec![file.clone()],
                    ..EngineConfig::default()
                },
                false,
            ),
        ];

        for (name, config, valid) in cases {
            assert_eq!(validate_config(&config).is_ok(), valid, "case '{}'", name);
        }
    }
}
