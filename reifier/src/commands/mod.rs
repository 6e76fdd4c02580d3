//! Command handlers for the reifier CLI.

pub mod generate;
pub mod info;
pub mod init;
pub mod list;

use crate::cli::Cli;
use reifier_core::config::{ReifierConfig, ReifierConfigBuilder};
use reifier_core::error::{ReifierError, Result};
use std::path::PathBuf;
use tracing::{error, info};

/// Loads the configuration named by `--config`, or searches for reifier.toml.
///
/// Without `--config`, a missing file means defaults.
pub fn load_config(cli: &Cli) -> Result<ReifierConfig> {
    let loaded = match &cli.config {
        Some(path) => ReifierConfig::from_path(path),
        None => ReifierConfig::new(),
    };
    match loaded {
        Ok(config) => {
            info!("Configuration loaded successfully");
            Ok(config)
        }
        Err(ReifierError::ConfigNotFound { .. }) if cli.config.is_none() => {
            info!("No reifier.toml found, using defaults");
            Ok(ReifierConfig::default())
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}

/// Jars given on the command line replace the configured classpath.
pub fn with_jars(config: ReifierConfig, jars: &[PathBuf]) -> ReifierConfig {
    if jars.is_empty() {
        return config;
    }
    let mut config = ReifierConfigBuilder::from_config(config).jars(jars).build();
    config.classpath.directories.clear();
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_with_jars_replaces_classpath() {
        let config = ReifierConfig::builder()
            .jar("configured/gradle-a.jar")
            .directory("configured/lib")
            .build();

        let config = with_jars(config, &[PathBuf::from("cli/gradle-b.jar")]);

        assert_eq!(config.classpath.jars, vec!["cli/gradle-b.jar"]);
        assert!(config.classpath.directories.is_empty());
    }

    #[test]
    fn test_with_no_jars_keeps_classpath() {
        let config = ReifierConfig::builder().directory("configured/lib").build();
        assert_eq!(with_jars(config.clone(), &[]), config);
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("reifier.toml");
        let cli = Cli::parse_from(["reifier", "--config", missing.to_str().unwrap(), "info"]);

        assert!(matches!(load_config(&cli), Err(ReifierError::Io(_))));
    }

    #[test]
    fn test_explicit_config_is_loaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[scan]\njar_prefix = \"acme-\"\n").unwrap();
        let cli = Cli::parse_from(["reifier", "-c", path.to_str().unwrap(), "info"]);

        assert_eq!(load_config(&cli).unwrap().scan.jar_prefix, "acme-");
    }
}
