// src/config.rs

//! Configuration loading utilities.
//!
//! This module provides convenience functions for loading the configuration
//! file and the page templates it points at.

use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::models::{Config, PathsConfig};

/// Detail and index page templates, loaded once per run.
#[derive(Debug, Clone)]
pub struct Templates {
    pub detail: String,
    pub index: String,
}

impl Templates {
    /// Load both templates relative to `base_path`. A missing template is fatal.
    pub fn load(base_path: &Path, paths: &PathsConfig) -> Result<Self> {
        Ok(Self {
            detail: read_template(&base_path.join(&paths.detail_template))?,
            index: read_template(&base_path.join(&paths.index_template))?,
        })
    }
}

fn read_template(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| AppError::config(format!("Cannot read template {}: {e}", path.display())))
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file is absent; a present but invalid file
/// is an error.
pub fn load_config(path: &Path) -> Result<Config> {
    let config = if path.exists() {
        Config::load(path)?
    } else {
        Config::load_or_default(path)
    };
    config.validate()?;
    Ok(config)
}

/// Public directory resolved against the working directory.
pub fn public_dir(base_path: &Path, config: &Config) -> PathBuf {
    base_path.join(&config.paths.public_dir)
}

/// Load and validate the config and both templates.
pub fn load_all(base_path: &Path, config_path: &Path) -> Result<(Config, Templates)> {
    let config = load_config(config_path)?;
    let templates = Templates::load(base_path, &config.paths)?;
    Ok((config, templates))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_template_is_config_error() {
        let tmp = TempDir::new().unwrap();
        let err = Templates::load(tmp.path(), &PathsConfig::default()).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("template.html"));
    }

    #[test]
    fn test_load_all() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("templates")).unwrap();
        std::fs::write(tmp.path().join("templates/template.html"), "<h1>{{제목}}</h1>").unwrap();
        std::fs::write(tmp.path().join("templates/index.tpl.html"), "{{EVENT_LINKS}}").unwrap();
        std::fs::write(
            tmp.path().join("config.toml"),
            "[crawler]\nmax_pages = 2\n",
        )
        .unwrap();

        let (config, templates) = load_all(tmp.path(), &tmp.path().join("config.toml")).unwrap();
        assert_eq!(config.crawler.max_pages, 2);
        assert_eq!(templates.index, "{{EVENT_LINKS}}");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[crawler]\nmax_pages = 0\n").unwrap();
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config.paths.public_dir, "public");
    }
}
