// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration.
//!
//! Configuration is optional. It is read from the YAML file named by the
//! `TEE_SIGN_CONFIG` environment variable, or from `tee-sign.yaml` in the
//! working directory. Missing keys fall back to defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV_VAR: &str = "TEE_SIGN_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "tee-sign.yaml";

/// Options for rasterizing and saving the tee sign.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub file_name: String,
    /// Multiplier applied to the sign's logical size. Must be positive.
    pub scale: f32,
    /// CSS color painted behind the sign.
    pub background_color: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            file_name: "tee-sign.png".to_string(),
            scale: 2.0,
            background_color: "#1f2937".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub export: ExportOptions,
    /// Font used for sign text. System fonts are tried when unset.
    pub font_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        Self::from_yaml_str(&yaml).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Load configuration from the environment-selected file, the default
    /// file, or built-in defaults, in that order.
    pub fn load() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            let path = PathBuf::from(path);
            log::info!("Loading config from {}", path.display());
            return Self::from_file(&path);
        }

        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            log::info!("Loading config from {}", default_path.display());
            return Self::from_file(default_path);
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.export.file_name, "tee-sign.png");
        assert_eq!(config.export.scale, 2.0);
        assert_eq!(config.export.background_color, "#1f2937");
        assert!(config.font_path.is_none());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml_str("export:\n  scale: 3.0\n").unwrap();
        assert_eq!(config.export.scale, 3.0);
        assert_eq!(config.export.file_name, "tee-sign.png");
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r##"
export:
  file_name: hole-7.png
  scale: 1.5
  background_color: "#000000"
font_path: /usr/share/fonts/sign.ttf
"##;
        let config = AppConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.export.file_name, "hole-7.png");
        assert_eq!(config.export.background_color, "#000000");
        assert_eq!(config.font_path, Some(PathBuf::from("/usr/share/fonts/sign.ttf")));
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(AppConfig::from_yaml_str("  \n").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tee-sign.yaml");
        std::fs::write(&path, "export:\n  file_name: out.png\n").unwrap();
        assert_eq!(AppConfig::from_file(&path).unwrap().export.file_name, "out.png");
        assert!(AppConfig::from_file(&dir.path().join("missing.yaml")).is_err());
    }
}
