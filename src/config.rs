//! Bundle configuration loaded from JSON.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Separator must be a single ASCII character, got {0:?}")]
    Separator(char),
    #[error("Label column must not be empty")]
    EmptyLabel,
    #[error("test_ratio must be in (0, 1), got {0}")]
    TestRatio(f64),
    #[error("usage_ratio must be in [0, 1], got {0}")]
    UsageRatio(f64),
}

/// Everything needed to build and write one competition bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleConfig {
    pub data_path: PathBuf,
    #[serde(default = "default_separator")]
    pub separator: char,
    pub label_column: String,
    #[serde(default = "default_test_ratio")]
    pub test_ratio: f64,
    #[serde(default = "default_usage_ratio")]
    pub usage_ratio: f64,
    #[serde(default)]
    pub junk_columns: Vec<String>,
    #[serde(default = "default_value")]
    pub default_value: String,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_separator() -> char {
    ','
}

fn default_test_ratio() -> f64 {
    0.2
}

fn default_usage_ratio() -> f64 {
    0.5
}

fn default_value() -> String {
    "0".to_string()
}

fn default_seed() -> u64 {
    42
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// The in-memory part of a config: what `build_bundle` needs.
#[derive(Debug, Clone, PartialEq)]
pub struct BundleParams {
    pub label_column: String,
    pub test_ratio: f64,
    pub usage_ratio: f64,
    pub junk_columns: Vec<String>,
    pub default_value: String,
}

impl BundleConfig {
    /// Config with defaults for everything but the input path and label.
    pub fn new(data_path: impl Into<PathBuf>, label_column: impl Into<String>) -> Self {
        Self {
            data_path: data_path.into(),
            separator: default_separator(),
            label_column: label_column.into(),
            test_ratio: default_test_ratio(),
            usage_ratio: default_usage_ratio(),
            junk_columns: Vec::new(),
            default_value: default_value(),
            seed: default_seed(),
            output_dir: default_output_dir(),
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.separator_byte()?;
        if self.label_column.is_empty() {
            return Err(ConfigError::EmptyLabel);
        }
        if !(self.test_ratio > 0.0 && self.test_ratio < 1.0) {
            return Err(ConfigError::TestRatio(self.test_ratio));
        }
        if !(0.0..=1.0).contains(&self.usage_ratio) {
            return Err(ConfigError::UsageRatio(self.usage_ratio));
        }
        Ok(())
    }

    pub fn separator_byte(&self) -> Result<u8, ConfigError> {
        if self.separator.is_ascii() {
            Ok(self.separator as u8)
        } else {
            Err(ConfigError::Separator(self.separator))
        }
    }

    pub fn params(&self) -> BundleParams {
        BundleParams {
            label_column: self.label_column.clone(),
            test_ratio: self.test_ratio,
            usage_ratio: self.usage_ratio,
            junk_columns: self.junk_columns.clone(),
            default_value: self.default_value.clone(),
        }
    }
}
