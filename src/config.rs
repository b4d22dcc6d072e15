//! Reporting configuration.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::context::Strategy;
use crate::error::ConfigError;

/// Order in which frames are listed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameOrder {
    /// Most recent call last.
    #[default]
    OutermostFirst,
    InnermostFirst,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default = "default_max_lookback")]
    pub max_lookback: usize,
    #[serde(default = "default_value_width")]
    pub value_width: usize,
    #[serde(default = "default_indent")]
    pub indent: String,
    /// Lines shown before and after the faulting line; 0 disables the window.
    #[serde(default)]
    pub context_lines: usize,
    #[serde(default)]
    pub order: FrameOrder,
    /// Append the host-formatted traceback text after the summary.
    #[serde(default)]
    pub full_traceback: bool,
    /// Extra path stems whose frames are skipped.
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default = "bool_true")]
    pub show_durations: bool,
    #[serde(default = "default_banner")]
    pub banner: String,
}

fn default_max_lookback() -> usize {
    10
}

fn default_value_width() -> usize {
    60
}

fn default_indent() -> String {
    "  ".to_string()
}

fn bool_true() -> bool {
    true
}

fn default_banner() -> String {
    "Traceback (most recent call last):".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            max_lookback: default_max_lookback(),
            value_width: default_value_width(),
            indent: default_indent(),
            context_lines: 0,
            order: FrameOrder::default(),
            full_traceback: false,
            exclude: Vec::new(),
            show_durations: true,
            banner: default_banner(),
        }
    }
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.value_width == 0 {
            return Err(ConfigError::OutOfRange {
                field: "value_width",
                reason: "must be at least 1".to_string(),
            });
        }
        if !self.indent.chars().all(|ch| ch == ' ' || ch == '\t') {
            return Err(ConfigError::OutOfRange {
                field: "indent",
                reason: format!("must be spaces or tabs, got {:?}", self.indent),
            });
        }
        Ok(())
    }
}
