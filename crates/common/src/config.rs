//! Common configuration types for the gallery renderer.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Default log filter when `GALLERY_LOG_LEVEL` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Observability configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive
    pub log_level: String,
    /// Enable JSON-formatted logs
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            json_logs: false,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ObservabilityConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl ObservabilityConfig {
    /// Load observability settings from a variable map.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ObservabilityConfigError> {
        let log_level = vars
            .get("GALLERY_LOG_LEVEL")
            .cloned()
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        let json_logs = match vars.get("GALLERY_JSON_LOGS") {
            Some(raw) => parse_flag(raw).ok_or_else(|| {
                ObservabilityConfigError::InvalidValue(format!("GALLERY_JSON_LOGS={raw}"))
            })?,
            None => false,
        };

        Ok(Self {
            log_level,
            json_logs,
        })
    }
}

/// Parse a boolean environment flag (`true/false`, `1/0`, `yes/no`).
#[must_use]
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
