//! Gallery renderer configuration.
//!
//! Configuration is loaded from environment variables with defaults matching
//! the browser client's behaviour.

use common::config::{parse_flag, ObservabilityConfig, ObservabilityConfigError};
use std::collections::HashMap;
use std::env;
use std::time::Duration;
use thiserror::Error;

use crate::pagination::MAX_TILES_PER_PAGE;

/// Default render target name for the gallery canvas.
pub const DEFAULT_CANVAS_TARGET: &str = "video-canvas";

/// Default render target name for the share canvas.
pub const DEFAULT_SHARE_TARGET: &str = "share-canvas";

/// Default quiet period before a main canvas resize is emitted.
pub const DEFAULT_CANVAS_DEBOUNCE_MS: u64 = 300;

/// Default quiet period before a share viewport resize is emitted.
pub const DEFAULT_SHARE_DEBOUNCE_MS: u64 = 50;

/// Gallery renderer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Render target name for the gallery canvas (default: "video-canvas").
    pub canvas_target: String,

    /// Render target name for the share canvas (default: "share-canvas").
    pub share_target: String,

    /// Quiet period for main canvas resize debounce (default: 300ms).
    pub canvas_debounce: Duration,

    /// Quiet period for share viewport resize debounce (default: 50ms).
    pub share_debounce: Duration,

    /// Upper bound on tiles per page. Never above the engine ceiling of 9.
    pub max_tiles_per_page: usize,

    /// Whether the page runs cross-origin isolated. Without isolation the
    /// local user's video is drawn by a dedicated element, not the canvas.
    pub cross_origin_isolated: bool,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl From<ObservabilityConfigError> for ConfigError {
    fn from(err: ObservabilityConfigError) -> Self {
        match err {
            ObservabilityConfigError::InvalidValue(v) => ConfigError::InvalidValue(v),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            canvas_target: DEFAULT_CANVAS_TARGET.to_string(),
            share_target: DEFAULT_SHARE_TARGET.to_string(),
            canvas_debounce: Duration::from_millis(DEFAULT_CANVAS_DEBOUNCE_MS),
            share_debounce: Duration::from_millis(DEFAULT_SHARE_DEBOUNCE_MS),
            max_tiles_per_page: MAX_TILES_PER_PAGE,
            cross_origin_isolated: false,
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a `HashMap` (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let canvas_target = vars
            .get("GALLERY_CANVAS_TARGET")
            .cloned()
            .unwrap_or_else(|| DEFAULT_CANVAS_TARGET.to_string());

        let share_target = vars
            .get("GALLERY_SHARE_TARGET")
            .cloned()
            .unwrap_or_else(|| DEFAULT_SHARE_TARGET.to_string());

        let canvas_debounce = Duration::from_millis(parse_number(
            vars,
            "GALLERY_CANVAS_DEBOUNCE_MS",
            DEFAULT_CANVAS_DEBOUNCE_MS,
        )?);

        let share_debounce = Duration::from_millis(parse_number(
            vars,
            "GALLERY_SHARE_DEBOUNCE_MS",
            DEFAULT_SHARE_DEBOUNCE_MS,
        )?);

        let max_tiles_per_page =
            parse_number(vars, "GALLERY_MAX_TILES_PER_PAGE", MAX_TILES_PER_PAGE)?;
        if max_tiles_per_page == 0 || max_tiles_per_page > MAX_TILES_PER_PAGE {
            return Err(ConfigError::InvalidValue(format!(
                "GALLERY_MAX_TILES_PER_PAGE must be between 1 and {MAX_TILES_PER_PAGE}, got {max_tiles_per_page}"
            )));
        }

        let cross_origin_isolated = match vars.get("GALLERY_CROSS_ORIGIN_ISOLATED") {
            Some(raw) => parse_flag(raw).ok_or_else(|| {
                ConfigError::InvalidValue(format!("GALLERY_CROSS_ORIGIN_ISOLATED={raw}"))
            })?,
            None => false,
        };

        let observability = ObservabilityConfig::from_vars(vars)?;

        Ok(Config {
            canvas_target,
            share_target,
            canvas_debounce,
            share_debounce,
            max_tiles_per_page,
            cross_origin_isolated,
            observability,
        })
    }
}

fn parse_number<T: std::str::FromStr>(
    vars: &HashMap<String, String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match vars.get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(format!("{key}={raw}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vars_success_with_defaults() {
        let config = Config::from_vars(&HashMap::new()).expect("Config should load successfully");

        assert_eq!(config, Config::default());
        assert_eq!(config.canvas_debounce, Duration::from_millis(300));
        assert_eq!(config.share_debounce, Duration::from_millis(50));
        assert_eq!(config.max_tiles_per_page, 9);
        assert!(!config.cross_origin_isolated);
    }

    #[test]
    fn test_from_vars_success_with_custom_values() {
        let vars = HashMap::from([
            ("GALLERY_CANVAS_TARGET".to_string(), "grid".to_string()),
            ("GALLERY_SHARE_TARGET".to_string(), "screen".to_string()),
            ("GALLERY_CANVAS_DEBOUNCE_MS".to_string(), "150".to_string()),
            ("GALLERY_SHARE_DEBOUNCE_MS".to_string(), "20".to_string()),
            ("GALLERY_MAX_TILES_PER_PAGE".to_string(), "4".to_string()),
            ("GALLERY_CROSS_ORIGIN_ISOLATED".to_string(), "true".to_string()),
            ("GALLERY_JSON_LOGS".to_string(), "1".to_string()),
        ]);

        let config = Config::from_vars(&vars).expect("Config should load successfully");

        assert_eq!(config.canvas_target, "grid");
        assert_eq!(config.share_target, "screen");
        assert_eq!(config.canvas_debounce, Duration::from_millis(150));
        assert_eq!(config.share_debounce, Duration::from_millis(20));
        assert_eq!(config.max_tiles_per_page, 4);
        assert!(config.cross_origin_isolated);
        assert!(config.observability.json_logs);
    }

    #[test]
    fn test_tiles_per_page_above_engine_ceiling() {
        let vars = HashMap::from([("GALLERY_MAX_TILES_PER_PAGE".to_string(), "16".to_string())]);
        let result = Config::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::InvalidValue(v)) if v.contains("got 16")));
    }

    #[test]
    fn test_tiles_per_page_zero() {
        let vars = HashMap::from([("GALLERY_MAX_TILES_PER_PAGE".to_string(), "0".to_string())]);
        assert!(matches!(
            Config::from_vars(&vars),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_invalid_debounce() {
        let vars = HashMap::from([(
            "GALLERY_CANVAS_DEBOUNCE_MS".to_string(),
            "soon".to_string(),
        )]);
        let result = Config::from_vars(&vars);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue(v)) if v == "GALLERY_CANVAS_DEBOUNCE_MS=soon"
        ));
    }

    #[test]
    fn test_invalid_isolation_flag() {
        let vars = HashMap::from([(
            "GALLERY_CROSS_ORIGIN_ISOLATED".to_string(),
            "sometimes".to_string(),
        )]);
        assert!(matches!(
            Config::from_vars(&vars),
            Err(ConfigError::InvalidValue(_))
        ));
    }
}
