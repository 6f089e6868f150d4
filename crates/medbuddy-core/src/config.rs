//! Environment-driven configuration.

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::chat::DEFAULT_REPLY_DELAY_MS;
use crate::pharmacy::SEARCH_RADIUS_M;
use crate::schedule::DEFAULT_SWEEP_INTERVAL_SECS;

pub const DB_PATH_VAR: &str = "MEDBUDDY_DB_PATH";
pub const MAPS_API_KEY_VAR: &str = "GOOGLE_MAPS_API_KEY";
pub const REPLY_DELAY_VAR: &str = "MEDBUDDY_REPLY_DELAY_MS";
pub const SEARCH_RADIUS_VAR: &str = "MEDBUDDY_SEARCH_RADIUS_M";
pub const SWEEP_INTERVAL_VAR: &str = "MEDBUDDY_SWEEP_INTERVAL_SECS";
pub const LOG_VAR: &str = "MEDBUDDY_LOG";

pub const DEFAULT_DB_PATH: &str = "medbuddy.db";
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Configuration errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub maps_api_key: Option<String>,
    pub reply_delay_ms: u64,
    pub search_radius_m: u32,
    pub sweep_interval_secs: u64,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            maps_api_key: None,
            reply_delay_ms: DEFAULT_REPLY_DELAY_MS,
            search_radius_m: SEARCH_RADIUS_M,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable lookup. Unset or blank variables take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            db_path: get(DB_PATH_VAR).map(PathBuf::from).unwrap_or(defaults.db_path),
            maps_api_key: get(MAPS_API_KEY_VAR),
            reply_delay_ms: parse_or(get(REPLY_DELAY_VAR), REPLY_DELAY_VAR, defaults.reply_delay_ms)?,
            search_radius_m: parse_or(get(SEARCH_RADIUS_VAR), SEARCH_RADIUS_VAR, defaults.search_radius_m)?,
            sweep_interval_secs: parse_or(
                get(SWEEP_INTERVAL_VAR),
                SWEEP_INTERVAL_VAR,
                defaults.sweep_interval_secs,
            )?,
            log_filter: get(LOG_VAR).unwrap_or(defaults.log_filter),
        })
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, var: &'static str, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
    }
}

/// Install the global tracing subscriber. `RUST_LOG` overrides `default_filter`.
///
/// Later calls are no-ops.
pub fn init_logging(default_filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.db_path, PathBuf::from("medbuddy.db"));
        assert_eq!(config.reply_delay_ms, 1000);
        assert_eq!(config.search_radius_m, 5000);
        assert_eq!(config.sweep_interval_secs, 60);
        assert_eq!(config.log_filter, "info");
        assert!(config.maps_api_key.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            (DB_PATH_VAR, "/data/med.db"),
            (MAPS_API_KEY_VAR, "key-123"),
            (REPLY_DELAY_VAR, "250"),
            (SEARCH_RADIUS_VAR, " 2000 "),
            (LOG_VAR, "medbuddy_core=debug"),
        ]))
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/data/med.db"));
        assert_eq!(config.maps_api_key.as_deref(), Some("key-123"));
        assert_eq!(config.reply_delay_ms, 250);
        assert_eq!(config.search_radius_m, 2000);
        assert_eq!(config.sweep_interval_secs, 60);
        assert_eq!(config.log_filter, "medbuddy_core=debug");
    }

    #[test]
    fn test_blank_is_default() {
        let config = AppConfig::from_lookup(lookup(&[(MAPS_API_KEY_VAR, "  ")])).unwrap();
        assert!(config.maps_api_key.is_none());
    }

    #[test]
    fn test_malformed_number() {
        let err = AppConfig::from_lookup(lookup(&[(SWEEP_INTERVAL_VAR, "soon")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                var: SWEEP_INTERVAL_VAR,
                value: "soon".into()
            }
        );
    }
}
