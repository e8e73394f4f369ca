// --- File: crates/planicare_config/src/lib.rs ---
//! Typed application configuration.
//!
//! Configuration is layered: `config/default.toml`, then an optional
//! environment-specific file selected by `RUN_ENV`, then `PLANICARE__*`
//! environment variable overrides (double underscore as separator, e.g.
//! `PLANICARE__SCHEDULING__HORIZON_DAYS=120`). Dependent crates only ever
//! see the resolved [`AppConfig`].

use chrono_tz::Tz;
use config::{Config, ConfigError, Environment, File};
use dotenv::dotenv;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

static DOTENV: OnceCell<()> = OnceCell::new();

/// Loads `.env` once; later calls are no-ops.
pub fn ensure_dotenv_loaded() {
    DOTENV.get_or_init(|| {
        // Missing .env is fine; environments without one rely on real env vars.
        let _ = dotenv();
    });
}

/// Scheduling knobs of the event engine.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SchedulingConfig {
    /// Forward window, in days, up to which series occurrences are
    /// materialized ahead of "now".
    #[serde(default = "default_horizon_days")]
    pub horizon_days: i64,
    /// IANA time zone used for business-calendar-day reasoning.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_horizon_days() -> i64 {
    90
}

fn default_timezone() -> String {
    "Europe/Paris".to_string()
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        SchedulingConfig {
            horizon_days: default_horizon_days(),
            timezone: default_timezone(),
        }
    }
}

impl SchedulingConfig {
    /// Resolves the configured time zone, falling back to the default when
    /// the string is not a known IANA name.
    pub fn tz(&self) -> Tz {
        self.timezone.parse().unwrap_or(chrono_tz::Europe::Paris)
    }
}

/// Root application configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub scheduling: SchedulingConfig,
}

/// Loads the layered configuration.
pub fn load_config() -> Result<Arc<AppConfig>, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".to_string());
    debug!("Loading configuration for RUN_ENV={}", run_env);

    let config = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{}", run_env)).required(false))
        .add_source(Environment::with_prefix("PLANICARE").separator("__"))
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;
    Ok(Arc::new(app_config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = AppConfig::default();
        assert_eq!(config.scheduling.horizon_days, 90);
        assert_eq!(config.scheduling.tz(), chrono_tz::Europe::Paris);
    }

    #[test]
    fn scheduling_section_deserializes() {
        let config: AppConfig = serde_json::from_str(
            r#"{"scheduling": {"horizon_days": 30, "timezone": "Europe/Zurich"}}"#,
        )
        .expect("scheduling config should deserialize");
        assert_eq!(config.scheduling.horizon_days, 30);
        assert_eq!(config.scheduling.tz(), chrono_tz::Europe::Zurich);
    }

    #[test]
    fn load_config_without_files_yields_the_defaults() {
        let config = load_config().expect("layered load should succeed");
        assert_eq!(config.scheduling.horizon_days, 90);
    }

    #[test]
    fn unknown_timezone_falls_back() {
        let scheduling =
            SchedulingConfig { horizon_days: 90, timezone: "Mars/Olympus".to_string() };
        assert_eq!(scheduling.tz(), chrono_tz::Europe::Paris);
    }
}
