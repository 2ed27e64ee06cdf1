use std::path::PathBuf;

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub locations: LocationsConfig,
    pub refresh: RefreshConfig,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LocationsConfig {
    /// JSON array of location records.
    pub path: PathBuf,
}

impl Default for LocationsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("dining-locations.json"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RefreshConfig {
    pub interval_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self { interval_secs: 60 }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelemetryConfig {
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            retry_delay_ms: 500,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        // .env is optional; deployments set variables directly
        let _ = dotenvy::dotenv();

        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dining-status");

        let builder = Config::builder()
            // 1. Defaults
            .set_default("locations.path", "dining-locations.json")?
            .set_default("refresh.interval_secs", 60)?
            .set_default("telemetry.max_attempts", 2)?
            .set_default("telemetry.retry_delay_ms", 500)?
            // 2. Local config file (optional, lowest priority)
            .add_source(File::from(PathBuf::from("config.toml")).required(false))
            // 3. User config directory (optional, overrides local)
            .add_source(File::from(config_dir.join("config.toml")).required(false))
            // 4. Environment variables (DINING__REFRESH__INTERVAL_SECS=...)
            .add_source(Environment::with_prefix("DINING").separator("__"));

        let s = builder.build()?;
        Ok(s.try_deserialize()?)
    }
}
