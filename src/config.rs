//! Configuration management for the risk scoring service

use crate::scoring::rules::RuleTables;
use crate::types::prediction::RiskLevelThresholds;
use anyhow::{ensure, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub detection: DetectionConfig,
    pub rules: RuleTables,
    pub metrics: MetricsConfig,
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins; empty allows any origin
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            allowed_origins: Vec::new(),
        }
    }
}

/// Detection configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Risk level classification thresholds
    pub risk_levels: RiskLevelThresholds,
    /// Largest batch accepted by the prediction endpoint
    pub max_batch_size: usize,
    /// Seed for reproducible noise; unset uses a thread-local RNG
    pub noise_seed: Option<u64>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            risk_levels: RiskLevelThresholds::default(),
            max_batch_size: 100,
            noise_seed: None,
        }
    }
}

/// Service metrics configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Seconds between summary log lines, 0 disables the reporter
    pub report_interval_secs: u64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            report_interval_secs: 60,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `FRAUDGUARD_CONFIG` or the default path
    pub fn load() -> Result<Self> {
        let path =
            std::env::var("FRAUDGUARD_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from_path(path)
    }

    /// Load configuration from a specific path.
    ///
    /// The file is optional; `FRAUDGUARD__SECTION__KEY` environment
    /// variables override it.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(
                Environment::with_prefix("FRAUDGUARD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the engine cannot score with
    pub fn validate(&self) -> Result<()> {
        let t = &self.detection.risk_levels;
        ensure!(
            (0.0..=1.0).contains(&t.low) && (0.0..=1.0).contains(&t.high),
            "risk thresholds must lie within [0, 1]"
        );
        ensure!(
            t.low <= t.medium && t.medium <= t.high,
            "risk thresholds must satisfy low <= medium <= high (got {} / {} / {})",
            t.low,
            t.medium,
            t.high
        );
        ensure!(
            self.detection.max_batch_size >= 1,
            "detection.max_batch_size must be at least 1"
        );

        let rules = &self.rules;
        ensure!(
            rules.amount_tiers.iter().all(|t| t.contribution >= 0.0),
            "amount tier contributions must be non-negative"
        );
        ensure!(
            rules.payment_methods.values().all(|&r| r >= 0.0)
                && rules.unknown_payment_method >= 0.0,
            "payment method contributions must be non-negative"
        );
        ensure!(
            rules.night_ends_at_hour <= 24,
            "rules.night_ends_at_hour must be an hour of the day"
        );

        Ok(())
    }
}
