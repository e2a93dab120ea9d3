//! Configuration management module
//!
//! Handles loading, validation, and management of application configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Dashboard refresh rate in milliseconds
    pub refresh_rate_ms: u64,

    /// Snapshot poll period in seconds
    pub poll_interval_secs: u64,

    /// Logging level
    pub log_level: String,

    /// File-based logging configuration
    pub log: LogConfig,

    /// Polymarket stream configuration
    pub polymarket: PolymarketConfig,

    /// Vatic targets API configuration
    pub vatic: VaticConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PolymarketConfig {
    /// RTDS WebSocket URL
    pub ws_url: String,

    /// Delay between reconnection attempts in seconds
    pub reconnect_delay_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct VaticConfig {
    /// Targets API base URL
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// Absolute or relative path to the log file
    pub file_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_rate_ms: 1000,
            poll_interval_secs: 10,
            log_level: "info".to_string(),
            log: LogConfig::default(),
            polymarket: PolymarketConfig::default(),
            vatic: VaticConfig::default(),
        }
    }
}

impl Default for PolymarketConfig {
    fn default() -> Self {
        Self {
            ws_url: "wss://ws-live-data.polymarket.com".to_string(),
            reconnect_delay_secs: 3,
        }
    }
}

impl Default for VaticConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.vatic.trading".to_string(),
            timeout_seconds: 10,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file_path: "logs/targetwatch.log".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment variable overrides
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        // Apply environment variable overrides
        config.apply_env_overrides();

        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        // TARGETWATCH_REFRESH_RATE_MS - dashboard refresh rate
        if let Ok(refresh_rate) = env::var("TARGETWATCH_REFRESH_RATE_MS") {
            if let Ok(value) = refresh_rate.parse::<u64>() {
                self.refresh_rate_ms = value;
            }
        }

        // TARGETWATCH_POLL_INTERVAL_SECS - snapshot poll period
        if let Ok(interval) = env::var("TARGETWATCH_POLL_INTERVAL_SECS") {
            if let Ok(value) = interval.parse::<u64>() {
                self.poll_interval_secs = value;
            }
        }

        // TARGETWATCH_LOG_LEVEL - logging level
        if let Ok(log_level) = env::var("TARGETWATCH_LOG_LEVEL") {
            self.log_level = log_level;
        }

        // TARGETWATCH_LOG_FILE_PATH - logging destination file
        if let Ok(file_path) = env::var("TARGETWATCH_LOG_FILE_PATH") {
            if !file_path.trim().is_empty() {
                self.log.file_path = file_path;
            }
        }

        // TARGETWATCH_POLYMARKET_WS_URL - RTDS WebSocket URL
        if let Ok(ws_url) = env::var("TARGETWATCH_POLYMARKET_WS_URL") {
            self.polymarket.ws_url = ws_url;
        }

        // TARGETWATCH_POLYMARKET_RECONNECT_DELAY_SECS - reconnect delay
        if let Ok(delay) = env::var("TARGETWATCH_POLYMARKET_RECONNECT_DELAY_SECS") {
            if let Ok(value) = delay.parse::<u64>() {
                self.polymarket.reconnect_delay_secs = value;
            }
        }

        // TARGETWATCH_VATIC_BASE_URL - targets API base URL
        if let Ok(base_url) = env::var("TARGETWATCH_VATIC_BASE_URL") {
            self.vatic.base_url = base_url;
        }

        // TARGETWATCH_VATIC_TIMEOUT_SECONDS - request timeout
        if let Ok(timeout) = env::var("TARGETWATCH_VATIC_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse::<u64>() {
                self.vatic.timeout_seconds = value;
            }
        }
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Load configuration with fallback to default
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::load_from_file(path).unwrap_or_else(|err| {
            tracing::warn!("Failed to load config: {}, using defaults", err);
            Self::default()
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.refresh_rate_ms == 0 {
            anyhow::bail!("Refresh rate must be greater than 0");
        }

        if self.poll_interval_secs == 0 {
            anyhow::bail!("Poll interval must be greater than 0");
        }

        if self.polymarket.ws_url.trim().is_empty() {
            anyhow::bail!("Polymarket WebSocket URL must not be empty");
        }

        if self.polymarket.reconnect_delay_secs == 0 {
            anyhow::bail!("Reconnect delay must be greater than 0");
        }

        if self.vatic.base_url.trim().is_empty() {
            anyhow::bail!("Vatic base URL must not be empty");
        }

        if self.vatic.timeout_seconds == 0 {
            anyhow::bail!("Timeout must be greater than 0");
        }

        if self.log.file_path.trim().is_empty() {
            anyhow::bail!("Log file path must not be empty");
        }

        Ok(())
    }
}
