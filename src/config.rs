//! Configuration types for binance-exchange

use crate::exchange::StopOrderConfig;
use serde::Deserialize;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub exchange: ExchangeConfig,
    #[serde(default)]
    pub order_types: StopOrderConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Exchange selection and trading mode
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeConfig {
    /// Exchange implementation to use (e.g. "binance")
    pub name: String,

    /// Simulate orders locally instead of submitting them
    #[serde(default = "default_true")]
    pub dry_run: bool,

    #[serde(default)]
    pub trading_mode: TradingMode,

    #[serde(default)]
    pub collateral: Collateral,
}

impl ExchangeConfig {
    /// Configuration for a named exchange with the defaults: dry run,
    /// spot trading, isolated collateral.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dry_run: true,
            trading_mode: TradingMode::Spot,
            collateral: Collateral::Isolated,
        }
    }
}

/// Trading mode
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TradingMode {
    #[default]
    Spot,
    Margin,
    Futures,
}

/// Collateral mode for margin/futures trading
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Collateral {
    #[default]
    Isolated,
    Cross,
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
