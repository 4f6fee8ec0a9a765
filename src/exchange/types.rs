//! Exchange types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order identifier
pub type OrderId = Uuid;

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "buy",
            OrderSide::Sell => "sell",
        }
    }
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    /// Market order (immediate execution)
    Market,
    /// Limit order (price specified)
    Limit,
    /// Stop-limit order: triggers at the stop price, executes as a limit
    StopLossLimit,
}

impl OrderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderKind::Market => "market",
            OrderKind::Limit => "limit",
            OrderKind::StopLossLimit => "stop_loss_limit",
        }
    }
}

impl std::fmt::Display for OrderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Open,
    Closed,
    Canceled,
}

/// An order as recorded by the exchange (or synthesized in dry-run mode)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Order ID
    pub id: OrderId,
    /// Trading pair
    pub pair: String,
    /// Order type
    pub kind: OrderKind,
    /// Order side
    pub side: OrderSide,
    /// Order amount in base currency
    pub amount: f64,
    /// Order price
    pub price: f64,
    /// Trigger price for stop orders
    pub stop_price: Option<f64>,
    /// Leverage applied to the position
    pub leverage: f64,
    /// Order status
    pub status: OrderStatus,
    /// Creation timestamp
    pub timestamp: DateTime<Utc>,
}

/// Extra parameters forwarded with an order submission
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderParams {
    /// Trigger price for stop orders
    pub stop_price: Option<f64>,
}

/// Recognized options for exchange-side stop-loss orders.
///
/// An explicit structure rather than a free-form options map: every field
/// is named, typed, and carries its default.
#[derive(Debug, Clone, Deserialize)]
pub struct StopOrderConfig {
    /// Ratio of the stop price at which the limit leg is placed; the limit
    /// sits below the stop for sells and above it for buys
    #[serde(default = "default_limit_ratio")]
    pub stoploss_on_exchange_limit_ratio: f64,
}

fn default_limit_ratio() -> f64 {
    0.99
}

impl Default for StopOrderConfig {
    fn default() -> Self {
        Self {
            stoploss_on_exchange_limit_ratio: 0.99,
        }
    }
}

/// Inputs for a liquidation price estimate
#[derive(Debug, Clone)]
pub struct LiquidationInputs {
    /// Trading pair
    pub pair: String,
    /// Entry price of the position
    pub open_rate: f64,
    /// True for short positions
    pub is_short: bool,
    /// Position size in base currency (sign is ignored)
    pub position: f64,
    /// Wallet balance (isolated) or margin balance (cross)
    pub wallet_balance: f64,
    /// Maintenance margin of all other contracts (cross only)
    pub mm_ex_other: f64,
    /// Unrealized PnL of all other contracts (cross only)
    pub upnl_ex_other: f64,
}

impl LiquidationInputs {
    /// Inputs for an isolated position; the cross-only terms are zero.
    pub fn isolated(
        pair: impl Into<String>,
        open_rate: f64,
        is_short: bool,
        position: f64,
        wallet_balance: f64,
    ) -> Self {
        Self {
            pair: pair.into(),
            open_rate,
            is_short,
            position,
            wallet_balance,
            mm_ex_other: 0.0,
            upnl_ex_other: 0.0,
        }
    }
}

/// A single OHLCV candle, open time in epoch milliseconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    pub open_time_ms: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Candle flavor requested from the exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandleType {
    Spot,
    Futures,
    Mark,
}

/// A raw bracket tier value: exchanges deliver these as numbers or numeric
/// strings, so deserialization stays lenient and coercion happens in the
/// bracket builder.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TierValue {
    Num(f64),
    Text(String),
}

impl TierValue {
    pub fn as_f64(&self) -> Result<f64, super::ExchangeError> {
        match self {
            TierValue::Num(n) => Ok(*n),
            TierValue::Text(s) => s.trim().parse().map_err(|_| {
                super::ExchangeError::Operational(format!("non-numeric bracket value: {s:?}"))
            }),
        }
    }
}

/// Raw leverage brackets as fetched: pair to ordered (floor, ratio) tiers
pub type RawBrackets = std::collections::HashMap<String, Vec<[TierValue; 2]>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_side_strings() {
        assert_eq!(OrderSide::Buy.as_str(), "buy");
        assert_eq!(OrderSide::Sell.as_str(), "sell");
        assert_eq!(format!("{}", OrderSide::Sell), "sell");
    }

    #[test]
    fn test_order_kind_strings() {
        assert_eq!(OrderKind::StopLossLimit.as_str(), "stop_loss_limit");
        assert_eq!(format!("{}", OrderKind::StopLossLimit), "stop_loss_limit");
    }

    #[test]
    fn test_stop_order_config_default_ratio() {
        let config = StopOrderConfig::default();
        assert_eq!(config.stoploss_on_exchange_limit_ratio, 0.99);
    }

    #[test]
    fn test_stop_order_config_deserialize_empty() {
        let config: StopOrderConfig = toml::from_str("").unwrap();
        assert_eq!(config.stoploss_on_exchange_limit_ratio, 0.99);
    }

    #[test]
    fn test_stop_order_config_deserialize_override() {
        let config: StopOrderConfig =
            toml::from_str("stoploss_on_exchange_limit_ratio = 0.98").unwrap();
        assert_eq!(config.stoploss_on_exchange_limit_ratio, 0.98);
    }

    #[test]
    fn test_liquidation_inputs_isolated() {
        let inputs = LiquidationInputs::isolated("ETH/USDT:USDT", 1500.0, false, 2.0, 100.0);
        assert_eq!(inputs.mm_ex_other, 0.0);
        assert_eq!(inputs.upnl_ex_other, 0.0);
        assert!(!inputs.is_short);
    }

    #[test]
    fn test_tier_value_coercion() {
        assert_eq!(TierValue::Num(0.025).as_f64().unwrap(), 0.025);
        assert_eq!(TierValue::Text("100000".into()).as_f64().unwrap(), 100000.0);
        assert_eq!(TierValue::Text(" 0.05 ".into()).as_f64().unwrap(), 0.05);
        assert!(TierValue::Text("abc".into()).as_f64().is_err());
    }

    #[test]
    fn test_raw_brackets_deserialize_mixed() {
        let raw: RawBrackets = serde_json::from_str(
            r#"{"ETH/USDT:USDT": [[0, 0.01], ["10000", "0.025"], [50000.0, 0.05]]}"#,
        )
        .unwrap();
        let tiers = &raw["ETH/USDT:USDT"];
        assert_eq!(tiers.len(), 3);
        assert_eq!(tiers[1][0].as_f64().unwrap(), 10000.0);
        assert_eq!(tiers[1][1].as_f64().unwrap(), 0.025);
    }
}
