//! Connectivity collaborator contract
//!
//! The trait a ccxt-style client implements. This crate never talks to the
//! network itself; it consumes an [`ExchangeApi`] and layers the
//! Binance-specific rules on top.

use super::error::ApiError;
use super::types::{Candle, CandleType, OrderKind, OrderParams, OrderRecord, OrderSide, RawBrackets};
use async_trait::async_trait;

/// Order placement, precision snapping, and market data, as provided by the
/// external connectivity library.
#[async_trait]
pub trait ExchangeApi: Send + Sync {
    /// Submit an order
    async fn create_order(
        &self,
        pair: &str,
        kind: OrderKind,
        side: OrderSide,
        amount: f64,
        price: f64,
        params: &OrderParams,
    ) -> Result<OrderRecord, ApiError>;

    /// Set the leverage used for subsequent orders on a pair
    async fn set_leverage(&self, pair: &str, leverage: f64) -> Result<(), ApiError>;

    /// Fetch the per-pair leverage bracket tiers
    async fn load_leverage_brackets(&self) -> Result<RawBrackets, ApiError>;

    /// Fetch up to `limit` candles starting at `since_ms`
    async fn fetch_candles(
        &self,
        pair: &str,
        timeframe: &str,
        since_ms: i64,
        limit: usize,
        candle_type: CandleType,
    ) -> Result<Vec<Candle>, ApiError>;

    /// Snap an amount to the pair's amount precision
    fn amount_to_precision(&self, pair: &str, amount: f64) -> f64;

    /// Snap a price to the pair's price precision
    fn price_to_precision(&self, pair: &str, price: f64) -> f64;
}
