//! Generic exchange abstraction
//!
//! Defines the contract an exchange implementation satisfies (bracket
//! refresh, leverage resolution, liquidation pricing, stop-loss placement)
//! and the collaborator trait it is built on. Implementations are selected
//! through configuration, not a class hierarchy.

mod api;
mod error;
mod types;

pub use api::ExchangeApi;
pub use error::{ApiError, ExchangeError};
pub use types::{
    Candle, CandleType, LiquidationInputs, OrderId, OrderKind, OrderParams, OrderRecord,
    OrderSide, OrderStatus, RawBrackets, StopOrderConfig, TierValue,
};

use crate::config::ExchangeConfig;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::Arc;

/// Retry budget for collaborator paths that tolerate retries
pub(crate) const API_RETRY_COUNT: u32 = 4;

/// Contract for an exchange specialization.
#[async_trait]
pub trait Exchange: Send + Sync {
    /// Build (or rebuild) the per-pair leverage bracket table
    async fn fill_leverage_brackets(&self) -> Result<(), ExchangeError>;

    /// Maximum leverage a pair can be traded at for a given stake
    fn max_leverage(&self, pair: &str, stake_amount: f64) -> f64;

    /// Maintenance margin ratio and amount for a position's notional value
    fn maintenance_ratio_and_amt(
        &self,
        pair: &str,
        nominal_value: f64,
    ) -> Result<(f64, f64), ExchangeError>;

    /// Estimated liquidation price for a position
    fn liquidation_price(&self, inputs: &LiquidationInputs) -> Result<f64, ExchangeError>;

    /// Place an exchange-side stop-loss limit order
    async fn stoploss(
        &self,
        pair: &str,
        amount: f64,
        stop_price: f64,
        order_types: &StopOrderConfig,
        side: OrderSide,
        leverage: f64,
    ) -> Result<OrderRecord, ExchangeError>;

    /// Whether an existing stop order needs replacing for a new stop price
    fn stoploss_adjust(&self, stop_loss: f64, order: &OrderRecord, side: OrderSide) -> bool;

    /// Paginated historic candle backfill with new-pair start detection
    async fn historic_candles(
        &self,
        pair: &str,
        timeframe: &str,
        since_ms: i64,
        candle_type: CandleType,
        is_new_pair: bool,
    ) -> Result<Vec<Candle>, ExchangeError>;

    /// Whether a position opened at `open_date` is past the funding-fee
    /// charge cutoff
    fn funding_fee_cutoff(&self, open_date: DateTime<Utc>) -> bool;
}

/// Build the exchange implementation named in the configuration.
pub fn new_exchange(
    api: Arc<dyn ExchangeApi>,
    config: ExchangeConfig,
) -> anyhow::Result<Arc<dyn Exchange>> {
    match config.name.as_str() {
        "binance" => Ok(Arc::new(crate::binance::Binance::new(api, config))),
        other => anyhow::bail!("unsupported exchange: {}", other),
    }
}

/// Run an operation with a bounded retry budget. Only retryable errors
/// (rate limits, transient network/exchange failures) are retried.
pub(crate) async fn with_retries<T, F, Fut>(attempts: u32, mut op: F) -> Result<T, ExchangeError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ExchangeError>>,
{
    let mut remaining = attempts;
    loop {
        match op().await {
            Err(e) if e.is_retryable() && remaining > 0 => {
                remaining -= 1;
                tracing::warn!(error = %e, remaining, "retrying exchange call");
            }
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExchangeConfig;
    use crate::testutil::MockApi;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_factory_selects_binance() {
        let api = Arc::new(MockApi::default());
        let exchange = new_exchange(api, ExchangeConfig::named("binance"));
        assert!(exchange.is_ok());
    }

    #[test]
    fn test_factory_rejects_unknown_exchange() {
        let api = Arc::new(MockApi::default());
        let err = new_exchange(api, ExchangeConfig::named("kraken")).err().unwrap();
        assert!(err.to_string().contains("unsupported exchange"));
    }

    #[tokio::test]
    async fn test_with_retries_retries_transient_then_succeeds() {
        let calls = AtomicU32::new(0);
        let calls = &calls;
        let result = with_retries(4, || async move {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(ExchangeError::Temporary("flaky".into()))
            } else {
                Ok(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_with_retries_exhausts_budget() {
        let calls = AtomicU32::new(0);
        let calls = &calls;
        let result: Result<(), _> = with_retries(4, || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(ExchangeError::Temporary("still down".into()))
        })
        .await;
        assert!(result.is_err());
        // Initial attempt plus four retries
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_with_retries_does_not_retry_usage_errors() {
        let calls = AtomicU32::new(0);
        let calls = &calls;
        let result: Result<(), _> = with_retries(4, || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(ExchangeError::Usage("bad input".into()))
        })
        .await;
        assert!(matches!(result, Err(ExchangeError::Usage(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
