//! Binance exchange implementation
//!
//! Satisfies the generic [`Exchange`] contract by composition over an
//! [`ExchangeApi`] collaborator: stop-loss limit orders, leverage bracket
//! tables, max-leverage resolution, and liquidation pricing under Binance's
//! published margin formulas.

mod brackets;
mod candles;
mod leverage;
mod liquidation;
mod stoploss;

pub use brackets::{Bracket, BracketTable};

use crate::config::ExchangeConfig;
use crate::exchange::{
    Candle, CandleType, Exchange, ExchangeApi, ExchangeError, LiquidationInputs, OrderKind,
    OrderRecord, OrderSide, OrderStatus, StopOrderConfig,
};
use async_trait::async_trait;
use chrono::{DateTime, Timelike, Utc};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Binance specialization of the generic exchange abstraction.
pub struct Binance {
    api: Arc<dyn ExchangeApi>,
    config: ExchangeConfig,
    // Swapped wholesale on rebuild; readers clone the Arc and always see a
    // complete table.
    brackets: RwLock<Arc<BracketTable>>,
}

impl Binance {
    /// Create a Binance exchange over the given collaborator.
    pub fn new(api: Arc<dyn ExchangeApi>, config: ExchangeConfig) -> Self {
        Self {
            api,
            config,
            brackets: RwLock::new(Arc::new(BracketTable::default())),
        }
    }

    pub(crate) fn api(&self) -> &dyn ExchangeApi {
        self.api.as_ref()
    }

    pub(crate) fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// Current bracket table snapshot.
    pub(crate) fn bracket_table(&self) -> Arc<BracketTable> {
        self.brackets.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Replace the bracket table with a freshly built one.
    pub(crate) fn install_brackets(&self, table: BracketTable) {
        *self.brackets.write().unwrap_or_else(|e| e.into_inner()) = Arc::new(table);
    }

    /// Synthesize a locally-recorded order without contacting the exchange.
    pub(crate) fn create_dry_run_order(
        &self,
        pair: &str,
        kind: OrderKind,
        side: OrderSide,
        amount: f64,
        price: f64,
        leverage: f64,
    ) -> OrderRecord {
        let stop_price = matches!(kind, OrderKind::StopLossLimit).then_some(price);
        OrderRecord {
            id: Uuid::new_v4(),
            pair: pair.to_string(),
            kind,
            side,
            amount,
            price,
            stop_price,
            leverage,
            status: OrderStatus::Open,
            timestamp: Utc::now(),
        }
    }

    /// Whether a position opened at `open_date` is charged the upcoming
    /// funding fee. Binance charges on the hour; positions opened within
    /// the first 15 seconds of the hour dodge it.
    pub fn funding_fee_cutoff(&self, open_date: DateTime<Utc>) -> bool {
        open_date.minute() > 0 || (open_date.minute() == 0 && open_date.second() > 15)
    }
}

#[async_trait]
impl Exchange for Binance {
    async fn fill_leverage_brackets(&self) -> Result<(), ExchangeError> {
        Binance::fill_leverage_brackets(self).await
    }

    fn max_leverage(&self, pair: &str, stake_amount: f64) -> f64 {
        Binance::max_leverage(self, pair, stake_amount)
    }

    fn maintenance_ratio_and_amt(
        &self,
        pair: &str,
        nominal_value: f64,
    ) -> Result<(f64, f64), ExchangeError> {
        Binance::maintenance_ratio_and_amt(self, pair, nominal_value)
    }

    fn liquidation_price(&self, inputs: &LiquidationInputs) -> Result<f64, ExchangeError> {
        Binance::liquidation_price(self, inputs)
    }

    async fn stoploss(
        &self,
        pair: &str,
        amount: f64,
        stop_price: f64,
        order_types: &StopOrderConfig,
        side: OrderSide,
        leverage: f64,
    ) -> Result<OrderRecord, ExchangeError> {
        Binance::stoploss(self, pair, amount, stop_price, order_types, side, leverage).await
    }

    fn stoploss_adjust(&self, stop_loss: f64, order: &OrderRecord, side: OrderSide) -> bool {
        Binance::stoploss_adjust(self, stop_loss, order, side)
    }

    async fn historic_candles(
        &self,
        pair: &str,
        timeframe: &str,
        since_ms: i64,
        candle_type: CandleType,
        is_new_pair: bool,
    ) -> Result<Vec<Candle>, ExchangeError> {
        Binance::historic_candles(self, pair, timeframe, since_ms, candle_type, is_new_pair).await
    }

    fn funding_fee_cutoff(&self, open_date: DateTime<Utc>) -> bool {
        Binance::funding_fee_cutoff(self, open_date)
    }
}
