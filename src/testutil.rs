//! Hand-rolled collaborator mock shared by unit tests

use crate::exchange::{
    ApiError, Candle, CandleType, ExchangeApi, OrderKind, OrderParams, OrderRecord, OrderSide,
    OrderStatus, RawBrackets,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::Mutex;
use uuid::Uuid;

/// Arguments of a recorded `create_order` call
#[derive(Debug, Clone)]
pub struct CreateOrderCall {
    pub pair: String,
    pub kind: OrderKind,
    pub side: OrderSide,
    pub amount: f64,
    pub price: f64,
    pub params: OrderParams,
}

/// Recording mock of the connectivity collaborator.
///
/// Precision snapping is the identity unless constructed with
/// [`MockApi::with_precision`]; errors are injected per method and
/// returned on every call until replaced.
#[derive(Default)]
pub struct MockApi {
    precision_decimals: Option<i32>,
    create_order_calls: Mutex<Vec<CreateOrderCall>>,
    create_order_error: Mutex<Option<ApiError>>,
    set_leverage_calls: Mutex<Vec<(String, f64)>>,
    set_leverage_error: Mutex<Option<ApiError>>,
    brackets: Mutex<Option<RawBrackets>>,
    brackets_error: Mutex<Option<ApiError>>,
    load_brackets_calls: Mutex<u32>,
    candle_batches: Mutex<VecDeque<Vec<Candle>>>,
    fetch_candles_calls: Mutex<Vec<(i64, usize)>>,
}

impl MockApi {
    /// Mock that rounds amounts and prices to `decimals` decimal places.
    pub fn with_precision(decimals: i32) -> Self {
        Self {
            precision_decimals: Some(decimals),
            ..Default::default()
        }
    }

    pub fn set_create_order_error(&self, err: ApiError) {
        *self.create_order_error.lock().unwrap() = Some(err);
    }

    pub fn set_set_leverage_error(&self, err: ApiError) {
        *self.set_leverage_error.lock().unwrap() = Some(err);
    }

    pub fn set_brackets(&self, raw: RawBrackets) {
        *self.brackets.lock().unwrap() = Some(raw);
    }

    pub fn set_brackets_error(&self, err: ApiError) {
        *self.brackets_error.lock().unwrap() = Some(err);
    }

    /// Queue one `fetch_candles` response; responses are consumed in order.
    pub fn push_candles(&self, batch: Vec<Candle>) {
        self.candle_batches.lock().unwrap().push_back(batch);
    }

    pub fn create_order_calls(&self) -> Vec<CreateOrderCall> {
        self.create_order_calls.lock().unwrap().clone()
    }

    pub fn set_leverage_calls(&self) -> Vec<(String, f64)> {
        self.set_leverage_calls.lock().unwrap().clone()
    }

    pub fn load_brackets_calls(&self) -> u32 {
        *self.load_brackets_calls.lock().unwrap()
    }

    pub fn fetch_candles_calls(&self) -> Vec<(i64, usize)> {
        self.fetch_candles_calls.lock().unwrap().clone()
    }

    fn snap(&self, value: f64) -> f64 {
        match self.precision_decimals {
            Some(decimals) => {
                let factor = 10f64.powi(decimals);
                (value * factor).round() / factor
            }
            None => value,
        }
    }
}

#[async_trait]
impl ExchangeApi for MockApi {
    async fn create_order(
        &self,
        pair: &str,
        kind: OrderKind,
        side: OrderSide,
        amount: f64,
        price: f64,
        params: &OrderParams,
    ) -> Result<OrderRecord, ApiError> {
        self.create_order_calls.lock().unwrap().push(CreateOrderCall {
            pair: pair.to_string(),
            kind,
            side,
            amount,
            price,
            params: params.clone(),
        });
        if let Some(err) = self.create_order_error.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(OrderRecord {
            id: Uuid::new_v4(),
            pair: pair.to_string(),
            kind,
            side,
            amount,
            price,
            stop_price: params.stop_price,
            leverage: 1.0,
            status: OrderStatus::Open,
            timestamp: Utc::now(),
        })
    }

    async fn set_leverage(&self, pair: &str, leverage: f64) -> Result<(), ApiError> {
        self.set_leverage_calls
            .lock()
            .unwrap()
            .push((pair.to_string(), leverage));
        if let Some(err) = self.set_leverage_error.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(())
    }

    async fn load_leverage_brackets(&self) -> Result<RawBrackets, ApiError> {
        *self.load_brackets_calls.lock().unwrap() += 1;
        if let Some(err) = self.brackets_error.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(self.brackets.lock().unwrap().clone().unwrap_or_default())
    }

    async fn fetch_candles(
        &self,
        _pair: &str,
        _timeframe: &str,
        since_ms: i64,
        limit: usize,
        _candle_type: CandleType,
    ) -> Result<Vec<Candle>, ApiError> {
        self.fetch_candles_calls.lock().unwrap().push((since_ms, limit));
        Ok(self
            .candle_batches
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }

    fn amount_to_precision(&self, _pair: &str, amount: f64) -> f64 {
        self.snap(amount)
    }

    fn price_to_precision(&self, _pair: &str, price: f64) -> f64 {
        self.snap(price)
    }
}
