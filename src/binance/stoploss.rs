//! Exchange-side stop-loss limit orders
//!
//! Binance-specific: a stop_loss_limit order triggers at the stop price
//! and rests as a limit order at a price offset from it, so the limit leg
//! sits on the passive side of the trigger.

use super::Binance;
use crate::exchange::{
    ApiError, ExchangeError, OrderKind, OrderParams, OrderRecord, OrderSide, StopOrderConfig,
};

impl Binance {
    /// Place a stop-loss limit order.
    ///
    /// The limit leg is `stop_price * ratio` for sells and
    /// `stop_price * (2 - ratio)` for buys, so the stop always triggers
    /// before the limit would. Dry-run mode synthesizes the order locally
    /// without contacting the exchange.
    pub async fn stoploss(
        &self,
        pair: &str,
        amount: f64,
        stop_price: f64,
        order_types: &StopOrderConfig,
        side: OrderSide,
        leverage: f64,
    ) -> Result<OrderRecord, ExchangeError> {
        let limit_ratio = order_types.stoploss_on_exchange_limit_ratio;
        let limit_rate = match side {
            OrderSide::Sell => stop_price * limit_ratio,
            OrderSide::Buy => stop_price * (2.0 - limit_ratio),
        };

        let stop_price = self.api().price_to_precision(pair, stop_price);

        // The invariant check runs against the unsnapped limit rate;
        // snapping happens at submission only.
        let bad_stop_price = match side {
            OrderSide::Sell => stop_price <= limit_rate,
            OrderSide::Buy => stop_price >= limit_rate,
        };
        if bad_stop_price {
            return Err(ExchangeError::Usage(
                "in stop-loss limit order, stop price should be better than limit price"
                    .to_string(),
            ));
        }

        if self.config().dry_run {
            return Ok(self.create_dry_run_order(
                pair,
                OrderKind::StopLossLimit,
                side,
                amount,
                stop_price,
                leverage,
            ));
        }

        let amount = self.api().amount_to_precision(pair, amount);
        let limit_rate = self.api().price_to_precision(pair, limit_rate);

        self.set_leverage(pair, leverage).await?;

        let params = OrderParams {
            stop_price: Some(stop_price),
        };
        match self
            .api()
            .create_order(pair, OrderKind::StopLossLimit, side, amount, limit_rate, &params)
            .await
        {
            Ok(order) => {
                tracing::info!(
                    %pair,
                    stop_price,
                    limit_rate,
                    order_id = %order.id,
                    "stop-loss limit order placed"
                );
                Ok(order)
            }
            Err(ApiError::InsufficientFunds(msg)) => Err(ExchangeError::InsufficientFunds(format!(
                "insufficient funds to create stop_loss_limit {side} order on market {pair}: \
                 tried to {side} amount {amount} at rate {limit_rate}: {msg}"
            ))),
            Err(ApiError::InvalidOrder(msg)) => Err(ExchangeError::InvalidOrder(format!(
                "could not create stop_loss_limit {side} order on market {pair}: \
                 tried to {side} amount {amount} at rate {limit_rate}: {msg}"
            ))),
            Err(e) => Err(e.into_exchange_err(&format!("could not place {side} order"))),
        }
    }

    /// Whether an existing stop order needs replacing: true when the new
    /// stop price is strictly better than the order's trigger.
    pub fn stoploss_adjust(&self, stop_loss: f64, order: &OrderRecord, side: OrderSide) -> bool {
        if order.kind != OrderKind::StopLossLimit {
            return false;
        }
        let Some(trigger) = order.stop_price else {
            return false;
        };
        match side {
            OrderSide::Sell => stop_loss > trigger,
            OrderSide::Buy => stop_loss < trigger,
        }
    }
}
