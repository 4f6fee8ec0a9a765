//! Liquidation price estimation
//!
//! Implements Binance's published formulas:
//! - margin:    <https://www.binance.com/en/support/faq/f6b010588e55413aa58b7d63ee0125ed>
//! - perpetual: <https://www.binance.com/en/support/faq/b3c689c1f50a44cabb3a84e663b81d93>

use super::Binance;
use crate::config::{Collateral, TradingMode};
use crate::exchange::{ExchangeError, LiquidationInputs};

impl Binance {
    /// Maintenance margin ratio and cumulative maintenance amount for the
    /// bracket a notional value falls into.
    pub fn maintenance_ratio_and_amt(
        &self,
        pair: &str,
        nominal_value: f64,
    ) -> Result<(f64, f64), ExchangeError> {
        let table = self.bracket_table();
        let brackets = table.get(pair).ok_or_else(|| {
            ExchangeError::InvalidOrder(format!("cannot calculate liquidation price for {pair}"))
        })?;

        // The lowest floor is always 0, so any non-negative notional value
        // matches a tier
        for bracket in brackets.iter().rev() {
            if nominal_value >= bracket.notional_floor {
                return Ok((bracket.mm_ratio, bracket.maintenance_amt));
            }
        }
        Err(ExchangeError::Usage(
            "nominal value cannot be lower than 0".to_string(),
        ))
    }

    /// Estimated liquidation price for a position.
    ///
    /// ```text
    /// (wallet_balance + cross_term + maintenance_amt - side * position * open_rate)
    /// -----------------------------------------------------------------------------
    ///                  position * mm_ratio - side * position
    /// ```
    ///
    /// `cross_term` is the unrealized PnL minus the maintenance margin of
    /// all other contracts; zero in isolated mode. No rounding is applied;
    /// the caller owns precision formatting.
    pub fn liquidation_price(&self, inputs: &LiquidationInputs) -> Result<f64, ExchangeError> {
        if self.config().trading_mode != TradingMode::Futures {
            return Err(ExchangeError::Usage(
                "only isolated futures is supported for leverage trading".to_string(),
            ));
        }

        let side = if inputs.is_short { -1.0 } else { 1.0 };
        let position = inputs.position.abs();
        let cross_term = if self.config().collateral == Collateral::Cross {
            inputs.upnl_ex_other - inputs.mm_ex_other
        } else {
            0.0
        };

        let (mm_ratio, maintenance_amt) = self.maintenance_ratio_and_amt(&inputs.pair, position)?;

        Ok(
            ((inputs.wallet_balance + cross_term + maintenance_amt)
                - side * position * inputs.open_rate)
                / (position * mm_ratio - side * position),
        )
    }
}
