//! Maximum leverage resolution and leverage-setting

use super::Binance;
use crate::config::TradingMode;
use crate::exchange::{with_retries, ExchangeError, API_RETRY_COUNT};

impl Binance {
    /// Maximum leverage `pair` can be traded at for the given stake.
    ///
    /// Scans the bracket tiers in ascending order and returns the tightest
    /// leverage that keeps the leveraged notional value inside the current
    /// tier. Pairs without bracket data get no leverage.
    pub fn max_leverage(&self, pair: &str, stake_amount: f64) -> f64 {
        let table = self.bracket_table();
        let Some(brackets) = table.get(pair) else {
            return 1.0;
        };

        for (i, bracket) in brackets.iter().enumerate() {
            let lev = if bracket.mm_ratio != 0.0 {
                1.0 / bracket.mm_ratio
            } else {
                tracing::warn!(
                    %pair,
                    notional_floor = bracket.notional_floor,
                    "maintenance margin ratio is zero"
                );
                1.0
            };

            let Some(next) = brackets.get(i + 1) else {
                // Last tier: nothing left to overflow into
                return lev;
            };

            // Tier holds if the leveraged trade value stays below the next
            // tier's floor
            if stake_amount * lev < next.notional_floor {
                return lev;
            }
        }

        1.0
    }

    /// Apply leverage on the exchange before placing an order.
    ///
    /// A no-op in dry-run mode and outside futures trading; live futures
    /// calls the collaborator under the bounded retry policy.
    pub async fn set_leverage(&self, pair: &str, leverage: f64) -> Result<(), ExchangeError> {
        if self.config().dry_run || self.config().trading_mode != TradingMode::Futures {
            return Ok(());
        }

        with_retries(API_RETRY_COUNT, || async move {
            self.api()
                .set_leverage(pair, leverage)
                .await
                .map_err(|e| e.into_exchange_err("could not set leverage"))
        })
        .await
    }
}
