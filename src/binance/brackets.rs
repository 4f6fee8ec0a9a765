//! Leverage bracket table
//!
//! Binance publishes a piecewise margin schedule per pair: tiers of
//! (notional floor, maintenance margin ratio). The builder derives the
//! cumulative maintenance amount that makes the piecewise maintenance
//! margin function continuous across tiers:
//!
//! ```text
//! amt[0] = 0
//! amt[i] = floor[i] * (ratio[i] - ratio[i-1]) + amt[i-1]
//! ```

use super::Binance;
use crate::config::TradingMode;
use crate::exchange::{with_retries, ExchangeError, RawBrackets, API_RETRY_COUNT};
use std::collections::HashMap;

/// Static fixture standing in for the live bracket source in dry-run mode.
const BRACKET_FIXTURE: &str = include_str!("binance_leverage_brackets.json");

/// One tier of a pair's margin schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    /// Lowest notional value this tier applies to
    pub notional_floor: f64,
    /// Maintenance margin ratio within this tier
    pub mm_ratio: f64,
    /// Cumulative maintenance amount up to this tier
    pub maintenance_amt: f64,
}

/// Per-pair margin schedules, tiers ascending by notional floor.
///
/// Built once per session (or from the fixture in dry-run mode) and
/// replaced wholesale on rebuild, never mutated in place.
#[derive(Debug, Clone, Default)]
pub struct BracketTable {
    pairs: HashMap<String, Vec<Bracket>>,
}

impl BracketTable {
    /// Build a table from raw (floor, ratio) tiers as delivered by the
    /// exchange. Values may be numbers or numeric strings.
    pub fn build(raw: &RawBrackets) -> Result<Self, ExchangeError> {
        let mut pairs = HashMap::with_capacity(raw.len());
        for (pair, tiers) in raw {
            let mut amt = 0.0;
            let mut old_ratio = 0.0;
            let mut brackets = Vec::with_capacity(tiers.len());
            for [floor, ratio] in tiers {
                let notional_floor = floor.as_f64()?;
                let mm_ratio = ratio.as_f64()?;
                // The first tier carries no amount; a zero ratio on the
                // previous tier also resets the running amount.
                amt = if old_ratio != 0.0 {
                    notional_floor * (mm_ratio - old_ratio) + amt
                } else {
                    0.0
                };
                old_ratio = mm_ratio;
                brackets.push(Bracket {
                    notional_floor,
                    mm_ratio,
                    maintenance_amt: amt,
                });
            }
            pairs.insert(pair.clone(), brackets);
        }
        Ok(Self { pairs })
    }

    /// Build the table from the embedded fixture.
    pub fn from_fixture() -> Result<Self, ExchangeError> {
        let raw: RawBrackets = serde_json::from_str(BRACKET_FIXTURE)
            .map_err(|e| ExchangeError::Operational(format!("bracket fixture parse error: {e}")))?;
        Self::build(&raw)
    }

    /// Brackets for a pair, ascending by notional floor.
    pub fn get(&self, pair: &str) -> Option<&[Bracket]> {
        self.pairs.get(pair).map(Vec::as_slice)
    }

    pub fn contains(&self, pair: &str) -> bool {
        self.pairs.contains_key(pair)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl Binance {
    /// Build the per-pair leverage bracket table and swap it in.
    ///
    /// Futures mode only; a no-op otherwise. Dry-run mode reads the
    /// embedded fixture; live mode fetches from the collaborator under the
    /// bounded retry policy. On failure the previous table stays in place.
    pub async fn fill_leverage_brackets(&self) -> Result<(), ExchangeError> {
        if self.config().trading_mode != TradingMode::Futures {
            return Ok(());
        }

        let table = if self.config().dry_run {
            BracketTable::from_fixture()?
        } else {
            let raw = with_retries(API_RETRY_COUNT, || async move {
                self.api()
                    .load_leverage_brackets()
                    .await
                    .map_err(|e| e.into_exchange_err("could not fetch leverage brackets"))
            })
            .await?;
            BracketTable::build(&raw)?
        };

        tracing::info!(pairs = table.len(), "leverage brackets loaded");
        self.install_brackets(table);
        Ok(())
    }
}
