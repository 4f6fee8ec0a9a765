//! binance-exchange: Binance-specific behavior on top of a generic
//! exchange abstraction
//!
//! This library provides:
//! - Exchange-side stop-loss (stop-limit) order placement
//! - Tiered leverage bracket tables, built from live data or a fixture
//! - Maximum-leverage resolution per pair and stake amount
//! - Liquidation price estimation under Binance's margin formulas
//! - Fast new-pair historic candle backfill

pub mod binance;
pub mod config;
pub mod exchange;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod testutil;
