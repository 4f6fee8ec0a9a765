//! Historic candle backfill
//!
//! Binance returns its earliest candles when queried with `since = 0`,
//! which allows detecting a pair's listing date: new pairs probe first and
//! advance the backfill start to the first available candle, avoiding a
//! long run of empty-range requests.

use super::Binance;
use crate::exchange::{Candle, CandleType, ExchangeError};
use chrono::{TimeZone, Utc};

/// Binance's per-request candle limit
const CANDLE_LIMIT: usize = 1000;

/// Milliseconds covered by one candle of the given timeframe
/// (e.g. "1m", "5m", "4h", "1d").
pub(crate) fn timeframe_ms(timeframe: &str) -> Result<i64, ExchangeError> {
    let bad = || ExchangeError::Usage(format!("unsupported timeframe: {timeframe}"));

    if timeframe.len() < 2 {
        return Err(bad());
    }
    let (value, unit) = timeframe.split_at(timeframe.len() - 1);
    let value: i64 = value.parse().map_err(|_| bad())?;
    if value <= 0 {
        return Err(bad());
    }
    let unit_ms = match unit {
        "m" => 60_000,
        "h" => 3_600_000,
        "d" => 86_400_000,
        "w" => 604_800_000,
        _ => return Err(bad()),
    };
    Ok(value * unit_ms)
}

impl Binance {
    /// Fetch candle history from `since_ms` up to now, paginated.
    ///
    /// For new pairs, a single probe request locates the earliest available
    /// candle and the backfill start is advanced to it.
    pub async fn historic_candles(
        &self,
        pair: &str,
        timeframe: &str,
        mut since_ms: i64,
        candle_type: CandleType,
        is_new_pair: bool,
    ) -> Result<Vec<Candle>, ExchangeError> {
        let step = timeframe_ms(timeframe)?;

        if is_new_pair {
            let probe = self.fetch_batch(pair, timeframe, 0, 1, candle_type).await?;
            if let Some(first) = probe.first() {
                if first.open_time_ms > since_ms {
                    since_ms = first.open_time_ms;
                    let start = Utc
                        .timestamp_millis_opt(since_ms)
                        .single()
                        .map(|d| d.to_rfc3339())
                        .unwrap_or_default();
                    tracing::info!(%pair, %start, "candle data available starting later than requested");
                }
            }
        }

        let mut candles = Vec::new();
        loop {
            let batch = self
                .fetch_batch(pair, timeframe, since_ms, CANDLE_LIMIT, candle_type)
                .await?;
            let Some(last) = batch.last() else {
                break;
            };
            let batch_len = batch.len();
            since_ms = last.open_time_ms + step;
            candles.extend(batch);

            if batch_len < CANDLE_LIMIT || since_ms >= Utc::now().timestamp_millis() {
                break;
            }
        }
        Ok(candles)
    }

    async fn fetch_batch(
        &self,
        pair: &str,
        timeframe: &str,
        since_ms: i64,
        limit: usize,
        candle_type: CandleType,
    ) -> Result<Vec<Candle>, ExchangeError> {
        self.api()
            .fetch_candles(pair, timeframe, since_ms, limit, candle_type)
            .await
            .map_err(|e| e.into_exchange_err("could not fetch candle history"))
    }
}
