use anyhow::Result;
use async_trait::async_trait;

use crate::config::BINANCE;
use crate::domain::{CandleSeries, PairInterval};

#[async_trait]
pub trait CandleSource: Send + Sync {
    // Either a validated series (oldest first) OR an anyhow::Error naming the pair
    async fn fetch_candles(&self, pair_interval: &PairInterval, limit: i32) -> Result<CandleSeries>;

    /// A unique identifier for this implementation (so that afterwards we know which one we used).
    fn signature(&self) -> &'static str;
}

/// Fetch the daily and weekly series for `symbol` concurrently.
pub async fn fetch_daily_and_weekly(
    source: &dyn CandleSource,
    symbol: &str,
) -> Result<(CandleSeries, CandleSeries)> {
    let daily = PairInterval::new(symbol, BINANCE.intervals.daily_ms);
    let weekly = PairInterval::new(symbol, BINANCE.intervals.weekly_ms);
    let limit = BINANCE.limits.klines_limit;

    let (daily_series, weekly_series) = futures::try_join!(
        source.fetch_candles(&daily, limit),
        source.fetch_candles(&weekly, limit),
    )?;
    log::info!(
        "Fetched {} daily and {} weekly candles for {} via {}",
        daily_series.len(),
        weekly_series.len(),
        symbol,
        source.signature()
    );
    Ok((daily_series, weekly_series))
}
