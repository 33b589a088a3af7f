use crate::analysis::AnalysisError;
use crate::domain::candle::Candle;
use crate::domain::pair_interval::PairInterval;

/// An ordered, validated run of candles for one pair and interval (oldest first).
///
/// Construction is the only place ordering is checked; afterwards the series is
/// read-only and every analysis component borrows it.
#[derive(Debug, Clone)]
pub struct CandleSeries {
    pair_interval: PairInterval,
    candles: Vec<Candle>,
}

impl CandleSeries {
    pub fn new(pair_interval: PairInterval, candles: Vec<Candle>) -> Result<Self, AnalysisError> {
        if candles.is_empty() {
            return Err(AnalysisError::EmptyOrInvalidSeries(format!(
                "{}: no candles",
                pair_interval
            )));
        }
        if let Some((i, c)) = candles
            .iter()
            .enumerate()
            .find(|(_, c)| c.close_time_ms <= c.open_time_ms)
        {
            return Err(AnalysisError::EmptyOrInvalidSeries(format!(
                "{}: candle {} closes at {} which is not after its open {}",
                pair_interval, i, c.close_time_ms, c.open_time_ms
            )));
        }
        if let Some(i) = candles
            .windows(2)
            .position(|w| w[1].open_time_ms <= w[0].open_time_ms)
        {
            return Err(AnalysisError::EmptyOrInvalidSeries(format!(
                "{}: candle {} does not open after candle {}",
                pair_interval,
                i + 1,
                i
            )));
        }
        Ok(Self {
            pair_interval,
            candles,
        })
    }

    pub fn pair_interval(&self) -> &PairInterval {
        &self.pair_interval
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn get_candle(&self, idx: usize) -> Option<&Candle> {
        self.candles.get(idx)
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn close_prices(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close_price).collect()
    }

    pub fn base_volumes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.base_volume).collect()
    }

    /// Index of the most recent candle whose close time is strictly before `now_ms`.
    pub fn latest_closed_index(&self, now_ms: i64) -> Result<usize, AnalysisError> {
        self.candles
            .iter()
            .rposition(|c| c.is_closed_at(now_ms))
            .ok_or_else(|| AnalysisError::NoClosedCandle {
                series: self.pair_interval.to_string(),
            })
    }
}
