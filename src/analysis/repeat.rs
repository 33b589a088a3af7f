use crate::analysis::{AnalysisError, SignalEvaluator};
use crate::config::RepeatSettings;
#[cfg(debug_assertions)]
use crate::config::debug::PRINT_REPEAT_SCAN;
use crate::domain::CandleSeries;

/// Answers "did the signal already fire in the last few days?" so the report can
/// flag a repeat capitulation instead of a fresh one.
#[derive(Debug, Clone)]
pub struct RepeatSignalDetector {
    evaluator: SignalEvaluator,
    settings: RepeatSettings,
}

impl RepeatSignalDetector {
    pub fn new(evaluator: SignalEvaluator, settings: RepeatSettings) -> Self {
        Self {
            evaluator,
            settings,
        }
    }

    pub fn settings(&self) -> &RepeatSettings {
        &self.settings
    }

    /// Indices scanned for `current_index`: `[max(floor, current - lookback), current)`.
    /// Empty when the floor reaches or passes the current index.
    pub fn scan_range(&self, current_index: usize) -> std::ops::Range<usize> {
        let start = self
            .settings
            .floor_index
            .max(current_index.saturating_sub(self.settings.lookback_days));
        start..current_index.max(start)
    }

    pub fn had_recent_signal(
        &self,
        series: &CandleSeries,
        current_index: usize,
    ) -> Result<bool, AnalysisError> {
        let closes = series.close_prices();
        let volumes = series.base_volumes();

        for i in self.scan_range(current_index) {
            let result = self.evaluator.evaluate_columns(&closes, &volumes, i)?;
            #[cfg(debug_assertions)]
            if PRINT_REPEAT_SCAN {
                log::debug!("{} repeat scan index {}: signal={}", series.pair_interval(), i, result.signal);
            }
            if result.signal {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
