use anyhow::{Context, Result};

use crate::analysis::{AnalysisError, RepeatSignalDetector, SignalEvaluator, WeeklyReversalFinder};
use crate::config::{RepeatSettings, ReversalSettings, SignalSettings};
#[cfg(debug_assertions)]
use crate::config::debug::PRINT_MESSAGE;
use crate::data::{CandleSource, fetch_daily_and_weekly};
use crate::domain::CandleSeries;
use crate::notify::Notifier;
use crate::report::{SignalReport, format_message};
use crate::utils::time_utils::epoch_ms_to_utc;

/// Everything one run needs, passed in explicitly rather than read from the environment.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub symbol: String,
    pub signal: SignalSettings,
    pub repeat: RepeatSettings,
    pub reversal: ReversalSettings,
}

impl EngineSettings {
    pub fn for_symbol(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            signal: SignalSettings::default(),
            repeat: RepeatSettings::default(),
            reversal: ReversalSettings::default(),
        }
    }
}

pub struct CapitulationEngine {
    symbol: String,
    evaluator: SignalEvaluator,
    repeat_detector: RepeatSignalDetector,
    reversal_finder: WeeklyReversalFinder,
}

impl CapitulationEngine {
    pub fn new(settings: EngineSettings) -> Self {
        let evaluator = SignalEvaluator::new(settings.signal);
        Self {
            symbol: settings.symbol,
            repeat_detector: RepeatSignalDetector::new(evaluator.clone(), settings.repeat),
            reversal_finder: WeeklyReversalFinder::new(settings.reversal),
            evaluator,
        }
    }

    /// Evaluate the latest closed daily candle and collect weekly entry levels.
    /// All-or-nothing: any error means no report.
    pub fn evaluate(
        &self,
        daily: &CandleSeries,
        weekly: &CandleSeries,
        now_ms: i64,
    ) -> Result<SignalReport, AnalysisError> {
        let idx = daily.latest_closed_index(now_ms)?;
        let weekly_idx = weekly.latest_closed_index(now_ms)?;

        let min_history = self.evaluator.settings().min_history;
        if idx < min_history {
            return Err(AnalysisError::InsufficientHistory {
                period: min_history,
                index: idx,
            });
        }

        let result = self.evaluator.evaluate(daily, idx)?;
        let is_repeat = self.repeat_detector.had_recent_signal(daily, idx)?;
        let reversal_entries = self
            .reversal_finder
            .find(weekly, weekly_idx, result.measures.close);

        let close_time_ms = daily
            .get_candle(idx)
            .map(|c| c.close_time_ms)
            .ok_or_else(|| AnalysisError::NoClosedCandle {
                series: daily.pair_interval().to_string(),
            })?;

        Ok(SignalReport {
            symbol: self.symbol.clone(),
            close_time_ms,
            result,
            is_repeat,
            lookback_days: self.repeat_detector.settings().lookback_days,
            reversal_entries,
        })
    }

    /// Fetch, evaluate, render and deliver. Nothing is sent if any earlier step fails.
    pub async fn run_once(
        &self,
        source: &dyn CandleSource,
        notifier: &dyn Notifier,
        now_ms: i64,
    ) -> Result<SignalReport> {
        log::info!("Evaluating capitulation signal for {}", self.symbol);
        let (daily, weekly) = fetch_daily_and_weekly(source, &self.symbol)
            .await
            .with_context(|| format!("fetching candles for {}", self.symbol))?;

        let report = self
            .evaluate(&daily, &weekly, now_ms)
            .with_context(|| format!("evaluating {}", self.symbol))?;

        log::info!(
            "Signal: {} | Date(UTC): {}",
            if report.result.signal { "YES" } else { "NO" },
            epoch_ms_to_utc(report.close_time_ms)
        );
        if report.result.signal && report.is_repeat {
            log::warn!(
                "{}: signal already fired within the last {} days",
                self.symbol,
                report.lookback_days
            );
        }
        if report.result.signal && report.reversal_entries.is_empty() {
            log::warn!("{}: no weekly V-point below the current close", self.symbol);
        }

        let message = format_message(&report);
        #[cfg(debug_assertions)]
        if PRINT_MESSAGE {
            log::debug!("Rendered message:\n{}", message);
        }

        notifier
            .send(&message)
            .await
            .with_context(|| format!("delivering report via {}", notifier.signature()))?;
        log::info!("Message sent via {}.", notifier.signature());

        Ok(report)
    }
}
