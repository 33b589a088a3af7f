use serde::Serialize;

use crate::config::ReversalSettings;
#[cfg(debug_assertions)]
use crate::config::debug::PRINT_REVERSAL_SCAN;
use crate::domain::CandleSeries;

/// A historical weekly support level: the close of a bearish week that was
/// immediately followed by a bullish week.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReversalEntry {
    pub price: f64,
    pub week_close_time_ms: i64,
}

/// Finds staged entry levels below the current price from weekly V-shaped reversals.
#[derive(Debug, Clone, Default)]
pub struct WeeklyReversalFinder {
    settings: ReversalSettings,
}

impl WeeklyReversalFinder {
    pub fn new(settings: ReversalSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ReversalSettings {
        &self.settings
    }

    /// V points of `series`, most recent first. Week `latest_idx` is only ever
    /// the bullish leg, and week 0 is never considered.
    pub fn v_points<'a>(
        &self,
        series: &'a CandleSeries,
        latest_idx: usize,
    ) -> impl Iterator<Item = ReversalEntry> + 'a {
        let candles = series.candles();
        let latest_idx = latest_idx.min(candles.len().saturating_sub(1));
        (1..latest_idx).rev().filter_map(move |i| {
            let (down, up) = (&candles[i], &candles[i + 1]);
            (down.is_bearish() && up.is_bullish()).then_some(ReversalEntry {
                price: down.close_price,
                week_close_time_ms: down.close_time_ms,
            })
        })
    }

    /// Whether `candidate` may follow `last_accepted` in the level list.
    ///
    /// The first level must sit strictly below `reference_price * (1 - gap)`;
    /// every later one must also be at least `gap` below the previous level.
    pub fn accepts(&self, reference_price: f64, last_accepted: Option<f64>, candidate: f64) -> bool {
        let keep = 1.0 - self.settings.min_gap_pct;
        candidate < reference_price * keep && last_accepted.is_none_or(|prev| candidate <= prev * keep)
    }

    /// Fold over candidates carrying the last accepted price; stops at `max_count`.
    pub fn select_levels(
        &self,
        candidates: impl IntoIterator<Item = ReversalEntry>,
        reference_price: f64,
    ) -> Vec<ReversalEntry> {
        candidates
            .into_iter()
            .scan(None, |last_accepted: &mut Option<f64>, candidate| {
                let accepted = self.accepts(reference_price, *last_accepted, candidate.price);
                #[cfg(debug_assertions)]
                if PRINT_REVERSAL_SCAN {
                    log::debug!(
                        "V point {:.2} (last accepted {:?}): accepted={}",
                        candidate.price,
                        last_accepted,
                        accepted
                    );
                }
                if accepted {
                    *last_accepted = Some(candidate.price);
                }
                Some(accepted.then_some(candidate))
            })
            .flatten()
            .take(self.settings.max_count)
            .collect()
    }

    pub fn find(
        &self,
        series: &CandleSeries,
        latest_idx: usize,
        reference_price: f64,
    ) -> Vec<ReversalEntry> {
        self.select_levels(self.v_points(series, latest_idx), reference_price)
    }
}
