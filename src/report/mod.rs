// Human-readable rendering of one run's outcome
pub mod message;

use serde::Serialize;

use crate::analysis::{ReversalEntry, SignalResult};

pub use message::format_message;

/// Everything the evaluation produces for one run, handed to rendering and delivery.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalReport {
    pub symbol: String,
    pub close_time_ms: i64,
    pub result: SignalResult,
    pub is_repeat: bool,
    pub lookback_days: usize,
    pub reversal_entries: Vec<ReversalEntry>,
}
