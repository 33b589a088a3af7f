// Signal evaluation and support-level detection
pub mod error;
pub mod moving_average;
pub mod repeat;
pub mod reversal;
pub mod signal;

// Re-export commonly used types
pub use error::AnalysisError;
pub use moving_average::sma;
pub use repeat::RepeatSignalDetector;
pub use reversal::{ReversalEntry, WeeklyReversalFinder};
pub use signal::{SignalEvaluator, SignalMeasures, SignalResult, SignalRule};
