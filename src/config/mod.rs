//! Configuration module for the capitulation watcher.

pub mod analysis;
pub mod binance;
pub mod debug;
pub mod telegram;

// Re-export commonly used items
pub use analysis::{ANALYSIS, AnalysisConfig, RepeatSettings, ReversalSettings, SignalSettings};
pub use binance::{BINANCE, BinanceApiConfig};
pub use telegram::TELEGRAM;
