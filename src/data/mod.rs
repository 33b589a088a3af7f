// Candle retrieval
pub mod binance_klines;
pub mod candle_source;

// Re-export commonly used types
pub use binance_klines::{BinanceCandleSource, KlineError};
pub use candle_source::{CandleSource, fetch_daily_and_weekly};
