// Domain types and value objects
pub mod candle;
pub mod candle_series;
pub mod pair_interval;

// Re-export commonly used types
pub use candle::{Candle, CandleType};
pub use candle_series::CandleSeries;
pub use pair_interval::PairInterval;
