use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("not enough data for SMA{period} at index {index}")]
    InsufficientHistory { period: usize, index: usize },

    #[error("empty or invalid candle series: {0}")]
    EmptyOrInvalidSeries(String),

    #[error("no closed candle found in {series}")]
    NoClosedCandle { series: String },
}
