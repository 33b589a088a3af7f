use crate::analysis::AnalysisError;

/// Simple moving average of the `period` values ending at (and including) `index`.
///
/// Fails with `InsufficientHistory` rather than averaging a shorter window.
pub fn sma(values: &[f64], period: usize, index: usize) -> Result<f64, AnalysisError> {
    if period == 0 || index + 1 < period || index >= values.len() {
        return Err(AnalysisError::InsufficientHistory { period, index });
    }
    let window = &values[index + 1 - period..=index];
    Ok(window.iter().sum::<f64>() / period as f64)
}
