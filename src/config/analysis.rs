//! Signal evaluation and level detection configuration

/// Settings for the four-condition capitulation rule
#[derive(Debug, Clone, PartialEq)]
pub struct SignalSettings {
    // Short moving average of closes (the "MA50")
    pub ma_short_period: usize,
    // Long moving average of closes (the "MA200")
    pub ma_long_period: usize,
    // Moving average of volume used as the abnormal-volume baseline
    pub volume_sma_period: usize,
    // Volume must be strictly above this multiple of the volume SMA
    pub volume_multiplier: f64,
    // Minimum closed daily index the run is allowed to evaluate
    pub min_history: usize,
}

/// Settings for the "signal already fired recently" scan
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatSettings {
    pub lookback_days: usize,
    // Indices below this floor are skipped, never evaluated
    pub floor_index: usize,
}

/// Settings for weekly V-shaped reversal levels
#[derive(Debug, Clone, PartialEq)]
pub struct ReversalSettings {
    pub max_count: usize,
    // Fractional gap, 0.05 corresponds to 5%
    pub min_gap_pct: f64,
}

/// The Master Analysis Configuration
pub struct AnalysisConfig {
    pub signal: SignalSettings,
    pub repeat: RepeatSettings,
    pub reversal: ReversalSettings,
}

pub const ANALYSIS: AnalysisConfig = AnalysisConfig {
    signal: SignalSettings {
        ma_short_period: 50,
        ma_long_period: 200,
        volume_sma_period: 20,
        volume_multiplier: 2.0,
        min_history: 200,
    },

    repeat: RepeatSettings {
        lookback_days: 10,
        floor_index: 200,
    },

    reversal: ReversalSettings {
        max_count: 2,
        min_gap_pct: 0.05,
    },
};

impl Default for SignalSettings {
    fn default() -> Self {
        ANALYSIS.signal
    }
}

impl Default for RepeatSettings {
    fn default() -> Self {
        ANALYSIS.repeat
    }
}

impl Default for ReversalSettings {
    fn default() -> Self {
        ANALYSIS.reversal
    }
}
