//! Binance-specific configuration constants and types.

use crate::utils::TimeUtils;

/// Configuration for Binance REST API client
/// (This is the runtime struct handed to the SDK builder)
pub struct BinanceApiConfig {
    pub timeout_ms: u64,
    pub retries: u32,
    pub backoff_ms: u64,
}

impl Default for BinanceApiConfig {
    fn default() -> Self {
        Self {
            timeout_ms: BINANCE.client.timeout_ms,
            retries: BINANCE.client.retries,
            backoff_ms: BINANCE.client.backoff_ms,
        }
    }
}

/// Configuration for REST API Limits
pub struct RestLimits {
    /// Number of klines requested per series. Must cover the long MA plus the repeat lookback.
    pub klines_limit: i32,
}

/// Intervals fetched for each run
pub struct SeriesIntervals {
    pub daily_ms: i64,
    pub weekly_ms: i64,
}

/// Default values for the Rest Client
pub struct ClientDefaults {
    pub timeout_ms: u64,
    pub retries: u32,
    pub backoff_ms: u64,
}

/// The Master Configuration Struct
pub struct BinanceConfig {
    pub limits: RestLimits,
    pub intervals: SeriesIntervals,
    pub client: ClientDefaults,
    pub default_symbol: &'static str,
}

pub const BINANCE: BinanceConfig = BinanceConfig {
    limits: RestLimits { klines_limit: 260 },
    intervals: SeriesIntervals {
        daily_ms: TimeUtils::MS_IN_D,
        weekly_ms: TimeUtils::MS_IN_W,
    },
    client: ClientDefaults {
        timeout_ms: 15_000,
        retries: 3,
        backoff_ms: 1000,
    },
    default_symbol: "BTCUSDT",
};
