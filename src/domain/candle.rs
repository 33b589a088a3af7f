// Define the CandleType enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandleType {
    Bullish,
    Bearish,
    // Open == close
    Doji,
}

// One OHLCV bar. Times are epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    pub open_time_ms: i64,
    pub open_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub close_price: f64,
    pub base_volume: f64,
    pub close_time_ms: i64,
}

impl Candle {
    // A constructor for convenience
    pub fn new(
        open_time_ms: i64,
        open_price: f64,
        high_price: f64,
        low_price: f64,
        close_price: f64,
        base_volume: f64,
        close_time_ms: i64,
    ) -> Self {
        Candle {
            open_time_ms,
            open_price,
            high_price,
            low_price,
            close_price,
            base_volume,
            close_time_ms,
        }
    }

    // Strict comparison: a flat candle is neither bullish nor bearish
    pub fn get_type(&self) -> CandleType {
        if self.close_price > self.open_price {
            CandleType::Bullish
        } else if self.close_price < self.open_price {
            CandleType::Bearish
        } else {
            CandleType::Doji
        }
    }

    pub fn is_bullish(&self) -> bool {
        self.get_type() == CandleType::Bullish
    }

    pub fn is_bearish(&self) -> bool {
        self.get_type() == CandleType::Bearish
    }

    /// Whether the candle's interval has fully elapsed at `now_ms`.
    pub fn is_closed_at(&self, now_ms: i64) -> bool {
        self.close_time_ms < now_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(open: f64, close: f64) -> Candle {
        Candle::new(0, open, open.max(close), open.min(close), close, 1.0, 999)
    }

    #[test]
    fn test_candle_type_is_strict() {
        assert_eq!(candle(100.0, 101.0).get_type(), CandleType::Bullish);
        assert_eq!(candle(100.0, 99.0).get_type(), CandleType::Bearish);
        assert_eq!(candle(100.0, 100.0).get_type(), CandleType::Doji);
        assert!(!candle(100.0, 100.0).is_bullish());
        assert!(!candle(100.0, 100.0).is_bearish());
    }

    #[test]
    fn test_closed_only_once_close_time_has_passed() {
        let c = candle(1.0, 2.0);
        assert!(!c.is_closed_at(999), "close_time == now is still forming");
        assert!(c.is_closed_at(1000));
    }
}
