// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod notify;
pub mod report;
pub mod utils;

// Re-export commonly used types
pub use analysis::{
    AnalysisError, RepeatSignalDetector, ReversalEntry, SignalEvaluator, SignalResult, SignalRule,
    WeeklyReversalFinder,
};
pub use domain::{Candle, CandleSeries, PairInterval};
pub use engine::{CapitulationEngine, EngineSettings};
pub use report::SignalReport;

use anyhow::Result;
use clap::Parser;
use thiserror::Error;

use crate::config::{ANALYSIS, BINANCE, RepeatSettings, ReversalSettings, SignalSettings};
use crate::data::BinanceCandleSource;
use crate::notify::{Notifier, StdoutNotifier, TelegramNotifier};

pub const EXIT_OK: i32 = 0;
pub const EXIT_CONFIG_ERROR: i32 = 1;
pub const EXIT_RUN_FAILED: i32 = 2;

// CLI argument parsing
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Binance spot symbol to evaluate
    #[arg(long, env = "BINANCE_SYMBOL", default_value = BINANCE.default_symbol)]
    pub symbol: String,

    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    pub telegram_bot_token: Option<String>,

    #[arg(long, env = "TELEGRAM_CHAT_ID")]
    pub telegram_chat_id: Option<String>,

    /// Days before the evaluated candle searched for an earlier signal
    #[arg(long, default_value_t = ANALYSIS.repeat.lookback_days)]
    pub lookback_days: usize,

    /// Maximum number of weekly reversal levels to report
    #[arg(long, default_value_t = ANALYSIS.reversal.max_count)]
    pub max_entries: usize,

    /// Minimum fractional gap between reported levels (0.05 = 5%)
    #[arg(long, default_value_t = ANALYSIS.reversal.min_gap_pct)]
    pub min_gap_pct: f64,

    /// Print the message instead of sending it to Telegram
    #[arg(long, default_value_t = false, conflicts_with = "json")]
    pub dry_run: bool,

    /// Print the structured report as JSON (stdout carries nothing else)
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID.")]
    MissingTelegramCredentials,
    #[error("symbol must not be empty")]
    EmptySymbol,
    #[error("min gap must be in [0, 1), got {0}")]
    InvalidMinGap(String),
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl Cli {
    pub fn symbol(&self) -> &str {
        self.symbol.trim()
    }

    /// Token and chat id, if both are present and non-blank.
    pub fn telegram_credentials(&self) -> Option<(&str, &str)> {
        Some((
            non_empty(&self.telegram_bot_token)?,
            non_empty(&self.telegram_chat_id)?,
        ))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbol().is_empty() {
            return Err(ConfigError::EmptySymbol);
        }
        // keeps 1 - gap in (0, 1]
        if !(0.0..1.0).contains(&self.min_gap_pct) {
            return Err(ConfigError::InvalidMinGap(self.min_gap_pct.to_string()));
        }
        if !self.dry_run && self.telegram_credentials().is_none() {
            return Err(ConfigError::MissingTelegramCredentials);
        }
        Ok(())
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            symbol: self.symbol().to_string(),
            signal: SignalSettings::default(),
            repeat: RepeatSettings {
                lookback_days: self.lookback_days,
                ..RepeatSettings::default()
            },
            reversal: ReversalSettings {
                max_count: self.max_entries,
                min_gap_pct: self.min_gap_pct,
            },
        }
    }

    pub fn notifier(&self) -> Result<Box<dyn Notifier>> {
        match (self.dry_run, self.telegram_credentials()) {
            (true, _) => Ok(Box::new(StdoutNotifier)),
            (false, Some((token, chat_id))) => Ok(Box::new(TelegramNotifier::new(token, chat_id)?)),
            (false, None) => Err(ConfigError::MissingTelegramCredentials.into()),
        }
    }
}

/// One complete evaluation run against Binance, delivered via the configured notifier.
pub async fn run(args: &Cli, now_ms: i64) -> Result<SignalReport> {
    let notifier = args.notifier()?;
    let source = BinanceCandleSource::new()?;
    let engine = CapitulationEngine::new(args.engine_settings());
    engine.run_once(&source, notifier.as_ref(), now_ms).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(token: Option<&str>, chat_id: Option<&str>, dry_run: bool) -> Cli {
        Cli {
            symbol: " BTCUSDT ".to_string(),
            telegram_bot_token: token.map(str::to_string),
            telegram_chat_id: chat_id.map(str::to_string),
            lookback_days: 10,
            max_entries: 2,
            min_gap_pct: 0.05,
            dry_run,
            json: false,
        }
    }

    #[test]
    fn test_blank_credentials_count_as_missing() {
        assert_eq!(
            cli(Some("  "), Some("42"), false).validate(),
            Err(ConfigError::MissingTelegramCredentials)
        );
        assert_eq!(
            cli(Some("token"), None, false).validate(),
            Err(ConfigError::MissingTelegramCredentials)
        );
        assert_eq!(
            cli(Some(" token "), Some("42"), false).telegram_credentials(),
            Some(("token", "42"))
        );
    }

    #[test]
    fn test_min_gap_outside_unit_range_is_rejected() {
        for gap in [-0.1, 1.0, 1.5, f64::NAN] {
            let mut args = cli(None, None, true);
            args.min_gap_pct = gap;
            assert!(
                matches!(args.validate(), Err(ConfigError::InvalidMinGap(_))),
                "gap {} accepted",
                gap
            );
        }
        let mut args = cli(None, None, true);
        args.min_gap_pct = 0.0;
        assert_eq!(args.validate(), Ok(()));

        let parsed = Cli::try_parse_from(["capitulation-watch", "--dry-run", "--min-gap-pct=-0.1"]).unwrap();
        assert_eq!(parsed.validate(), Err(ConfigError::InvalidMinGap("-0.1".to_string())));
    }

    #[test]
    fn test_dry_run_needs_no_credentials() {
        assert_eq!(cli(None, None, true).validate(), Ok(()));
        assert!(cli(None, None, true).notifier().is_ok());
        assert!(cli(None, None, false).notifier().is_err());
    }

    #[test]
    fn test_engine_settings_from_args() {
        let mut args = cli(None, None, true);
        args.lookback_days = 7;
        args.max_entries = 3;
        args.min_gap_pct = 0.1;
        let settings = args.engine_settings();
        assert_eq!(settings.symbol, "BTCUSDT");
        assert_eq!(settings.repeat.lookback_days, 7);
        assert_eq!(settings.repeat.floor_index, 200);
        assert_eq!(settings.reversal.max_count, 3);
        assert_eq!(settings.reversal.min_gap_pct, 0.1);
        assert_eq!(settings.signal, SignalSettings::default());
    }

    #[test]
    fn test_cli_flags_parse() {
        let args = Cli::try_parse_from([
            "capitulation-watch",
            "--symbol",
            "ETHUSDT",
            "--dry-run",
            "--lookback-days",
            "5",
        ])
        .unwrap();
        assert_eq!(args.symbol(), "ETHUSDT");
        assert!(args.dry_run);
        assert!(!args.json);
        assert_eq!(args.lookback_days, 5);
        assert_eq!(args.max_entries, 2);
    }

    #[test]
    fn test_json_output_excludes_dry_run() {
        let err = Cli::try_parse_from(["capitulation-watch", "--dry-run", "--json"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
        assert!(Cli::try_parse_from(["capitulation-watch", "--json"]).unwrap().json);
    }
}
