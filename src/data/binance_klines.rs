// External crates
use anyhow::{Context, Result};
use async_trait::async_trait;
use binance_sdk::config::ConfigurationRestApi;
use binance_sdk::spot::{
    SpotRestApi,
    rest_api::{KlinesIntervalEnum, KlinesItemInner, KlinesParams, RestApi},
};
use binance_sdk::{errors, errors::ConnectorError as connection_error};
use thiserror::Error;

// Local crates
use crate::config::binance::BinanceApiConfig;
use crate::data::candle_source::CandleSource;
use crate::domain::{Candle, CandleSeries, PairInterval};
use crate::utils::TimeUtils;

// For "MS -> Enum" we return Result instead of panicking.
pub fn try_interval_from_ms(ms: i64) -> Result<KlinesIntervalEnum, KlineError> {
    match ms {
        TimeUtils::MS_IN_H => Ok(KlinesIntervalEnum::Interval1h),
        TimeUtils::MS_IN_4_H => Ok(KlinesIntervalEnum::Interval4h),
        TimeUtils::MS_IN_12_H => Ok(KlinesIntervalEnum::Interval12h),
        TimeUtils::MS_IN_D => Ok(KlinesIntervalEnum::Interval1d),
        TimeUtils::MS_IN_3_D => Ok(KlinesIntervalEnum::Interval3d),
        TimeUtils::MS_IN_W => Ok(KlinesIntervalEnum::Interval1w),
        TimeUtils::MS_IN_1_M => Ok(KlinesIntervalEnum::Interval1M),
        _ => Err(KlineError::UnsupportedInterval(ms)),
    }
}

#[derive(Debug, Error)]
pub enum KlineError {
    #[error("invalid kline row length {0}")]
    InvalidLength(usize),
    #[error("invalid type for kline field {0}")]
    InvalidType(&'static str),
    #[error("unsupported interval: {0}ms")]
    UnsupportedInterval(i64),
    #[error("Binance API connection failed: {0}.")]
    ConnectionFailed(String),
}

// Binance kline rows: open time, open, high, low, close, volume, close time, then
// quote volume, trade count and taker volumes we do not use.
const KLINE_ROW_MIN_LEN: usize = 7;

fn kline_time(item: &KlinesItemInner, field: &'static str) -> Result<i64, KlineError> {
    match item {
        KlinesItemInner::Integer(ms) => Ok(*ms),
        _ => Err(KlineError::InvalidType(field)),
    }
}

// Prices and volumes arrive as decimal strings
fn kline_float(item: &KlinesItemInner, field: &'static str) -> Result<f64, KlineError> {
    match item {
        KlinesItemInner::String(s) => s.parse::<f64>().map_err(|_| KlineError::InvalidType(field)),
        _ => Err(KlineError::InvalidType(field)),
    }
}

impl TryFrom<Vec<KlinesItemInner>> for Candle {
    type Error = KlineError;

    fn try_from(row: Vec<KlinesItemInner>) -> Result<Self, Self::Error> {
        if row.len() < KLINE_ROW_MIN_LEN {
            return Err(KlineError::InvalidLength(row.len()));
        }
        Ok(Candle::new(
            kline_time(&row[0], "open_time")?,
            kline_float(&row[1], "open")?,
            kline_float(&row[2], "high")?,
            kline_float(&row[3], "low")?,
            kline_float(&row[4], "close")?,
            kline_float(&row[5], "volume")?,
            kline_time(&row[6], "close_time")?,
        ))
    }
}

pub fn convert_klines(data: Vec<Vec<KlinesItemInner>>) -> Result<Vec<Candle>, KlineError> {
    data.into_iter().map(Candle::try_from).collect()
}

fn configure_binance_client() -> Result<RestApi> {
    let config = BinanceApiConfig::default();
    let rest_conf = ConfigurationRestApi::builder()
        .timeout(config.timeout_ms)
        .retries(config.retries)
        .backoff(config.backoff_ms)
        .build()?;
    // Create the Spot REST API client
    Ok(SpotRestApi::production(rest_conf))
}

fn log_connector_error(conn_err: &errors::ConnectorError, pair_interval: &PairInterval) {
    match conn_err {
        connection_error::ConnectorClientError(msg) => {
            log::error!("{} Client error: Check your request parameters. {}", pair_interval, msg);
        }
        connection_error::TooManyRequestsError(msg) => {
            log::error!("{} Rate limit exceeded. Please wait and try again. {}", pair_interval, msg);
        }
        connection_error::RateLimitBanError(msg) => {
            log::error!("{} IP address banned due to excessive rate limits. {}", pair_interval, msg);
        }
        errors::ConnectorError::ServerError { msg, status_code } => {
            log::error!(
                "{} Server error: {} (status code: {:?})",
                pair_interval,
                msg,
                status_code
            );
        }
        errors::ConnectorError::NetworkError(msg) => {
            log::error!("{} Network error: Check your internet connection. {}", pair_interval, msg);
        }
        other => {
            log::error!("{} Unexpected ConnectorError variant: {:?}", pair_interval, other);
        }
    }
}

/// Latest klines straight from the Binance spot REST API.
pub struct BinanceCandleSource {
    rest_client: RestApi,
}

impl BinanceCandleSource {
    pub fn new() -> Result<Self> {
        Ok(Self {
            rest_client: configure_binance_client().context("configuring Binance REST client")?,
        })
    }

    async fn fetch_rows(
        &self,
        params: KlinesParams,
        pair_interval: &PairInterval,
    ) -> Result<Vec<Vec<KlinesItemInner>>> {
        match self.rest_client.klines(params).await {
            Ok(response) => Ok(response.data().await?),
            Err(e) => {
                if let Some(conn_err) = e.downcast_ref::<errors::ConnectorError>() {
                    log_connector_error(conn_err, pair_interval);
                    Err(anyhow::Error::new(KlineError::ConnectionFailed(conn_err.to_string()))
                        .context(format!("Binance API call failed for {}", pair_interval)))
                } else {
                    Err(anyhow::Error::new(KlineError::ConnectionFailed(e.to_string()))
                        .context(format!("Unexpected error during API call for {}", pair_interval)))
                }
            }
        }
    }
}

#[async_trait]
impl CandleSource for BinanceCandleSource {
    fn signature(&self) -> &'static str {
        "Binance API"
    }

    async fn fetch_candles(&self, pair_interval: &PairInterval, limit: i32) -> Result<CandleSeries> {
        let params = KlinesParams::builder(
            pair_interval.bn_name().to_string(),
            try_interval_from_ms(pair_interval.interval_ms)?,
        )
        .limit(limit)
        .build()?;

        let rows = self.fetch_rows(params, pair_interval).await?;
        let candles = convert_klines(rows)
            .with_context(|| format!("{} convert_klines failed", pair_interval))?;
        #[cfg(debug_assertions)]
        log::debug!("{}: received {} klines", pair_interval, candles.len());

        // Binance returns oldest first; CandleSeries rejects anything else
        Ok(CandleSeries::new(pair_interval.clone(), candles)?)
    }
}
