use std::collections::BTreeMap;

use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, EnumIter};

use crate::analysis::{AnalysisError, sma};
use crate::config::SignalSettings;
use crate::domain::CandleSeries;

/// One named condition of the capitulation rule. A candle is a signal only when
/// every rule in the evaluator's rule list holds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, AsRefStr, Serialize,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum SignalRule {
    /// Timeframe gate. Only daily series are evaluated, so it always holds.
    IsDailyOrAbove,
    AbnormalVolume,
    CloseBelowMa200,
    Ma200AboveMa50,
}

/// The numbers a rule is judged against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalMeasures {
    pub close: f64,
    pub volume: f64,
    pub ma50: f64,
    pub ma200: f64,
    pub vol_sma20: f64,
    pub vol_threshold: f64,
}

impl SignalRule {
    pub fn holds(&self, m: &SignalMeasures) -> bool {
        match self {
            SignalRule::IsDailyOrAbove => true,
            SignalRule::AbnormalVolume => m.volume > m.vol_threshold,
            SignalRule::CloseBelowMa200 => m.close < m.ma200,
            SignalRule::Ma200AboveMa50 => m.ma200 > m.ma50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalResult {
    #[serde(flatten)]
    pub measures: SignalMeasures,
    pub signal: bool,
    pub conditions: BTreeMap<SignalRule, bool>,
}

impl SignalResult {
    /// The outcome is the logical AND of every condition.
    pub fn from_conditions(measures: SignalMeasures, conditions: BTreeMap<SignalRule, bool>) -> Self {
        let signal = conditions.values().all(|&passed| passed);
        Self {
            measures,
            signal,
            conditions,
        }
    }

    pub fn condition(&self, rule: SignalRule) -> Option<bool> {
        self.conditions.get(&rule).copied()
    }

    /// Rules that did not hold, in rule order.
    pub fn failed_rules(&self) -> impl Iterator<Item = SignalRule> + '_ {
        self.conditions
            .iter()
            .filter(|&(_, &passed)| !passed)
            .map(|(&rule, _)| rule)
    }
}

/// Classifies one closed daily candle as a capitulation buy signal or not.
#[derive(Debug, Clone)]
pub struct SignalEvaluator {
    settings: SignalSettings,
    rules: Vec<SignalRule>,
}

impl SignalEvaluator {
    /// Evaluator applying every known rule.
    pub fn new(settings: SignalSettings) -> Self {
        Self::with_rules(settings, SignalRule::iter().collect())
    }

    pub fn with_rules(settings: SignalSettings, rules: Vec<SignalRule>) -> Self {
        Self { settings, rules }
    }

    pub fn settings(&self) -> &SignalSettings {
        &self.settings
    }

    pub fn evaluate(&self, series: &CandleSeries, index: usize) -> Result<SignalResult, AnalysisError> {
        self.evaluate_columns(&series.close_prices(), &series.base_volumes(), index)
    }

    /// Same as `evaluate`, on pre-extracted close and volume columns so a scan
    /// over many indices extracts them once.
    pub fn evaluate_columns(
        &self,
        closes: &[f64],
        volumes: &[f64],
        index: usize,
    ) -> Result<SignalResult, AnalysisError> {
        let s = &self.settings;
        let ma50 = sma(closes, s.ma_short_period, index)?;
        let ma200 = sma(closes, s.ma_long_period, index)?;
        let vol_sma20 = sma(volumes, s.volume_sma_period, index)?;

        let measures = SignalMeasures {
            close: closes[index],
            volume: volumes[index],
            ma50,
            ma200,
            vol_sma20,
            vol_threshold: vol_sma20 * s.volume_multiplier,
        };
        let conditions = self
            .rules
            .iter()
            .map(|&rule| (rule, rule.holds(&measures)))
            .collect();

        Ok(SignalResult::from_conditions(measures, conditions))
    }
}

impl Default for SignalEvaluator {
    fn default() -> Self {
        Self::new(SignalSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Candle, PairInterval};
    use crate::utils::TimeUtils;

    const DAY: i64 = TimeUtils::MS_IN_D;

    /// 200 daily candles built so that at index 199:
    /// close = 100, MA200 = 110, MA50 = 90 and the 20-day volume window is
    /// `prior_volumes` (19 values) followed by `last_volume`.
    fn scenario_series(prior_volumes: &[f64], last_volume: f64) -> CandleSeries {
        assert_eq!(prior_volumes.len(), 19);
        let mut closes = Vec::with_capacity(200);
        closes.extend(std::iter::repeat_n(110.0, 100));
        closes.extend(std::iter::repeat_n(130.0, 50));
        closes.extend(std::iter::repeat_n(90.0, 48));
        closes.push(80.0);
        closes.push(100.0);

        let mut volumes = vec![1.0; 180];
        volumes.extend_from_slice(prior_volumes);
        volumes.push(last_volume);

        let candles = closes
            .iter()
            .zip(volumes.iter())
            .enumerate()
            .map(|(i, (&close, &volume))| {
                let i = i as i64;
                Candle::new(i * DAY, close, close, close, close, volume, (i + 1) * DAY - 1)
            })
            .collect();
        CandleSeries::new(PairInterval::new("BTCUSDT", DAY), candles).unwrap()
    }

    fn volumes_summing_to_350() -> Vec<f64> {
        let mut v = vec![20.0; 14];
        v.extend(std::iter::repeat_n(14.0, 5));
        v
    }

    fn volumes_summing_to_360() -> Vec<f64> {
        let mut v = vec![20.0; 18];
        v.push(0.0);
        v
    }

    fn volumes_summing_to_370() -> Vec<f64> {
        let mut v = vec![20.0; 18];
        v.push(10.0);
        v
    }

    #[test]
    fn test_all_conditions_hold_gives_signal() {
        let series = scenario_series(&volumes_summing_to_350(), 50.0);
        let result = SignalEvaluator::default().evaluate(&series, 199).unwrap();

        assert_eq!(result.measures.close, 100.0);
        assert_eq!(result.measures.ma200, 110.0);
        assert_eq!(result.measures.ma50, 90.0);
        assert_eq!(result.measures.vol_sma20, 20.0);
        assert_eq!(result.measures.vol_threshold, 40.0);
        assert_eq!(result.condition(SignalRule::IsDailyOrAbove), Some(true));
        assert_eq!(result.condition(SignalRule::AbnormalVolume), Some(true));
        assert_eq!(result.condition(SignalRule::CloseBelowMa200), Some(true));
        assert_eq!(result.condition(SignalRule::Ma200AboveMa50), Some(true));
        assert!(result.signal);
        assert_eq!(result.failed_rules().count(), 0);
    }

    #[test]
    fn test_volume_below_threshold_is_the_only_failure() {
        let series = scenario_series(&volumes_summing_to_370(), 30.0);
        let result = SignalEvaluator::default().evaluate(&series, 199).unwrap();

        assert_eq!(result.measures.vol_threshold, 40.0);
        assert!(!result.signal);
        assert_eq!(
            result.failed_rules().collect::<Vec<_>>(),
            vec![SignalRule::AbnormalVolume]
        );
    }

    #[test]
    fn test_volume_equal_to_threshold_is_not_abnormal() {
        // Prior 19 sum to 360, last is 40: SMA20 = 20, threshold = 40
        let series = scenario_series(&volumes_summing_to_360(), 40.0);
        let result = SignalEvaluator::default().evaluate(&series, 199).unwrap();
        assert_eq!(result.measures.vol_sma20, 20.0);
        assert_eq!(result.measures.vol_threshold, 40.0);
        assert_eq!(result.measures.volume, 40.0);
        assert_eq!(result.condition(SignalRule::AbnormalVolume), Some(false));
        assert_eq!(
            result.failed_rules().collect::<Vec<_>>(),
            vec![SignalRule::AbnormalVolume]
        );
        assert!(!result.signal);
    }

    #[test]
    fn test_flipping_any_single_condition_clears_signal() {
        let measures = SignalMeasures {
            close: 100.0,
            volume: 50.0,
            ma50: 90.0,
            ma200: 110.0,
            vol_sma20: 20.0,
            vol_threshold: 40.0,
        };
        let all_pass: BTreeMap<_, _> = SignalRule::iter().map(|r| (r, true)).collect();
        assert!(SignalResult::from_conditions(measures, all_pass.clone()).signal);

        for rule in SignalRule::iter() {
            let mut conditions = all_pass.clone();
            conditions.insert(rule, false);
            let result = SignalResult::from_conditions(measures, conditions);
            assert!(!result.signal, "{} = false should clear the signal", rule.as_ref());
            assert_eq!(result.failed_rules().collect::<Vec<_>>(), vec![rule]);
        }
    }

    #[test]
    fn test_evaluating_without_long_ma_history_fails() {
        let series = scenario_series(&volumes_summing_to_350(), 50.0);
        let err = SignalEvaluator::default().evaluate(&series, 198).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::InsufficientHistory {
                period: 200,
                index: 198
            }
        );
    }

    #[test]
    fn test_rule_names_are_camel_case() {
        let names: Vec<String> = SignalRule::iter().map(|r| r.as_ref().to_string()).collect();
        assert_eq!(
            names,
            vec![
                "isDailyOrAbove",
                "abnormalVolume",
                "closeBelowMa200",
                "ma200AboveMa50"
            ]
        );
    }

    #[test]
    fn test_result_serializes_flat() {
        let series = scenario_series(&volumes_summing_to_350(), 50.0);
        let result = SignalEvaluator::default().evaluate(&series, 199).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["ma200"], 110.0);
        assert_eq!(json["volSma20"], 20.0);
        assert_eq!(json["volThreshold"], 40.0);
        assert_eq!(json["signal"], true);
        assert_eq!(json["conditions"]["abnormalVolume"], true);
    }
}
