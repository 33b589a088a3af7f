use itertools::Itertools;
use num_format::{Locale, ToFormattedString};

use crate::analysis::SignalRule;
use crate::domain::PairInterval;
use crate::report::SignalReport;
use crate::utils::time_utils::epoch_ms_to_utc;

const OK: &str = "✅";
const NO: &str = "❌";

/// `value` with `decimals` places and comma thousands separators, e.g. `95,123.50`.
pub fn format_grouped(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let int_grouped = int_part
        .parse::<u64>()
        .map(|n| n.to_formatted_string(&Locale::en))
        .unwrap_or_else(|_| int_part.to_string());
    let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{}{}", sign, int_grouped)
    } else {
        format!("{}{}.{}", sign, int_grouped, frac_part)
    }
}

fn price(value: f64) -> String {
    format_grouped(value, 2)
}

fn vol(value: f64) -> String {
    format_grouped(value, 4)
}

fn mark(passed: Option<bool>) -> &'static str {
    if passed.unwrap_or(false) { OK } else { NO }
}

/// Reason shown when `rule` fails. The timeframe gate is not reported.
pub fn failure_reason(rule: SignalRule) -> Option<&'static str> {
    match rule {
        SignalRule::IsDailyOrAbove => None,
        SignalRule::AbnormalVolume => Some("成交量未達爆量門檻"),
        SignalRule::CloseBelowMa200 => Some("收盤價未跌破 MA200"),
        SignalRule::Ma200AboveMa50 => Some("均線結構非 MA200 > MA50"),
    }
}

pub fn format_message(report: &SignalReport) -> String {
    let result = &report.result;
    let m = &result.measures;
    let base = PairInterval::get_base(&report.symbol).unwrap_or(&report.symbol);

    let mut lines = vec![
        format!("📊 {} 抄底監控（日線）", base),
        format!("交易對：{}", report.symbol),
        format!("K線日期（UTC）：{}", epoch_ms_to_utc(report.close_time_ms)),
        String::new(),
        if result.signal {
            "結論：✅ 觸發抄底訊號".to_string()
        } else {
            "結論：❌ 未觸發抄底訊號".to_string()
        },
    ];

    if result.signal && report.is_repeat {
        lines.push(format!(
            "⚠️ 提醒：{} 天內曾出現抄底訊號，屬於重複抄底。",
            report.lookback_days
        ));
    }

    if result.signal {
        lines.push(String::new());
        lines.push("進場價位：".to_string());
        lines.push(format!("- {}", price(m.close)));
        if report.reversal_entries.is_empty() {
            lines.push("- 暫無可用第二進場價位".to_string());
        } else {
            lines.extend(
                report
                    .reversal_entries
                    .iter()
                    .map(|entry| format!("- {}", price(entry.price))),
            );
        }
    } else {
        let reasons = result.failed_rules().filter_map(failure_reason).join("；");
        lines.push("未通過條件：".to_string());
        lines.push(format!("- {}", if reasons.is_empty() { "無" } else { reasons.as_str() }));
    }

    lines.extend([
        String::new(),
        "條件檢查：".to_string(),
        format!(
            "- {} 爆量成立：{} > 2 × {}",
            mark(result.condition(SignalRule::AbnormalVolume)),
            vol(m.volume),
            vol(m.vol_sma20)
        ),
        format!(
            "- {} 跌破長期均線：{} < {}",
            mark(result.condition(SignalRule::CloseBelowMa200)),
            price(m.close),
            price(m.ma200)
        ),
        format!(
            "- {} 空頭均線結構：MA200 {} > MA50 {}",
            mark(result.condition(SignalRule::Ma200AboveMa50)),
            price(m.ma200),
            price(m.ma50)
        ),
    ]);

    lines.join("\n")
}
