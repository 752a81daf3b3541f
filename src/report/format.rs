//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the simulation/statistics code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use crate::domain::{DistributionMode, SummaryStatistics};
use crate::sim::{Rejection, ResultSet};

/// Run header: mode, seed, and how many draws survived the validity gate.
pub fn format_run_summary(results: &ResultSet, mode: DistributionMode, seed: u64, threads: usize) -> String {
    let mut out = String::new();

    out.push_str("=== sotp - SOTP Monte Carlo Valuation ===\n");
    out.push_str(&format!("Mode: {} | seed={seed} | threads={threads}\n", mode.display_name()));
    out.push_str(&format!(
        "Iterations: {} | valid={} | rejected={} ({:.2}%)\n",
        fmt_thousands(results.attempted() as f64),
        fmt_thousands(results.len() as f64),
        fmt_thousands(results.rejected() as f64),
        results.rejection_rate() * 100.0,
    ));
    for reason in Rejection::ALL {
        let n = results.rejected_for(reason);
        if n > 0 {
            out.push_str(&format!("  (rejected {}) {}\n", reason.display_name(), fmt_thousands(n as f64)));
        }
    }
    out.push('\n');

    out
}

/// Statistic/value table.
pub fn format_statistics(stats: &SummaryStatistics, currency: &str) -> String {
    let money = |v: f64| fmt_money(v, currency);
    let rows: Vec<(String, String)> = vec![
        ("Trials".to_string(), fmt_thousands(stats.trials as f64)),
        ("Target Price (Mean)".to_string(), money(stats.mean)),
        ("Mean upside%".to_string(), format!("{:.2}%", stats.mean_upside_percent)),
        ("25th percentile".to_string(), money(stats.percentile_25)),
        ("Median".to_string(), money(stats.median)),
        ("75th percentile".to_string(), money(stats.percentile_75)),
        ("Standard deviation".to_string(), money(stats.std_dev)),
        ("Coefficient of Variation".to_string(), format!("{:.2}", stats.coefficient_of_variation)),
        ("Skewness".to_string(), format!("{:.2}", stats.skewness)),
        ("Kurtosis".to_string(), format!("{:.2}", stats.kurtosis)),
        (
            "% above 10% upside".to_string(),
            format!("{:.2}%", stats.prob_above_10pct_upside * 100.0),
        ),
        (
            format!("% bull scenario (> {})", money(stats.bull_threshold)),
            format!("{:.2}%", stats.prob_bull_scenario * 100.0),
        ),
    ];

    let key_width = rows.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    let mut out = String::new();
    out.push_str("--- Monte Carlo Simulation Statistical Analysis ---\n");
    for (key, value) in rows {
        out.push_str(&format!("{key:<key_width$}  {value}\n"));
    }
    out
}

/// `Rp 12,345` style amount, rounded to whole units.
pub fn fmt_money(v: f64, currency: &str) -> String {
    if currency.is_empty() {
        fmt_thousands(v)
    } else {
        format!("{currency} {}", fmt_thousands(v))
    }
}

/// Round to an integer and group digits by thousands.
pub fn fmt_thousands(v: f64) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }
    let rounded = v.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::summarize;

    #[test]
    fn thousands_grouping() {
        assert_eq!(fmt_thousands(0.0), "0");
        assert_eq!(fmt_thousands(999.4), "999");
        assert_eq!(fmt_thousands(1_000.0), "1,000");
        assert_eq!(fmt_thousands(11_500.0), "11,500");
        assert_eq!(fmt_thousands(1_234_567.6), "1,234,568");
        assert_eq!(fmt_thousands(-7_700.0), "-7,700");
    }

    #[test]
    fn money_prefix() {
        assert_eq!(fmt_money(7_700.0, "Rp"), "Rp 7,700");
        assert_eq!(fmt_money(7_700.0, ""), "7,700");
    }

    #[test]
    fn statistics_table_lists_every_field() {
        let stats = summarize(&[100.0, 200.0, 300.0, 400.0, 500.0], 250.0, 450.0).unwrap();
        let txt = format_statistics(&stats, "Rp");
        assert!(txt.contains("Trials"));
        assert!(
            txt.lines().any(|l| l.starts_with("Target Price (Mean)") && l.ends_with("  Rp 300")),
            "{txt}"
        );
        assert!(txt.contains("Mean upside%"));
        assert!(txt.contains("20.00%"));
        assert!(txt.contains("% above 10% upside"));
        assert!(txt.contains("60.00%"));
        assert!(txt.contains("% bull scenario (> Rp 450)"));
        assert!(txt.contains("Kurtosis"));
        assert!(txt.contains("-1.20"));
    }
}
