//! Period-level statistics derived from an export document, feeding
//! the coaching prompts.

use std::collections::BTreeMap;

use common::{ExportDocument, PeriodStats};

use crate::summarize::{round2, summarize};

/// Derive the coaching statistics for one document.
///
/// The summary is recomputed from the trades rather than trusted from
/// disk, so a stale or hand-edited summary block cannot skew a review.
/// Daily buckets group each trade's effective net by its `date` field;
/// trades without a date contribute to the totals but to no day.
pub fn period_stats(doc: &ExportDocument) -> PeriodStats {
    let summary = summarize(&doc.trades);

    let mut by_day: BTreeMap<&str, f64> = BTreeMap::new();
    for trade in &doc.trades {
        if trade.date.is_empty() {
            continue;
        }
        *by_day.entry(trade.date.as_str()).or_insert(0.0) += trade.effective_net();
    }

    let trading_days = by_day.len();
    let best_day_pnl = by_day.values().fold(f64::MIN, |acc, v| acc.max(*v));
    let worst_day_pnl = by_day.values().fold(f64::MAX, |acc, v| acc.min(*v));
    let positive_days = by_day.values().filter(|v| **v > 0.0).count();

    let decided = summary.winning_trades + summary.losing_trades;
    let win_rate = if decided == 0 {
        0.0
    } else {
        summary.winning_trades as f64 * 100.0 / decided as f64
    };

    let avg_pnl_per_trade = summary.total_pnl / summary.total_trades.max(1) as f64;

    let consistency = if trading_days == 0 {
        "N/A".to_string()
    } else {
        format!(
            "{:.0}% positive days",
            positive_days as f64 * 100.0 / trading_days as f64
        )
    };

    PeriodStats {
        total_trades: summary.total_trades,
        total_pnl: summary.total_pnl,
        total_commissions: summary.total_commissions,
        net_pnl: summary.net_pnl,
        win_rate,
        trading_days,
        best_day_pnl: if trading_days == 0 { 0.0 } else { round2(best_day_pnl) },
        worst_day_pnl: if trading_days == 0 { 0.0 } else { round2(worst_day_pnl) },
        avg_pnl_per_trade: round2(avg_pnl_per_trade),
        consistency,
        symbols: summary.symbols,
    }
}
