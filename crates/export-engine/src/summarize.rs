//! Reduces a batch of trade records into the summary block persisted
//! alongside them.

use std::collections::BTreeSet;

use common::{TradeRecord, TradeSummary};

/// Round to two decimal places, half away from zero.
///
/// Applied once to each money total, never to intermediate values, so
/// per-record rounding error cannot accumulate.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Aggregate a batch of trades into its summary.
///
/// `netPnL` prefers each record's reported net and falls back to
/// `pnl - commission`; win and loss counts use strict comparisons, so
/// scratch trades count as neither.
pub fn summarize(trades: &[TradeRecord]) -> TradeSummary {
    let total_pnl: f64 = trades.iter().map(|t| t.pnl).sum();
    let total_commissions: f64 = trades.iter().map(|t| t.commission).sum();
    let net_pnl: f64 = trades.iter().map(|t| t.effective_net()).sum();

    let symbols: BTreeSet<&str> = trades
        .iter()
        .map(|t| t.symbol.as_str())
        .filter(|s| !s.is_empty())
        .collect();

    TradeSummary {
        total_trades: trades.len(),
        total_pnl: round2(total_pnl),
        total_commissions: round2(total_commissions),
        net_pnl: round2(net_pnl),
        winning_trades: trades.iter().filter(|t| t.pnl > 0.0).count(),
        losing_trades: trades.iter().filter(|t| t.pnl < 0.0).count(),
        symbols: symbols.into_iter().map(|s| s.to_string()).collect(),
    }
}
