//! Screens report rows for the artifacts PropReports leaks into its
//! trade listings: subtotal lines, section headers and summary rows.

use common::TradeRecord;

/// Whether a record is a genuine trade row.
///
/// Three rejection rules, each shaped by a known artifact:
/// subtotal rows carry the numeric total in the symbol column, header
/// and summary rows have no `HH:MM:SS` open time, and only genuine
/// rows carry a long/short direction.
pub fn is_valid_trade(trade: &TradeRecord) -> bool {
    if !trade.symbol.is_empty() && trade.symbol.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    if !trade.opened.contains(':') {
        return false;
    }
    matches!(trade.side.to_ascii_lowercase().as_str(), "long" | "short")
}

/// Splits a batch of rows into the valid trades and the count dropped.
pub fn filter_valid(trades: Vec<TradeRecord>) -> (Vec<TradeRecord>, usize) {
    let before = trades.len();
    let valid: Vec<TradeRecord> = trades.into_iter().filter(|t| is_valid_trade(t)).collect();
    let dropped = before - valid.len();
    (valid, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_trade(symbol: &str, opened: &str, side: &str) -> TradeRecord {
        TradeRecord {
            symbol: symbol.to_string(),
            opened: opened.to_string(),
            side: side.to_string(),
            ..TradeRecord::default()
        }
    }

    #[test]
    fn test_accepts_genuine_rows() {
        assert!(is_valid_trade(&make_trade("AAPL", "09:31:02", "Long")));
        assert!(is_valid_trade(&make_trade("TSLA", "10:15:44", "short")));
        assert!(is_valid_trade(&make_trade("SPY", "15:59:01", "LONG")));
    }

    #[test]
    fn test_rejects_numeric_symbol() {
        // subtotal rows leak the row count or total into the symbol column
        assert!(!is_valid_trade(&make_trade("12345", "09:31:02", "Long")));
        assert!(!is_valid_trade(&make_trade("7", "09:31:02", "Long")));
    }

    #[test]
    fn test_accepts_alphanumeric_symbol() {
        assert!(is_valid_trade(&make_trade("BRK.B", "09:31:02", "Long")));
        assert!(is_valid_trade(&make_trade("C6L", "09:31:02", "Short")));
    }

    #[test]
    fn test_rejects_opened_without_time() {
        assert!(!is_valid_trade(&make_trade("AAPL", "", "Long")));
        assert!(!is_valid_trade(&make_trade("AAPL", "Total", "Long")));
    }

    #[test]
    fn test_rejects_unknown_side() {
        assert!(!is_valid_trade(&make_trade("AAPL", "09:31:02", "")));
        assert!(!is_valid_trade(&make_trade("AAPL", "09:31:02", "flat")));
        assert!(!is_valid_trade(&make_trade("AAPL", "09:31:02", "longish")));
    }

    #[test]
    fn test_empty_symbol_passes_digit_rule() {
        // only all-digit symbols mark subtotal rows; an empty symbol is
        // not one, so the other two rules decide
        assert!(is_valid_trade(&make_trade("", "09:31:02", "Long")));
    }

    #[test]
    fn test_missing_fields_default_to_invalid() {
        assert!(!is_valid_trade(&TradeRecord::default()));
    }

    #[test]
    fn test_filter_valid_counts_dropped() {
        let batch = vec![
            make_trade("AAPL", "09:31:02", "Long"),
            make_trade("4512", "", ""),
            make_trade("TSLA", "11:02:13", "Short"),
            make_trade("", "Total", ""),
        ];
        let (valid, dropped) = filter_valid(batch);
        assert_eq!(valid.len(), 2);
        assert_eq!(dropped, 2);
        assert_eq!(valid[0].symbol, "AAPL");
        assert_eq!(valid[1].symbol, "TSLA");
    }
}
