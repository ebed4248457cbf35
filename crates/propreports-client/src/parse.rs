//! Turns a delimited report body into trade records.
//!
//! The portal's export format drifts across deployments: header names
//! vary in case and wording, money cells mix `$`, thousands commas and
//! accounting parentheses, and subtotal rows are interleaved with the
//! trades they total. Parsing is deliberately permissive and keeps
//! every row; the validator decides later which rows are trades.

use common::{Error, Result, TradeRecord};
use csv::ReaderBuilder;
use serde_json::Value;

/// Map a header cell to the column it feeds, if the toolkit models it.
fn canonical_column(name: &str) -> Option<&'static str> {
    let key = name
        .trim()
        .trim_start_matches('\u{feff}')
        .to_ascii_lowercase();
    match key.as_str() {
        "symbol" | "sym" => Some("symbol"),
        "opened" | "open time" | "open" => Some("opened"),
        "type" | "side" => Some("type"),
        "p&l" | "pnl" | "gross p&l" | "gross" => Some("pnl"),
        "comm" | "commission" | "commissions" | "fees" => Some("commission"),
        "net" | "net p&l" => Some("net"),
        "date" | "trade date" => Some("date"),
        "closed" | "close time" => Some("closed"),
        "held" => Some("held"),
        "qty" | "quantity" | "shares" => Some("qty"),
        "entry" | "avg entry" => Some("entry"),
        "exit" | "avg exit" => Some("exit"),
        _ => None,
    }
}

/// Normalize a money cell: strip `$` and thousands commas, read
/// accounting parentheses as negation. Empty and non-numeric cells
/// become `None`.
fn parse_money(cell: &str) -> Option<f64> {
    let cleaned: String = cell
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ','))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    if let Some(inner) = cleaned.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        return inner.parse::<f64>().ok().map(|v| -v);
    }
    cleaned.parse::<f64>().ok()
}

/// Parse a report body into records, one per non-blank data row.
pub fn parse_trades(body: &str) -> Result<Vec<TradeRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| Error::Csv(e.to_string()))?
        .clone();
    let columns: Vec<Option<&'static str>> = headers.iter().map(canonical_column).collect();

    let mut trades = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| Error::Csv(e.to_string()))?;
        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }

        let mut trade = TradeRecord::default();
        for (idx, cell) in row.iter().enumerate() {
            let Some(column) = columns.get(idx).copied().flatten() else {
                continue;
            };
            match column {
                "symbol" => trade.symbol = cell.to_string(),
                "opened" => trade.opened = cell.to_string(),
                "type" => trade.side = cell.to_string(),
                "pnl" => trade.pnl = parse_money(cell).unwrap_or(0.0),
                "commission" => trade.commission = parse_money(cell).unwrap_or(0.0),
                "net" => trade.net = parse_money(cell),
                "date" => trade.date = cell.to_string(),
                other => {
                    trade
                        .extra
                        .insert(other.to_string(), Value::String(cell.to_string()));
                }
            }
        }
        trades.push(trade);
    }
    Ok(trades)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "\
Date,Opened,Closed,Held,Symbol,Type,Qty,P&L,Comm,Net
2025-08-25,09:31:02,09:35:44,00:04:42,AAPL,Long,100,\"$125.50\",$2.00,\"$123.50\"
2025-08-25,10:02:13,10:40:01,00:37:48,TSLA,Short,50,\"($40.00)\",$1.50,\"($41.50)\"
,,,,2,,150,\"$85.50\",$3.50,\"$82.00\"
2025-08-25,11:15:09,11:16:21,00:01:12,BRK.B,Long,10,\"$1,024.00\",$0.35,\"$1,023.65\"
";

    #[test]
    fn test_parses_genuine_rows() {
        let trades = parse_trades(REPORT).unwrap();
        assert_eq!(trades.len(), 4);

        let first = &trades[0];
        assert_eq!(first.symbol, "AAPL");
        assert_eq!(first.opened, "09:31:02");
        assert_eq!(first.side, "Long");
        assert_eq!(first.date, "2025-08-25");
        assert_eq!(first.pnl, 125.50);
        assert_eq!(first.commission, 2.00);
        assert_eq!(first.net, Some(123.50));
    }

    #[test]
    fn test_accounting_parentheses_negate() {
        let trades = parse_trades(REPORT).unwrap();
        assert_eq!(trades[1].pnl, -40.0);
        assert_eq!(trades[1].net, Some(-41.5));
    }

    #[test]
    fn test_thousands_separators_stripped() {
        let trades = parse_trades(REPORT).unwrap();
        assert_eq!(trades[3].pnl, 1024.0);
        assert_eq!(trades[3].net, Some(1023.65));
    }

    #[test]
    fn test_subtotal_row_kept_with_leaked_symbol() {
        // the count lands in the symbol column and no open time is set;
        // validation downstream rejects exactly this shape
        let trades = parse_trades(REPORT).unwrap();
        let subtotal = &trades[2];
        assert_eq!(subtotal.symbol, "2");
        assert_eq!(subtotal.opened, "");
        assert_eq!(subtotal.side, "");
        assert_eq!(subtotal.pnl, 85.5);
    }

    #[test]
    fn test_unmodeled_columns_ride_in_extra() {
        let trades = parse_trades(REPORT).unwrap();
        assert_eq!(
            trades[0].extra.get("qty"),
            Some(&Value::String("100".to_string()))
        );
        assert_eq!(
            trades[0].extra.get("closed"),
            Some(&Value::String("09:35:44".to_string()))
        );
    }

    #[test]
    fn test_header_aliases_and_case() {
        let body = "\
TRADE DATE,Open,Side,SYM,Gross P&L,Fees
2025-08-25,09:31:02,long,AAPL,10.00,0.50
";
        let trades = parse_trades(body).unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].date, "2025-08-25");
        assert_eq!(trades[0].opened, "09:31:02");
        assert_eq!(trades[0].side, "long");
        assert_eq!(trades[0].symbol, "AAPL");
        assert_eq!(trades[0].pnl, 10.0);
        assert_eq!(trades[0].commission, 0.5);
        assert_eq!(trades[0].net, None);
    }

    #[test]
    fn test_blank_and_short_rows() {
        let body = "\
Symbol,Opened,Type,P&L
,,,
AAPL,09:31:02,Long
";
        let trades = parse_trades(body).unwrap();
        // the blank row is skipped, the short row parses with defaults
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].symbol, "AAPL");
        assert_eq!(trades[0].pnl, 0.0);
    }

    #[test]
    fn test_empty_body() {
        assert!(parse_trades("").unwrap().is_empty());
        assert!(parse_trades("Symbol,Opened,Type\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_money_variants() {
        assert_eq!(parse_money("$125.50"), Some(125.5));
        assert_eq!(parse_money("(40.00)"), Some(-40.0));
        assert_eq!(parse_money("$1,024.00"), Some(1024.0));
        assert_eq!(parse_money("-12.25"), Some(-12.25));
        assert_eq!(parse_money(""), None);
        assert_eq!(parse_money("Total"), None);
    }
}
