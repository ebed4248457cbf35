use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One trade row as persisted in an export document.
///
/// PropReports report rows are ragged: subtotal and header lines leak
/// through with fields missing, and numeric columns sometimes arrive as
/// strings. Every scalar field therefore deserializes leniently, with
/// missing or malformed values collapsing to the field default instead
/// of failing the whole document. Columns the toolkit does not model
/// (qty, entry, exit, held, ...) ride along in `extra` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub symbol: String,

    #[serde(default, deserialize_with = "de::lenient_string")]
    pub opened: String,

    /// Position direction, "Long" or "Short" on genuine rows.
    #[serde(rename = "type", default, deserialize_with = "de::lenient_string")]
    pub side: String,

    /// Gross profit and loss before commissions.
    #[serde(default, deserialize_with = "de::lenient_f64")]
    pub pnl: f64,

    #[serde(default, deserialize_with = "de::lenient_f64")]
    pub commission: f64,

    /// Net result as reported by the portal, when the report carries a
    /// net column at all.
    #[serde(
        default,
        deserialize_with = "de::lenient_opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub net: Option<f64>,

    /// Trade date in `YYYY-MM-DD` form.
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub date: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TradeRecord {
    /// Net result of the trade, deriving `pnl - commission` when the
    /// report did not supply an explicit net column.
    pub fn effective_net(&self) -> f64 {
        self.net.unwrap_or(self.pnl - self.commission)
    }
}

/// Aggregate block stored next to the trades array in every export
/// document. Always recomputable from the trades it describes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TradeSummary {
    pub total_trades: usize,
    #[serde(rename = "totalPnL")]
    pub total_pnl: f64,
    pub total_commissions: f64,
    #[serde(rename = "netPnL")]
    pub net_pnl: f64,
    pub winning_trades: usize,
    pub losing_trades: usize,
    /// Distinct non-empty symbols, sorted for stable output.
    pub symbols: Vec<String>,
}

/// Cleaning markers stamped onto a document once invalid rows have been
/// removed. Absent on documents that never needed cleaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleaned: Option<bool>,

    #[serde(rename = "cleanedAt", default, skip_serializing_if = "Option::is_none")]
    pub cleaned_at: Option<String>,

    #[serde(
        rename = "removedTrades",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub removed_trades: Option<usize>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A persisted export file: the trades for one reporting period plus
/// their summary. Unknown top-level keys survive a load/save cycle via
/// `extra` so that cleaning older files does not shed data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    #[serde(rename = "exportDate", default, skip_serializing_if = "Option::is_none")]
    pub export_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,

    /// Period label the document covers, e.g. `2025-08-25` or `2025-W34`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(default)]
    pub trades: Vec<TradeRecord>,

    #[serde(default)]
    pub summary: TradeSummary,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ExportMetadata>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ExportDocument {
    /// Build a freshly exported document.
    pub fn new(
        account: &str,
        period_label: &str,
        exported_at: &str,
        trades: Vec<TradeRecord>,
        summary: TradeSummary,
    ) -> Self {
        Self {
            export_date: Some(exported_at.to_string()),
            account: Some(account.to_string()),
            date: Some(period_label.to_string()),
            trades,
            summary,
            metadata: None,
            extra: Map::new(),
        }
    }
}

/// Derived statistics for one reporting period, consumed by the
/// coaching prompt builders and persisted with coaching reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PeriodStats {
    pub total_trades: usize,
    #[serde(rename = "totalPnL")]
    pub total_pnl: f64,
    pub total_commissions: f64,
    #[serde(rename = "netPnL")]
    pub net_pnl: f64,
    /// Winning trades as a percentage of decided (non-scratch) trades.
    pub win_rate: f64,
    pub trading_days: usize,
    #[serde(rename = "bestDayPnL")]
    pub best_day_pnl: f64,
    #[serde(rename = "worstDayPnL")]
    pub worst_day_pnl: f64,
    #[serde(rename = "avgPnLPerTrade")]
    pub avg_pnl_per_trade: f64,
    /// Human-readable share of positive days, `"N/A"` with no days.
    pub consistency: String,
    pub symbols: Vec<String>,
}

/// The three export cadences, in directory-name form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodKind {
    Daily,
    Weekly,
    Monthly,
}

impl PeriodKind {
    pub const ALL: [PeriodKind; 3] = [PeriodKind::Daily, PeriodKind::Weekly, PeriodKind::Monthly];

    pub fn dir_name(self) -> &'static str {
        match self {
            PeriodKind::Daily => "daily",
            PeriodKind::Weekly => "weekly",
            PeriodKind::Monthly => "monthly",
        }
    }
}

/// One reporting period. Weeks are ISO weeks anchored on their Monday,
/// months on their first day, so window math never leaves the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Day(NaiveDate),
    /// Monday of the ISO week.
    Week(NaiveDate),
    /// First day of the month.
    Month(NaiveDate),
}

impl Period {
    pub fn day(date: NaiveDate) -> Self {
        Period::Day(date)
    }

    /// The ISO week containing `date`.
    pub fn week_of(date: NaiveDate) -> Self {
        let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
        Period::Week(monday)
    }

    /// The calendar month containing `date`.
    pub fn month_of(date: NaiveDate) -> Self {
        let first = date - Duration::days(date.day0() as i64);
        Period::Month(first)
    }

    /// `None` when the ISO year has no such week.
    pub fn from_iso_week(year: i32, week: u32) -> Option<Self> {
        NaiveDate::from_isoywd_opt(year, week, Weekday::Mon).map(Period::Week)
    }

    pub fn from_year_month(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Period::Month)
    }

    pub fn kind(&self) -> PeriodKind {
        match self {
            Period::Day(_) => PeriodKind::Daily,
            Period::Week(_) => PeriodKind::Weekly,
            Period::Month(_) => PeriodKind::Monthly,
        }
    }

    /// First day of the period window.
    pub fn start(&self) -> NaiveDate {
        match *self {
            Period::Day(d) | Period::Week(d) | Period::Month(d) => d,
        }
    }

    /// Last day of the period window, inclusive.
    pub fn end(&self) -> NaiveDate {
        match *self {
            Period::Day(d) => d,
            Period::Week(monday) => monday + Duration::days(6),
            Period::Month(first) => (first + chrono::Months::new(1)) - Duration::days(1),
        }
    }

    /// File-stem label: `2025-08-25`, `2025-W34` or `2025-08`.
    pub fn label(&self) -> String {
        match *self {
            Period::Day(d) => d.format("%Y-%m-%d").to_string(),
            Period::Week(monday) => {
                let iso = monday.iso_week();
                format!("{:04}-W{:02}", iso.year(), iso.week())
            }
            Period::Month(first) => first.format("%Y-%m").to_string(),
        }
    }

    /// Whether a `YYYY-MM-DD` date string falls inside the window.
    /// Unparseable dates fall outside every window.
    pub fn contains_date(&self, raw: &str) -> bool {
        match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) => date >= self.start() && date <= self.end(),
            Err(_) => false,
        }
    }
}

mod de {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        })
    }

    pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
            _ => 0.0,
        })
    }

    pub fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        })
    }
}
