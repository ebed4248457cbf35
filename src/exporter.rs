//! Export driver: fetch a period's trades from the portal and persist
//! the export document.

use std::path::PathBuf;

use anyhow::Result;
use chrono::{Duration, NaiveDate, Utc};
use clap::ValueEnum;
use common::{ExportDocument, Period, TradeRecord};
use export_engine::{filter_valid, summarize};
use propreports_client::PropReportsClient;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::store::{self, ExportStore};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportKind {
    Daily,
    Weekly,
    Monthly,
}

/// The period containing `date`, or the one containing today.
pub fn resolve_period(kind: ExportKind, date: Option<NaiveDate>) -> Period {
    let anchor = date.unwrap_or_else(|| Utc::now().date_naive());
    match kind {
        ExportKind::Daily => Period::day(anchor),
        ExportKind::Weekly => Period::week_of(anchor),
        ExportKind::Monthly => Period::month_of(anchor),
    }
}

pub async fn run_export(cfg: &AppConfig, store: &ExportStore, period: Period) -> Result<PathBuf> {
    let password = cfg.portal_password()?;
    let mut client = PropReportsClient::new(
        &cfg.propreports.domain,
        &cfg.propreports.account,
        &password,
        cfg.propreports.timeout_secs,
    )?;
    client.login().await?;

    // Daily fetches widen to a two-day window. The portal's report
    // sometimes carries the tail of the prior session; the date filter
    // below keeps only the requested day.
    let (fetch_start, fetch_end) = match period {
        Period::Day(day) => (day - Duration::days(1), day),
        _ => (period.start(), period.end()),
    };

    let rows = client.fetch_trades(fetch_start, fetch_end).await?;
    info!("Fetched {} report rows for {}", rows.len(), period.label());

    let in_window: Vec<TradeRecord> = rows
        .into_iter()
        .filter(|t| period.contains_date(&t.date))
        .collect();

    let (valid, dropped) = filter_valid(in_window);
    if dropped > 0 {
        warn!(
            "Dropped {} subtotal/header rows from the {} report",
            dropped,
            period.label()
        );
    }
    if valid.is_empty() {
        info!("No trades for {}; writing an empty document", period.label());
    }

    let summary = summarize(&valid);
    let doc = ExportDocument::new(
        &cfg.propreports.account,
        &period.label(),
        &store::now_stamp(),
        valid,
        summary,
    );

    let path = store.document_path(&period);
    store.save_document(&path, &doc)?;
    info!(
        "✅ Export complete: {} ({} trades, net ${:.2})",
        path.display(),
        doc.summary.total_trades,
        doc.summary.net_pnl
    );
    Ok(path)
}
