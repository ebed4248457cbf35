//! Coaching driver: resolve the review period, derive its statistics
//! from the persisted export and save the model's review.

use std::path::PathBuf;

use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate, Utc};
use clap::ValueEnum;
use coach_client::{CoachClient, CoachRequest, ReviewCadence};
use common::{Error, Period, PeriodKind, PeriodStats};
use export_engine::period_stats;
use serde_json::{json, Map, Value};
use tracing::info;

use crate::config::AppConfig;
use crate::store::{self, ExportStore};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CoachKind {
    Weekly,
    Monthly,
}

pub struct CoachArgs {
    pub kind: CoachKind,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub week: Option<u32>,
    pub auto: bool,
}

/// Resolve which period to review.
///
/// `--auto` reviews the previous period while the current one is too
/// young to judge: the first five days of a month review the prior
/// month, Monday and Tuesday review the prior week.
pub fn resolve_review_period(args: &CoachArgs, today: NaiveDate) -> Result<Period> {
    match args.kind {
        CoachKind::Monthly => {
            if args.auto {
                let anchor = if today.day() <= 5 {
                    today - Duration::days(today.day0() as i64 + 1)
                } else {
                    today
                };
                return Ok(Period::month_of(anchor));
            }
            let year = args.year.unwrap_or(today.year());
            let month = args.month.unwrap_or(today.month());
            Period::from_year_month(year, month)
                .ok_or_else(|| anyhow::anyhow!("invalid month {}-{:02}", year, month))
        }
        CoachKind::Weekly => {
            if args.auto {
                let anchor = if today.weekday().num_days_from_monday() <= 1 {
                    today - Duration::days(7)
                } else {
                    today
                };
                return Ok(Period::week_of(anchor));
            }
            let year = args.year.unwrap_or(today.iso_week().year());
            match args.week {
                Some(week) => Period::from_iso_week(year, week)
                    .ok_or_else(|| anyhow::anyhow!("invalid week {}-W{:02}", year, week)),
                None => Ok(Period::week_of(today)),
            }
        }
    }
}

pub async fn run_coach(cfg: &AppConfig, store: &ExportStore, args: CoachArgs) -> Result<PathBuf> {
    let today = Utc::now().date_naive();
    let period = resolve_review_period(&args, today)?;
    let label = period.label();

    let path = store
        .find_document(period.kind(), &label)
        .ok_or_else(|| Error::MissingDocument(label.clone()))?;
    let doc = store.load_document(&path)?;
    let current = period_stats(&doc);
    info!(
        "Reviewing {} ({} trades, net ${:.2})",
        label, current.total_trades, current.net_pnl
    );

    let request = match period {
        Period::Month(first) => CoachRequest::monthly(current, previous_month_stats(store, first)),
        Period::Week(monday) => CoachRequest::weekly(current, recent_week_stats(store, monday)),
        Period::Day(_) => anyhow::bail!("daily coaching reviews are not supported"),
    };

    let api_key = cfg.coach_api_key()?;
    let client = CoachClient::new(api_key, cfg.coach.model.clone(), cfg.coach.timeout_ms)
        .with_api_url(cfg.coach.api_url.clone());
    let reply = client
        .review(&request)
        .await
        .map_err(|e| Error::Coach(e.to_string()))?;

    let report = build_report(&request, reply.into_value(), &label)?;
    let out = store.coaching_path(request.cadence.as_str(), &label);
    store.save_coaching(&out, &report)?;
    info!("✅ Coaching report saved: {}", out.display());
    Ok(out)
}

fn build_report(request: &CoachRequest, coaching: Value, label: &str) -> Result<Value> {
    let mut report = Map::new();
    report.insert("generated_at".into(), json!(store::now_iso()));
    report.insert("period".into(), json!(label));
    report.insert("type".into(), json!(request.cadence.as_str()));
    report.insert("request_id".into(), json!(request.request_id.to_string()));
    report.insert("data_analyzed".into(), serde_json::to_value(&request.current)?);
    match request.cadence {
        ReviewCadence::Monthly => {
            report.insert(
                "previous_month_data".into(),
                serde_json::to_value(&request.previous_month)?,
            );
        }
        ReviewCadence::Weekly => {
            report.insert(
                "previous_weeks_data".into(),
                serde_json::to_value(&request.previous_weeks)?,
            );
        }
    }
    report.insert("coaching".into(), coaching);
    Ok(Value::Object(report))
}

fn previous_month_stats(store: &ExportStore, first: NaiveDate) -> Option<PeriodStats> {
    let prev = Period::month_of(first - Duration::days(1));
    let path = store.find_document(PeriodKind::Monthly, &prev.label())?;
    let doc = store.load_document(&path).ok()?;
    Some(period_stats(&doc))
}

/// Stats for up to four weeks immediately before the reviewed one,
/// oldest first. Missing weeks are skipped, not errors.
fn recent_week_stats(store: &ExportStore, monday: NaiveDate) -> Vec<PeriodStats> {
    let mut recent = Vec::new();
    for weeks_back in (1..=4).rev() {
        let prev = Period::week_of(monday - Duration::days(7 * weeks_back));
        let Some(path) = store.find_document(PeriodKind::Weekly, &prev.label()) else {
            continue;
        };
        if let Ok(doc) = store.load_document(&path) {
            recent.push(period_stats(&doc));
        }
    }
    recent
}
