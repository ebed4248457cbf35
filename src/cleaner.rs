//! Cleaning driver: re-validate every persisted export document and
//! rewrite the ones that still carry subtotal or header rows.

use std::path::Path;

use anyhow::Result;
use export_engine::{clean_document, CleanOutcome};
use tracing::{debug, info, warn};

use crate::store::ExportStore;

/// Tally of one cleaning run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanReport {
    pub processed: usize,
    pub rewritten: usize,
    pub removed_trades: usize,
    pub failures: usize,
}

pub fn run_clean(store: &ExportStore) -> Result<CleanReport> {
    let files = store.list_documents()?;
    info!(
        "Checking {} export files under {}",
        files.len(),
        store.root().display()
    );

    let mut report = CleanReport::default();
    for path in files {
        report.processed += 1;
        match clean_file(store, &path) {
            Ok(outcome) if outcome.changed() => {
                report.rewritten += 1;
                report.removed_trades += outcome.removed;
                info!(
                    "Cleaned {}: removed {} invalid rows, kept {}",
                    path.display(),
                    outcome.removed,
                    outcome.kept
                );
            }
            Ok(_) => debug!("{}: already clean", path.display()),
            // one unreadable file must not abort the batch
            Err(e) => {
                report.failures += 1;
                warn!("Skipping {}: {}", path.display(), e);
            }
        }
    }

    info!(
        "✅ Cleaning done: {} files checked, {} rewritten, {} rows removed, {} failures",
        report.processed, report.rewritten, report.removed_trades, report.failures
    );
    Ok(report)
}

fn clean_file(store: &ExportStore, path: &Path) -> common::Result<CleanOutcome> {
    let mut doc = store.load_document(path)?;
    let outcome = clean_document(&mut doc);
    // an untouched document is never rewritten, not even reformatted
    if outcome.changed() {
        store.save_document(path, &doc)?;
    }
    Ok(outcome)
}
