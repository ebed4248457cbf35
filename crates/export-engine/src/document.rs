//! Cleaning pass over a loaded export document.

use chrono::Utc;
use common::ExportDocument;

use crate::summarize::summarize;
use crate::validate::is_valid_trade;

/// What one cleaning pass did to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanOutcome {
    pub kept: usize,
    pub removed: usize,
}

impl CleanOutcome {
    /// Whether the document was modified and needs persisting.
    pub fn changed(&self) -> bool {
        self.removed > 0
    }
}

/// Re-validate a document's trades, dropping rows that fail validation.
///
/// Only a pass that actually removes rows touches the document: the
/// summary is recomputed from the surviving trades and the metadata
/// block is stamped with `cleaned`, `cleanedAt` and `removedTrades`.
/// A pass that removes nothing leaves the document untouched, which
/// also makes cleaning idempotent: a second pass over a cleaned
/// document keeps its original stamp.
pub fn clean_document(doc: &mut ExportDocument) -> CleanOutcome {
    let before = doc.trades.len();
    doc.trades.retain(|t| is_valid_trade(t));
    let removed = before - doc.trades.len();

    if removed > 0 {
        doc.summary = summarize(&doc.trades);
        let metadata = doc.metadata.get_or_insert_with(Default::default);
        metadata.cleaned = Some(true);
        metadata.cleaned_at = Some(Utc::now().format("%Y-%m-%d %H:%M:%S").to_string());
        metadata.removed_trades = Some(removed);
    }

    CleanOutcome {
        kept: doc.trades.len(),
        removed,
    }
}
