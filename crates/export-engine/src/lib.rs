//! Validation, aggregation and cleaning for persisted trade exports.
//!
//! Everything in this crate is pure: the drivers in the binary decide
//! what to fetch, load and persist, this crate decides what a valid
//! trade is and what the derived blocks look like.

pub mod document;
pub mod stats;
pub mod summarize;
pub mod validate;

pub use document::{clean_document, CleanOutcome};
pub use stats::period_stats;
pub use summarize::summarize;
pub use validate::{filter_valid, is_valid_trade};
