//! Client for a PropReports-style reporting portal.
//!
//! Covers the full fetch path: form login capturing the session
//! cookie, a single-attempt report request for a date window, and
//! parsing of the delimited report body into trade records.

pub mod parse;
pub mod rest;

pub use parse::parse_trades;
pub use rest::PropReportsClient;
