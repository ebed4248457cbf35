//! Shared types and error definitions for the prop-coach toolkit.

pub mod error;
pub mod types;

pub use error::Error;
pub use types::*;

/// Convenience Result type used across the workspace.
pub type Result<T> = std::result::Result<T, Error>;
