//! OpenAI-backed coaching reviews of trading performance.

pub mod client;
pub mod prompt;
pub mod types;

pub use client::CoachClient;
pub use types::{CoachError, CoachRequest, CoachingReply, ReviewCadence};
