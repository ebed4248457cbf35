use common::PeriodStats;
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::prompt;

/// Which review a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewCadence {
    Weekly,
    Monthly,
}

impl ReviewCadence {
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewCadence::Weekly => "weekly",
            ReviewCadence::Monthly => "monthly",
        }
    }
}

/// One coaching request: the period under review plus whatever history
/// is available for comparison.
#[derive(Debug, Clone)]
pub struct CoachRequest {
    pub request_id: Uuid,
    pub cadence: ReviewCadence,
    pub current: PeriodStats,
    /// Monthly reviews compare against the prior month when its export
    /// exists.
    pub previous_month: Option<PeriodStats>,
    /// Weekly reviews compare against up to four prior weeks.
    pub previous_weeks: Vec<PeriodStats>,
}

impl CoachRequest {
    pub fn monthly(current: PeriodStats, previous_month: Option<PeriodStats>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            cadence: ReviewCadence::Monthly,
            current,
            previous_month,
            previous_weeks: Vec::new(),
        }
    }

    pub fn weekly(current: PeriodStats, previous_weeks: Vec<PeriodStats>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            cadence: ReviewCadence::Weekly,
            current,
            previous_month: None,
            previous_weeks,
        }
    }

    /// The user-role prompt sent for this request.
    pub fn user_prompt(&self) -> String {
        match self.cadence {
            ReviewCadence::Monthly => {
                prompt::monthly_prompt(&self.current, self.previous_month.as_ref())
            }
            ReviewCadence::Weekly => prompt::weekly_prompt(&self.current, &self.previous_weeks),
        }
    }
}

/// The model's review. The prompt asks for strict JSON; anything that
/// fails to parse is kept as raw text rather than discarded.
#[derive(Debug, Clone, PartialEq)]
pub enum CoachingReply {
    Structured(Value),
    Raw(String),
}

impl CoachingReply {
    /// The JSON persisted under the `coaching` key of a report.
    pub fn into_value(self) -> Value {
        match self {
            CoachingReply::Structured(value) => value,
            CoachingReply::Raw(text) => json!({ "raw_response": text }),
        }
    }
}

#[derive(Debug, Error)]
pub enum CoachError {
    #[error("API request failed: {0}")]
    Api(String),

    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("request timed out")]
    Timeout,

    #[error("response missing message content")]
    MissingContent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cadence_directory_names() {
        assert_eq!(ReviewCadence::Weekly.as_str(), "weekly");
        assert_eq!(ReviewCadence::Monthly.as_str(), "monthly");
    }

    #[test]
    fn test_requests_get_distinct_ids() {
        let a = CoachRequest::monthly(PeriodStats::default(), None);
        let b = CoachRequest::monthly(PeriodStats::default(), None);
        assert_ne!(a.request_id, b.request_id);
    }

    #[test]
    fn test_raw_reply_wraps_text() {
        let reply = CoachingReply::Raw("keep sizing consistent".to_string());
        assert_eq!(
            reply.into_value(),
            json!({ "raw_response": "keep sizing consistent" })
        );
    }

    #[test]
    fn test_structured_reply_passes_through() {
        let value = json!({ "week_summary": "solid" });
        let reply = CoachingReply::Structured(value.clone());
        assert_eq!(reply.into_value(), value);
    }
}
