//! Chat-completions client used for coaching reviews.

use reqwest::header::AUTHORIZATION;
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};

use crate::prompt::SYSTEM_PROMPT;
use crate::types::{CoachError, CoachRequest, CoachingReply};

const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 1500;

/// Client for the chat-completions endpoint.
///
/// One request per review, no retry loop: coaching runs as a batch job
/// and the operator re-runs it on failure.
pub struct CoachClient {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    model: String,
}

impl CoachClient {
    pub fn new(api_key: String, model: String, timeout_ms: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key,
            api_url: DEFAULT_API_URL.to_string(),
            model,
        }
    }

    /// Point the client at a different endpoint, e.g. a proxy.
    pub fn with_api_url(mut self, api_url: String) -> Self {
        self.api_url = api_url;
        self
    }

    #[instrument(skip(self, request), fields(request_id = %request.request_id, cadence = request.cadence.as_str()))]
    pub async fn review(&self, request: &CoachRequest) -> Result<CoachingReply, CoachError> {
        let payload = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": request.user_prompt() }
            ],
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
        });

        debug!("Requesting {} coaching review", request.cadence.as_str());
        let resp = self
            .client
            .post(&self.api_url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CoachError::Timeout
                } else {
                    CoachError::Api(e.to_string())
                }
            })?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body = resp.text().await.unwrap_or_default();
            return Err(CoachError::HttpStatus {
                status,
                body: body.chars().take(500).collect(),
            });
        }

        let body: Value = resp.json().await.map_err(|e| CoachError::Api(e.to_string()))?;
        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(CoachError::MissingContent)?;

        Ok(parse_reply(content))
    }
}

/// Extract the review from the model's message content.
///
/// The prompt asks for strict JSON but models wrap it in prose or code
/// fences often enough that the widest brace window is tried first;
/// content with no parseable JSON is kept raw.
pub fn parse_reply(content: &str) -> CoachingReply {
    if let (Some(start), Some(end)) = (content.find('{'), content.rfind('}')) {
        if end > start {
            if let Ok(value) = serde_json::from_str::<Value>(&content[start..=end]) {
                return CoachingReply::Structured(value);
            }
        }
    }
    warn!("Coaching reply was not valid JSON, keeping raw text");
    CoachingReply::Raw(content.to_string())
}
