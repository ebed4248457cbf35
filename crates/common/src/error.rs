use thiserror::Error;

/// Workspace-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    Csv(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("PropReports error (status={status}): {message}")]
    PropReportsApi { status: u16, message: String },

    #[error("Login failed: {0}")]
    Auth(String),

    #[error("Coaching API error: {0}")]
    Coach(String),

    #[error("no export document found for {0}")]
    MissingDocument(String),

    #[error("{0}")]
    Other(String),
}
