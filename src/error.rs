use reqwest::StatusCode;
use thiserror::Error;

/// Boxed cause carried by mid-stream read failures.
pub type StreamReadCause = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum ChatApiError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("invalid request payload: {0}")]
    InvalidRequestPayload(String),

    #[error("connection failed: {0}")]
    Connection(#[source] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("response carried no readable body")]
    MissingBody,

    #[error("stream read failed: {0}")]
    StreamRead(#[source] StreamReadCause),

    #[error("request was cancelled")]
    Cancelled,
}

/// Best-effort message for a rejected response.
///
/// Prefers the response body text; an unreadable or empty body falls back to
/// the status line reason, then to a generic placeholder.
pub fn status_error_message(status: StatusCode, body: Option<String>) -> String {
    body.map(|body| body.trim().to_owned())
        .filter(|body| !body.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown server error")
                .to_string()
        })
}
