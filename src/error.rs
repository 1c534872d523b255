use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Failure of one completion exchange.
///
/// Both variants mean the same thing to the conversation (the turn produced
/// no committed reply); they stay separate so logs keep the transport detail.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The request never completed: connect failure, send failure, or the
    /// response body breaking off mid-stream.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("endpoint returned {status}: {message}")]
    Status { status: StatusCode, message: String },
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

/// Pull a readable message out of a non-success response body.
///
/// OpenAI-compatible endpoints wrap it as `{"error":{"message":...}}`; when
/// the body is not that shape it is used as-is, and when it is empty the
/// status' canonical reason stands in.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(message) = parsed.error.and_then(|detail| detail.message) {
            return message;
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        trimmed.to_string()
    }
}
