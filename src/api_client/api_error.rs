use reqwest::{Error as ReqwestError, StatusCode};
use thiserror::Error;

/// Every way a backend call can fail.
///
/// `Network`, `Status` and `Decode` are server or transport failures; `EmptyBody` is a
/// successful response that carried nothing where a payload was required.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    #[error("Server returned {status} for {url}")]
    Status { status: u16, url: String },
    #[error("Empty response body from {url}")]
    EmptyBody { url: String },
    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl ApiError {
    pub fn status(status: StatusCode, url: &str) -> Self {
        ApiError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status, .. } if *status == StatusCode::UNAUTHORIZED.as_u16())
    }

    /// True for a successful response without content, as opposed to a failure.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, ApiError::EmptyBody { .. })
    }
}
