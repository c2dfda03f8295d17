use thiserror::Error;

/// Failure of one backend request.
///
/// Cloneable so that a single failure can be handed to every caller that
/// joined the same in-flight request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RequestError {
    /// Non-2xx response
    #[error("HTTP {status} {reason}: {}", or_no_body(.detail))]
    Status {
        status: u16,
        reason: String,
        detail: String,
    },

    /// Connection refused, timeout, TLS and the like
    #[error("Network error: {0}")]
    Transport(String),

    /// 2xx response whose body is not what the endpoint promises
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for RequestError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            RequestError::Decode(e.to_string())
        } else {
            RequestError::Transport(e.to_string())
        }
    }
}

fn or_no_body(detail: &str) -> &str {
    if detail.is_empty() {
        "no body"
    } else {
        detail
    }
}

pub type RequestResult<T> = Result<T, RequestError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
