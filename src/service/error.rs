//! Service error type

use thiserror::Error;

/// Any failure of a conversation service call.
///
/// Transport failures, timeouts, non-success statuses and undecodable bodies
/// all collapse into this one type. `detail` is for logs; nothing branches on it.
#[derive(Debug, Clone, Error)]
#[error("{detail}")]
pub struct ServiceError {
    pub detail: String,
}

impl ServiceError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }

    pub fn transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::new(format!("request timed out: {err}"))
        } else {
            Self::new(format!("transport failure: {err}"))
        }
    }

    pub fn status(status: reqwest::StatusCode, body: &str) -> Self {
        Self::new(format!("service returned {status}: {body}"))
    }

    pub fn decode(err: impl std::fmt::Display) -> Self {
        Self::new(format!("malformed response: {err}"))
    }
}
