use std::fmt;

use serde_json::Value;

pub type RequestId = u64;
pub type CopyToken = u64;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    SummaryCompleted {
        request_id: RequestId,
        result: Result<SummaryOutput, ApiError>,
    },
    CopyResetElapsed {
        token: CopyToken,
    },
}

/// Decoded success body of the summarize endpoint. Other fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Deserialize)]
pub struct SummaryOutput {
    #[serde(default)]
    pub summary: Option<String>,
}

/// The engine thread is gone; no request will be answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("summarizer engine is not running")]
pub struct EngineStopped;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
    /// Decoded error body, when the API sent one.
    pub data: Option<Value>,
}

impl ApiError {
    pub(crate) fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            data: None,
        }
    }

    pub(crate) fn with_data(kind: ApiErrorKind, message: impl Into<String>, data: Value) -> Self {
        Self {
            kind,
            message: message.into(),
            data: Some(data),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorKind {
    InvalidUrl,
    HttpStatus(u16),
    Parse { status: u16 },
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::InvalidUrl => write!(f, "invalid url"),
            ApiErrorKind::HttpStatus(code) => write!(f, "http status {code}"),
            ApiErrorKind::Parse { status } => write!(f, "unparsable body (status {status})"),
            ApiErrorKind::Timeout => write!(f, "timeout"),
            ApiErrorKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            ApiErrorKind::Network => write!(f, "network error"),
        }
    }
}
