use std::fmt;

use serde_json::Value;

/// Status half of a failed summary request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureStatus {
    /// The API answered with a non-success HTTP status.
    Http(u16),
    /// The request never produced a response.
    FetchError,
    /// A response arrived but its body could not be parsed.
    ParsingError { original_status: u16 },
    /// The request timed out.
    TimeoutError,
    /// The adapter rejected the response for its own reasons.
    CustomError,
}

impl fmt::Display for FailureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureStatus::Http(code) => write!(f, "{code}"),
            FailureStatus::FetchError => write!(f, "FETCH_ERROR"),
            FailureStatus::ParsingError { .. } => write!(f, "PARSING_ERROR"),
            FailureStatus::TimeoutError => write!(f, "TIMEOUT_ERROR"),
            FailureStatus::CustomError => write!(f, "CUSTOM_ERROR"),
        }
    }
}

/// A failure reported by the remote fetch adapter.
///
/// Carries either an adapter-level `error` string, a JSON `data` payload
/// (typically the error body returned by the API), or both.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchFailure {
    pub status: FailureStatus,
    pub error: Option<String>,
    pub data: Option<Value>,
}

impl FetchFailure {
    pub fn with_error(status: FailureStatus, error: impl Into<String>) -> Self {
        Self {
            status,
            error: Some(error.into()),
            data: None,
        }
    }

    pub fn with_data(status: FailureStatus, data: Value) -> Self {
        Self {
            status,
            error: None,
            data: Some(data),
        }
    }

    /// Text shown to the user: the error string if there is one, otherwise
    /// the serialized payload.
    pub fn message(&self) -> String {
        if let Some(error) = &self.error {
            return error.clone();
        }
        match &self.data {
            Some(data) => data.to_string(),
            None => self.status.to_string(),
        }
    }
}
