use summarizer_core::{Effect, FailureStatus, FetchFailure, Msg, SummaryPayload};
use summarizer_engine::{
    ApiError, ApiErrorKind, Clipboard, EngineEvent, EngineHandle, EngineStopped, KeyValueStore,
    RequestId,
};
use summarizer_logging::{summarizer_error, summarizer_info, summarizer_warn};

use super::persistence;

pub struct EffectRunner {
    engine: EngineHandle,
    store: Box<dyn KeyValueStore>,
    clipboard: Box<dyn Clipboard>,
    history_writable: bool,
}

impl EffectRunner {
    pub fn new(
        engine: EngineHandle,
        store: Box<dyn KeyValueStore>,
        clipboard: Box<dyn Clipboard>,
    ) -> Self {
        Self {
            engine,
            store,
            clipboard,
            history_writable: true,
        }
    }

    /// Stops `PersistHistory` from touching a stored value that could not
    /// be read at startup.
    pub fn with_history_writes(mut self, enabled: bool) -> Self {
        self.history_writable = enabled;
        self
    }

    /// Executes `effects`. Returns messages for effects that settled
    /// immediately because the engine is not running.
    pub fn run(&self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut settled = Vec::new();
        for effect in effects {
            match effect {
                Effect::RequestSummary { request_id, url } => {
                    summarizer_info!("RequestSummary request_id={} url={}", request_id, url);
                    if let Err(err) = self.engine.summarize(request_id, url) {
                        summarizer_error!("Request {} not sent: {}", request_id, err);
                        settled.push(request_not_sent(request_id, err));
                    }
                }
                Effect::PersistHistory(records) => {
                    if !self.history_writable {
                        summarizer_warn!("Not saving history; the stored value was unreadable");
                        continue;
                    }
                    if let Err(err) = persistence::save_history(self.store.as_ref(), &records) {
                        summarizer_error!("Failed to persist history: {}", err);
                    }
                }
                Effect::WriteClipboard(text) => {
                    // The copied indicator is already shown; a failed write is only logged.
                    if let Err(err) = self.clipboard.write(&text) {
                        summarizer_warn!("Clipboard write failed: {}", err);
                    }
                }
                Effect::ScheduleCopyReset { token, after } => {
                    if let Err(err) = self.engine.schedule_copy_reset(token, after) {
                        // Without a timer the indicator would never clear.
                        summarizer_error!("Copy reset {} not scheduled: {}", token, err);
                        settled.push(Msg::CopyResetElapsed { token });
                    }
                }
                Effect::CancelCopyReset { token } => {
                    if let Err(err) = self.engine.cancel_copy_reset(token) {
                        summarizer_warn!("Copy reset {} not cancelled: {}", token, err);
                    }
                }
            }
        }
        settled
    }

    /// Engine results that arrived since the last call.
    pub fn poll(&self) -> Vec<Msg> {
        std::iter::from_fn(|| self.engine.try_recv())
            .map(map_event)
            .collect()
    }

    /// Blocks up to `timeout` for the next engine result.
    #[cfg(test)]
    pub fn wait(&self, timeout: std::time::Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).map(map_event)
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::SummaryCompleted { request_id, result } => Msg::SummaryReceived {
            request_id,
            result: result
                .map(|output| SummaryPayload {
                    summary: output.summary,
                })
                .map_err(map_failure),
        },
        EngineEvent::CopyResetElapsed { token } => Msg::CopyResetElapsed { token },
    }
}

fn request_not_sent(request_id: RequestId, err: EngineStopped) -> Msg {
    Msg::SummaryReceived {
        request_id,
        result: Err(FetchFailure::with_error(
            FailureStatus::CustomError,
            err.to_string(),
        )),
    }
}

fn map_failure(err: ApiError) -> FetchFailure {
    match err.kind {
        ApiErrorKind::HttpStatus(code) => FetchFailure {
            status: FailureStatus::Http(code),
            error: None,
            data: Some(err.data.unwrap_or_default()),
        },
        ApiErrorKind::Parse { status } => FetchFailure {
            status: FailureStatus::ParsingError {
                original_status: status,
            },
            error: Some(err.message),
            data: err.data,
        },
        ApiErrorKind::Timeout => FetchFailure::with_error(FailureStatus::TimeoutError, err.message),
        ApiErrorKind::Network => FetchFailure::with_error(FailureStatus::FetchError, err.message),
        ApiErrorKind::InvalidUrl | ApiErrorKind::TooLarge { .. } => {
            FetchFailure::with_error(FailureStatus::CustomError, err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn http_failure_exposes_body_as_data() {
        let failure = map_failure(ApiError {
            kind: ApiErrorKind::HttpStatus(400),
            message: "400 Bad Request".to_string(),
            data: Some(json!({ "msg": "bad" })),
        });

        assert_eq!(failure.status, FailureStatus::Http(400));
        assert_eq!(failure.message(), r#"{"msg":"bad"}"#);
    }

    #[test]
    fn transport_failure_exposes_error_string() {
        let failure = map_failure(ApiError {
            kind: ApiErrorKind::Network,
            message: "connection refused".to_string(),
            data: None,
        });

        assert_eq!(failure.status, FailureStatus::FetchError);
        assert_eq!(failure.message(), "connection refused");
    }

    #[test]
    fn request_to_stopped_engine_settles_as_failure() {
        let msg = request_not_sent(4, EngineStopped);

        let (request_id, result) = match msg {
            Msg::SummaryReceived { request_id, result } => (request_id, result),
            other => panic!("unexpected message {other:?}"),
        };
        assert_eq!(request_id, 4);
        let failure = result.unwrap_err();
        assert_eq!(failure.status, FailureStatus::CustomError);
        assert_eq!(failure.message(), "summarizer engine is not running");
    }

    #[test]
    fn too_large_is_a_custom_error() {
        let failure = map_failure(ApiError {
            kind: ApiErrorKind::TooLarge {
                max_bytes: 10,
                actual: Some(11),
            },
            message: "response too large".to_string(),
            data: None,
        });

        assert_eq!(failure.status, FailureStatus::CustomError);
        assert!(failure.message().starts_with("response too large"));
    }
}
