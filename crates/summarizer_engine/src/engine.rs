use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use summarizer_logging::{summarizer_error, summarizer_info, summarizer_warn};
use tokio_util::sync::CancellationToken;

use crate::summarize::{RapidApiSummarizer, SummarizeSettings, Summarizer};
use crate::{ApiError, CopyToken, EngineEvent, EngineStopped, RequestId};

enum EngineCommand {
    Summarize { request_id: RequestId, url: String },
    ScheduleCopyReset { token: CopyToken, after: Duration },
    CancelCopyReset { token: CopyToken },
}

/// Runs summarize requests and copy-reset timers on a background runtime.
/// Results come back as [`EngineEvent`]s.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: SummarizeSettings) -> Result<Self, ApiError> {
        let summarizer = RapidApiSummarizer::new(settings)?;
        Ok(Self::with_summarizer(Arc::new(summarizer)))
    }

    pub fn with_summarizer(summarizer: Arc<dyn Summarizer>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    summarizer_error!("Failed to start engine runtime: {}", err);
                    return;
                }
            };
            let mut pending_reset: Option<(CopyToken, CancellationToken)> = None;

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Summarize { request_id, url } => {
                        let summarizer = summarizer.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let result = summarizer.summarize(&url).await;
                            if let Err(err) = &result {
                                summarizer_warn!(
                                    "Request {} for {} failed: {}",
                                    request_id,
                                    url,
                                    err
                                );
                            }
                            let _ = event_tx
                                .send(EngineEvent::SummaryCompleted { request_id, result });
                        });
                    }
                    EngineCommand::ScheduleCopyReset { token, after } => {
                        // Only one reset is ever pending; a new one replaces it.
                        if let Some((_, cancel)) = pending_reset.take() {
                            cancel.cancel();
                        }
                        let cancel = CancellationToken::new();
                        let cancelled = cancel.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            tokio::select! {
                                _ = cancelled.cancelled() => {}
                                _ = tokio::time::sleep(after) => {
                                    let _ = event_tx.send(EngineEvent::CopyResetElapsed { token });
                                }
                            }
                        });
                        pending_reset = Some((token, cancel));
                    }
                    EngineCommand::CancelCopyReset { token } => {
                        if matches!(&pending_reset, Some((pending, _)) if *pending == token) {
                            if let Some((_, cancel)) = pending_reset.take() {
                                cancel.cancel();
                            }
                        }
                    }
                }
            }
            summarizer_info!("Engine command channel closed; shutting down");
        });

        Self { cmd_tx, event_rx }
    }

    pub fn summarize(
        &self,
        request_id: RequestId,
        url: impl Into<String>,
    ) -> Result<(), EngineStopped> {
        self.send(EngineCommand::Summarize {
            request_id,
            url: url.into(),
        })
    }

    pub fn schedule_copy_reset(
        &self,
        token: CopyToken,
        after: Duration,
    ) -> Result<(), EngineStopped> {
        self.send(EngineCommand::ScheduleCopyReset { token, after })
    }

    pub fn cancel_copy_reset(&self, token: CopyToken) -> Result<(), EngineStopped> {
        self.send(EngineCommand::CancelCopyReset { token })
    }

    fn send(&self, command: EngineCommand) -> Result<(), EngineStopped> {
        self.cmd_tx.send(command).map_err(|_| EngineStopped)
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}
