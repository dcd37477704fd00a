use std::time::Duration;

use crate::view_model::{AppViewModel, HistoryRowView};
use crate::{FetchFailure, History, Record};

pub type RequestId = u64;
pub type CopyToken = u64;

/// How long the copied indicator stays on a url.
pub const COPY_FEEDBACK_WINDOW: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading {
        request_id: RequestId,
        url: String,
    },
    Failed(FetchFailure),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    current: Record,
    history: History,
    copied: Option<(String, CopyToken)>,
    fetch: FetchState,
    input_error: Option<String>,
    restored: bool,
    next_request_id: RequestId,
    next_copy_token: CopyToken,
    copy_window: Duration,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_copy_window(COPY_FEEDBACK_WINDOW)
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_copy_window(copy_window: Duration) -> Self {
        Self {
            current: Record::default(),
            history: History::new(),
            copied: None,
            fetch: FetchState::Idle,
            input_error: None,
            restored: false,
            next_request_id: 1,
            next_copy_token: 1,
            copy_window,
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        let loading = matches!(self.fetch, FetchState::Loading { .. });
        let error = match &self.fetch {
            FetchState::Failed(failure) => Some(failure.message()),
            _ => None,
        };
        let summary = if !loading && error.is_none() && !self.current.summary.is_empty() {
            Some(self.current.summary.clone())
        } else {
            None
        };
        let copied_url = self.copied_url();
        let history = self
            .history
            .iter()
            .enumerate()
            .map(|(index, record)| HistoryRowView {
                index,
                url: record.url.clone(),
                copied: copied_url == Some(record.url.as_str()),
            })
            .collect();

        AppViewModel {
            input: self.current.url.clone(),
            input_error: self.input_error.clone(),
            loading,
            error,
            summary,
            history,
        }
    }

    pub fn current(&self) -> &Record {
        &self.current
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn fetch_state(&self) -> &FetchState {
        &self.fetch
    }

    pub fn copied_url(&self) -> Option<&str> {
        self.copied.as_ref().map(|(url, _)| url.as_str())
    }

    /// Returns whether anything visible changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn restore_history(&mut self, records: Vec<Record>) -> bool {
        if self.restored {
            return false;
        }
        self.restored = true;
        self.history = History::from_records(records);
        self.mark_dirty();
        true
    }

    pub(crate) fn set_input(&mut self, url: String) {
        self.current.url = url;
        self.input_error = None;
        self.mark_dirty();
    }

    pub(crate) fn set_input_error(&mut self, message: impl Into<String>) {
        self.input_error = Some(message.into());
        self.mark_dirty();
    }

    pub(crate) fn is_loading(&self) -> bool {
        matches!(self.fetch, FetchState::Loading { .. })
    }

    pub(crate) fn start_request(&mut self, url: String) -> RequestId {
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.current.url = url.clone();
        self.input_error = None;
        self.fetch = FetchState::Loading { request_id, url };
        self.mark_dirty();
        request_id
    }

    /// Ends the outstanding request. Returns the url it was started with,
    /// or `None` when `request_id` is not the outstanding request.
    pub(crate) fn settle_request(&mut self, request_id: RequestId) -> Option<String> {
        match &self.fetch {
            FetchState::Loading {
                request_id: pending,
                ..
            } if *pending == request_id => {}
            _ => return None,
        }
        let FetchState::Loading { url, .. } = std::mem::take(&mut self.fetch) else {
            return None;
        };
        self.mark_dirty();
        Some(url)
    }

    pub(crate) fn fail_request(&mut self, failure: FetchFailure) {
        self.fetch = FetchState::Failed(failure);
        self.mark_dirty();
    }

    /// Applies a summary: the merged record becomes current and is prepended
    /// to history as a separate copy.
    pub(crate) fn apply_summary(&mut self, url: String, summary: String) {
        let record = Record { url, summary };
        self.current = record.clone();
        self.history.prepend(record);
        self.mark_dirty();
    }

    pub(crate) fn select(&mut self, index: usize) -> bool {
        let Some(record) = self.history.get(index) else {
            return false;
        };
        self.current = record.clone();
        self.input_error = None;
        self.mark_dirty();
        true
    }

    /// Points the copied indicator at `url`. Returns the new token and the
    /// token of the indicator it replaced, if any.
    pub(crate) fn mark_copied(&mut self, url: String) -> (CopyToken, Option<CopyToken>) {
        let token = self.next_copy_token;
        self.next_copy_token += 1;
        let previous = self.copied.replace((url, token)).map(|(_, token)| token);
        self.mark_dirty();
        (token, previous)
    }

    pub(crate) fn clear_copied(&mut self, token: CopyToken) -> bool {
        match &self.copied {
            Some((_, current)) if *current == token => {
                self.copied = None;
                self.mark_dirty();
                true
            }
            _ => false,
        }
    }

    pub(crate) fn copy_window(&self) -> Duration {
        self.copy_window
    }
}
