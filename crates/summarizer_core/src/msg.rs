use crate::{CopyToken, FetchFailure, Record, RequestId};

/// Successful adapter result. Fields other than the summary are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SummaryPayload {
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Records read back from storage at startup.
    HistoryRestored(Vec<Record>),
    /// User edited the URL input.
    InputChanged(String),
    /// User submitted the URL input.
    Submitted,
    /// Adapter settled for a request.
    SummaryReceived {
        request_id: RequestId,
        result: Result<SummaryPayload, FetchFailure>,
    },
    /// User picked an entry from the history list.
    HistorySelected { index: usize },
    /// User clicked copy on a url.
    CopyClicked(String),
    /// The copied indicator's window ran out.
    CopyResetElapsed { token: CopyToken },
}
