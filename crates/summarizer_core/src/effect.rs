use std::time::Duration;

use crate::{CopyToken, Record, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the remote adapter for a summary of `url`.
    RequestSummary { request_id: RequestId, url: String },
    /// Overwrite the stored history with the full list.
    PersistHistory(Vec<Record>),
    /// Put `text` on the system clipboard.
    WriteClipboard(String),
    /// Deliver `Msg::CopyResetElapsed { token }` after `after`.
    ScheduleCopyReset { token: CopyToken, after: Duration },
    /// Drop a reset that has not fired yet.
    CancelCopyReset { token: CopyToken },
}
