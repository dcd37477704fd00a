//! Summarizer core: pure state machine and view-model helpers.
mod effect;
mod failure;
mod msg;
mod record;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use failure::{FailureStatus, FetchFailure};
pub use msg::{Msg, SummaryPayload};
pub use record::{History, Record};
pub use state::{AppState, CopyToken, FetchState, RequestId, COPY_FEEDBACK_WINDOW};
pub use update::update;
pub use view_model::{AppViewModel, HistoryRowView};
