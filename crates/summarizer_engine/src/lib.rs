//! Summarizer engine: IO adapters and effect execution.
mod clipboard;
mod engine;
mod persist;
mod store;
mod summarize;
mod types;

pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard, Osc52Clipboard};
pub use engine::EngineHandle;
pub use persist::{ensure_store_dir, AtomicFileWriter, PersistError};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use summarize::{RapidApiSummarizer, SummarizeSettings, Summarizer};
pub use types::{
    ApiError, ApiErrorKind, CopyToken, EngineEvent, EngineStopped, RequestId, SummaryOutput,
};
