use serde::{Deserialize, Serialize};
use summarizer_core::Record;
use summarizer_engine::{KeyValueStore, StoreError};
use summarizer_logging::{summarizer_error, summarizer_info, summarizer_warn};

/// Storage slot holding the history as a JSON array.
pub(crate) const HISTORY_KEY: &str = "articles";
/// Where an unreadable history value is moved aside.
pub(crate) const MALFORMED_HISTORY_KEY: &str = "articles.malformed";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedRecord {
    url: String,
    #[serde(default)]
    summary: Option<String>,
}

/// History read at startup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct LoadedHistory {
    pub records: Vec<Record>,
    /// `false` when the stored value could neither be read nor moved aside;
    /// saving would then destroy it.
    pub writable: bool,
}

impl LoadedHistory {
    fn empty(writable: bool) -> Self {
        Self {
            records: Vec::new(),
            writable,
        }
    }
}

/// Reads the history once at startup. An absent value yields an empty
/// history. A malformed value is moved to [`MALFORMED_HISTORY_KEY`] byte for
/// byte; when that is impossible the history is reported as not writable.
pub(crate) fn load_history(store: &dyn KeyValueStore) -> LoadedHistory {
    let content = match store.get(HISTORY_KEY) {
        Ok(Some(text)) => text,
        Ok(None) => return LoadedHistory::empty(true),
        Err(StoreError::Malformed(_)) => {
            summarizer_warn!("Stored history is not valid text; starting empty");
            return LoadedHistory::empty(set_aside(store));
        }
        Err(err) => {
            summarizer_error!(
                "Failed to read stored history ({}); history will not be saved this session",
                err
            );
            return LoadedHistory::empty(false);
        }
    };

    let records: Option<Vec<PersistedRecord>> = match serde_json::from_str(&content) {
        Ok(records) => records,
        Err(err) => {
            summarizer_warn!("Stored history is malformed ({}); starting empty", err);
            return LoadedHistory::empty(set_aside(store));
        }
    };

    let records: Vec<Record> = records
        .unwrap_or_default()
        .into_iter()
        .map(|record| Record::new(record.url, record.summary.unwrap_or_default()))
        .collect();
    summarizer_info!("Loaded {} history records", records.len());
    LoadedHistory {
        records,
        writable: true,
    }
}

/// Moves the unreadable history aside. Returns whether saving is safe.
fn set_aside(store: &dyn KeyValueStore) -> bool {
    match store.set_aside(HISTORY_KEY, MALFORMED_HISTORY_KEY) {
        Ok(_) => {
            summarizer_info!("Kept unreadable history under {:?}", MALFORMED_HISTORY_KEY);
            true
        }
        Err(err) => {
            summarizer_error!(
                "Failed to keep malformed history aside ({}); history will not be saved this session",
                err
            );
            false
        }
    }
}

/// Replaces the stored history with `records`.
pub(crate) fn save_history(
    store: &dyn KeyValueStore,
    records: &[Record],
) -> Result<(), StoreError> {
    let persisted: Vec<PersistedRecord> = records
        .iter()
        .map(|record| PersistedRecord {
            url: record.url.clone(),
            summary: Some(record.summary.clone()),
        })
        .collect();
    let content = serde_json::to_string(&persisted)
        .map_err(|err| StoreError::Unavailable(format!("serializing history: {err}")))?;
    store.set(HISTORY_KEY, &content)
}
