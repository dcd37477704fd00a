#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub input: String,
    /// Why the last submit was refused, if it was.
    pub input_error: Option<String>,
    pub loading: bool,
    /// Message of the last failed request.
    pub error: Option<String>,
    /// Summary to display; only set when not loading and no error is shown.
    pub summary: Option<String>,
    pub history: Vec<HistoryRowView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRowView {
    pub index: usize,
    pub url: String,
    /// This row's url is the one most recently copied.
    pub copied: bool,
}
