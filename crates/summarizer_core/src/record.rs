/// A summarized article: the url the user submitted and the summary the
/// remote API returned for it. `summary` is empty until a fetch succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    pub url: String,
    pub summary: String,
}

impl Record {
    pub fn new(url: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            summary: summary.into(),
        }
    }
}

/// Past summaries, newest first. Duplicated urls are kept.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct History {
    records: Vec<Record>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn prepend(&mut self, record: Record) {
        self.records.insert(0, record);
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }
}
