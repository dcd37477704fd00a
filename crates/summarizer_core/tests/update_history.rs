use summarizer_core::{update, AppState, Effect, Msg, Record, SummaryPayload};

fn restored(records: Vec<Record>) -> AppState {
    let (state, effects) = update(AppState::new(), Msg::HistoryRestored(records));
    assert!(effects.is_empty());
    state
}

#[test]
fn restore_loads_history_once() {
    let records = vec![
        Record::new("https://b.example.com", "B"),
        Record::new("https://a.example.com", "A"),
    ];
    let mut state = restored(records.clone());
    assert_eq!(state.history().records(), records.as_slice());
    assert!(state.consume_dirty());

    let (state, _) = update(
        state,
        Msg::HistoryRestored(vec![Record::new("https://c.example.com", "C")]),
    );
    assert_eq!(state.history().records(), records.as_slice());
}

#[test]
fn restore_of_empty_storage_yields_empty_history() {
    let state = restored(Vec::new());
    assert!(state.history().is_empty());
    assert!(state.view().history.is_empty());
}

#[test]
fn select_replaces_current_without_touching_history() {
    let records = vec![
        Record::new("https://b.example.com", "B"),
        Record::new("https://a.example.com", "A"),
    ];
    let state = restored(records.clone());

    let (state, effects) = update(state, Msg::HistorySelected { index: 1 });

    assert!(effects.is_empty());
    assert_eq!(state.current(), &records[1]);
    assert_eq!(state.history().records(), records.as_slice());
    assert_eq!(state.view().summary.as_deref(), Some("A"));
}

#[test]
fn select_out_of_range_is_ignored() {
    let state = restored(vec![Record::new("https://a.example.com", "A")]);
    let before = state.current().clone();

    let (mut state, effects) = update(state, Msg::HistorySelected { index: 5 });

    assert!(effects.is_empty());
    assert_eq!(state.current(), &before);
    // Restoring marked the state dirty; the ignored select adds nothing.
    assert!(state.consume_dirty());
    let (mut state, _) = update(state, Msg::HistorySelected { index: 5 });
    assert!(!state.consume_dirty());
}

#[test]
fn editing_current_after_select_leaves_history_entry_alone() {
    let state = restored(vec![Record::new("https://a.example.com", "A")]);
    let (state, _) = update(state, Msg::HistorySelected { index: 0 });
    let (state, _) = update(state, Msg::InputChanged("https://edited.example.com".into()));

    assert_eq!(state.current().url, "https://edited.example.com");
    assert_eq!(
        state.history().records(),
        &[Record::new("https://a.example.com", "A")]
    );
}

#[test]
fn success_prepends_to_restored_history() {
    let state = restored(vec![Record::new("https://a.example.com", "A")]);
    let (state, _) = update(state, Msg::InputChanged("https://b.example.com".into()));
    let (state, _) = update(state, Msg::Submitted);
    let (state, effects) = update(
        state,
        Msg::SummaryReceived {
            request_id: 1,
            result: Ok(SummaryPayload {
                summary: Some("B".into()),
            }),
        },
    );

    let expected = vec![
        Record::new("https://b.example.com", "B"),
        Record::new("https://a.example.com", "A"),
    ];
    assert_eq!(state.history().records(), expected.as_slice());
    assert_eq!(effects, vec![Effect::PersistHistory(expected)]);
    let rows: Vec<_> = state.view().history.iter().map(|row| row.index).collect();
    assert_eq!(rows, vec![0, 1]);
}
