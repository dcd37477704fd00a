use pretty_assertions::assert_eq;
use summarizer_core::{update, AppState, Msg, Record};

fn restored() -> AppState {
    let (mut state, _) = update(
        AppState::new(),
        Msg::HistoryRestored(vec![Record::new("https://a.example.com", "A")]),
    );
    state.consume_dirty();
    state
}

#[test]
fn stale_copy_reset_changes_nothing() {
    let state = restored();
    let (next, effects) = update(state.clone(), Msg::CopyResetElapsed { token: 42 });

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn view_ignores_render_bookkeeping() {
    let (mut state, _) = update(
        AppState::new(),
        Msg::InputChanged("https://a.example.com".to_string()),
    );
    let pending = state.view();
    assert!(state.consume_dirty());

    assert_eq!(state.view(), pending);
}
