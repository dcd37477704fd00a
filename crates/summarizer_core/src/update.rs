use url::Url;

use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::HistoryRestored(records) => {
            state.restore_history(records);
            Vec::new()
        }
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::Submitted => {
            // A second submit while a request is outstanding is dropped so only
            // one result is ever consulted.
            if state.is_loading() {
                return (state, Vec::new());
            }
            match validate_url(&state.current().url) {
                Ok(url) => {
                    let request_id = state.start_request(url.clone());
                    vec![Effect::RequestSummary { request_id, url }]
                }
                Err(message) => {
                    state.set_input_error(message);
                    Vec::new()
                }
            }
        }
        Msg::SummaryReceived { request_id, result } => {
            let Some(url) = state.settle_request(request_id) else {
                return (state, Vec::new());
            };
            match result {
                Ok(payload) => match payload.summary.filter(|summary| !summary.is_empty()) {
                    Some(summary) => {
                        state.apply_summary(url, summary);
                        vec![Effect::PersistHistory(state.history().records().to_vec())]
                    }
                    None => Vec::new(),
                },
                Err(failure) => {
                    state.fail_request(failure);
                    Vec::new()
                }
            }
        }
        Msg::HistorySelected { index } => {
            state.select(index);
            Vec::new()
        }
        Msg::CopyClicked(url) => {
            let (token, previous) = state.mark_copied(url.clone());
            let mut effects = Vec::with_capacity(3);
            if let Some(previous) = previous {
                effects.push(Effect::CancelCopyReset { token: previous });
            }
            effects.push(Effect::WriteClipboard(url));
            effects.push(Effect::ScheduleCopyReset {
                token,
                after: state.copy_window(),
            });
            effects
        }
        Msg::CopyResetElapsed { token } => {
            state.clear_copied(token);
            Vec::new()
        }
    };

    (state, effects)
}

/// Applies the constraints of a required URL input field: surrounding
/// whitespace is stripped and the rest must parse as an absolute URL.
fn validate_url(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("Please enter a URL.".to_string());
    }
    Url::parse(trimmed)
        .map(|_| trimmed.to_string())
        .map_err(|err| format!("Please enter a valid URL ({err})."))
}
