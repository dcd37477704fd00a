use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use summarizer_core::{update, AppState, Msg};
use summarizer_engine::{EngineHandle, FileStore, Osc52Clipboard};
use summarizer_logging::summarizer_info;

use super::config::{AppConfig, CONFIG_FILENAME};
use super::effects::EffectRunner;
use super::logging::{self, LogDestination};
use super::persistence;
use super::ui::constants::HELP_TEXT;
use super::ui::input::{parse_line, UiCommand};
use super::ui::render::render;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub fn run_app() -> anyhow::Result<()> {
    let config = AppConfig::load(Path::new(CONFIG_FILENAME))?;
    let destination = if config.log_to_stderr {
        LogDestination::Both
    } else {
        LogDestination::File
    };
    logging::initialize(destination, &config.log_file);

    let store = FileStore::open(&config.store_dir)
        .with_context(|| format!("opening history store {}", config.store_dir.display()))?;
    let history = persistence::load_history(&store);
    let engine = EngineHandle::new(config.summarize_settings())
        .context("creating summarize client")?;
    let runner = EffectRunner::new(engine, Box::new(store), Box::new(Osc52Clipboard::stdout()))
        .with_history_writes(history.writable);

    let mut panel = PanelController::new(AppState::with_copy_window(config.copy_window()), runner);
    panel.dispatch(Msg::HistoryRestored(history.records));

    let line_rx = spawn_stdin_reader();
    let mut out = io::stdout();
    writeln!(out, "{HELP_TEXT}")?;
    panel.render_if_dirty(&mut out)?;

    loop {
        match line_rx.recv_timeout(POLL_INTERVAL) {
            Ok(line) => match parse_line(&line) {
                UiCommand::Quit => break,
                UiCommand::Help => writeln!(out, "{HELP_TEXT}")?,
                command => {
                    if let Some(notice) = panel.handle_command(command) {
                        writeln!(out, "{notice}")?;
                    }
                }
            },
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                // Input closed; finish the outstanding request, then exit.
                if !panel.is_loading() {
                    break;
                }
                thread::sleep(POLL_INTERVAL);
            }
        }
        panel.pump();
        panel.render_if_dirty(&mut out)?;
    }

    summarizer_info!("Exiting");
    Ok(())
}

fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Owns the panel state and executes the effects every update produces.
pub(crate) struct PanelController {
    state: AppState,
    runner: EffectRunner,
}

impl PanelController {
    pub(crate) fn new(state: AppState, runner: EffectRunner) -> Self {
        Self { state, runner }
    }

    pub(crate) fn dispatch(&mut self, msg: Msg) {
        let mut inbox = VecDeque::from([msg]);
        while let Some(msg) = inbox.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            inbox.extend(self.runner.run(effects));
        }
    }

    /// Turns a prompt command into messages. Returns a notice for the user
    /// when the command cannot be applied.
    pub(crate) fn handle_command(&mut self, command: UiCommand) -> Option<String> {
        match command {
            UiCommand::Submit(text) => {
                self.dispatch(Msg::InputChanged(text));
                self.dispatch(Msg::Submitted);
            }
            UiCommand::Resubmit => self.dispatch(Msg::Submitted),
            UiCommand::Select(index) => {
                if index >= self.state.history().len() {
                    return Some(format!("No history entry {}", index + 1));
                }
                self.dispatch(Msg::HistorySelected { index });
            }
            UiCommand::Copy(index) => {
                let Some(record) = self.state.history().get(index) else {
                    return Some(format!("No history entry {}", index + 1));
                };
                let url = record.url.clone();
                self.dispatch(Msg::CopyClicked(url));
            }
            UiCommand::Invalid(message) => return Some(message),
            UiCommand::Help | UiCommand::Quit => {}
        }
        None
    }

    /// Applies engine results that have arrived.
    pub(crate) fn pump(&mut self) {
        for msg in self.runner.poll() {
            self.dispatch(msg);
        }
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.state.view().loading
    }

    pub(crate) fn render_if_dirty(&mut self, out: &mut impl Write) -> io::Result<()> {
        if !self.state.consume_dirty() {
            return Ok(());
        }
        out.write_all(render(&self.state.view()).as_bytes())?;
        out.flush()
    }

    /// Waits for one engine result and applies it.
    #[cfg(test)]
    fn settle(&mut self) {
        let msg = self
            .runner
            .wait(Duration::from_secs(5))
            .expect("engine result");
        self.dispatch(msg);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use serde_json::json;
    use summarizer_core::{Effect, Record};
    use summarizer_engine::{
        ApiError, ApiErrorKind, KeyValueStore, MemoryClipboard, MemoryStore, Summarizer,
        SummaryOutput,
    };

    use super::*;
    use crate::platform::persistence::{HISTORY_KEY, MALFORMED_HISTORY_KEY};

    /// Knows `/a` and `/c`; every other url fails with a 400 JSON body.
    struct FakeSummarizer;

    #[async_trait::async_trait]
    impl Summarizer for FakeSummarizer {
        async fn summarize(&self, article_url: &str) -> Result<SummaryOutput, ApiError> {
            match article_url {
                "https://example.com/a" => Ok(SummaryOutput {
                    summary: Some("S1".to_string()),
                }),
                "https://example.com/c" => Ok(SummaryOutput {
                    summary: Some("S3".to_string()),
                }),
                _ => Err(ApiError {
                    kind: ApiErrorKind::HttpStatus(400),
                    message: "400 Bad Request".to_string(),
                    data: Some(json!({ "msg": "bad" })),
                }),
            }
        }
    }

    struct Harness {
        panel: PanelController,
        store: MemoryStore,
        clipboard: MemoryClipboard,
    }

    fn harness_with(store: MemoryStore, copy_window: Duration) -> Harness {
        let clipboard = MemoryClipboard::new();
        let engine = EngineHandle::with_summarizer(Arc::new(FakeSummarizer));
        let history = persistence::load_history(&store);
        let runner = EffectRunner::new(
            engine,
            Box::new(store.clone()),
            Box::new(clipboard.clone()),
        )
        .with_history_writes(history.writable);
        let mut panel = PanelController::new(AppState::with_copy_window(copy_window), runner);
        panel.dispatch(Msg::HistoryRestored(history.records));
        Harness {
            panel,
            store,
            clipboard,
        }
    }

    fn harness() -> Harness {
        harness_with(MemoryStore::new(), Duration::from_secs(3))
    }

    #[test]
    fn successful_submit_updates_panel_and_store() {
        let mut h = harness();
        h.panel
            .handle_command(UiCommand::Submit("https://example.com/a".into()));
        assert!(h.panel.is_loading());
        h.panel.settle();

        let expected = Record::new("https://example.com/a", "S1");
        assert_eq!(h.panel.state.current(), &expected);
        assert_eq!(h.panel.state.history().records(), &[expected.clone()]);
        assert!(!h.panel.is_loading());
        assert_eq!(
            h.store.get(HISTORY_KEY).unwrap().as_deref(),
            Some(r#"[{"url":"https://example.com/a","summary":"S1"}]"#)
        );
    }

    #[test]
    fn failed_submit_shows_error_and_keeps_history() {
        let mut h = harness();
        h.panel
            .handle_command(UiCommand::Submit("https://example.com/a".into()));
        h.panel.settle();
        let stored_before = h.store.get(HISTORY_KEY).unwrap();

        h.panel
            .handle_command(UiCommand::Submit("https://example.com/b".into()));
        h.panel.settle();

        let view = h.panel.state.view();
        assert_eq!(view.error.as_deref(), Some(r#"{"msg":"bad"}"#));
        assert_eq!(
            h.panel.state.history().records(),
            &[Record::new("https://example.com/a", "S1")]
        );
        assert_eq!(h.panel.state.current().summary, "S1");
        assert_eq!(h.store.get(HISTORY_KEY).unwrap(), stored_before);
    }

    #[test]
    fn history_survives_a_fresh_mount() {
        let store = MemoryStore::new();
        let mut first = harness_with(store.clone(), Duration::from_secs(3));
        first
            .panel
            .handle_command(UiCommand::Submit("https://example.com/a".into()));
        first.panel.settle();
        first
            .panel
            .handle_command(UiCommand::Submit("https://example.com/c".into()));
        first.panel.settle();

        let second = harness_with(store, Duration::from_secs(3));
        assert_eq!(
            second.panel.state.history().records(),
            first.panel.state.history().records()
        );
        assert_eq!(
            second.panel.state.history().records(),
            &[
                Record::new("https://example.com/c", "S3"),
                Record::new("https://example.com/a", "S1"),
            ]
        );
    }

    #[test]
    fn select_shows_stored_summary_without_fetching() {
        let mut h = harness();
        h.panel
            .handle_command(UiCommand::Submit("https://example.com/a".into()));
        h.panel.settle();
        h.panel
            .handle_command(UiCommand::Submit("https://example.com/c".into()));
        h.panel.settle();

        assert_eq!(h.panel.handle_command(UiCommand::Select(1)), None);
        assert!(!h.panel.is_loading());
        assert_eq!(
            h.panel.state.current(),
            &Record::new("https://example.com/a", "S1")
        );
        assert_eq!(h.panel.state.history().len(), 2);
        assert_eq!(
            h.panel.handle_command(UiCommand::Select(9)),
            Some("No history entry 10".to_string())
        );
    }

    #[test]
    fn copy_writes_clipboard_and_indicator_expires() {
        let mut h = harness_with(MemoryStore::new(), Duration::from_millis(30));
        h.panel
            .handle_command(UiCommand::Submit("https://example.com/a".into()));
        h.panel.settle();

        assert_eq!(h.panel.handle_command(UiCommand::Copy(0)), None);
        assert_eq!(h.clipboard.contents().as_deref(), Some("https://example.com/a"));
        assert_eq!(h.panel.state.copied_url(), Some("https://example.com/a"));

        h.panel.settle();
        assert_eq!(h.panel.state.copied_url(), None);
    }

    #[test]
    fn malformed_history_is_kept_while_new_history_is_saved() {
        let store = MemoryStore::new();
        store.set(HISTORY_KEY, "{not json").unwrap();
        let mut h = harness_with(store, Duration::from_secs(3));
        assert!(h.panel.state.history().is_empty());

        h.panel
            .handle_command(UiCommand::Submit("https://example.com/a".into()));
        h.panel.settle();

        assert_eq!(
            h.store.get(MALFORMED_HISTORY_KEY).unwrap().as_deref(),
            Some("{not json")
        );
        assert_eq!(
            h.store.get(HISTORY_KEY).unwrap().as_deref(),
            Some(r#"[{"url":"https://example.com/a","summary":"S1"}]"#)
        );
    }

    #[test]
    fn history_writes_can_be_disabled() {
        let store = MemoryStore::new();
        let runner = EffectRunner::new(
            EngineHandle::with_summarizer(Arc::new(FakeSummarizer)),
            Box::new(store.clone()),
            Box::new(MemoryClipboard::new()),
        )
        .with_history_writes(false);

        let settled = runner.run(vec![Effect::PersistHistory(vec![Record::new(
            "https://example.com/a",
            "S1",
        )])]);

        assert!(settled.is_empty());
        assert_eq!(store.get(HISTORY_KEY).unwrap(), None);
    }

    #[test]
    fn copy_of_missing_entry_is_reported() {
        let mut h = harness();
        assert_eq!(
            h.panel.handle_command(UiCommand::Copy(0)),
            Some("No history entry 1".to_string())
        );
        assert_eq!(h.clipboard.contents(), None);
    }

    #[test]
    fn render_only_when_dirty() {
        let mut h = harness();
        let mut out = Vec::new();
        h.panel.render_if_dirty(&mut out).unwrap();
        assert!(!out.is_empty());

        let mut again = Vec::new();
        h.panel.render_if_dirty(&mut again).unwrap();
        assert!(again.is_empty());

        h.panel
            .handle_command(UiCommand::Submit("https://example.com/a".into()));
        let mut loading = Vec::new();
        h.panel.render_if_dirty(&mut loading).unwrap();
        assert!(String::from_utf8(loading).unwrap().contains("Summarizing..."));
    }
}
