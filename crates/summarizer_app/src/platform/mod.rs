//! Terminal front-end: wires the core state machine to the engine, the
//! history store, and the clipboard.
mod app;
mod config;
mod effects;
mod logging;
mod persistence;
mod ui;

pub use app::run_app;
