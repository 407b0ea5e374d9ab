//! GPX Redact - Command Line Application Library
//!
//! This is the application crate that wires command line settings, logging and the
//! redaction library together. The binary in `main.rs` only calls into it.

mod app;

pub use app::settings::Settings;
pub use app::{AppError, run, setup_logging};
