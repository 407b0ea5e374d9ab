//! Application module
//!
//! Wires the command line settings to the redaction library:
//! - Logging setup from the verbosity flags (or `RUST_LOG`)
//! - Region parsing and validation
//! - Reading, redacting and writing the GPX document
//! - Optional statistics report as JSON

pub(crate) mod report;
pub(crate) mod settings;

use crate::app::settings::Settings;
use gpx_redact_lib::{RedactError, Redactor, io};

/// Errors surfaced to the command line
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Redact(#[from] RedactError),

    #[error("Report serialization error: {0}")]
    Report(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Usage(#[from] clap::Error),
}

/// Install the tracing subscriber
///
/// `RUST_LOG` takes precedence; otherwise the verbosity flags pick the level.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_filter()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run one redaction as described by the settings
pub fn run(settings: &Settings) -> Result<(), AppError> {
    #[cfg(feature = "profiling")]
    profiling::scope!("app::run");

    settings.validate()?;

    let regions = settings.regions()?;
    report::log_regions(&regions);
    let redactor = Redactor::new(regions, settings.redact_config());

    // Paths were checked by `validate`
    let Some(input) = settings.input_path() else {
        return Ok(());
    };
    tracing::debug!("Reading {}", input.display());
    let document = io::read_file(input)?;

    let stats = if settings.dry_run {
        let stats = redactor.inspect(document.gpx())?;
        tracing::info!("Dry run, no output written");
        stats
    } else {
        let redaction = redactor.redact(&document)?;
        if let Some(output) = settings.output_path() {
            tracing::debug!("Writing {}", output.display());
            io::write_file(&redaction.bytes, output)?;
        }
        redaction.stats
    };

    report::log_stats(&stats);

    if let Some(path) = &settings.report {
        report::write_json(&stats, path)?;
        tracing::info!("Wrote report to {}", path.display());
    }

    Ok(())
}
