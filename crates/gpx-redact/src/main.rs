// The binary uses the library, not duplicate modules
use gpx_redact::{AppError, Settings, run, setup_logging};
use std::process::ExitCode;

fn main() -> ExitCode {
    let settings = Settings::from_cli();
    setup_logging(&settings);

    match run(&settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(AppError::Usage(e)) => e.exit(),
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
