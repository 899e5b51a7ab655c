//! Log output for the kiosk binaries.

use std::{fs::OpenOptions, io, path::Path, sync::Arc};

use tracing_subscriber::{
    Layer, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Send events at `stdout_level` and above to stdout and DEBUG and above to
/// the file at `debug_log_path`.
///
/// Store failures are logged at ERROR, so stdout doubles as the operator's
/// diagnostic channel at any level.
///
/// # Errors
/// Returns an error if the log file cannot be opened for appending.
pub fn setup_logging(debug_log_path: &Path, stdout_level: LevelFilter) -> io::Result<()> {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(debug_log_path)?;

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_ansi(false)
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(stdout_level)
                .and_then(debug_log)
                .with_filter(LevelFilter::DEBUG),
        )
        .init();

    Ok(())
}
