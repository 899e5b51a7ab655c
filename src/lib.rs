//! Stock Kiosk is a point-of-sale inventory tool for small shops.
//!
//! A barcode scan looks up a product in the product master worksheet,
//! decrements its stock by one and appends a record to the purchase log
//! worksheet. The most recent sale can be undone exactly once.
//!
//! The library is split into:
//! - [store]: the worksheet store the kiosk reads from and writes to,
//! - [TransactionEngine]: the scan/undo state machine,
//! - [Kiosk]: the presentation adapter that turns engine outcomes into
//!   [ScreenUpdate]s for a front end to render,
//! - a small web front end built with axum and maud, see [build_router].

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod config;
mod endpoints;
mod engine;
mod html;
mod kiosk;
mod logging;
mod routing;
mod sale;
mod scan_page;
pub mod store;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use config::{StoreLayout, load_layout};
pub use engine::{ScanOutcome, TransactionEngine, UndoOutcome};
pub use kiosk::{DEFAULT_SCAN_SETTLE_DELAY, Kiosk, ScreenUpdate};
pub use logging::setup_logging;
pub use routing::build_router;
pub use sale::{LogEntry, PendingTransaction, ProductRecord};
pub use timezone::get_local_offset;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The workbook could not be opened or is missing one of the configured
    /// worksheets.
    ///
    /// This only occurs at start up and is fatal: the front end should tell
    /// the operator and exit.
    #[error("could not connect to the workbook: {0}")]
    StoreUnavailable(String),

    /// No worksheet with the given name exists in the workbook.
    #[error("the worksheet \"{0}\" does not exist")]
    WorksheetNotFound(String),

    /// Tried to create a worksheet with a name that is already taken.
    #[error("the worksheet \"{0}\" already exists")]
    DuplicateWorksheet(String),

    /// A positional row reference pointed past the end of a worksheet.
    ///
    /// Row references are positional, so this happens when rows were deleted
    /// between a lookup and a later write.
    #[error("row {row} is out of range for worksheet \"{worksheet}\"")]
    RowOutOfRange {
        /// The worksheet that was addressed.
        worksheet: String,
        /// The 1-based row that was requested.
        row: usize,
    },

    /// A row did not have a value in a column the layout requires.
    #[error("the row has no value in column {column}")]
    MissingCell {
        /// The 1-based column that was read.
        column: usize,
    },

    /// A cell that should hold an integer held something else.
    #[error("expected an integer in column {column}, got \"{value}\"")]
    InvalidCell {
        /// The 1-based column that was read.
        column: usize,
        /// The raw cell text.
        value: String,
    },

    /// The worksheet layout is not usable, e.g. two fields share a column.
    #[error("invalid worksheet layout: {0}")]
    InvalidLayout(String),

    /// The stored cells of a row could not be decoded.
    #[error("could not decode the cells of a row: {0}")]
    InvalidRowData(String),

    /// The configured time zone is not a canonical time zone name.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// A configuration file could not be read or parsed.
    #[error("could not load configuration: {0}")]
    ConfigError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::InvalidRowData(value.to_string())
    }
}
