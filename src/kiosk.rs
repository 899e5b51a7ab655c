//! The presentation adapter between a front end and the [TransactionEngine].
//!
//! Front ends pass raw scanner input and undo button presses to a [Kiosk] and
//! render the [ScreenUpdate] they get back. The kiosk knows nothing about how
//! the screen is drawn.

use std::{path::Path, time::Duration};

use time::UtcOffset;

use crate::{
    Error, ScanOutcome, StoreLayout, TransactionEngine, UndoOutcome,
    store::{SqliteWorkbook, TableStore},
};

/// How long a front end should wait after the enter key before reading the
/// scanned text, so a hardware scanner can finish typing.
pub const DEFAULT_SCAN_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// The status line shown while the kiosk waits for a scan.
pub const SCAN_PROMPT: &str = "Scan a product barcode";

/// Everything a front end needs to draw the kiosk screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenUpdate {
    /// A short line describing what the kiosk is doing.
    pub status: String,
    /// The result of the last scan or undo.
    pub message: String,
    /// Whether the undo button should be enabled.
    pub undo_available: bool,
}

impl Default for ScreenUpdate {
    fn default() -> Self {
        Self {
            status: SCAN_PROMPT.to_owned(),
            message: String::new(),
            undo_available: false,
        }
    }
}

/// Drives a [TransactionEngine] on behalf of a front end.
#[derive(Debug)]
pub struct Kiosk<S> {
    engine: TransactionEngine<S>,
    currency_suffix: String,
    screen: ScreenUpdate,
}

impl<S: TableStore> Kiosk<S> {
    /// Create a kiosk showing the scan prompt.
    ///
    /// `currency_suffix` is appended to displayed prices, e.g. "円".
    pub fn new(engine: TransactionEngine<S>, currency_suffix: &str) -> Self {
        Self {
            engine,
            currency_suffix: currency_suffix.to_owned(),
            screen: ScreenUpdate::default(),
        }
    }

    /// What the screen currently shows.
    pub fn screen(&self) -> &ScreenUpdate {
        &self.screen
    }

    /// The engine this kiosk drives.
    pub fn engine(&self) -> &TransactionEngine<S> {
        &self.engine
    }

    /// Handle the text submitted by the scanner.
    pub fn on_scan_submitted(&mut self, raw_text: &str) -> ScreenUpdate {
        let code = raw_text.trim();

        let message = match self.engine.scan(code) {
            ScanOutcome::Unchanged => return self.screen.clone(),
            ScanOutcome::Unregistered { .. } => "This product is not registered".to_owned(),
            ScanOutcome::OutOfStock { name } => format!("{name} is out of stock!"),
            ScanOutcome::Sold {
                name,
                price,
                new_stock,
            } => format!(
                "{name} {price}{}, remaining: {new_stock}",
                self.currency_suffix
            ),
            ScanOutcome::TransactionError(_) => "An error occurred".to_owned(),
        };

        self.update(format!("Scanned: {code}"), message)
    }

    /// Handle a press of the undo button.
    pub fn on_undo_requested(&mut self) -> ScreenUpdate {
        let message = match self.engine.undo() {
            UndoOutcome::NothingToUndo => {
                let status = self.screen.status.clone();
                return self.update(status, "There is nothing to undo".to_owned());
            }
            UndoOutcome::Undone {
                name,
                restored_stock,
            } => format!("{name} purchase undone (remaining: {restored_stock})"),
            UndoOutcome::UndoError(_) => "An error occurred while undoing".to_owned(),
        };

        self.update(SCAN_PROMPT.to_owned(), message)
    }

    fn update(&mut self, status: String, message: String) -> ScreenUpdate {
        self.screen = ScreenUpdate {
            status,
            message,
            undo_available: self.engine.has_pending(),
        };

        self.screen.clone()
    }
}

impl Kiosk<SqliteWorkbook> {
    /// Connect to the workbook at `db_path` and create a kiosk for it.
    ///
    /// # Errors
    /// Returns [Error::StoreUnavailable] if the workbook cannot be opened or
    /// lacks a worksheet named in `layout`.
    pub fn open(db_path: &Path, layout: StoreLayout, utc_offset: UtcOffset) -> Result<Self, Error> {
        let workbook = SqliteWorkbook::open(db_path, &layout)?;
        let currency_suffix = layout.currency_suffix.clone();
        let engine = TransactionEngine::new(workbook, layout, utc_offset);

        Ok(Self::new(engine, &currency_suffix))
    }
}
