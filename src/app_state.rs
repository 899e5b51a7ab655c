//! Implements a struct that holds the state of the kiosk web server.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use crate::{Kiosk, store::SqliteWorkbook};

/// The state of the kiosk web server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The kiosk, locked for the whole of each scan or undo so that only one
    /// runs at a time.
    pub kiosk: Arc<Mutex<Kiosk<SqliteWorkbook>>>,

    /// How long to wait before handling a submitted scan.
    pub scan_settle_delay: Duration,
}

impl AppState {
    /// Create a new [AppState] around a kiosk that is already connected to
    /// its workbook.
    pub fn new(kiosk: Kiosk<SqliteWorkbook>, scan_settle_delay: Duration) -> Self {
        Self {
            kiosk: Arc::new(Mutex::new(kiosk)),
            scan_settle_delay,
        }
    }
}
