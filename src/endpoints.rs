//! The URIs served by the kiosk web front end.

/// The kiosk screen.
pub const ROOT: &str = "/";
/// The route for submitting a scanned barcode.
pub const SCAN: &str = "/api/scan";
/// The route for undoing the last sale.
pub const UNDO: &str = "/api/undo";
/// The route for static files.
pub const STATIC: &str = "/static";
