//! The tabular store the kiosk reads products from and logs sales to.
//!
//! The store is a workbook of named worksheets. Rows and columns are
//! addressed positionally and counted from 1, the way spreadsheets count
//! them. A row reference is only a position: deleting a row shifts every row
//! below it up by one.

mod sqlite;

use std::fmt::Display;

pub use sqlite::{SqliteWorkbook, create_workbook_tables, initialize_workbook};

use crate::Error;

/// A 1-based positional reference to a row in a worksheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowRef(usize);

impl RowRef {
    /// Create a row reference, returns `None` for row 0.
    pub fn new(row: usize) -> Option<Self> {
        (row > 0).then_some(Self(row))
    }

    /// The 1-based row number.
    pub fn get(self) -> usize {
        self.0
    }

    /// The 0-based offset of the row from the top of the worksheet.
    pub fn offset(self) -> usize {
        self.0 - 1
    }
}

impl Display for RowRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The operations the transaction engine needs from a workbook.
///
/// Cell values are plain text. Reading a cell past the end of a row yields an
/// empty string.
pub trait TableStore {
    /// Find the first row, from the top, whose cell in `column` equals `key`.
    fn find_row_by_key(
        &self,
        worksheet: &str,
        column: usize,
        key: &str,
    ) -> Result<Option<RowRef>, Error>;

    /// Read every cell of a row.
    fn read_row(&self, worksheet: &str, row: RowRef) -> Result<Vec<String>, Error>;

    /// Read a single cell.
    fn read_cell(&self, worksheet: &str, row: RowRef, column: usize) -> Result<String, Error>;

    /// Overwrite a single cell.
    fn write_cell(
        &self,
        worksheet: &str,
        row: RowRef,
        column: usize,
        value: &str,
    ) -> Result<(), Error>;

    /// Add a row after the last row of the worksheet.
    fn append_row(&self, worksheet: &str, values: &[String]) -> Result<(), Error>;

    /// Read every row of the worksheet, top to bottom.
    fn read_all_rows(&self, worksheet: &str) -> Result<Vec<Vec<String>>, Error>;

    /// Delete a row, shifting the rows below it up.
    fn delete_row(&self, worksheet: &str, row: RowRef) -> Result<(), Error>;
}
