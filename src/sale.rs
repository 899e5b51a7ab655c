//! The records a sale reads and writes.

use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Error, StoreLayout, store::RowRef};

/// The format of purchase log timestamps, e.g. "2025/06/14 09:05:31".
const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]/[month]/[day] [hour]:[minute]:[second]");

/// A product as listed in the product master worksheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    /// The barcode of the product.
    pub code: String,
    /// The name shown to the customer.
    pub name: String,
    /// The unit price.
    pub price: i64,
    /// The number of items left.
    pub stock: i64,
}

impl ProductRecord {
    /// Read a product out of the cells of a master row.
    ///
    /// # Errors
    /// Returns [Error::MissingCell] if the row is too short to hold the name,
    /// price or stock, or [Error::InvalidCell] if the price or stock is not an
    /// integer or the price is negative.
    pub fn from_cells(code: &str, cells: &[String], layout: &StoreLayout) -> Result<Self, Error> {
        let name = cell(cells, layout.name_column)?.to_owned();
        let price_cell = cell(cells, layout.price_column)?;
        let price = parse_count(price_cell, layout.price_column)?;
        if price < 0 {
            return Err(Error::InvalidCell {
                column: layout.price_column,
                value: price_cell.to_owned(),
            });
        }
        let stock = parse_count(cell(cells, layout.stock_column)?, layout.stock_column)?;

        Ok(Self {
            code: code.to_owned(),
            name,
            price,
            stock,
        })
    }

    /// The cells of a master row holding this product.
    ///
    /// Columns the layout does not use are left empty. `layout` must have
    /// passed [StoreLayout::validate].
    pub fn to_cells(&self, layout: &StoreLayout) -> Vec<String> {
        let mut cells = vec![String::new(); layout.master_width()];
        cells[layout.key_column - 1] = self.code.clone();
        cells[layout.name_column - 1] = self.name.clone();
        cells[layout.price_column - 1] = self.price.to_string();
        cells[layout.stock_column - 1] = self.stock.to_string();
        cells
    }

    /// The header row of the product master worksheet for a validated
    /// `layout`.
    pub fn header(layout: &StoreLayout) -> Vec<String> {
        let mut cells = vec![String::new(); layout.master_width()];
        cells[layout.key_column - 1] = "Code".to_owned();
        cells[layout.name_column - 1] = "Name".to_owned();
        cells[layout.price_column - 1] = "Price".to_owned();
        cells[layout.stock_column - 1] = "Stock".to_owned();
        cells
    }
}

/// One line of the purchase log.
///
/// A log entry is never edited once appended. The only time one is removed is
/// when the sale it records is undone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// When the sale happened, in local time.
    pub timestamp: String,
    /// The barcode of the product sold.
    pub code: String,
    /// The name of the product sold.
    pub name: String,
    /// The number of items sold, always 1 for a scan.
    pub quantity: i64,
    /// The total charged.
    pub amount: i64,
}

impl LogEntry {
    /// Record the sale of a single `product` at time `now`.
    pub fn single_sale(product: &ProductRecord, now: OffsetDateTime) -> Self {
        Self {
            timestamp: format_timestamp(now),
            code: product.code.clone(),
            name: product.name.clone(),
            quantity: 1,
            amount: product.price,
        }
    }

    /// The cells of the log row, in worksheet column order.
    pub fn to_cells(&self) -> Vec<String> {
        vec![
            self.timestamp.clone(),
            self.code.clone(),
            self.name.clone(),
            self.quantity.to_string(),
            self.amount.to_string(),
        ]
    }

    /// The header row of the purchase log worksheet.
    pub fn header() -> Vec<String> {
        ["Timestamp", "Code", "Name", "Quantity", "Amount"]
            .into_iter()
            .map(str::to_owned)
            .collect()
    }
}

/// The last sale, kept so that it can be undone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransaction {
    /// The barcode that was scanned.
    pub code: String,
    /// The master row the stock was taken from.
    pub master_row: RowRef,
    /// Exactly what was appended to the purchase log.
    pub log_entry: LogEntry,
}

fn format_timestamp(now: OffsetDateTime) -> String {
    // The format only uses components every OffsetDateTime has.
    now.format(TIMESTAMP_FORMAT).unwrap_or_else(|error| {
        tracing::warn!("could not format timestamp {now}: {error}");
        now.to_string()
    })
}

fn cell(cells: &[String], column: usize) -> Result<&str, Error> {
    column
        .checked_sub(1)
        .and_then(|index| cells.get(index))
        .map(String::as_str)
        .ok_or(Error::MissingCell { column })
}

/// Parse an integer cell, allowing the surrounding whitespace and thousands
/// separators spreadsheets tend to add.
pub(crate) fn parse_count(value: &str, column: usize) -> Result<i64, Error> {
    value
        .trim()
        .replace(',', "")
        .parse()
        .map_err(|_| Error::InvalidCell {
            column,
            value: value.to_owned(),
        })
}
