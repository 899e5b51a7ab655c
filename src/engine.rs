//! The scan and undo state machine.
//!
//! The engine keeps no durable state of its own. Everything it knows about
//! products and sales lives in the workbook, except for the single
//! [PendingTransaction] that lets the last sale be undone. That slot is lost
//! when the process exits.
//!
//! The workbook has no multi-row transactions, so a sale is three separate
//! writes made in a fixed order: the stock cell, then the log row, then the
//! pending slot. If the log append fails after the stock write succeeded, the
//! stock stays decremented with no log row and nothing to undo. The engine
//! reports the failure and leaves the fix to the operator.

use time::{OffsetDateTime, UtcOffset};

use crate::{
    Error, LogEntry, PendingTransaction, ProductRecord, StoreLayout,
    sale::parse_count,
    store::{RowRef, TableStore},
};

/// What happened when a barcode was scanned.
#[derive(Debug, PartialEq)]
pub enum ScanOutcome {
    /// The input was blank, nothing was done.
    Unchanged,
    /// No product in the master has this barcode.
    Unregistered {
        /// The barcode that was scanned.
        code: String,
    },
    /// The product exists but has no stock left.
    OutOfStock {
        /// The product name.
        name: String,
    },
    /// One item was sold and can be undone.
    Sold {
        /// The product name.
        name: String,
        /// The price charged.
        price: i64,
        /// The stock left after the sale.
        new_stock: i64,
    },
    /// The workbook could not be read or written.
    ///
    /// The stock may or may not have been decremented.
    TransactionError(Error),
}

/// What happened when the last sale was undone.
#[derive(Debug, PartialEq)]
pub enum UndoOutcome {
    /// There was no sale to undo.
    NothingToUndo,
    /// The stock was restored.
    Undone {
        /// The product name.
        name: String,
        /// The stock after putting the item back.
        restored_stock: i64,
    },
    /// The workbook could not be read or written part way through the undo.
    UndoError(Error),
}

/// Sells products one scan at a time and undoes the most recent sale.
///
/// The engine owns the only copy of the pending undo state, so separate
/// engines never share it.
#[derive(Debug)]
pub struct TransactionEngine<S> {
    store: S,
    layout: StoreLayout,
    utc_offset: UtcOffset,
    pending: Option<PendingTransaction>,
}

impl<S: TableStore> TransactionEngine<S> {
    /// Create an engine with nothing to undo.
    ///
    /// Log timestamps are written in local time at `utc_offset`.
    pub fn new(store: S, layout: StoreLayout, utc_offset: UtcOffset) -> Self {
        Self {
            store,
            layout,
            utc_offset,
            pending: None,
        }
    }

    /// The sale that [TransactionEngine::undo] would undo, if any.
    pub fn pending(&self) -> Option<&PendingTransaction> {
        self.pending.as_ref()
    }

    /// Whether there is a sale to undo.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The store the engine reads and writes.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Sell one item of the product with barcode `raw_code`.
    ///
    /// Blank input is ignored. Any other scan first forgets the previous sale,
    /// so it can no longer be undone even if this scan fails.
    pub fn scan(&mut self, raw_code: &str) -> ScanOutcome {
        let code = raw_code.trim();
        if code.is_empty() {
            return ScanOutcome::Unchanged;
        }

        self.pending = None;

        match self.sell_one(code) {
            Ok(outcome) => outcome,
            Err(error) => {
                tracing::error!("could not complete the sale of {code}: {error}");
                ScanOutcome::TransactionError(error)
            }
        }
    }

    /// Put back the item from the last sale and remove its log row.
    ///
    /// Undo is single shot: the pending sale is forgotten whether the undo
    /// succeeds or fails.
    pub fn undo(&mut self) -> UndoOutcome {
        let Some(pending) = self.pending.take() else {
            return UndoOutcome::NothingToUndo;
        };

        match self.compensate(&pending) {
            Ok(restored_stock) => UndoOutcome::Undone {
                name: pending.log_entry.name,
                restored_stock,
            },
            Err(error) => {
                tracing::error!(
                    "could not undo the sale of {} from master row {}: {error}",
                    pending.code,
                    pending.master_row
                );
                UndoOutcome::UndoError(error)
            }
        }
    }

    fn sell_one(&mut self, code: &str) -> Result<ScanOutcome, Error> {
        let master = &self.layout.master_table_name;

        let Some(row) = self
            .store
            .find_row_by_key(master, self.layout.key_column, code)?
        else {
            tracing::info!("scanned unregistered code {code}");
            return Ok(ScanOutcome::Unregistered {
                code: code.to_owned(),
            });
        };

        let cells = self.store.read_row(master, row)?;
        let product = ProductRecord::from_cells(code, &cells, &self.layout)?;

        if product.stock <= 0 {
            tracing::info!("{} ({code}) is out of stock", product.name);
            return Ok(ScanOutcome::OutOfStock { name: product.name });
        }

        let new_stock = product.stock - 1;
        self.store.write_cell(
            master,
            row,
            self.layout.stock_column,
            &new_stock.to_string(),
        )?;

        let log_entry = LogEntry::single_sale(&product, self.now());
        if let Err(error) = self
            .store
            .append_row(&self.layout.log_table_name, &log_entry.to_cells())
        {
            tracing::error!(
                "stock of {code} in master row {row} is now {new_stock} but the sale was not logged"
            );
            return Err(error);
        }

        tracing::info!(
            "sold {} ({code}) for {}, {new_stock} left",
            product.name,
            product.price
        );

        self.pending = Some(PendingTransaction {
            code: product.code,
            master_row: row,
            log_entry,
        });

        Ok(ScanOutcome::Sold {
            name: product.name,
            price: product.price,
            new_stock,
        })
    }

    /// Restore the stock and delete the log row of `pending`, returning the
    /// restored stock.
    fn compensate(&self, pending: &PendingTransaction) -> Result<i64, Error> {
        let master = &self.layout.master_table_name;
        let stock_column = self.layout.stock_column;

        // Re-read rather than trust the value seen at scan time.
        let stock_cell = self
            .store
            .read_cell(master, pending.master_row, stock_column)?;
        let restored_stock = parse_count(&stock_cell, stock_column)?
            .checked_add(1)
            .ok_or_else(|| Error::InvalidCell {
                column: stock_column,
                value: stock_cell.clone(),
            })?;
        self.store.write_cell(
            master,
            pending.master_row,
            stock_column,
            &restored_stock.to_string(),
        )?;

        let log = &self.layout.log_table_name;
        let wanted = pending.log_entry.to_cells();
        let rows = self.store.read_all_rows(log)?;

        // Search bottom up so the newest of any identical rows goes. Row 1 is
        // the header.
        let matched = rows
            .iter()
            .enumerate()
            .skip(1)
            .rev()
            .find(|(_, cells)| **cells == wanted)
            .and_then(|(index, _)| RowRef::new(index + 1));

        match matched {
            Some(row) => self.store.delete_row(log, row)?,
            None => tracing::warn!(
                "no log row matched the sale of {} being undone, the log was left as is",
                pending.code
            ),
        }

        tracing::info!(
            "undid the sale of {} ({}), stock restored to {restored_stock}",
            pending.log_entry.name,
            pending.code
        );

        Ok(restored_stock)
    }

    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.utc_offset)
    }
}
