use std::cell::Cell;

use rusqlite::Connection;

use crate::{
    Error, ProductRecord, StoreLayout,
    store::{RowRef, SqliteWorkbook, TableStore, initialize_workbook},
};

/// The barcode of the product in [sample_products] with stock left.
pub(crate) const TEA_CODE: &str = "4901234567894";
/// The barcode of the product in [sample_products] that is sold out.
pub(crate) const SOLD_OUT_CODE: &str = "4900000000017";
/// The barcode of a second product in [sample_products] with stock left.
pub(crate) const COFFEE_CODE: &str = "4900000000024";

pub(crate) fn sample_products() -> Vec<ProductRecord> {
    vec![
        ProductRecord {
            code: TEA_CODE.to_owned(),
            name: "Tea".to_owned(),
            price: 150,
            stock: 5,
        },
        ProductRecord {
            code: SOLD_OUT_CODE.to_owned(),
            name: "Rice Ball".to_owned(),
            price: 120,
            stock: 0,
        },
        ProductRecord {
            code: COFFEE_CODE.to_owned(),
            name: "Coffee".to_owned(),
            price: 130,
            stock: 2,
        },
    ]
}

/// An in-memory workbook with the default layout holding [sample_products].
///
/// The products are in master rows 2, 3 and 4, in order.
pub(crate) fn get_test_workbook() -> SqliteWorkbook {
    let layout = StoreLayout::default();
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    let workbook = initialize_workbook(connection, &layout).expect("Could not create workbook");

    for product in sample_products() {
        workbook
            .append_row(&layout.master_table_name, &product.to_cells(&layout))
            .expect("Could not add product");
    }

    workbook
}

#[track_caller]
pub(crate) fn must_get_stock(store: &impl TableStore, code: &str) -> i64 {
    let layout = StoreLayout::default();
    let row = store
        .find_row_by_key(&layout.master_table_name, layout.key_column, code)
        .expect("Could not search master")
        .expect("Product not found");

    store
        .read_cell(&layout.master_table_name, row, layout.stock_column)
        .expect("Could not read stock")
        .parse()
        .expect("Stock is not an integer")
}

/// The purchase log rows, without the header row.
#[track_caller]
pub(crate) fn must_get_log(store: &impl TableStore) -> Vec<Vec<String>> {
    let layout = StoreLayout::default();
    let mut rows = store
        .read_all_rows(&layout.log_table_name)
        .expect("Could not read log");
    rows.remove(0);
    rows
}

/// The operations of [TableStore], used to pick one for [RecordingStore] to
/// fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StoreOperation {
    FindRowByKey,
    ReadRow,
    ReadCell,
    WriteCell,
    AppendRow,
    ReadAllRows,
    DeleteRow,
}

/// Wraps a store to count calls and make one kind of call fail.
pub(crate) struct RecordingStore<S> {
    pub inner: S,
    calls: Cell<usize>,
    fail_on: Cell<Option<StoreOperation>>,
}

impl<S: TableStore> RecordingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            calls: Cell::new(0),
            fail_on: Cell::new(None),
        }
    }

    /// The number of store calls made so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// Make every later call of `operation` fail, or stop failing with `None`.
    pub fn fail_on(&self, operation: Option<StoreOperation>) {
        self.fail_on.set(operation);
    }

    fn record(&self, operation: StoreOperation) -> Result<(), Error> {
        self.calls.set(self.calls.get() + 1);

        if self.fail_on.get() == Some(operation) {
            return Err(Error::StoreUnavailable(format!(
                "injected failure on {operation:?}"
            )));
        }

        Ok(())
    }
}

impl<S: TableStore> TableStore for RecordingStore<S> {
    fn find_row_by_key(
        &self,
        worksheet: &str,
        column: usize,
        key: &str,
    ) -> Result<Option<RowRef>, Error> {
        self.record(StoreOperation::FindRowByKey)?;
        self.inner.find_row_by_key(worksheet, column, key)
    }

    fn read_row(&self, worksheet: &str, row: RowRef) -> Result<Vec<String>, Error> {
        self.record(StoreOperation::ReadRow)?;
        self.inner.read_row(worksheet, row)
    }

    fn read_cell(&self, worksheet: &str, row: RowRef, column: usize) -> Result<String, Error> {
        self.record(StoreOperation::ReadCell)?;
        self.inner.read_cell(worksheet, row, column)
    }

    fn write_cell(
        &self,
        worksheet: &str,
        row: RowRef,
        column: usize,
        value: &str,
    ) -> Result<(), Error> {
        self.record(StoreOperation::WriteCell)?;
        self.inner.write_cell(worksheet, row, column, value)
    }

    fn append_row(&self, worksheet: &str, values: &[String]) -> Result<(), Error> {
        self.record(StoreOperation::AppendRow)?;
        self.inner.append_row(worksheet, values)
    }

    fn read_all_rows(&self, worksheet: &str) -> Result<Vec<Vec<String>>, Error> {
        self.record(StoreOperation::ReadAllRows)?;
        self.inner.read_all_rows(worksheet)
    }

    fn delete_row(&self, worksheet: &str, row: RowRef) -> Result<(), Error> {
        self.record(StoreOperation::DeleteRow)?;
        self.inner.delete_row(worksheet, row)
    }
}
