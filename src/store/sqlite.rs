//! A workbook of worksheets stored in a SQLite database.
//!
//! Each row's cells are stored as a JSON array of strings. The position of a
//! row is its rank within its worksheet when ordered by insertion ID, so rows
//! appended later always come after rows appended earlier.

use std::path::Path;

use rusqlite::{Connection, OpenFlags};

use crate::{
    Error, LogEntry, ProductRecord, StoreLayout,
    store::{RowRef, TableStore},
};

/// A SQLite-backed [TableStore].
#[derive(Debug)]
pub struct SqliteWorkbook {
    connection: Connection,
}

impl SqliteWorkbook {
    /// Wrap a connection to a database that already has the workbook tables.
    ///
    /// Use [create_workbook_tables] to add the tables to a fresh database.
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }

    /// Open an existing workbook file and check that both worksheets named in
    /// `layout` exist.
    ///
    /// The file is not created if it does not exist.
    ///
    /// # Errors
    /// Returns [Error::StoreUnavailable] if the file cannot be opened or a
    /// worksheet is missing.
    pub fn open(path: &Path, layout: &StoreLayout) -> Result<Self, Error> {
        let connection = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|error| Error::StoreUnavailable(format!("{}: {error}", path.display())))?;

        Self::connect(connection, layout)
    }

    /// Wrap `connection` after checking that both worksheets named in
    /// `layout` exist.
    ///
    /// # Errors
    /// Returns [Error::StoreUnavailable] if a worksheet is missing or the
    /// workbook tables cannot be read.
    pub fn connect(connection: Connection, layout: &StoreLayout) -> Result<Self, Error> {
        let workbook = Self::new(connection);

        for name in [&layout.master_table_name, &layout.log_table_name] {
            workbook
                .worksheet_id(name)
                .map_err(|error| Error::StoreUnavailable(error.to_string()))?;
        }

        Ok(workbook)
    }

    /// Add an empty worksheet, with `header` as its first row if it is not
    /// empty.
    ///
    /// # Errors
    /// Returns [Error::DuplicateWorksheet] if the name is taken, or
    /// [Error::SqlError] if there is some other SQL error.
    pub fn create_worksheet(&self, name: &str, header: &[String]) -> Result<(), Error> {
        self.connection
            .execute("INSERT INTO worksheet (name) VALUES (?1)", (name,))
            .map_err(|error| match error {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error {
                        code: _,
                        extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                    },
                    _,
                ) => Error::DuplicateWorksheet(name.to_owned()),
                error => error.into(),
            })?;

        if !header.is_empty() {
            self.append_row(name, header)?;
        }

        Ok(())
    }

    fn worksheet_id(&self, name: &str) -> Result<i64, Error> {
        self.connection
            .query_row(
                "SELECT id FROM worksheet WHERE name = ?1",
                (name,),
                |row| row.get(0),
            )
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::WorksheetNotFound(name.to_owned()),
                error => error.into(),
            })
    }

    /// Get the database ID and cells of the row at a position.
    fn row_at(&self, worksheet: &str, row: RowRef) -> Result<(i64, Vec<String>), Error> {
        let worksheet_id = self.worksheet_id(worksheet)?;

        let (id, raw_cells): (i64, String) = self
            .connection
            .query_row(
                "SELECT id, cells FROM worksheet_row
                 WHERE worksheet_id = ?1
                 ORDER BY id
                 LIMIT 1 OFFSET ?2",
                (worksheet_id, row.offset() as i64),
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::RowOutOfRange {
                    worksheet: worksheet.to_owned(),
                    row: row.get(),
                },
                error => error.into(),
            })?;

        Ok((id, decode_cells(&raw_cells)?))
    }
}

impl TableStore for SqliteWorkbook {
    fn find_row_by_key(
        &self,
        worksheet: &str,
        column: usize,
        key: &str,
    ) -> Result<Option<RowRef>, Error> {
        let index = column_index(column)?;

        let position = self
            .read_all_rows(worksheet)?
            .iter()
            .position(|cells| cells.get(index).is_some_and(|cell| cell == key));

        Ok(position.and_then(|offset| RowRef::new(offset + 1)))
    }

    fn read_row(&self, worksheet: &str, row: RowRef) -> Result<Vec<String>, Error> {
        self.row_at(worksheet, row).map(|(_, cells)| cells)
    }

    fn read_cell(&self, worksheet: &str, row: RowRef, column: usize) -> Result<String, Error> {
        let index = column_index(column)?;
        let cells = self.read_row(worksheet, row)?;

        Ok(cells.get(index).cloned().unwrap_or_default())
    }

    fn write_cell(
        &self,
        worksheet: &str,
        row: RowRef,
        column: usize,
        value: &str,
    ) -> Result<(), Error> {
        let index = column_index(column)?;
        let (id, mut cells) = self.row_at(worksheet, row)?;

        if cells.len() <= index {
            cells.resize(index + 1, String::new());
        }
        cells[index] = value.to_owned();

        self.connection.execute(
            "UPDATE worksheet_row SET cells = ?1 WHERE id = ?2",
            (serde_json::to_string(&cells)?, id),
        )?;

        Ok(())
    }

    fn append_row(&self, worksheet: &str, values: &[String]) -> Result<(), Error> {
        let worksheet_id = self.worksheet_id(worksheet)?;

        self.connection.execute(
            "INSERT INTO worksheet_row (worksheet_id, cells) VALUES (?1, ?2)",
            (worksheet_id, serde_json::to_string(values)?),
        )?;

        Ok(())
    }

    fn read_all_rows(&self, worksheet: &str) -> Result<Vec<Vec<String>>, Error> {
        let worksheet_id = self.worksheet_id(worksheet)?;

        self.connection
            .prepare("SELECT cells FROM worksheet_row WHERE worksheet_id = ?1 ORDER BY id")?
            .query_map((worksheet_id,), |row| row.get::<_, String>(0))?
            .map(|maybe_cells| {
                maybe_cells
                    .map_err(Error::from)
                    .and_then(|raw_cells| decode_cells(&raw_cells))
            })
            .collect()
    }

    fn delete_row(&self, worksheet: &str, row: RowRef) -> Result<(), Error> {
        let (id, _) = self.row_at(worksheet, row)?;

        self.connection
            .execute("DELETE FROM worksheet_row WHERE id = ?1", (id,))?;

        Ok(())
    }
}

/// Turn an empty database into a workbook with the master and log worksheets
/// named in `layout`, each with a header row.
///
/// # Errors
/// Returns [Error::InvalidLayout] if the layout is not valid,
/// [Error::DuplicateWorksheet] if the database already holds a worksheet of
/// the same name, or [Error::SqlError] if there is some other SQL error.
pub fn initialize_workbook(
    connection: Connection,
    layout: &StoreLayout,
) -> Result<SqliteWorkbook, Error> {
    layout.validate()?;
    create_workbook_tables(&connection)?;

    let workbook = SqliteWorkbook::new(connection);
    workbook.create_worksheet(&layout.master_table_name, &ProductRecord::header(layout))?;
    workbook.create_worksheet(&layout.log_table_name, &LogEntry::header())?;

    Ok(workbook)
}

/// Create the worksheet tables in the database.
///
/// # Errors
/// Returns an error if the tables cannot be created or if there is an SQL error.
pub fn create_workbook_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS worksheet (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS worksheet_row (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            worksheet_id INTEGER NOT NULL,
            cells TEXT NOT NULL,
            FOREIGN KEY(worksheet_id) REFERENCES worksheet(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_worksheet_row_position ON worksheet_row(worksheet_id, id);",
    )?;

    Ok(())
}

fn column_index(column: usize) -> Result<usize, Error> {
    column
        .checked_sub(1)
        .ok_or_else(|| Error::InvalidLayout("columns are counted from 1".to_owned()))
}

fn decode_cells(raw_cells: &str) -> Result<Vec<String>, Error> {
    Ok(serde_json::from_str(raw_cells)?)
}

#[cfg(test)]
mod sqlite_workbook_tests {
    use rusqlite::Connection;

    use crate::{
        Error, LogEntry, StoreLayout,
        store::{RowRef, SqliteWorkbook, TableStore, create_workbook_tables, initialize_workbook},
    };

    const SHEET: &str = "Products";

    fn row(n: usize) -> RowRef {
        RowRef::new(n).unwrap()
    }

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    fn get_test_workbook() -> SqliteWorkbook {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_workbook_tables(&connection).expect("Could not create workbook tables");
        let workbook = SqliteWorkbook::new(connection);
        workbook
            .create_worksheet(SHEET, &cells(&["name", "code"]))
            .expect("Could not create worksheet");
        workbook
    }

    #[test]
    fn create_worksheet_adds_header_row() {
        let workbook = get_test_workbook();

        let rows = workbook.read_all_rows(SHEET).unwrap();

        assert_eq!(rows, vec![cells(&["name", "code"])]);
    }

    #[test]
    fn create_worksheet_fails_on_duplicate_name() {
        let workbook = get_test_workbook();

        let result = workbook.create_worksheet(SHEET, &[]);

        assert_eq!(result, Err(Error::DuplicateWorksheet(SHEET.to_owned())));
    }

    #[test]
    fn find_returns_first_matching_row() {
        let workbook = get_test_workbook();
        workbook.append_row(SHEET, &cells(&["Tea", "111"])).unwrap();
        workbook.append_row(SHEET, &cells(&["Coffee", "222"])).unwrap();
        workbook.append_row(SHEET, &cells(&["Cola", "222"])).unwrap();

        let found = workbook.find_row_by_key(SHEET, 2, "222").unwrap();

        assert_eq!(found, Some(row(3)));
    }

    #[test]
    fn find_returns_none_for_unknown_key() {
        let workbook = get_test_workbook();
        workbook.append_row(SHEET, &cells(&["Tea", "111"])).unwrap();

        let found = workbook.find_row_by_key(SHEET, 2, "999").unwrap();

        assert_eq!(found, None);
    }

    #[test]
    fn find_ignores_rows_too_short_for_column() {
        let workbook = get_test_workbook();
        workbook.append_row(SHEET, &cells(&["Tea"])).unwrap();

        let found = workbook.find_row_by_key(SHEET, 2, "").unwrap();

        assert_eq!(found, None);
    }

    #[test]
    fn read_cell_past_end_of_row_is_empty() {
        let workbook = get_test_workbook();
        workbook.append_row(SHEET, &cells(&["Tea"])).unwrap();

        let value = workbook.read_cell(SHEET, row(2), 5).unwrap();

        assert_eq!(value, "");
    }

    #[test]
    fn write_cell_pads_short_rows() {
        let workbook = get_test_workbook();
        workbook.append_row(SHEET, &cells(&["Tea"])).unwrap();

        workbook.write_cell(SHEET, row(2), 3, "5").unwrap();

        assert_eq!(
            workbook.read_row(SHEET, row(2)).unwrap(),
            cells(&["Tea", "", "5"])
        );
    }

    #[test]
    fn write_cell_fails_past_last_row() {
        let workbook = get_test_workbook();

        let result = workbook.write_cell(SHEET, row(2), 1, "Tea");

        assert_eq!(
            result,
            Err(Error::RowOutOfRange {
                worksheet: SHEET.to_owned(),
                row: 2
            })
        );
    }

    #[test]
    fn delete_row_shifts_later_rows_up() {
        let workbook = get_test_workbook();
        workbook.append_row(SHEET, &cells(&["Tea", "111"])).unwrap();
        workbook.append_row(SHEET, &cells(&["Coffee", "222"])).unwrap();

        workbook.delete_row(SHEET, row(2)).unwrap();

        assert_eq!(
            workbook.read_row(SHEET, row(2)).unwrap(),
            cells(&["Coffee", "222"])
        );
        assert_eq!(workbook.read_all_rows(SHEET).unwrap().len(), 2);
    }

    #[test]
    fn operations_fail_on_unknown_worksheet() {
        let workbook = get_test_workbook();

        let result = workbook.append_row("Nope", &cells(&["x"]));

        assert_eq!(result, Err(Error::WorksheetNotFound("Nope".to_owned())));
    }

    #[test]
    fn connect_fails_when_worksheet_is_missing() {
        let connection = Connection::open_in_memory().unwrap();
        create_workbook_tables(&connection).unwrap();

        let result = SqliteWorkbook::connect(connection, &StoreLayout::default());

        assert!(matches!(result, Err(Error::StoreUnavailable(_))));
    }

    #[test]
    fn connect_succeeds_when_both_worksheets_exist() {
        let layout = StoreLayout::default();
        let connection = Connection::open_in_memory().unwrap();
        create_workbook_tables(&connection).unwrap();
        let workbook = SqliteWorkbook::new(connection);
        workbook
            .create_worksheet(&layout.master_table_name, &[])
            .unwrap();
        workbook.create_worksheet(&layout.log_table_name, &[]).unwrap();
        let SqliteWorkbook { connection } = workbook;

        let result = SqliteWorkbook::connect(connection, &layout);

        assert!(result.is_ok());
    }

    #[test]
    fn initialize_creates_both_worksheets_with_headers() {
        let layout = StoreLayout::default();
        let connection = Connection::open_in_memory().unwrap();

        let workbook = initialize_workbook(connection, &layout).unwrap();

        assert_eq!(
            workbook.read_all_rows(&layout.log_table_name).unwrap(),
            vec![LogEntry::header()]
        );
        assert_eq!(
            workbook
                .read_cell(&layout.master_table_name, row(1), layout.key_column)
                .unwrap(),
            "Code"
        );
    }

    #[test]
    fn open_fails_on_missing_file() {
        let path = std::env::temp_dir().join("stock_kiosk_workbook_that_does_not_exist.db");

        let result = SqliteWorkbook::open(&path, &StoreLayout::default());

        assert!(matches!(result, Err(Error::StoreUnavailable(_))));
    }
}
