//! The worksheet layout the kiosk expects and how to load it.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::Error;

/// Where the kiosk finds things in the workbook.
///
/// Columns are 1-based, the same way spreadsheet columns are counted, so
/// column 1 is column A.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreLayout {
    /// The name of the product master worksheet.
    pub master_table_name: String,
    /// The name of the purchase log worksheet.
    pub log_table_name: String,
    /// The master column holding the product barcode.
    pub key_column: usize,
    /// The master column holding the product display name.
    pub name_column: usize,
    /// The master column holding the unit price.
    pub price_column: usize,
    /// The master column holding the stock count.
    pub stock_column: usize,
    /// Text appended to prices when they are displayed, e.g. "円".
    pub currency_suffix: String,
}

impl Default for StoreLayout {
    fn default() -> Self {
        Self {
            master_table_name: "商品マスタ".to_owned(),
            log_table_name: "購入履歴".to_owned(),
            key_column: 6,
            name_column: 1,
            price_column: 3,
            stock_column: 4,
            currency_suffix: "円".to_owned(),
        }
    }
}

impl StoreLayout {
    /// Check that the layout can be used to address a workbook.
    ///
    /// # Errors
    /// Returns [Error::InvalidLayout] if a column is zero, two fields share a
    /// column, or a worksheet name is empty or shared by both worksheets.
    pub fn validate(&self) -> Result<(), Error> {
        let columns = [
            ("key", self.key_column),
            ("name", self.name_column),
            ("price", self.price_column),
            ("stock", self.stock_column),
        ];

        for (field, column) in columns {
            if column == 0 {
                return Err(Error::InvalidLayout(format!(
                    "the {field} column must be 1 or greater"
                )));
            }
        }

        for (i, (field, column)) in columns.iter().enumerate() {
            if let Some((other, _)) = columns[i + 1..].iter().find(|(_, c)| c == column) {
                return Err(Error::InvalidLayout(format!(
                    "the {field} and {other} columns are both column {column}"
                )));
            }
        }

        if self.master_table_name.trim().is_empty() || self.log_table_name.trim().is_empty() {
            return Err(Error::InvalidLayout(
                "worksheet names cannot be empty".to_owned(),
            ));
        }

        if self.master_table_name == self.log_table_name {
            return Err(Error::InvalidLayout(
                "the master and log worksheets must be different".to_owned(),
            ));
        }

        Ok(())
    }

    /// The number of columns a master row needs to hold every field.
    pub fn master_width(&self) -> usize {
        [
            self.key_column,
            self.name_column,
            self.price_column,
            self.stock_column,
        ]
        .into_iter()
        .max()
        .unwrap_or_default()
    }
}

/// Load a layout from a JSON file, or the default layout if `path` is `None`.
///
/// Fields missing from the file keep their default values.
///
/// # Errors
/// Returns [Error::ConfigError] if the file cannot be read or parsed, or
/// [Error::InvalidLayout] if the resulting layout is not valid.
pub fn load_layout(path: Option<&Path>) -> Result<StoreLayout, Error> {
    let layout = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|error| Error::ConfigError(format!("{}: {error}", path.display())))?;
            serde_json::from_str(&text)
                .map_err(|error| Error::ConfigError(format!("{}: {error}", path.display())))?
        }
        None => StoreLayout::default(),
    };

    layout.validate()?;

    Ok(layout)
}
