use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use serde::Deserialize;

use stock_kiosk::{
    ProductRecord, StoreLayout, load_layout,
    store::{TableStore, initialize_workbook},
};

/// A utility for creating a workbook database for trying out the kiosk.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// A CSV file of products with the columns `code,name,price,stock`.
    ///
    /// A handful of sample products are used if this is not given.
    #[arg(long)]
    products: Option<PathBuf>,

    /// File path to a JSON file describing the worksheet layout.
    #[arg(long)]
    layout: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct ProductRow {
    code: String,
    name: String,
    price: i64,
    stock: i64,
}

impl TryFrom<ProductRow> for ProductRecord {
    type Error = String;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        if row.price < 0 {
            return Err(format!(
                "the price of {} must not be negative, got {}",
                row.code.trim(),
                row.price
            ));
        }

        Ok(Self {
            code: row.code.trim().to_owned(),
            name: row.name,
            price: row.price,
            stock: row.stock,
        })
    }
}

/// Create and populate a workbook for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'kiosk.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    let layout = load_layout(args.layout.as_deref())?;
    let products = match &args.products {
        Some(path) => read_products(path)?,
        None => sample_products(),
    };

    println!("Creating workbook at {output_path:#?}");
    let conn = Connection::open(output_path)?;
    let workbook = initialize_workbook(conn, &layout)?;

    println!("Adding {} products...", products.len());
    add_products(&workbook, &layout, &products)?;

    println!("Success!");

    Ok(())
}

fn read_products(path: &Path) -> Result<Vec<ProductRecord>, Box<dyn Error>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut products = Vec::new();

    for (index, result) in reader.deserialize::<ProductRow>().enumerate() {
        // Line 1 is the CSV header.
        let line = index + 2;
        let row = result.map_err(|error| format!("line {line}: {error}"))?;
        let product =
            ProductRecord::try_from(row).map_err(|error| format!("line {line}: {error}"))?;
        products.push(product);
    }

    Ok(products)
}

fn sample_products() -> Vec<ProductRecord> {
    [
        ("4901234567894", "Tea", 150, 5),
        ("4900000000017", "Rice Ball", 120, 0),
        ("4900000000024", "Coffee", 130, 2),
        ("4900000000031", "Sandwich", 280, 10),
    ]
    .into_iter()
    .map(|(code, name, price, stock)| ProductRecord {
        code: code.to_owned(),
        name: name.to_owned(),
        price,
        stock,
    })
    .collect()
}

fn add_products(
    workbook: &impl TableStore,
    layout: &StoreLayout,
    products: &[ProductRecord],
) -> Result<(), stock_kiosk::Error> {
    for product in products {
        workbook.append_row(&layout.master_table_name, &product.to_cells(layout))?;
    }

    Ok(())
}
