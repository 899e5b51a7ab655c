use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    process::exit,
};

use clap::Parser;
use tracing_subscriber::filter::LevelFilter;

use stock_kiosk::{
    Error, Kiosk, ScreenUpdate, get_local_offset, load_layout, setup_logging,
    store::SqliteWorkbook,
};

/// A line based kiosk for scanners that type into a console.
///
/// Each line is a barcode. Enter "undo" (or "u") to undo the last sale and
/// "quit" (or "q") to exit.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the workbook SQLite database.
    #[arg(long)]
    db_path: PathBuf,

    /// File path to a JSON file describing the worksheet layout.
    #[arg(long)]
    layout: Option<PathBuf>,

    /// The canonical name of the local timezone, used for purchase log
    /// timestamps.
    #[arg(long, default_value = "Asia/Tokyo")]
    timezone: String,

    /// File path to append debug logs to.
    #[arg(long, default_value = "debug.log")]
    log_path: PathBuf,
}

enum Command<'a> {
    Scan(&'a str),
    Undo,
    Quit,
}

fn parse_command(line: &str) -> Command<'_> {
    match line.trim() {
        "u" | "undo" => Command::Undo,
        "q" | "quit" => Command::Quit,
        text => Command::Scan(text),
    }
}

fn main() {
    let args = Args::parse();

    // Only errors go to the console so they do not bury the screen.
    if let Err(error) = setup_logging(&args.log_path, LevelFilter::ERROR) {
        eprintln!("Could not open the log file {:#?}: {error}", args.log_path);
        exit(1);
    }

    let mut kiosk = match connect(&args) {
        Ok(kiosk) => kiosk,
        Err(error) => {
            eprintln!(
                "Could not connect to the workbook.\nCheck your settings.\n\nDetails: {error}"
            );
            exit(1);
        }
    };

    show(kiosk.screen());

    // Lines arrive whole, so there is no need to wait for the scanner to
    // finish typing.
    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(error) => {
                tracing::error!("could not read from stdin: {error}");
                break;
            }
        };

        let screen = match parse_command(&line) {
            Command::Scan(text) => kiosk.on_scan_submitted(text),
            Command::Undo => kiosk.on_undo_requested(),
            Command::Quit => break,
        };

        show(&screen);
    }
}

fn connect(args: &Args) -> Result<Kiosk<SqliteWorkbook>, Error> {
    let layout = load_layout(args.layout.as_deref())?;
    let utc_offset = get_local_offset(&args.timezone)?;

    Kiosk::open(&args.db_path, layout, utc_offset)
}

/// Print the screen and the input prompt to stdout.
fn show(screen: &ScreenUpdate) {
    if let Err(error) = draw(&mut io::stdout().lock(), screen) {
        tracing::debug!("could not draw the screen: {error}");
    }
}

fn draw(out: &mut impl Write, screen: &ScreenUpdate) -> io::Result<()> {
    let undo_hint = if screen.undo_available {
        "[undo available]"
    } else {
        ""
    };

    writeln!(out)?;
    writeln!(out, "{}", screen.status)?;
    if !screen.message.is_empty() {
        writeln!(out, "{}", screen.message)?;
    }
    write!(out, "{undo_hint}> ")?;
    out.flush()
}
