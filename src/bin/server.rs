use std::{net::SocketAddr, path::PathBuf, process::exit, time::Duration};

use axum_server::Handle;
use clap::Parser;
use tracing_subscriber::filter::LevelFilter;

use stock_kiosk::{
    AppState, DEFAULT_SCAN_SETTLE_DELAY, Error, Kiosk, build_router, get_local_offset,
    graceful_shutdown, load_layout, setup_logging, store::SqliteWorkbook,
};

/// The kiosk web server: serves the scan screen to a browser running in
/// kiosk mode on the same machine.
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

    /// How long to wait, in milliseconds, before handling a scan.
    #[arg(long, default_value_t = DEFAULT_SCAN_SETTLE_DELAY.as_millis() as u64)]
    scan_delay_ms: u64,

    /// The port to serve the kiosk from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// File path to append debug logs to.
    #[arg(long, default_value = "debug.log")]
    log_path: PathBuf,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(error) = setup_logging(&args.log_path, LevelFilter::INFO) {
        eprintln!("Could not open the log file {:#?}: {error}", args.log_path);
        exit(1);
    }

    let kiosk = match connect(&args) {
        Ok(kiosk) => kiosk,
        Err(error) => {
            tracing::error!("could not start the kiosk: {error}");
            eprintln!(
                "Could not connect to the workbook.\nCheck your settings.\n\nDetails: {error}"
            );
            exit(1);
        }
    };

    let state = AppState::new(kiosk, Duration::from_millis(args.scan_delay_ms));
    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    tracing::info!("Kiosk listening on http://{}", addr);
    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(build_router(state).into_make_service())
        .await
    {
        tracing::error!("the server stopped unexpectedly: {error}");
        exit(1);
    }
}

fn connect(args: &Args) -> Result<Kiosk<SqliteWorkbook>, Error> {
    let layout = load_layout(args.layout.as_deref())?;
    let utc_offset = get_local_offset(&args.timezone)?;

    Kiosk::open(&args.db_path, layout, utc_offset)
}
