//! canteen-export
//!
//! Writes every canteen order, joined with its user, as one row of a flat
//! CSV file that the reporting dashboard reads.
//!
//! # Usage
//!
//! ```bash
//! MONGO_URI=mongodb://localhost:27017 canteen-export
//! canteen-export --output reports/orders.csv --cache-users --progress
//! ```

use tracing::{Level, debug};

use canteen_export::cli::CliInterface;
use canteen_export::error::Result;
use canteen_export::export;

/// Printed on stdout once the file is in place
const COMPLETION_MESSAGE: &str = "CSV file updated successfully with new entries.";

/// Application entry point
#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// 1. Load `.env` into the process environment
/// 2. Parse arguments and build the configuration
/// 3. Initialize logging
/// 4. Run the export
async fn run() -> Result<()> {
    let dotenv = dotenvy::dotenv();

    let cli = CliInterface::new()?;
    initialize_logging(&cli);

    match dotenv {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) => debug!("No .env loaded: {}", e),
    }
    if let Some(path) = cli.config_path() {
        debug!("Using config file {}", path.display());
    }

    let summary = export::run(cli.config()).await?;
    debug!("{:?}", summary);

    if !cli.args().quiet {
        println!("{}", COMPLETION_MESSAGE);
    }
    Ok(())
}

/// Initialize logging system based on verbosity level
///
/// Logs go to stderr; stdout carries only the completion message.
fn initialize_logging(cli: &CliInterface) {
    let level: Level = cli.config().logging.level.to_tracing_level();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr);

    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
