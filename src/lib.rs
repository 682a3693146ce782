//! Canteen order export library
//!
//! Joins the `orders` and `users` collections of the canteen database in
//! application code and writes a flat, fixed-column CSV file.
//!
//! # Modules
//!
//! - `cli`: Command-line interface and argument parsing
//! - `config`: Configuration management
//! - `connection`: MongoDB connection management
//! - `error`: Error types and handling
//! - `export`: Order source, user lookup, row flattening and CSV writing
//! - `formatter`: BSON to CSV cell rendering
//!
//! # Example
//!
//! ```no_run
//! use canteen_export::{Config, export};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::default();
//!     config.apply_env();
//!
//!     let summary = export::run(&config).await?;
//!     println!("{} orders exported", summary.orders_exported);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod connection;
pub mod error;
pub mod export;
pub mod formatter;

// Re-export commonly used types
pub use config::Config;
pub use connection::ConnectionManager;
pub use error::{ExportError, Result};
pub use export::{ExportRow, ExportSummary};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
pub fn version() -> &'static str {
    VERSION
}
