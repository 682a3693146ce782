//! Command-line interface for canteen-export
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading (file, environment, arguments)
//! - Log level selection

use clap::Parser;
use std::path::{Path, PathBuf};

use crate::config::{Config, LogLevel, LookupMode};
use crate::error::Result;

/// Export canteen orders joined with their users to CSV
#[derive(Parser, Debug)]
#[command(
    name = "canteen-export",
    version,
    about = "Export canteen orders joined with their users to CSV",
    long_about = "Reads every order from MongoDB, resolves its user, flattens the first \
item and writes one CSV row per order.

The connection string is read from the MONGO_URI environment variable \
(a .env file in the working directory is loaded first)."
)]
pub struct CliArgs {
    /// Output CSV file
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Database holding the orders and users collections
    #[arg(long, value_name = "NAME")]
    pub database: Option<String>,

    /// Orders collection name
    #[arg(long, value_name = "NAME")]
    pub orders_collection: Option<String>,

    /// Users collection name
    #[arg(long, value_name = "NAME")]
    pub users_collection: Option<String>,

    /// Number of orders fetched per cursor batch
    #[arg(long, value_name = "N")]
    pub batch_size: Option<u32>,

    /// Remember resolved users instead of querying once per order
    #[arg(long)]
    pub cache_users: bool,

    /// Show a progress bar on stderr
    #[arg(long)]
    pub progress: bool,

    /// Connection timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Quiet mode (errors only, no completion message)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv")]
    pub very_verbose: bool,
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Effective configuration
    config: Config,
}

impl CliInterface {
    /// Parse process arguments and build the effective configuration
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Build the effective configuration from already-parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let mut config = Config::load_from_file(args.config_file.as_deref())?;
        config.apply_env();
        Self::apply_args_to_config(&mut config, &args);

        Ok(Self { args, config })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the CLI arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Get the config file path in effect
    pub fn config_path(&self) -> Option<&Path> {
        self.args.config_file.as_deref()
    }

    /// Apply CLI arguments to configuration
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) {
        Self::apply_export_args(config, args);
        Self::apply_logging_args(config, args);
        Self::apply_connection_args(config, args);
    }

    /// Apply export-related CLI arguments to configuration
    fn apply_export_args(config: &mut Config, args: &CliArgs) {
        let export = &mut config.export;

        if let Some(output) = &args.output {
            export.output_path = output.clone();
        }
        if let Some(database) = &args.database {
            export.database = database.clone();
        }
        if let Some(orders) = &args.orders_collection {
            export.orders_collection = orders.clone();
        }
        if let Some(users) = &args.users_collection {
            export.users_collection = users.clone();
        }
        if let Some(batch_size) = args.batch_size {
            export.batch_size = batch_size;
        }
        if args.cache_users {
            export.lookup = LookupMode::Cached;
        }
        if args.progress {
            export.progress = true;
        }
    }

    /// Apply logging-related CLI arguments to configuration
    fn apply_logging_args(config: &mut Config, args: &CliArgs) {
        config.logging.level = if args.very_verbose {
            LogLevel::Trace
        } else if args.verbose {
            LogLevel::Debug
        } else if args.quiet {
            LogLevel::Error
        } else {
            config.logging.level
        };
    }

    /// Apply connection-related CLI arguments to configuration
    fn apply_connection_args(config: &mut Config, args: &CliArgs) {
        if let Some(timeout) = args.timeout {
            config.connection.timeout = timeout;
        }
    }
}
