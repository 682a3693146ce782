//! Error handling for the export run.
//!
//! This module provides:
//! - A single crate-wide error type wrapping configuration, connection,
//!   output and driver failures
//! - Structured error information extraction from MongoDB driver errors
//!
//! Field-level problems in source documents are never errors; they are
//! defaulted in `export::row` and logged.
//!
//! # Example
//!
//! ```rust,no_run
//! use canteen_export::error::{ConfigError, ExportError, Result};
//!
//! fn require_uri(value: Option<String>) -> Result<String> {
//!     value.ok_or_else(|| ConfigError::MissingField("MONGO_URI".to_string()).into())
//! }
//! ```

pub mod kinds;
pub mod mongo;

pub use kinds::{ConfigError, ConnectionError, ExportError, OutputError, Result};
pub use mongo::{ErrorInfo, extract_error_info};
