use std::{fmt, io};

use crate::error::mongo::format_mongodb_error;

/// Crate-wide `Result` type using [`ExportError`] as the error.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Top-level error type for an export run.
///
/// Every variant is fatal: the run stops and the process exits non-zero.
#[derive(Debug)]
pub enum ExportError {
    /// Configuration errors (missing URI, bad config file).
    Config(ConfigError),

    /// Connection-related errors.
    Connection(ConnectionError),

    /// Errors writing the CSV output.
    Output(OutputError),

    /// I/O errors.
    Io(io::Error),

    /// MongoDB driver errors.
    MongoDb(mongodb::error::Error),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Missing required field.
    MissingField(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/// Connection-specific errors.
#[derive(Debug)]
pub enum ConnectionError {
    /// Invalid connection URI.
    InvalidUri(String),

    /// Failed to establish a connection.
    ConnectionFailed(String),

    /// Ping command failed.
    PingFailed(String),

    /// Not currently connected to MongoDB.
    NotConnected,
}

/// Output file errors.
#[derive(Debug)]
pub enum OutputError {
    /// Parent directory of the output file does not exist.
    DirectoryMissing(String),

    /// Could not create the output file.
    CreateFailed { path: String, source: io::Error },

    /// Could not write to the output file.
    WriteFailed(io::Error),

    /// Could not flush or move the finished file into place.
    FinalizeFailed { path: String, source: io::Error },
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Config(e) => write!(f, "Configuration error: {e}"),
            ExportError::Connection(e) => write!(f, "Connection error: {e}"),
            ExportError::Output(e) => write!(f, "Output error: {e}"),
            ExportError::Io(e) => write!(f, "I/O error: {e}"),
            ExportError::MongoDb(e) => format_mongodb_error(f, e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::MissingField(field) => write!(f, "Missing required field: {field}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionError::InvalidUri(msg) => write!(f, "Invalid connection URI: {msg}"),
            ConnectionError::ConnectionFailed(msg) => write!(f, "Failed to connect: {msg}"),
            ConnectionError::PingFailed(msg) => write!(f, "Ping failed: {msg}"),
            ConnectionError::NotConnected => write!(f, "Not connected to MongoDB"),
        }
    }
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputError::DirectoryMissing(dir) => write!(f, "Directory does not exist: {dir}"),
            OutputError::CreateFailed { path, source } => {
                write!(f, "Failed to create file {path}: {source}")
            }
            OutputError::WriteFailed(e) => write!(f, "Failed to write row: {e}"),
            OutputError::FinalizeFailed { path, source } => {
                write!(f, "Failed to finalize {path}: {source}")
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(e) => Some(e),
            ExportError::MongoDb(e) => Some(e),
            ExportError::Output(e) => std::error::Error::source(e),
            ExportError::Config(_) | ExportError::Connection(_) => None,
        }
    }
}
impl std::error::Error for ConfigError {}
impl std::error::Error for ConnectionError {}
impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutputError::CreateFailed { source, .. } | OutputError::FinalizeFailed { source, .. } => {
                Some(source)
            }
            OutputError::WriteFailed(e) => Some(e),
            OutputError::DirectoryMissing(_) => None,
        }
    }
}

/* ========================= Conversions to ExportError ========================= */

impl From<io::Error> for ExportError {
    fn from(err: io::Error) -> Self {
        ExportError::Io(err)
    }
}

impl From<mongodb::error::Error> for ExportError {
    fn from(err: mongodb::error::Error) -> Self {
        ExportError::MongoDb(err)
    }
}

impl From<ConfigError> for ExportError {
    fn from(err: ConfigError) -> Self {
        ExportError::Config(err)
    }
}

impl From<ConnectionError> for ExportError {
    fn from(err: ConnectionError) -> Self {
        ExportError::Connection(err)
    }
}

impl From<OutputError> for ExportError {
    fn from(err: OutputError) -> Self {
        ExportError::Output(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_uri_message() {
        let err: ExportError = ConfigError::MissingField("MONGO_URI".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing required field: MONGO_URI"
        );
    }

    #[test]
    fn test_output_error_keeps_source() {
        let err: ExportError = OutputError::WriteFailed(io::Error::other("disk full")).into();
        let source = std::error::Error::source(&err).expect("io source");
        assert_eq!(source.to_string(), "disk full");
    }

    #[test]
    fn test_invalid_value_message() {
        let err = ConfigError::InvalidValue {
            field: "export.batch_size".to_string(),
            value: "0".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value '0' for field 'export.batch_size'"
        );
    }
}
