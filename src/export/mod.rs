//! Orders to CSV export
//!
//! One pass over the `orders` collection:
//!
//! 1. **OrderSource** streams order documents from an unfiltered cursor
//! 2. **UserDirectory** resolves each order's `user` reference
//! 3. **ExportRow** flattens the order, its user and its first item into ten
//!    fixed columns, substituting defaults for anything missing
//! 4. **RowWriter** writes the CSV, replacing the previous file on success
//!
//! The **ExportCoordinator** drives the pipeline; [`run`] wires it to a live
//! MongoDB deployment from a [`Config`].

pub mod coordinator;
pub mod lookup;
pub mod model;
pub mod progress;
pub mod row;
pub mod source;
pub mod writers;

#[cfg(test)]
pub(crate) mod testing;

pub use coordinator::{ExportCoordinator, ExportSummary};
pub use lookup::{CachedUserDirectory, CollectionUserDirectory, UserDirectory};
pub use model::{Order, User};
pub use progress::ProgressTracker;
pub use row::{ExportRow, HEADERS, UNKNOWN};
pub use source::{CursorOrderSource, OrderSource};
pub use writers::{CsvWriter, RowWriter};

use mongodb::bson::doc;
use tracing::{debug, warn};

use crate::config::{Config, LookupMode};
use crate::connection::ConnectionManager;
use crate::error::Result;

/// Run a full export against the configured deployment
///
/// Fails before touching the network or the filesystem when the URI is
/// missing or the output directory does not exist.
pub async fn run(config: &Config) -> Result<ExportSummary> {
    let uri = config.require_uri()?.to_string();
    config.validate()?;

    let export = &config.export;
    writers::validate_path(&export.output_path)?;

    let mut manager = ConnectionManager::new(uri, config.connection.clone());
    manager.connect().await?;

    let orders = manager.get_collection(&export.database, &export.orders_collection)?;
    let users = manager.get_collection(&export.database, &export.users_collection)?;

    let total = if export.progress {
        match orders.estimated_document_count().await {
            Ok(n) => Some(n),
            Err(e) => {
                warn!("Could not estimate order count: {}", e);
                None
            }
        }
    } else {
        None
    };

    debug!(
        "Scanning {}.{} with batch size {}",
        export.database, export.orders_collection, export.batch_size
    );
    let cursor = orders.find(doc! {}).batch_size(export.batch_size).await?;

    let directory: Box<dyn UserDirectory> = match export.lookup {
        LookupMode::PerOrder => Box::new(CollectionUserDirectory::new(users)),
        LookupMode::Cached => Box::new(CachedUserDirectory::new(CollectionUserDirectory::new(users))),
    };

    let mut coordinator = ExportCoordinator::new(
        Box::new(CursorOrderSource::new(cursor, export.batch_size)),
        directory,
        ProgressTracker::new(total, export.progress),
        Box::new(CsvWriter::new(&export.output_path).await?),
    )
    .with_output_path(&export.output_path);

    let summary = coordinator.execute().await?;
    drop(coordinator);

    manager.disconnect().await?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, ExportError, OutputError};

    #[tokio::test]
    async fn test_run_without_uri_fails_before_io() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.export.output_path = dir.path().join("extract_data.csv");

        let err = run(&config).await.unwrap_err();
        assert!(matches!(
            err,
            ExportError::Config(ConfigError::MissingField(_))
        ));
        assert!(!config.export.output_path.exists());
    }

    #[tokio::test]
    async fn test_run_with_missing_output_directory() {
        let mut config = Config::default();
        config.connection.uri = Some("mongodb://localhost:27017".to_string());
        config.export.output_path = "/definitely/not/here/extract_data.csv".into();

        let err = run(&config).await.unwrap_err();
        assert!(matches!(
            err,
            ExportError::Output(OutputError::DirectoryMissing(_))
        ));
    }
}
