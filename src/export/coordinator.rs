//! Export coordinator
//!
//! Pulls order batches from an [`OrderSource`], resolves each order's user
//! through a [`UserDirectory`], flattens it into an [`ExportRow`] and hands
//! the batch to a [`RowWriter`]. Lookups are sequential and happen in
//! cursor order.

use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::formatter::{BsonConverter, PlainTextConverter};

use super::lookup::UserDirectory;
use super::model::Order;
use super::progress::ProgressTracker;
use super::row::ExportRow;
use super::source::OrderSource;
use super::writers::RowWriter;

/// Result of an export run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Number of order rows written
    pub orders_exported: u64,
    /// Orders whose user could not be resolved
    pub unknown_users: u64,
    /// Orders without a usable first item
    pub orders_without_items: u64,
    /// Orders with at least one malformed field
    pub malformed_orders: u64,
    /// User queries sent to the database
    pub user_queries: u64,
    /// Size of the written file in bytes
    pub file_size_bytes: u64,
    /// Time taken for the export
    pub elapsed_ms: u64,
    /// Where the file was written
    pub output_path: PathBuf,
}

/// Coordinator for one export run
pub struct ExportCoordinator {
    source: Box<dyn OrderSource>,
    users: Box<dyn UserDirectory>,
    tracker: ProgressTracker,
    writer: Box<dyn RowWriter>,
    converter: PlainTextConverter,
    output_path: PathBuf,
}

impl ExportCoordinator {
    /// Create a new export coordinator
    pub fn new(
        source: Box<dyn OrderSource>,
        users: Box<dyn UserDirectory>,
        tracker: ProgressTracker,
        writer: Box<dyn RowWriter>,
    ) -> Self {
        Self {
            source,
            users,
            tracker,
            writer,
            converter: PlainTextConverter::new(),
            output_path: PathBuf::new(),
        }
    }

    /// Record the output path in the summary
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Execute the export
    ///
    /// Any error aborts the run. The writer is dropped unfinished in that
    /// case, so the previous output stays in place.
    pub async fn execute(&mut self) -> Result<ExportSummary> {
        let start_time = Instant::now();
        let mut summary = ExportSummary {
            output_path: self.output_path.clone(),
            ..Default::default()
        };

        info!("Starting export");
        let mut batch_count = 0u32;

        while let Some(docs) = self.source.next_batch().await? {
            debug!("Received batch of {} orders", docs.len());

            let mut rows = Vec::with_capacity(docs.len());
            for doc in &docs {
                let order = Order::from_document(doc);
                rows.push(self.export_order(&order, &mut summary).await?);
            }

            self.writer.write_rows(&rows).await?;
            summary.orders_exported += rows.len() as u64;
            self.tracker.update(summary.orders_exported);

            batch_count += 1;
            if batch_count % 10 == 0 {
                info!(
                    "Progress: {} orders exported ({} batches)",
                    summary.orders_exported, batch_count
                );
            }
        }

        self.writer.finalize().await?;
        self.source.close().await?;
        self.tracker.finish();

        summary.user_queries = self.users.queries();
        // The file is already in place, so a failed stat only loses the size
        summary.file_size_bytes = match self.writer.file_size().await {
            Ok(size) => size,
            Err(e) => {
                warn!("Could not read size of {}: {}", summary.output_path.display(), e);
                0
            }
        };
        summary.elapsed_ms = start_time.elapsed().as_millis() as u64;

        info!(
            "Export completed: {} orders, {} unknown users, {} without items, {} bytes, {} ms",
            summary.orders_exported,
            summary.unknown_users,
            summary.orders_without_items,
            summary.file_size_bytes,
            summary.elapsed_ms
        );

        Ok(summary)
    }

    async fn export_order(&mut self, order: &Order, summary: &mut ExportSummary) -> Result<ExportRow> {
        if !order.issues.is_empty() {
            summary.malformed_orders += 1;
            let id = self.converter.convert_optional(order.id.as_ref());
            for issue in &order.issues {
                warn!("Order {}: {}, using defaults", id, issue);
            }
        }

        let user = match order.user.as_ref() {
            Some(reference) => self.users.find_user(reference).await?,
            None => None,
        };

        if user.is_none() {
            summary.unknown_users += 1;
        }
        if order.has_no_items() {
            summary.orders_without_items += 1;
        }

        Ok(ExportRow::build(order, user.as_ref(), &self.converter))
    }
}
