//! Order document sources
//!
//! Orders are pulled in batches so memory stays bounded on large
//! collections. Batches only bound memory; rows still come out in cursor
//! order, one per document.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::Cursor;
use mongodb::bson::Document;
use tracing::{debug, info};

use crate::error::Result;

/// Trait for streaming order documents in batches
#[async_trait]
pub trait OrderSource: Send {
    /// Fetch the next batch of documents, or `None` once exhausted
    async fn next_batch(&mut self) -> Result<Option<Vec<Document>>>;

    /// Close the source and release server resources
    async fn close(&mut self) -> Result<()>;
}

/// Cursor-backed order source over `orders.find({})`
pub struct CursorOrderSource {
    cursor: Option<Cursor<Document>>,
    batch_size: u32,
    total_fetched: u64,
    closed: bool,
}

impl CursorOrderSource {
    /// Create a new cursor source
    ///
    /// # Arguments
    /// * `cursor` - Cursor from an unfiltered, unsorted find
    /// * `batch_size` - Number of documents to hand out per batch
    pub fn new(cursor: Cursor<Document>, batch_size: u32) -> Self {
        Self {
            cursor: Some(cursor),
            batch_size: batch_size.max(1),
            total_fetched: 0,
            closed: false,
        }
    }
}

#[async_trait]
impl OrderSource for CursorOrderSource {
    async fn next_batch(&mut self) -> Result<Option<Vec<Document>>> {
        if self.closed {
            return Ok(None);
        }

        let cursor = match self.cursor.as_mut() {
            Some(c) => c,
            None => return Ok(None),
        };

        let mut batch = Vec::with_capacity(self.batch_size as usize);

        for _ in 0..self.batch_size {
            match cursor.try_next().await {
                Ok(Some(doc)) => batch.push(doc),
                Ok(None) => break,
                Err(e) => {
                    self.cursor = None;
                    self.closed = true;
                    return Err(e.into());
                }
            }
        }

        if batch.is_empty() {
            debug!("Order cursor exhausted after {} documents", self.total_fetched);
            self.cursor = None;
            self.closed = true;
            Ok(None)
        } else {
            self.total_fetched += batch.len() as u64;
            debug!(
                "Fetched batch of {} orders (total: {})",
                batch.len(),
                self.total_fetched
            );
            Ok(Some(batch))
        }
    }

    async fn close(&mut self) -> Result<()> {
        if !self.closed {
            // Dropping the cursor kills it server-side
            self.cursor = None;
            self.closed = true;
            info!("Closed order cursor after {} documents", self.total_fetched);
        }
        Ok(())
    }
}

impl Drop for CursorOrderSource {
    fn drop(&mut self) {
        if !self.closed {
            debug!("CursorOrderSource dropped without explicit close");
            self.cursor = None;
        }
    }
}
