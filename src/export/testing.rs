//! In-memory order sources and user directories for tests

use async_trait::async_trait;
use mongodb::bson::{Bson, Document};

use crate::error::Result;

use super::lookup::UserDirectory;
use super::model::User;
use super::source::OrderSource;

/// Order source over documents already in memory
pub(crate) struct VecOrderSource {
    docs: std::vec::IntoIter<Document>,
    batch_size: usize,
}

impl VecOrderSource {
    pub(crate) fn new(docs: Vec<Document>, batch_size: usize) -> Self {
        Self {
            docs: docs.into_iter(),
            batch_size: batch_size.max(1),
        }
    }
}

#[async_trait]
impl OrderSource for VecOrderSource {
    async fn next_batch(&mut self) -> Result<Option<Vec<Document>>> {
        let batch: Vec<Document> = self.docs.by_ref().take(self.batch_size).collect();
        if batch.is_empty() {
            Ok(None)
        } else {
            Ok(Some(batch))
        }
    }

    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Directory over user documents held in memory
pub(crate) struct MemoryUserDirectory {
    users: Vec<User>,
    queries: u64,
}

impl MemoryUserDirectory {
    pub(crate) fn new(docs: &[Document]) -> Self {
        Self {
            users: docs.iter().map(User::from_document).collect(),
            queries: 0,
        }
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_user(&mut self, reference: &Bson) -> Result<Option<User>> {
        self.queries += 1;
        Ok(self
            .users
            .iter()
            .find(|user| user.id.as_ref() == Some(reference))
            .cloned())
    }

    fn queries(&self) -> u64 {
        self.queries
    }
}
