//! User resolution for order references
//!
//! Each order's `user` field is resolved with `find_one({_id: ref})`. The
//! memoizing variant answers repeated references from memory and produces
//! exactly the same rows.

use std::collections::HashMap;

use async_trait::async_trait;
use mongodb::Collection;
use mongodb::bson::{Bson, Document, doc};
use tracing::trace;

use crate::error::Result;

use super::model::User;

/// Resolves an order's user reference
#[async_trait]
pub trait UserDirectory: Send {
    /// Find the user whose `_id` equals `reference`
    async fn find_user(&mut self, reference: &Bson) -> Result<Option<User>>;

    /// Number of queries sent to the backing store so far
    fn queries(&self) -> u64;
}

/// Directory backed by the `users` collection, one query per call
pub struct CollectionUserDirectory {
    collection: Collection<Document>,
    queries: u64,
}

impl CollectionUserDirectory {
    pub fn new(collection: Collection<Document>) -> Self {
        Self {
            collection,
            queries: 0,
        }
    }
}

#[async_trait]
impl UserDirectory for CollectionUserDirectory {
    async fn find_user(&mut self, reference: &Bson) -> Result<Option<User>> {
        self.queries += 1;
        let found = self
            .collection
            .find_one(doc! { "_id": reference.clone() })
            .await?;
        trace!("Lookup of user {} found: {}", reference, found.is_some());
        Ok(found.as_ref().map(User::from_document))
    }

    fn queries(&self) -> u64 {
        self.queries
    }
}

/// Memoizing wrapper around another directory
///
/// Misses are cached too, so an order set full of dangling references
/// still costs one query per distinct reference.
pub struct CachedUserDirectory<D> {
    inner: D,
    cache: HashMap<String, Option<User>>,
}

impl<D: UserDirectory> CachedUserDirectory<D> {
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            cache: HashMap::new(),
        }
    }

    /// Canonical extended JSON keeps `1`, `1L` and `"1"` apart
    fn cache_key(reference: &Bson) -> String {
        reference.clone().into_canonical_extjson().to_string()
    }
}

#[async_trait]
impl<D: UserDirectory> UserDirectory for CachedUserDirectory<D> {
    async fn find_user(&mut self, reference: &Bson) -> Result<Option<User>> {
        let key = Self::cache_key(reference);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit.clone());
        }

        let user = self.inner.find_user(reference).await?;
        self.cache.insert(key, user.clone());
        Ok(user)
    }

    fn queries(&self) -> u64 {
        self.inner.queries()
    }
}
