//! Repository layer for book record storage

pub mod memory;
pub mod redis;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::StorageResult,
    models::book::{Book, BookChanges},
};

/// Key-value table of book records, keyed by `book_id`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Unconditional upsert of a full record
    async fn put(&self, book: &Book) -> StorageResult<()>;

    /// Patch the named attributes; creates the record when absent. An empty
    /// patch writes nothing.
    async fn update(&self, book_id: &str, changes: &BookChanges) -> StorageResult<()>;

    /// Remove a record; no-op when absent
    async fn delete(&self, book_id: &str) -> StorageResult<()>;

    async fn get(&self, book_id: &str) -> StorageResult<Option<Book>>;

    /// Connectivity probe
    async fn ping(&self) -> StorageResult<()>;
}

/// Main repository struct holding the store handle
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<dyn BookStore>,
}

impl Repository {
    /// Create a new repository around an already connected store
    pub fn new(books: Arc<dyn BookStore>) -> Self {
        Self { books }
    }

    /// Repository backed by a fresh in-memory store
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(memory::MemoryBookStore::new()))
    }
}
