//! In-process book store

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::BookStore;
use crate::{
    error::StorageResult,
    models::book::{Book, BookChanges},
};

#[derive(Default)]
pub struct MemoryBookStore {
    books: RwLock<HashMap<String, Book>>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.books.read().await.len()
    }

    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.books.read().await.is_empty()
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn put(&self, book: &Book) -> StorageResult<()> {
        self.books
            .write()
            .await
            .insert(book.book_id.clone(), book.clone());
        Ok(())
    }

    async fn update(&self, book_id: &str, changes: &BookChanges) -> StorageResult<()> {
        // Same as Redis: an empty patch writes nothing
        if changes.is_empty() {
            return Ok(());
        }

        let mut books = self.books.write().await;
        let book = books.entry(book_id.to_string()).or_insert_with(|| Book {
            book_id: book_id.to_string(),
            ..Default::default()
        });
        book.apply(changes);
        Ok(())
    }

    async fn delete(&self, book_id: &str) -> StorageResult<()> {
        self.books.write().await.remove(book_id);
        Ok(())
    }

    async fn get(&self, book_id: &str) -> StorageResult<Option<Book>> {
        Ok(self.books.read().await.get(book_id).cloned())
    }

    async fn ping(&self) -> StorageResult<()> {
        Ok(())
    }
}
