//! Redis-backed book store: one hash per record at `<table>:<book_id>`

use std::collections::HashMap;

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client};

use super::BookStore;
use crate::{
    error::StorageResult,
    models::book::{Book, BookChanges},
};

#[derive(Clone)]
pub struct RedisBookStore {
    connection: ConnectionManager,
    table: String,
}

impl RedisBookStore {
    /// Connect and verify the server answers
    pub async fn connect(url: &str, table: &str) -> StorageResult<Self> {
        let client = Client::open(url)?;
        let connection = ConnectionManager::new(client).await?;

        let store = Self {
            connection,
            table: table.to_string(),
        };
        store.ping().await?;

        Ok(store)
    }

    fn key(&self, book_id: &str) -> String {
        format!("{}:{}", self.table, book_id)
    }
}

#[async_trait]
impl BookStore for RedisBookStore {
    async fn put(&self, book: &Book) -> StorageResult<()> {
        let key = self.key(&book.book_id);
        let attributes = book.attributes();
        let mut conn = self.connection.clone();

        // Replace, not merge: drop stale attributes in the same transaction
        redis::pipe()
            .atomic()
            .del(&key)
            .ignore()
            .hset_multiple(&key, &attributes[..])
            .ignore()
            .query_async::<_, ()>(&mut conn)
            .await?;

        Ok(())
    }

    async fn update(&self, book_id: &str, changes: &BookChanges) -> StorageResult<()> {
        // HSET needs at least one pair
        if changes.is_empty() {
            return Ok(());
        }

        let attributes = changes.attributes();
        let mut conn = self.connection.clone();
        conn.hset_multiple::<_, _, _, ()>(self.key(book_id), &attributes[..])
            .await?;

        Ok(())
    }

    async fn delete(&self, book_id: &str) -> StorageResult<()> {
        let mut conn = self.connection.clone();
        conn.del::<_, ()>(self.key(book_id)).await?;
        Ok(())
    }

    async fn get(&self, book_id: &str) -> StorageResult<Option<Book>> {
        let mut conn = self.connection.clone();
        let attributes: HashMap<String, String> = conn.hgetall(self.key(book_id)).await?;

        if attributes.is_empty() {
            return Ok(None);
        }

        Ok(Some(Book::from_attributes(book_id, attributes)))
    }

    async fn ping(&self) -> StorageResult<()> {
        let mut conn = self.connection.clone();
        redis::cmd("PING").query_async::<_, String>(&mut conn).await?;
        Ok(())
    }
}
