//! Book loan request dispatcher
//!
//! Every invocation decodes one request body, routes on its `operation`
//! field, validates the fields that operation needs and issues exactly one
//! storage call. Failures never escape: they come back as error envelopes.

use serde_json::json;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult, MISSING_FIELD},
    models::{
        book::{Book, BookChanges, BookField, BOOK_ID},
        envelope::{RequestEnvelope, ResponseEnvelope},
        request::{BookRequest, Operation},
    },
    repository::Repository,
};

/// Fields that satisfy the "something to update" gate. `returned_date` is
/// written when present but does not count here.
const UPDATE_GATE: [BookField; 3] = [
    BookField::Title,
    BookField::Borrower,
    BookField::BorrowedDate,
];

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Handle one gateway invocation
    pub async fn handle(&self, envelope: &RequestEnvelope) -> ResponseEnvelope {
        match self.dispatch(envelope).await {
            Ok(response) => response,
            Err(e) => {
                match &e {
                    AppError::Storage(fault) => tracing::error!("Storage error: {}", fault),
                    other => tracing::debug!("Rejected request: {}", other),
                }
                ResponseEnvelope::from_error(&e)
            }
        }
    }

    async fn dispatch(&self, envelope: &RequestEnvelope) -> AppResult<ResponseEnvelope> {
        let body = envelope.decoded_body()?;
        let request = BookRequest::parse(&body)?;
        let operation = request.operation()?;

        tracing::debug!(operation = operation.as_str(), "Dispatching book request");

        match operation {
            Operation::Create => {
                let book_id = self.create_book(&request).await?;
                Ok(ResponseEnvelope::ok(json!({
                    "message": "Book created",
                    "book_id": book_id,
                })))
            }
            Operation::Update => {
                self.update_book(&request).await?;
                Ok(ResponseEnvelope::message("Book updated"))
            }
            Operation::Delete => {
                self.delete_book(&request).await?;
                Ok(ResponseEnvelope::message("Book deleted"))
            }
        }
    }

    /// Create a new loan record and return its generated id
    pub async fn create_book(&self, request: &BookRequest) -> AppResult<String> {
        let (Some(title), Some(borrower), Some(borrowed_date)) = (
            request.required(BookField::Title.as_str()),
            request.required(BookField::Borrower.as_str()),
            request.required(BookField::BorrowedDate.as_str()),
        ) else {
            return Err(AppError::bad_request(MISSING_FIELD));
        };

        let book = Book {
            book_id: Uuid::new_v4().to_string(),
            title,
            borrower,
            borrowed_date,
            returned_date: request
                .present(BookField::ReturnedDate.as_str())
                .unwrap_or_default(),
        };

        self.repository.books.put(&book).await?;
        tracing::info!(book_id = %book.book_id, "Book created");

        Ok(book.book_id)
    }

    /// Patch the allow-listed fields present in the request
    pub async fn update_book(&self, request: &BookRequest) -> AppResult<()> {
        let book_id = request.required(BOOK_ID);
        let gated = UPDATE_GATE.iter().any(|field| request.has(field.as_str()));

        let Some(book_id) = book_id.filter(|_| gated) else {
            return Err(AppError::bad_request(MISSING_FIELD));
        };

        let changes = BookChanges::from_request(request);
        self.repository.books.update(&book_id, &changes).await?;
        tracing::info!(book_id = %book_id, fields = changes.len(), "Book updated");

        Ok(())
    }

    /// Remove a record; unknown ids succeed
    pub async fn delete_book(&self, request: &BookRequest) -> AppResult<()> {
        let book_id = request
            .required(BOOK_ID)
            .ok_or_else(|| AppError::bad_request(MISSING_FIELD))?;

        self.repository.books.delete(&book_id).await?;
        tracing::info!(book_id = %book_id, "Book deleted");

        Ok(())
    }

    /// Read one record
    pub async fn get_book(&self, book_id: &str) -> AppResult<Book> {
        self.repository
            .books
            .get(book_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", book_id)))
    }

    /// Check the store is reachable
    pub async fn ping(&self) -> AppResult<()> {
        Ok(self.repository.books.ping().await?)
    }
}
