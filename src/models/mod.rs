//! Data models for the book loans server

pub mod book;
pub mod envelope;
pub mod request;

// Re-export commonly used types
pub use book::{Book, BookChanges, BookField};
pub use envelope::{RequestEnvelope, ResponseEnvelope};
pub use request::{BookRequest, Operation};
