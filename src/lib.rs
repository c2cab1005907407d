//! Book Loans Server
//!
//! Keeps book loan records in a key-value table and exposes one request
//! dispatcher that creates, updates or deletes them, answering with a JSON
//! status envelope.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
