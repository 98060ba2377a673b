//! Remote book store contract.
//!
//! The [`BookStore`] trait is what the synchronizer talks to; [`BookStoreClient`]
//! implements it over HTTP.

mod client;

pub use client::BookStoreClient;

use crate::book::{Book, BookDraft, BookUpdate};
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the remote book store.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Remote error (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// The remote service of record for book data.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Fetch the full collection, in the order the store returns it.
    async fn list_books(&self) -> Result<Vec<Book>, RemoteError>;

    /// Create a book. The returned record carries the store-assigned id.
    async fn create_book(&self, draft: &BookDraft) -> Result<Book, RemoteError>;

    /// Update a book. The response body is not used.
    async fn update_book(&self, id: &str, update: &BookUpdate) -> Result<(), RemoteError>;

    /// Delete a book. The response body is not used.
    async fn delete_book(&self, id: &str) -> Result<(), RemoteError>;

    /// Ask the store whether `password` authorizes mutations.
    async fn check_password(&self, password: &str) -> Result<bool, RemoteError>;
}
