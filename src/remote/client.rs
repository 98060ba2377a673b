//! HTTP client for the remote book store.

use super::{BookStore, RemoteError};
use crate::book::{Book, BookDraft, BookUpdate};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Response;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct BooksResponse {
    books: Vec<Book>,
}

#[derive(Debug, Serialize)]
struct CheckPasswordRequest<'a> {
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct CheckPasswordResponse {
    #[serde(rename = "isValid")]
    is_valid: bool,
}

/// HTTP client for communicating with the book store.
pub struct BookStoreClient {
    client: reqwest::Client,
    base_url: String,
}

impl BookStoreClient {
    /// Create a new book store client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the book store (e.g., "http://localhost:5001")
    /// * `timeout_sec` - Request timeout in seconds
    pub fn new(base_url: impl Into<String>, timeout_sec: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()
            .context("Failed to create HTTP client")?;

        // Paths are joined with a leading slash
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    /// Get the base URL of the book store.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn books_url(&self) -> String {
        format!("{}/books", self.base_url)
    }

    fn book_url(&self, id: &str) -> String {
        format!("{}/books/{}", self.base_url, urlencoding::encode(id))
    }

    fn check_password_url(&self) -> String {
        format!("{}/check-password", self.base_url)
    }
}

fn map_send_error(e: reqwest::Error) -> RemoteError {
    if e.is_timeout() {
        RemoteError::Timeout
    } else {
        RemoteError::Connection(e.to_string())
    }
}

async fn ensure_success(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RemoteError::Status {
        status: status.as_u16(),
        message: body,
    })
}

#[async_trait]
impl BookStore for BookStoreClient {
    async fn list_books(&self) -> Result<Vec<Book>, RemoteError> {
        let response = self
            .client
            .get(self.books_url())
            .send()
            .await
            .map_err(map_send_error)?;
        let response = ensure_success(response).await?;

        let parsed: BooksResponse = response.json().await.map_err(|e| {
            RemoteError::InvalidResponse(format!("Failed to parse books list: {}", e))
        })?;
        debug!(count = parsed.books.len(), "Fetched books");
        Ok(parsed.books)
    }

    async fn create_book(&self, draft: &BookDraft) -> Result<Book, RemoteError> {
        let response = self
            .client
            .post(self.books_url())
            .json(draft)
            .send()
            .await
            .map_err(map_send_error)?;
        let response = ensure_success(response).await?;

        let book: Book = response.json().await.map_err(|e| {
            RemoteError::InvalidResponse(format!("Failed to parse created book: {}", e))
        })?;
        debug!(id = %book.id, "Created book");
        Ok(book)
    }

    async fn update_book(&self, id: &str, update: &BookUpdate) -> Result<(), RemoteError> {
        let response = self
            .client
            .put(self.book_url(id))
            .json(update)
            .send()
            .await
            .map_err(map_send_error)?;
        ensure_success(response).await?;
        debug!(id, "Updated book");
        Ok(())
    }

    async fn delete_book(&self, id: &str) -> Result<(), RemoteError> {
        let response = self
            .client
            .delete(self.book_url(id))
            .send()
            .await
            .map_err(map_send_error)?;
        ensure_success(response).await?;
        debug!(id, "Deleted book");
        Ok(())
    }

    async fn check_password(&self, password: &str) -> Result<bool, RemoteError> {
        let response = self
            .client
            .post(self.check_password_url())
            .json(&CheckPasswordRequest { password })
            .send()
            .await
            .map_err(map_send_error)?;
        let response = ensure_success(response).await?;

        let parsed: CheckPasswordResponse = response.json().await.map_err(|e| {
            RemoteError::InvalidResponse(format!("Failed to parse password check: {}", e))
        })?;
        Ok(parsed.is_valid)
    }
}
