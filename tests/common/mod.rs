//! Common test infrastructure
//!
//! This module provides the infrastructure needed for end-to-end tests: an
//! in-process book store speaking the HTTP contract, and a scripted password
//! prompt. Tests should only import from this module, not from internal
//! submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{TestServer, ScriptedPrompt, TEST_PASSWORD};
//!
//! #[tokio::test]
//! async fn test_list_books() {
//!     let server = TestServer::spawn().await;
//!     let client = server.client();
//!
//!     let books = client.list_books().await.unwrap();
//!     assert_eq!(books.len(), 3);
//! }
//! ```

#![allow(dead_code)]

mod constants;
mod fixtures;
mod prompt;
mod server;

// Public API - this is what tests import
pub use constants::*;
pub use fixtures::seed_books;
pub use prompt::ScriptedPrompt;
pub use server::{FakeStore, TestServer};
