//! Booklist Library
//!
//! Keeps a local view of a remote book collection in step with the store,
//! applying every create/update/delete only after the store confirmed it and
//! gating mutations behind a password check.

pub mod auth;
pub mod book;
pub mod config;
pub mod remote;
pub mod sync;

// Re-export commonly used types for convenience
pub use auth::{Authorizer, PasswordAuthorizer, PasswordPrompt, TerminalPasswordPrompt};
pub use book::{Book, BookDraft, BookField, BookUpdate, ValidationError};
pub use remote::{BookStore, BookStoreClient, RemoteError};
pub use sync::{ListSynchronizer, SyncError, SyncEvent, SyncOptions, SyncState};
