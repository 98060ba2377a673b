//! Password-gated authorization for mutating operations.
//!
//! The synchronizer only sees an [`Authorizer`]: something it awaits for a
//! yes/no before each mutation. [`PasswordAuthorizer`] is the production
//! implementation, asking the operator for a password and validating it
//! against the remote store.

mod terminal;

pub use terminal::TerminalPasswordPrompt;

use crate::remote::BookStore;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Message shown to the operator when the password check itself fails.
pub const CHECK_FAILED_MESSAGE: &str = "Error checking password.";

/// Gate awaited before any mutating operation.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait Authorizer: Send + Sync {
    /// Returns true when the operation may proceed.
    async fn authorize(&self) -> bool;
}

/// Source of passwords, typically a human at a terminal.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait PasswordPrompt: Send + Sync {
    /// Ask for a password. `None` means the operator declined.
    async fn request_password(&self) -> Option<String>;

    /// Tell the operator that authorization could not be checked.
    fn report_error(&self, message: &str);
}

/// Authorizes by prompting for a password and asking the store to verify it.
///
/// Any failure along the way (declined prompt, rejected password, transport
/// error) results in `false`. Transport errors are also reported through the
/// prompt.
pub struct PasswordAuthorizer {
    prompt: Arc<dyn PasswordPrompt>,
    store: Arc<dyn BookStore>,
}

impl PasswordAuthorizer {
    pub fn new(prompt: Arc<dyn PasswordPrompt>, store: Arc<dyn BookStore>) -> Self {
        Self { prompt, store }
    }
}

#[async_trait]
impl Authorizer for PasswordAuthorizer {
    async fn authorize(&self) -> bool {
        let password = match self.prompt.request_password().await {
            Some(password) if !password.is_empty() => password,
            _ => {
                debug!("Password prompt declined");
                return false;
            }
        };

        match self.store.check_password(&password).await {
            Ok(true) => true,
            Ok(false) => {
                info!("Password rejected by the book store");
                false
            }
            Err(e) => {
                error!("Error checking password: {}", e);
                self.prompt.report_error(CHECK_FAILED_MESSAGE);
                false
            }
        }
    }
}
