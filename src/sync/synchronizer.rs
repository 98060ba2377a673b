use super::SyncEvent;
use crate::auth::Authorizer;
use crate::book::{Book, BookDraft, BookField, BookUpdate, ValidationError};
use crate::remote::{BookStore, RemoteError};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

pub const FETCH_FAILED_MESSAGE: &str = "Unable to fetch books.";
pub const CREATE_FAILED_MESSAGE: &str = "Unable to create book.";
pub const UPDATE_FAILED_MESSAGE: &str = "Unable to update book.";
pub const DELETE_FAILED_MESSAGE: &str = "Unable to delete book.";

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Errors returned by synchronizer operations.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Not authorized")]
    Unauthorized,

    #[error("No book is being edited")]
    NoEditInProgress,

    #[error("{message}")]
    Remote {
        message: &'static str,
        #[source]
        source: RemoteError,
    },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Also send the image field on update. Off by default: the store's
    /// update endpoint takes title and author only, so the local image can
    /// drift from the remote one after an edit.
    pub send_image_on_update: bool,
}

/// Everything the presentation layer renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncState {
    /// Last known remote collection, in display order.
    pub collection: Vec<Book>,
    /// Input for the next create.
    pub draft_new: BookDraft,
    /// The single record in edit mode, if any.
    pub draft_edit: Option<Book>,
    pub busy: bool,
    pub last_error: Option<String>,
}

/// Keeps a local collection in step with a [`BookStore`].
///
/// Every mutation runs validation, then authorization, then the remote call,
/// and only touches local state once the remote call succeeded.
pub struct ListSynchronizer {
    store: Arc<dyn BookStore>,
    authorizer: Arc<dyn Authorizer>,
    options: SyncOptions,
    state: SyncState,
    event_tx: broadcast::Sender<SyncEvent>,
}

impl ListSynchronizer {
    pub fn new(
        store: Arc<dyn BookStore>,
        authorizer: Arc<dyn Authorizer>,
        options: SyncOptions,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            store,
            authorizer,
            options,
            state: SyncState::default(),
            event_tx,
        }
    }

    /// Subscribe to state change events.
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.event_tx.subscribe()
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    pub fn collection(&self) -> &[Book] {
        &self.state.collection
    }

    pub fn draft_new(&self) -> &BookDraft {
        &self.state.draft_new
    }

    pub fn draft_edit(&self) -> Option<&Book> {
        self.state.draft_edit.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.state.busy
    }

    pub fn last_error(&self) -> Option<&str> {
        self.state.last_error.as_deref()
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Replace the collection with the store's current list.
    pub async fn load(&mut self) -> Result<(), SyncError> {
        self.set_busy(true);
        let result = self.store.list_books().await;
        let outcome = match result {
            Ok(books) => {
                info!("Loaded {} books", books.len());
                let count = books.len();
                self.state.collection = books;
                self.state.last_error = None;
                self.emit(SyncEvent::CollectionReplaced(count));
                Ok(())
            }
            Err(e) => Err(self.fail(FETCH_FAILED_MESSAGE, e)),
        };
        self.set_busy(false);
        outcome
    }

    /// Create a book from the new-record draft.
    ///
    /// On success the store's record (with its id) is appended and the draft
    /// is reset.
    pub async fn create(&mut self) -> Result<Book, SyncError> {
        self.state.draft_new.validate()?;
        self.ensure_authorized().await?;

        let draft = self.state.draft_new.clone();
        self.set_busy(true);
        let result = self.store.create_book(&draft).await;
        let outcome = match result {
            Ok(book) if book.id.is_empty() => Err(self.fail(
                CREATE_FAILED_MESSAGE,
                RemoteError::InvalidResponse("Created book has no id".to_string()),
            )),
            Ok(book) => {
                info!("Created book {} ({})", book.id, book.title);
                self.state.collection.push(book.clone());
                self.state.draft_new = BookDraft::default();
                self.emit(SyncEvent::BookAdded(book.clone()));
                Ok(book)
            }
            Err(e) => Err(self.fail(CREATE_FAILED_MESSAGE, e)),
        };
        self.set_busy(false);
        outcome
    }

    /// Replace the new-record draft with `draft` and create it.
    pub async fn create_with(&mut self, draft: BookDraft) -> Result<Book, SyncError> {
        self.state.draft_new = draft;
        self.create().await
    }

    /// Put `book` in edit mode.
    ///
    /// Only one record can be edited at a time. A previous edit draft is
    /// replaced; if it held changes not present in the collection it is
    /// returned so the caller can tell the operator.
    pub fn begin_edit(&mut self, book: &Book) -> Option<Book> {
        let previous = self.state.draft_edit.replace(book.clone());
        let discarded = previous.filter(|prev| self.has_unsaved_changes(prev));
        if let Some(prev) = &discarded {
            warn!("Discarding unsaved edit of book {}", prev.id);
        }
        discarded
    }

    /// Leave edit mode without saving. Returns the dropped draft.
    pub fn cancel_edit(&mut self) -> Option<Book> {
        self.state.draft_edit.take()
    }

    /// Send the edit draft to the store and apply it locally.
    ///
    /// On failure the draft stays in place so the operator can retry.
    pub async fn commit_edit(&mut self) -> Result<Book, SyncError> {
        let draft = self
            .state
            .draft_edit
            .clone()
            .ok_or(SyncError::NoEditInProgress)?;
        draft.validate()?;
        self.ensure_authorized().await?;

        let update = BookUpdate::from_book(&draft, self.options.send_image_on_update);
        self.set_busy(true);
        let result = self.store.update_book(&draft.id, &update).await;
        let outcome = match result {
            Ok(()) => {
                match self.state.collection.iter_mut().find(|b| b.id == draft.id) {
                    Some(slot) => *slot = draft.clone(),
                    None => warn!("Updated book {} is not in the local collection", draft.id),
                }
                info!("Updated book {}", draft.id);
                self.state.draft_edit = None;
                self.emit(SyncEvent::BookUpdated(draft.clone()));
                Ok(draft)
            }
            Err(e) => Err(self.fail(UPDATE_FAILED_MESSAGE, e)),
        };
        self.set_busy(false);
        outcome
    }

    /// Delete the book with `id` from the store, then from the collection.
    ///
    /// Every local record carrying `id` is dropped. Returns the dropped
    /// records in collection order.
    pub async fn remove(&mut self, id: &str) -> Result<Vec<Book>, SyncError> {
        self.ensure_authorized().await?;

        self.set_busy(true);
        let result = self.store.delete_book(id).await;
        let outcome = match result {
            Ok(()) => {
                let (removed, kept): (Vec<Book>, Vec<Book>) =
                    std::mem::take(&mut self.state.collection)
                        .into_iter()
                        .partition(|b| b.id == id);
                self.state.collection = kept;
                if removed.len() > 1 {
                    warn!("Removed {} local records sharing id {}", removed.len(), id);
                }
                if self.state.draft_edit.as_ref().is_some_and(|d| d.id == id) {
                    debug!("Dropping edit draft of deleted book {}", id);
                    self.state.draft_edit = None;
                }
                info!("Deleted book {}", id);
                self.emit(SyncEvent::BookRemoved(id.to_string()));
                Ok(removed)
            }
            Err(e) => Err(self.fail(DELETE_FAILED_MESSAGE, e)),
        };
        self.set_busy(false);
        outcome
    }

    /// Write `value` into the edit draft if one is open, else into the
    /// new-record draft.
    pub fn set_field(&mut self, field: BookField, value: impl Into<String>) {
        let value = value.into();
        match self.state.draft_edit.as_mut() {
            Some(draft) => draft.set(field, value),
            None => self.state.draft_new.set(field, value),
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn ensure_authorized(&self) -> Result<(), SyncError> {
        if self.authorizer.authorize().await {
            Ok(())
        } else {
            debug!("Authorization denied, operation aborted");
            Err(SyncError::Unauthorized)
        }
    }

    fn has_unsaved_changes(&self, draft: &Book) -> bool {
        self.state
            .collection
            .iter()
            .find(|b| b.id == draft.id)
            .map_or(true, |current| current != draft)
    }

    fn set_busy(&mut self, busy: bool) {
        self.state.busy = busy;
        self.emit(SyncEvent::BusyChanged(busy));
    }

    fn fail(&mut self, message: &'static str, source: RemoteError) -> SyncError {
        error!("{} {}", message, source);
        self.state.last_error = Some(message.to_string());
        self.emit(SyncEvent::Failed(message.to_string()));
        SyncError::Remote { message, source }
    }

    fn emit(&self, event: SyncEvent) {
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }
}
