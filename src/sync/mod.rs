//! Local view of the remote book collection.
//!
//! The [`ListSynchronizer`] owns the collection, the draft buffers and the
//! status flags, and only applies a mutation locally after the remote store
//! confirmed it.

mod events;
mod synchronizer;

pub use events::SyncEvent;
pub use synchronizer::{
    ListSynchronizer, SyncError, SyncOptions, SyncState, CREATE_FAILED_MESSAGE,
    DELETE_FAILED_MESSAGE, FETCH_FAILED_MESSAGE, UPDATE_FAILED_MESSAGE,
};
