use crate::book::Book;

/// Change notifications published by the synchronizer.
///
/// Presentation layers subscribe to these to render `busy` and errors while a
/// request is in flight, since the synchronizer itself is borrowed mutably
/// for the whole operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// A remote call started (`true`) or finished (`false`).
    BusyChanged(bool),
    /// The collection was replaced by a fresh list of this many books.
    CollectionReplaced(usize),
    BookAdded(Book),
    BookUpdated(Book),
    /// A book with this id was removed.
    BookRemoved(String),
    /// A remote operation failed with this operator-facing message.
    Failed(String),
}
