mod models;

pub use models::{Book, BookDraft, BookField, BookUpdate, ValidationError, ALL_FIELDS};
