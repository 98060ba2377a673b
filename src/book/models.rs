//! Book records as exchanged with the remote book store.
//!
//! The JSON shape matches the remote service: the identifier travels as `_id`
//! and the cover reference as `image_url`.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// Records
// =============================================================================

/// A book known to the remote store, identified by the id it assigned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub author: String,
    pub image_url: String,
}

impl Book {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.title, &self.author, &self.image_url)
    }

    pub fn set(&mut self, field: BookField, value: String) {
        match field {
            BookField::Title => self.title = value,
            BookField::Author => self.author = value,
            BookField::ImageUrl => self.image_url = value,
        }
    }

    pub fn get(&self, field: BookField) -> &str {
        match field {
            BookField::Title => &self.title,
            BookField::Author => &self.author,
            BookField::ImageUrl => &self.image_url,
        }
    }
}

/// A book that does not exist remotely yet, so it has no id.
///
/// This is the body of a create request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub image_url: String,
}

impl BookDraft {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            image_url: image_url.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.title, &self.author, &self.image_url)
    }

    pub fn set(&mut self, field: BookField, value: String) {
        match field {
            BookField::Title => self.title = value,
            BookField::Author => self.author = value,
            BookField::ImageUrl => self.image_url = value,
        }
    }

    pub fn get(&self, field: BookField) -> &str {
        match field {
            BookField::Title => &self.title,
            BookField::Author => &self.author,
            BookField::ImageUrl => &self.image_url,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.author.is_empty() && self.image_url.is_empty()
    }
}

/// Body of an update request.
///
/// The image is only sent when the caller opts in, the remote endpoint
/// historically accepts title and author only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BookUpdate {
    pub title: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl BookUpdate {
    pub fn from_book(book: &Book, include_image: bool) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            image_url: include_image.then(|| book.image_url.clone()),
        }
    }
}

// =============================================================================
// Fields
// =============================================================================

/// Editable content field of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookField {
    Title,
    Author,
    ImageUrl,
}

pub const ALL_FIELDS: &[BookField] = &[BookField::Title, BookField::Author, BookField::ImageUrl];

impl BookField {
    /// Wire name of the field, as used in JSON bodies.
    pub fn as_str(self) -> &'static str {
        match self {
            BookField::Title => "title",
            BookField::Author => "author",
            BookField::ImageUrl => "image_url",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "title" => Some(BookField::Title),
            "author" => Some(BookField::Author),
            "image_url" | "image-url" | "image" => Some(BookField::ImageUrl),
            _ => None,
        }
    }
}

impl fmt::Display for BookField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Validation
// =============================================================================

/// One or more required fields were left empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Please fill in all fields (missing: {})", format_fields(.missing))]
pub struct ValidationError {
    pub missing: Vec<BookField>,
}

fn format_fields(fields: &[BookField]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn validate_fields(title: &str, author: &str, image_url: &str) -> Result<(), ValidationError> {
    let missing: Vec<BookField> = [
        (BookField::Title, title),
        (BookField::Author, author),
        (BookField::ImageUrl, image_url),
    ]
    .into_iter()
    .filter(|(_, value)| value.is_empty())
    .map(|(field, _)| field)
    .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { missing })
    }
}
