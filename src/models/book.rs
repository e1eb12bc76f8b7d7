//! Book (catalog entry) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::NOT_BLANK;

/// Book model from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    /// Generated identifier, `None` until the book is persisted
    pub id: Option<i64>,
    pub title: String,
    pub author: String,
    /// Unique numeric ISBN
    pub isbn: i64,
}

/// Create book request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(
        required(message = "must not be null"),
        regex(path = *NOT_BLANK, message = "must not be blank")
    )]
    pub title: Option<String>,
    #[validate(
        required(message = "must not be null"),
        regex(path = *NOT_BLANK, message = "must not be blank")
    )]
    pub author: Option<String>,
    #[validate(required(message = "must not be null"))]
    pub isbn: Option<i64>,
}

impl CreateBook {
    /// Build the unsaved domain book. Call after validation.
    pub fn into_book(self) -> Book {
        Book {
            id: None,
            title: self.title.unwrap_or_default(),
            author: self.author.unwrap_or_default(),
            isbn: self.isbn.unwrap_or_default(),
        }
    }
}

/// Update book request. The ISBN of a catalogued book cannot change.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(
        required(message = "must not be null"),
        regex(path = *NOT_BLANK, message = "must not be blank")
    )]
    pub title: Option<String>,
    #[validate(
        required(message = "must not be null"),
        regex(path = *NOT_BLANK, message = "must not be blank")
    )]
    pub author: Option<String>,
}

impl UpdateBook {
    /// Apply the requested changes to a stored book. Call after validation.
    pub fn apply_to(self, book: Book) -> Book {
        Book {
            title: self.title.unwrap_or(book.title),
            author: self.author.unwrap_or(book.author),
            ..book
        }
    }
}

/// Book search parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    /// Case-insensitive substring of the author
    pub author: Option<String>,
    /// Exact ISBN
    pub isbn: Option<i64>,
    /// Zero-based page number (default: 0)
    pub page: Option<i64>,
    /// Page size
    pub size: Option<i64>,
}

/// Example-style book filter: absent fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<i64>,
}

impl From<&BookQuery> for BookFilter {
    fn from(query: &BookQuery) -> Self {
        let non_empty = |value: &Option<String>| value.clone().filter(|s| !s.is_empty());

        Self {
            title: non_empty(&query.title),
            author: non_empty(&query.author),
            isbn: query.isbn,
        }
    }
}
