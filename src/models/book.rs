//! Book model and related types

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::collections::Changeset;

/// Circulation status of a book
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookStatus {
    Available,
    Borrowed,
}

impl BookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => "Available",
            BookStatus::Borrowed => "Borrowed",
        }
    }
}

impl std::fmt::Display for BookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Book held by the library, identified by its ISBN
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub publication_year: i32,
    pub genre: String,
    /// False while the book is out on a loan
    pub available: bool,
}

impl Book {
    pub fn new(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        publication_year: i32,
        genre: impl Into<String>,
    ) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
            author: author.into(),
            publication_year,
            genre: genre.into(),
            available: true,
        }
    }

    pub fn status(&self) -> BookStatus {
        if self.available {
            BookStatus::Available
        } else {
            BookStatus::Borrowed
        }
    }
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ISBN: {}, Title: {}, Author: {}, Year: {}, Genre: {}, Status: {}",
            self.isbn,
            self.title,
            self.author,
            self.publication_year,
            self.genre,
            self.status()
        )
    }
}

impl From<CreateBook> for Book {
    fn from(book: CreateBook) -> Self {
        Book::new(
            book.isbn,
            book.title,
            book.author,
            book.publication_year.unwrap_or(0),
            book.genre.unwrap_or_default(),
        )
    }
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "ISBN is required"))]
    pub isbn: String,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    /// Defaults to 0 when unknown
    #[validate(range(min = 0, max = 9999, message = "Publication year must be between 0 and 9999"))]
    pub publication_year: Option<i32>,
    pub genre: Option<String>,
}

impl CreateBook {
    /// Strip surrounding whitespace so blank fields fail validation
    pub fn trimmed(self) -> Self {
        Self {
            isbn: self.isbn.trim().to_string(),
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            genre: self.genre.map(|g| g.trim().to_string()),
            ..self
        }
    }
}

/// Editable book fields. The ISBN is the record identity and availability is
/// driven by loans, so neither can be changed here.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct BookChanges {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Author cannot be empty"))]
    pub author: Option<String>,
    #[validate(range(min = 0, max = 9999, message = "Publication year must be between 0 and 9999"))]
    pub publication_year: Option<i32>,
    pub genre: Option<String>,
}

impl BookChanges {
    pub fn trimmed(self) -> Self {
        Self {
            title: self.title.map(|t| t.trim().to_string()),
            author: self.author.map(|a| a.trim().to_string()),
            genre: self.genre.map(|g| g.trim().to_string()),
            ..self
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.publication_year.is_none()
            && self.genre.is_none()
    }
}

impl Changeset<Book> for BookChanges {
    fn apply_to(self, book: &mut Book) {
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(author) = self.author {
            book.author = author;
        }
        if let Some(year) = self.publication_year {
            book.publication_year = year;
        }
        if let Some(genre) = self.genre {
            book.genre = genre;
        }
    }
}

/// Book list query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Case-insensitive title substring
    pub title: Option<String>,
    /// Case-insensitive author substring
    pub author: Option<String>,
    /// Only books not currently on loan
    pub available: Option<bool>,
}
