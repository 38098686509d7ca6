//! Data models for the library catalog

pub mod author;
pub mod book;

// Re-export commonly used types
pub use author::{Author, AuthorDto, NewAuthor};
pub use book::{Book, BookDto, NewBook};

/// Returns true when a required text field carries no visible characters
pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
