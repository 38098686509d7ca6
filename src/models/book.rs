//! Book model and related types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::author::{Author, AuthorDto};
use crate::error::{AppError, AppResult};

/// Persisted book record with its owning author resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub isbn: String,
    pub author: Author,
}

/// Book fields as written to storage; the author is referenced by id only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub isbn: String,
    pub author_id: i64,
}

/// Book as exposed by the REST API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct BookDto {
    /// Generated identifier (ignored on requests)
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "isbn is required"))]
    pub isbn: String,
    /// Owning author; only `id` is read on requests
    #[validate(required(message = "author is required"))]
    pub author: Option<AuthorDto>,
}

impl From<Book> for BookDto {
    fn from(book: Book) -> Self {
        Self {
            id: Some(book.id),
            title: book.title,
            isbn: book.isbn,
            author: Some(book.author.into()),
        }
    }
}

impl TryFrom<BookDto> for NewBook {
    type Error = AppError;

    fn try_from(dto: BookDto) -> AppResult<Self> {
        let author_id = dto
            .author
            .and_then(|author| author.id)
            .ok_or_else(|| AppError::Validation("author.id is required".to_string()))?;

        Ok(Self {
            title: dto.title,
            isbn: dto.isbn,
            author_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn author_reference_needs_only_an_id() {
        let dto: BookDto = serde_json::from_value(json!({
            "title": "Dune",
            "isbn": "978-0441013593",
            "author": { "id": 3 }
        }))
        .unwrap();

        assert!(dto.validate().is_ok());
        let book = NewBook::try_from(dto).unwrap();
        assert_eq!(book.author_id, 3);
    }

    #[test]
    fn missing_author_is_a_validation_error() {
        let dto: BookDto = serde_json::from_value(json!({
            "title": "Dune",
            "isbn": "978-0441013593"
        }))
        .unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn author_without_id_cannot_be_mapped_in() {
        let dto = BookDto {
            title: "Dune".into(),
            isbn: "978-0441013593".into(),
            author: Some(AuthorDto {
                id: None,
                name: "Frank Herbert".into(),
            }),
            ..Default::default()
        };
        assert!(matches!(NewBook::try_from(dto), Err(AppError::Validation(_))));
    }

    #[test]
    fn entity_maps_out_with_embedded_author() {
        let dto = BookDto::from(Book {
            id: 1,
            title: "Dune".into(),
            isbn: "978-0441013593".into(),
            author: Author {
                id: 3,
                name: "Frank Herbert".into(),
            },
        });
        assert_eq!(
            serde_json::to_value(&dto).unwrap(),
            json!({
                "id": 1,
                "title": "Dune",
                "isbn": "978-0441013593",
                "author": { "id": 3, "name": "Frank Herbert" }
            })
        );
    }
}
