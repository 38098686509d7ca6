//! Author model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Persisted author record
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Author {
    pub id: i64,
    pub name: String,
}

/// Author that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuthor {
    pub name: String,
}

/// Author as exposed by the REST API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct AuthorDto {
    /// Generated identifier (ignored on requests)
    #[serde(default)]
    pub id: Option<i64>,
    /// Display name of the author
    #[serde(default)]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
}

impl From<Author> for AuthorDto {
    fn from(author: Author) -> Self {
        Self {
            id: Some(author.id),
            name: author.name,
        }
    }
}

impl From<AuthorDto> for NewAuthor {
    fn from(dto: AuthorDto) -> Self {
        Self { name: dto.name }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_without_name_fails_validation() {
        let dto: AuthorDto = serde_json::from_str("{}").unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn request_id_is_dropped_when_mapping_in() {
        let dto = AuthorDto {
            id: Some(42),
            name: "John Doe".into(),
        };
        assert_eq!(NewAuthor::from(dto).name, "John Doe");
    }

    #[test]
    fn entity_maps_out_with_id() {
        let dto = AuthorDto::from(Author {
            id: 7,
            name: "Jane Doe".into(),
        });
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json, serde_json::json!({ "id": 7, "name": "Jane Doe" }));
    }
}
