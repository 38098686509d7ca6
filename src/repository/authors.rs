//! Author storage

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::is_foreign_key_violation;
use crate::{
    error::{AppError, AppResult},
    models::author::{Author, NewAuthor},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// Store a new author and return it with its generated id
    async fn insert(&self, author: &NewAuthor) -> AppResult<Author>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Author>>;

    /// All authors, ordered by id
    async fn find_all(&self) -> AppResult<Vec<Author>>;

    /// Overwrite the stored fields of an existing author
    async fn save(&self, author: &Author) -> AppResult<Author>;

    /// Remove an author; returns false when no row matched
    async fn delete(&self, id: i64) -> AppResult<bool>;

    /// Remove an author and every book it owns, atomically.
    /// Returns the number of books removed.
    async fn delete_with_books(&self, id: i64) -> AppResult<u64>;
}

#[derive(Clone)]
pub struct PgAuthorRepository {
    pool: Pool<Postgres>,
}

impl PgAuthorRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorRepository for PgAuthorRepository {
    async fn insert(&self, author: &NewAuthor) -> AppResult<Author> {
        let row = sqlx::query_as::<_, Author>(
            "INSERT INTO authors (name) VALUES ($1) RETURNING id, name",
        )
        .bind(&author.name)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Author>> {
        let row = sqlx::query_as::<_, Author>("SELECT id, name FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_all(&self) -> AppResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, Author>("SELECT id, name FROM authors ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn save(&self, author: &Author) -> AppResult<Author> {
        sqlx::query_as::<_, Author>(
            "UPDATE authors SET name = $1 WHERE id = $2 RETURNING id, name",
        )
        .bind(&author.name)
        .bind(author.id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Author not found".to_string()))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                // A book was attached between the ownership check and the delete
                if is_foreign_key_violation(&e) {
                    AppError::Conflict(format!("Author {} still has books", id))
                } else {
                    AppError::Database(e)
                }
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_with_books(&self, id: i64) -> AppResult<u64> {
        let mut tx = self.pool.begin().await?;

        let books = sqlx::query("DELETE FROM books WHERE author_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let authors = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if authors == 0 {
            tx.rollback().await?;
            return Err(AppError::NotFound("Author not found".to_string()));
        }

        tx.commit().await?;
        Ok(books)
    }
}
