//! Book storage

use async_trait::async_trait;
use sqlx::{FromRow, Pool, Postgres};

use super::is_foreign_key_violation;
use crate::{
    error::{AppError, AppResult},
    models::{
        author::Author,
        book::{Book, NewBook},
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Store a new book and return it with its generated id and resolved author
    async fn insert(&self, book: &NewBook) -> AppResult<Book>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>>;

    /// All books, ordered by id
    async fn find_all(&self) -> AppResult<Vec<Book>>;

    /// Books owned by one author, ordered by id
    async fn find_by_author(&self, author_id: i64) -> AppResult<Vec<Book>>;

    async fn count_by_author(&self, author_id: i64) -> AppResult<i64>;

    /// Overwrite title, isbn and author reference of an existing book
    async fn save(&self, id: i64, book: &NewBook) -> AppResult<Book>;

    /// Remove a book; returns false when no row matched
    async fn delete(&self, id: i64) -> AppResult<bool>;
}

/// Joined books/authors row
#[derive(FromRow)]
struct BookRow {
    id: i64,
    title: String,
    isbn: String,
    author_id: i64,
    author_name: String,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            isbn: row.isbn,
            author: Author {
                id: row.author_id,
                name: row.author_name,
            },
        }
    }
}

const SELECT_BOOKS: &str = r#"
    SELECT b.id, b.title, b.isbn, a.id AS author_id, a.name AS author_name
    FROM books b
    JOIN authors a ON a.id = b.author_id
"#;

fn map_write_error(err: sqlx::Error, author_id: i64) -> AppError {
    if is_foreign_key_violation(&err) {
        AppError::Validation(format!("Author {} does not exist", author_id))
    } else {
        AppError::Database(err)
    }
}

#[derive(Clone)]
pub struct PgBookRepository {
    pool: Pool<Postgres>,
}

impl PgBookRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for PgBookRepository {
    async fn insert(&self, book: &NewBook) -> AppResult<Book> {
        let row = sqlx::query_as::<_, BookRow>(
            r#"
            WITH inserted AS (
                INSERT INTO books (title, isbn, author_id)
                VALUES ($1, $2, $3)
                RETURNING id, title, isbn, author_id
            )
            SELECT i.id, i.title, i.isbn, a.id AS author_id, a.name AS author_name
            FROM inserted i
            JOIN authors a ON a.id = i.author_id
            "#,
        )
        .bind(&book.title)
        .bind(&book.isbn)
        .bind(book.author_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, book.author_id))?;
        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, BookRow>(&format!("{} WHERE b.id = $1", SELECT_BOOKS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Book::from))
    }

    async fn find_all(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, BookRow>(&format!("{} ORDER BY b.id", SELECT_BOOKS))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn find_by_author(&self, author_id: i64) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, BookRow>(&format!(
            "{} WHERE b.author_id = $1 ORDER BY b.id",
            SELECT_BOOKS
        ))
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn count_by_author(&self, author_id: i64) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn save(&self, id: i64, book: &NewBook) -> AppResult<Book> {
        sqlx::query_as::<_, BookRow>(
            r#"
            WITH updated AS (
                UPDATE books SET title = $1, isbn = $2, author_id = $3
                WHERE id = $4
                RETURNING id, title, isbn, author_id
            )
            SELECT u.id, u.title, u.isbn, a.id AS author_id, a.name AS author_name
            FROM updated u
            JOIN authors a ON a.id = u.author_id
            "#,
        )
        .bind(&book.title)
        .bind(&book.isbn)
        .bind(book.author_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, book.author_id))?
        .map(Book::from)
        .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
