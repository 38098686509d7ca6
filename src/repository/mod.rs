//! Repository layer for storage operations

pub mod authors;
pub mod books;
pub mod memory;

use std::sync::Arc;

use sqlx::{Pool, Postgres};

pub use authors::{AuthorRepository, PgAuthorRepository};
pub use books::{BookRepository, PgBookRepository};
pub use memory::MemoryStore;

use crate::error::AppResult;

/// Main repository struct holding one handle per entity
#[derive(Clone)]
pub struct Repository {
    pub pool: Option<Pool<Postgres>>,
    pub authors: Arc<dyn AuthorRepository>,
    pub books: Arc<dyn BookRepository>,
}

impl Repository {
    /// Create a repository backed by the given PostgreSQL pool
    pub fn postgres(pool: Pool<Postgres>) -> Self {
        Self {
            authors: Arc::new(PgAuthorRepository::new(pool.clone())),
            books: Arc::new(PgBookRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Create a repository backed by a fresh process-local store
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::default());
        Self {
            pool: None,
            authors: store.clone(),
            books: store,
        }
    }

    /// Check that the storage engine answers
    pub async fn ping(&self) -> AppResult<()> {
        if let Some(pool) = &self.pool {
            sqlx::query("SELECT 1").execute(pool).await?;
        }
        Ok(())
    }
}

/// PostgreSQL error code for foreign key violations
const FOREIGN_KEY_VIOLATION: &str = "23503";

pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some(FOREIGN_KEY_VIOLATION),
        _ => false,
    }
}
