//! Business logic services

pub mod authors;
pub mod books;

use crate::{error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub authors: authors::AuthorService,
    pub books: books::BookService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            authors: authors::AuthorService::new(repository.clone()),
            books: books::BookService::new(repository.clone()),
            repository,
        }
    }

    /// Check that the storage backend is reachable
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
