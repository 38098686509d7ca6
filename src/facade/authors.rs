//! Author DTO mapping

use crate::{
    error::AppResult,
    models::{author::AuthorDto, book::BookDto},
    services::authors::AuthorService,
};

#[derive(Clone)]
pub struct AuthorFacade {
    service: AuthorService,
}

impl AuthorFacade {
    pub fn new(service: AuthorService) -> Self {
        Self { service }
    }

    pub async fn create(&self, dto: AuthorDto) -> AppResult<AuthorDto> {
        let author = self.service.create(dto.into()).await?;
        Ok(author.into())
    }

    pub async fn get(&self, id: i64) -> AppResult<AuthorDto> {
        Ok(self.service.get_by_id(id).await?.into())
    }

    pub async fn list(&self) -> AppResult<Vec<AuthorDto>> {
        let authors = self.service.list().await?;
        Ok(authors.into_iter().map(AuthorDto::from).collect())
    }

    pub async fn update(&self, id: i64, dto: AuthorDto) -> AppResult<AuthorDto> {
        let author = self.service.update(id, dto.into()).await?;
        Ok(author.into())
    }

    pub async fn delete(&self, id: i64, force: bool) -> AppResult<()> {
        self.service.delete(id, force).await
    }

    pub async fn list_books(&self, id: i64) -> AppResult<Vec<BookDto>> {
        let books = self.service.list_books(id).await?;
        Ok(books.into_iter().map(BookDto::from).collect())
    }
}
