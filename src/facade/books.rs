//! Book DTO mapping

use crate::{
    error::AppResult,
    models::book::{BookDto, NewBook},
    services::books::BookService,
};

#[derive(Clone)]
pub struct BookFacade {
    service: BookService,
}

impl BookFacade {
    pub fn new(service: BookService) -> Self {
        Self { service }
    }

    pub async fn create(&self, dto: BookDto) -> AppResult<BookDto> {
        let book = self.service.create(NewBook::try_from(dto)?).await?;
        Ok(book.into())
    }

    pub async fn get(&self, id: i64) -> AppResult<BookDto> {
        Ok(self.service.get_by_id(id).await?.into())
    }

    pub async fn list(&self) -> AppResult<Vec<BookDto>> {
        let books = self.service.list().await?;
        Ok(books.into_iter().map(BookDto::from).collect())
    }

    pub async fn update(&self, id: i64, dto: BookDto) -> AppResult<BookDto> {
        let book = self.service.update(id, NewBook::try_from(dto)?).await?;
        Ok(book.into())
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.service.delete(id).await
    }
}
