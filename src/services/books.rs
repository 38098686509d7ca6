//! Book service

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, NewBook},
        is_blank,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BookService {
    repository: Repository,
}

impl BookService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Check required fields and that the referenced author exists
    async fn check(&self, book: &NewBook) -> AppResult<()> {
        if is_blank(&book.title) {
            return Err(AppError::Validation("Book title cannot be blank".to_string()));
        }
        if is_blank(&book.isbn) {
            return Err(AppError::Validation("Book isbn cannot be blank".to_string()));
        }
        if self.repository.authors.find_by_id(book.author_id).await?.is_none() {
            return Err(AppError::Validation(format!(
                "Author {} does not exist",
                book.author_id
            )));
        }
        Ok(())
    }

    pub async fn create(&self, book: NewBook) -> AppResult<Book> {
        self.check(&book).await?;
        let created = self.repository.books.insert(&book).await?;
        tracing::info!(book_id = created.id, author_id = book.author_id, "Book created");
        Ok(created)
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Book> {
        self.repository
            .books
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    pub async fn list(&self) -> AppResult<Vec<Book>> {
        self.repository.books.find_all().await
    }

    /// Replace title, isbn and author of an existing book
    pub async fn update(&self, id: i64, book: NewBook) -> AppResult<Book> {
        let existing = self.get_by_id(id).await?;
        self.check(&book).await?;
        let saved = self.repository.books.save(existing.id, &book).await?;
        tracing::info!(book_id = id, author_id = book.author_id, "Book updated");
        Ok(saved)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let book = self.get_by_id(id).await?;
        if !self.repository.books.delete(book.id).await? {
            return Err(AppError::NotFound("Book not found".to_string()));
        }
        tracing::info!(book_id = id, "Book deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mockall::predicate::eq;
    use tokio_test::assert_ok;

    use super::*;
    use crate::{
        models::author::Author,
        repository::{authors::MockAuthorRepository, books::MockBookRepository},
    };

    fn service(authors: MockAuthorRepository, books: MockBookRepository) -> BookService {
        BookService::new(Repository {
            pool: None,
            authors: Arc::new(authors),
            books: Arc::new(books),
        })
    }

    fn author(id: i64) -> Author {
        Author {
            id,
            name: format!("Author {}", id),
        }
    }

    fn draft(author_id: i64) -> NewBook {
        NewBook {
            title: "Dune".into(),
            isbn: "978-0441013593".into(),
            author_id,
        }
    }

    fn stored(id: i64, book: &NewBook) -> Book {
        Book {
            id,
            title: book.title.clone(),
            isbn: book.isbn.clone(),
            author: author(book.author_id),
        }
    }

    #[tokio::test]
    async fn create_resolves_author_then_inserts() {
        let mut authors = MockAuthorRepository::new();
        authors
            .expect_find_by_id()
            .with(eq(3))
            .returning(|id| Ok(Some(author(id))));
        let mut books = MockBookRepository::new();
        books
            .expect_insert()
            .times(1)
            .returning(|book| Ok(stored(10, book)));

        let created = service(authors, books).create(draft(3)).await.unwrap();
        assert_eq!(created.id, 10);
        assert_eq!(created.title, "Dune");
        assert_eq!(created.author.id, 3);
    }

    #[tokio::test]
    async fn create_with_unknown_author_is_a_validation_error() {
        let mut authors = MockAuthorRepository::new();
        authors.expect_find_by_id().returning(|_| Ok(None));
        let mut books = MockBookRepository::new();
        books.expect_insert().never();

        let err = service(authors, books).create(draft(99)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn create_with_blank_isbn_skips_author_lookup() {
        let mut authors = MockAuthorRepository::new();
        authors.expect_find_by_id().never();

        let book = NewBook {
            isbn: " ".into(),
            ..draft(3)
        };
        let err = service(authors, MockBookRepository::new())
            .create(book)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn update_of_missing_book_is_not_found() {
        let mut books = MockBookRepository::new();
        books.expect_find_by_id().with(eq(8)).returning(|_| Ok(None));
        books.expect_save().never();

        let err = service(MockAuthorRepository::new(), books)
            .update(8, draft(3))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg == "Book not found"));
    }

    #[tokio::test]
    async fn update_replaces_all_fields_including_author() {
        let mut authors = MockAuthorRepository::new();
        authors.expect_find_by_id().returning(|id| Ok(Some(author(id))));
        let mut books = MockBookRepository::new();
        books
            .expect_find_by_id()
            .returning(|id| Ok(Some(stored(id, &draft(3)))));
        books
            .expect_save()
            .withf(|id, book| *id == 10 && book.author_id == 4 && book.title == "Dune Messiah")
            .returning(|id, book| Ok(stored(id, book)));

        let updated = service(authors, books)
            .update(
                10,
                NewBook {
                    title: "Dune Messiah".into(),
                    ..draft(4)
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.author.id, 4);
        assert_eq!(updated.title, "Dune Messiah");
    }

    #[tokio::test]
    async fn update_rejects_blank_title_without_saving() {
        let mut books = MockBookRepository::new();
        books
            .expect_find_by_id()
            .returning(|id| Ok(Some(stored(id, &draft(3)))));
        books.expect_save().never();

        let book = NewBook {
            title: "  ".into(),
            ..draft(3)
        };
        let err = service(MockAuthorRepository::new(), books)
            .update(10, book)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn delete_loads_then_removes() {
        let mut books = MockBookRepository::new();
        books
            .expect_find_by_id()
            .returning(|id| Ok(Some(stored(id, &draft(3)))));
        books.expect_delete().with(eq(10)).times(1).returning(|_| Ok(true));

        assert_ok!(service(MockAuthorRepository::new(), books).delete(10).await);
    }
}
