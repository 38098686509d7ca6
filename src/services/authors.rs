//! Author service

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, NewAuthor},
        book::Book,
        is_blank,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorService {
    repository: Repository,
}

fn check_name(name: &str) -> AppResult<()> {
    if is_blank(name) {
        return Err(AppError::Validation("Author name cannot be blank".to_string()));
    }
    Ok(())
}

impl AuthorService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn create(&self, author: NewAuthor) -> AppResult<Author> {
        check_name(&author.name)?;
        let created = self.repository.authors.insert(&author).await?;
        tracing::info!(author_id = created.id, "Author created");
        Ok(created)
    }

    /// Get author by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Author> {
        self.repository
            .authors
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Author not found".to_string()))
    }

    pub async fn list(&self) -> AppResult<Vec<Author>> {
        self.repository.authors.find_all().await
    }

    /// Replace the name of an existing author
    pub async fn update(&self, id: i64, author: NewAuthor) -> AppResult<Author> {
        let mut existing = self.get_by_id(id).await?;
        check_name(&author.name)?;
        existing.name = author.name;
        let saved = self.repository.authors.save(&existing).await?;
        tracing::info!(author_id = id, "Author updated");
        Ok(saved)
    }

    /// Delete an author.
    ///
    /// Authors that still own books are kept unless `force` is set, in which
    /// case their books are deleted along with them.
    pub async fn delete(&self, id: i64, force: bool) -> AppResult<()> {
        let author = self.get_by_id(id).await?;

        if force {
            let removed = self.repository.authors.delete_with_books(author.id).await?;
            tracing::info!(author_id = id, books_removed = removed, "Author deleted with books");
            return Ok(());
        }

        let owned = self.repository.books.count_by_author(author.id).await?;
        if owned > 0 {
            return Err(AppError::Conflict(format!(
                "Cannot delete author: {} book(s) still reference it",
                owned
            )));
        }

        if !self.repository.authors.delete(author.id).await? {
            return Err(AppError::NotFound("Author not found".to_string()));
        }
        tracing::info!(author_id = id, "Author deleted");
        Ok(())
    }

    /// Books owned by the author
    pub async fn list_books(&self, id: i64) -> AppResult<Vec<Book>> {
        let author = self.get_by_id(id).await?;
        self.repository.books.find_by_author(author.id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mockall::predicate::eq;
    use tokio_test::{assert_err, assert_ok};

    use super::*;
    use crate::repository::{authors::MockAuthorRepository, books::MockBookRepository};

    fn service(authors: MockAuthorRepository, books: MockBookRepository) -> AuthorService {
        AuthorService::new(Repository {
            pool: None,
            authors: Arc::new(authors),
            books: Arc::new(books),
        })
    }

    fn john() -> Author {
        Author {
            id: 1,
            name: "John Doe".into(),
        }
    }

    #[tokio::test]
    async fn create_persists_and_echoes_name() {
        let mut authors = MockAuthorRepository::new();
        authors
            .expect_insert()
            .withf(|author| author.name == "John Doe")
            .times(1)
            .returning(|_| Ok(john()));

        let created = service(authors, MockBookRepository::new())
            .create(NewAuthor {
                name: "John Doe".into(),
            })
            .await
            .unwrap();
        assert_eq!(created, john());
    }

    #[tokio::test]
    async fn create_rejects_blank_name_without_touching_storage() {
        let mut authors = MockAuthorRepository::new();
        authors.expect_insert().never();

        let err = service(authors, MockBookRepository::new())
            .create(NewAuthor { name: "   ".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn missing_author_is_not_found() {
        let mut authors = MockAuthorRepository::new();
        authors.expect_find_by_id().with(eq(9)).returning(|_| Ok(None));

        let err = service(authors, MockBookRepository::new())
            .get_by_id(9)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg == "Author not found"));
    }

    #[tokio::test]
    async fn update_overwrites_name_of_loaded_author() {
        let mut authors = MockAuthorRepository::new();
        authors.expect_find_by_id().with(eq(1)).returning(|_| Ok(Some(john())));
        authors
            .expect_save()
            .withf(|author| author.id == 1 && author.name == "Updated Name")
            .returning(|author| Ok(author.clone()));

        let updated = service(authors, MockBookRepository::new())
            .update(
                1,
                NewAuthor {
                    name: "Updated Name".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Updated Name");
    }

    #[tokio::test]
    async fn update_of_missing_author_never_saves() {
        let mut authors = MockAuthorRepository::new();
        authors.expect_find_by_id().returning(|_| Ok(None));
        authors.expect_save().never();

        let result = service(authors, MockBookRepository::new())
            .update(
                4,
                NewAuthor {
                    name: "Updated Name".into(),
                },
            )
            .await;
        assert_err!(result);
    }

    #[tokio::test]
    async fn update_rejects_blank_name_without_saving() {
        let mut authors = MockAuthorRepository::new();
        authors.expect_find_by_id().with(eq(1)).returning(|_| Ok(Some(john())));
        authors.expect_save().never();

        let err = service(authors, MockBookRepository::new())
            .update(1, NewAuthor { name: " \t ".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn delete_is_refused_while_books_reference_author() {
        let mut authors = MockAuthorRepository::new();
        authors.expect_find_by_id().returning(|_| Ok(Some(john())));
        authors.expect_delete().never();
        let mut books = MockBookRepository::new();
        books.expect_count_by_author().with(eq(1)).returning(|_| Ok(2));

        let err = service(authors, books).delete(1, false).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn delete_without_books_removes_author() {
        let mut authors = MockAuthorRepository::new();
        authors.expect_find_by_id().returning(|_| Ok(Some(john())));
        authors.expect_delete().with(eq(1)).times(1).returning(|_| Ok(true));
        let mut books = MockBookRepository::new();
        books.expect_count_by_author().returning(|_| Ok(0));

        assert_ok!(service(authors, books).delete(1, false).await);
    }

    #[tokio::test]
    async fn forced_delete_cascades_to_books() {
        let mut authors = MockAuthorRepository::new();
        authors.expect_find_by_id().returning(|_| Ok(Some(john())));
        authors
            .expect_delete_with_books()
            .with(eq(1))
            .times(1)
            .returning(|_| Ok(3));
        let mut books = MockBookRepository::new();
        books.expect_count_by_author().never();

        assert_ok!(service(authors, books).delete(1, true).await);
    }

    #[tokio::test]
    async fn list_books_requires_existing_author() {
        let mut authors = MockAuthorRepository::new();
        authors.expect_find_by_id().returning(|_| Ok(None));
        let mut books = MockBookRepository::new();
        books.expect_find_by_author().never();

        let err = service(authors, books).list_books(5).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
