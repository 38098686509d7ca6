//! Process-local store implementing every repository trait.
//!
//! Ids are generated from per-table sequences starting at 1 and never reused,
//! matching the behaviour of the `BIGSERIAL` columns in the SQL schema.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::{AuthorRepository, BookRepository};
use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, NewAuthor},
        book::{Book, NewBook},
    },
};

#[derive(Debug, Clone)]
struct BookRecord {
    title: String,
    isbn: String,
    author_id: i64,
}

#[derive(Debug, Default)]
struct Tables {
    authors: BTreeMap<i64, String>,
    books: BTreeMap<i64, BookRecord>,
    author_seq: i64,
    book_seq: i64,
}

impl Tables {
    fn author(&self, id: i64) -> Option<Author> {
        self.authors.get(&id).map(|name| Author {
            id,
            name: name.clone(),
        })
    }

    fn book(&self, id: i64, record: &BookRecord) -> AppResult<Book> {
        // The foreign key guarantees the author is present
        let author = self.author(record.author_id).ok_or_else(|| {
            AppError::Internal(format!("Book {} references missing author {}", id, record.author_id))
        })?;
        Ok(Book {
            id,
            title: record.title.clone(),
            isbn: record.isbn.clone(),
            author,
        })
    }

    fn check_author_exists(&self, author_id: i64) -> AppResult<()> {
        if self.authors.contains_key(&author_id) {
            Ok(())
        } else {
            Err(AppError::Validation(format!("Author {} does not exist", author_id)))
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    fn lock(&self) -> AppResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| AppError::Internal("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl AuthorRepository for MemoryStore {
    async fn insert(&self, author: &NewAuthor) -> AppResult<Author> {
        let mut tables = self.lock()?;
        tables.author_seq += 1;
        let id = tables.author_seq;
        tables.authors.insert(id, author.name.clone());
        Ok(Author {
            id,
            name: author.name.clone(),
        })
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Author>> {
        Ok(self.lock()?.author(id))
    }

    async fn find_all(&self) -> AppResult<Vec<Author>> {
        let tables = self.lock()?;
        Ok(tables
            .authors
            .iter()
            .map(|(id, name)| Author {
                id: *id,
                name: name.clone(),
            })
            .collect())
    }

    async fn save(&self, author: &Author) -> AppResult<Author> {
        let mut tables = self.lock()?;
        let name = tables
            .authors
            .get_mut(&author.id)
            .ok_or_else(|| AppError::NotFound("Author not found".to_string()))?;
        *name = author.name.clone();
        Ok(author.clone())
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut tables = self.lock()?;
        if tables.books.values().any(|book| book.author_id == id) {
            return Err(AppError::Conflict(format!("Author {} still has books", id)));
        }
        Ok(tables.authors.remove(&id).is_some())
    }

    async fn delete_with_books(&self, id: i64) -> AppResult<u64> {
        let mut tables = self.lock()?;
        if tables.authors.remove(&id).is_none() {
            return Err(AppError::NotFound("Author not found".to_string()));
        }
        let before = tables.books.len();
        tables.books.retain(|_, book| book.author_id != id);
        Ok((before - tables.books.len()) as u64)
    }
}

#[async_trait]
impl BookRepository for MemoryStore {
    async fn insert(&self, book: &NewBook) -> AppResult<Book> {
        let mut tables = self.lock()?;
        tables.check_author_exists(book.author_id)?;
        tables.book_seq += 1;
        let id = tables.book_seq;
        let record = BookRecord {
            title: book.title.clone(),
            isbn: book.isbn.clone(),
            author_id: book.author_id,
        };
        let stored = tables.book(id, &record)?;
        tables.books.insert(id, record);
        Ok(stored)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        let tables = self.lock()?;
        tables
            .books
            .get(&id)
            .map(|record| tables.book(id, record))
            .transpose()
    }

    async fn find_all(&self) -> AppResult<Vec<Book>> {
        let tables = self.lock()?;
        tables
            .books
            .iter()
            .map(|(id, record)| tables.book(*id, record))
            .collect()
    }

    async fn find_by_author(&self, author_id: i64) -> AppResult<Vec<Book>> {
        let tables = self.lock()?;
        tables
            .books
            .iter()
            .filter(|(_, record)| record.author_id == author_id)
            .map(|(id, record)| tables.book(*id, record))
            .collect()
    }

    async fn count_by_author(&self, author_id: i64) -> AppResult<i64> {
        let tables = self.lock()?;
        Ok(tables
            .books
            .values()
            .filter(|record| record.author_id == author_id)
            .count() as i64)
    }

    async fn save(&self, id: i64, book: &NewBook) -> AppResult<Book> {
        let mut tables = self.lock()?;
        if !tables.books.contains_key(&id) {
            return Err(AppError::NotFound("Book not found".to_string()));
        }
        tables.check_author_exists(book.author_id)?;
        let record = BookRecord {
            title: book.title.clone(),
            isbn: book.isbn.clone(),
            author_id: book.author_id,
        };
        let stored = tables.book(id, &record)?;
        tables.books.insert(id, record);
        Ok(stored)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        Ok(self.lock()?.books.remove(&id).is_some())
    }
}
