//! DTO mapping between the HTTP handlers and the services

mod authors;
mod books;

pub use authors::AuthorFacade;
pub use books::BookFacade;

use crate::services::Services;

/// Container for all facades
#[derive(Clone)]
pub struct Facades {
    pub authors: AuthorFacade,
    pub books: BookFacade,
}

impl Facades {
    pub fn new(services: &Services) -> Self {
        Self {
            authors: AuthorFacade::new(services.authors.clone()),
            books: BookFacade::new(services.books.clone()),
        }
    }
}
