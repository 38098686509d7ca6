//! Library Catalog Server
//!
//! A REST JSON API for managing a catalog of authors and their books.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod facade;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub facades: Arc<facade::Facades>,
}

impl AppState {
    /// Wire services and facades over the given repository
    pub fn new(config: AppConfig, repository: repository::Repository) -> Self {
        let services = services::Services::new(repository);
        let facades = facade::Facades::new(&services);
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
            facades: Arc::new(facades),
        }
    }
}
