//! SAPIENS Library Management System
//!
//! An in-memory library management server: books, users and loans kept in
//! insertion-ordered record lists, exposed through a REST JSON API.

use std::sync::Arc;

pub mod api;
pub mod collections;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use repository::Repository;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Build the state from configuration, seeding sample records if enabled
    pub fn new(config: AppConfig) -> Self {
        let repository = if config.library.seed_sample_data {
            Repository::with_sample_data()
        } else {
            Repository::new()
        };

        let services = services::Services::new(repository.into_shared(), &config);

        Self {
            config: Arc::new(config),
            services: Arc::new(services),
        }
    }
}
