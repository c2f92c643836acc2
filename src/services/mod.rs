//! Business logic services

pub mod catalog;
pub mod loans;
pub mod stats;
pub mod users;

use crate::{config::AppConfig, repository::SharedRepository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub users: users::UsersService,
    pub loans: loans::LoansService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services over the given repository
    pub fn new(repository: SharedRepository, config: &AppConfig) -> Self {
        let loan_days = config.loans.duration_days;

        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            users: users::UsersService::new(repository.clone()),
            loans: loans::LoansService::new(repository.clone(), loan_days),
            stats: stats::StatsService::new(repository, loan_days),
        }
    }
}
