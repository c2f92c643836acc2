//! Library statistics service

use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, repository::SharedRepository};

/// Snapshot of library-wide counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LibraryStats {
    /// Books in the catalogue
    pub total_books: usize,
    /// Books not currently on loan
    pub available_books: usize,
    /// Registered users
    pub total_users: usize,
    /// Loans not yet returned
    pub active_loans: usize,
    /// All loans ever registered
    pub total_loans: usize,
    /// Returned loans that came back after the due date
    pub late_returns: usize,
}

#[derive(Clone)]
pub struct StatsService {
    repository: SharedRepository,
    loan_days: u32,
}

impl StatsService {
    pub fn new(repository: SharedRepository, loan_days: u32) -> Self {
        Self {
            repository,
            loan_days,
        }
    }

    pub async fn get_stats(&self) -> AppResult<LibraryStats> {
        let repo = self.repository.read().await;

        Ok(LibraryStats {
            total_books: repo.books.count(),
            available_books: repo.books.count_available(),
            total_users: repo.users.count(),
            active_loans: repo.loans.count_active(),
            total_loans: repo.loans.list().len(),
            late_returns: repo.loans.count_returned_late(self.loan_days),
        })
    }
}
