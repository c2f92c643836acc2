//! Loan management service

use chrono::{Local, NaiveDate};

use crate::{
    error::{AppError, AppResult},
    models::loan::{CreateLoan, LoanDetails},
    repository::SharedRepository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: SharedRepository,
    loan_days: u32,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl LoansService {
    pub fn new(repository: SharedRepository, loan_days: u32) -> Self {
        Self {
            repository,
            loan_days,
        }
    }

    /// Lend a book to a user.
    ///
    /// The book must exist and be available, the user must exist. The book is
    /// marked as borrowed in the same critical section that records the loan.
    pub async fn create_loan(&self, loan: CreateLoan) -> AppResult<LoanDetails> {
        let mut repo = self.repository.write().await;

        let book = repo
            .books
            .get_by_isbn(&loan.isbn)
            .ok_or_else(|| AppError::NotFound(format!("Book with ISBN {} not found", loan.isbn)))?;
        if !book.available {
            tracing::warn!("Loan refused: book {} is already lent", loan.isbn);
            return Err(AppError::Unavailable(format!(
                "Book {} is not available",
                loan.isbn
            )));
        }

        if !repo.users.exists(&loan.user_id) {
            return Err(AppError::NotFound(format!(
                "User with id {} not found",
                loan.user_id
            )));
        }

        let loan_date = loan.loan_date.unwrap_or_else(today);
        let created = repo.loans.create(&loan.isbn, &loan.user_id, loan_date);
        repo.books.set_available(&loan.isbn, false)?;

        tracing::info!("Loan registered: {}", created);
        Ok(LoanDetails::new(created, self.loan_days))
    }

    /// Register the return of an active loan and make the book available again
    pub async fn return_loan(
        &self,
        loan_id: &str,
        return_date: Option<NaiveDate>,
    ) -> AppResult<LoanDetails> {
        let mut repo = self.repository.write().await;

        let returned = repo
            .loans
            .return_loan(loan_id, return_date.unwrap_or_else(today))?;

        // The book may have been removed from the catalogue in the meantime
        if repo.books.set_available(&returned.isbn, true).is_err() {
            tracing::warn!(
                "Loan {} returned for book {} which is no longer catalogued",
                returned.id,
                returned.isbn
            );
        }

        let details = LoanDetails::new(returned, self.loan_days);
        tracing::info!(
            "Loan returned: {} ({} day(s) overdue)",
            details.loan,
            details.overdue_days
        );
        Ok(details)
    }

    /// Get a single loan, returned or not
    pub async fn get_loan(&self, loan_id: &str) -> AppResult<LoanDetails> {
        self.repository
            .read()
            .await
            .loans
            .get_by_id(loan_id)
            .cloned()
            .map(|loan| LoanDetails::new(loan, self.loan_days))
            .ok_or_else(|| AppError::NotFound(format!("Loan {} not found", loan_id)))
    }

    /// All loans, active and finished, in registration order
    pub async fn list_loans(&self) -> AppResult<Vec<LoanDetails>> {
        let loans = self.repository.read().await.loans.list();
        Ok(self.details(loans))
    }

    /// Loans not yet returned
    pub async fn list_active(&self) -> AppResult<Vec<LoanDetails>> {
        let loans = self.repository.read().await.loans.active();
        Ok(self.details(loans))
    }

    /// Active loans of a user
    pub async fn get_user_loans(&self, user_id: &str) -> AppResult<Vec<LoanDetails>> {
        let repo = self.repository.read().await;
        if !repo.users.exists(user_id) {
            return Err(AppError::NotFound(format!("User with id {} not found", user_id)));
        }
        Ok(self.details(repo.loans.active_for_user(user_id)))
    }

    /// Active loans of a book
    pub async fn get_book_loans(&self, isbn: &str) -> AppResult<Vec<LoanDetails>> {
        let loans = self.repository.read().await.loans.active_for_book(isbn);
        Ok(self.details(loans))
    }

    fn details(&self, loans: Vec<crate::models::loan::Loan>) -> Vec<LoanDetails> {
        loans
            .into_iter()
            .map(|loan| LoanDetails::new(loan, self.loan_days))
            .collect()
    }
}
