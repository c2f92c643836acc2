//! Loans ledger

use chrono::NaiveDate;

use crate::{
    error::{AppError, AppResult},
    models::loan::Loan,
};

/// Append-only loan ledger. Returned loans stay in the ledger as history.
#[derive(Debug, Clone)]
pub struct LoansRepository {
    loans: Vec<Loan>,
    next_seq: u32,
}

impl Default for LoansRepository {
    fn default() -> Self {
        Self {
            loans: Vec::new(),
            next_seq: 1,
        }
    }
}

impl LoansRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new active loan and return it
    pub fn create(&mut self, isbn: &str, user_id: &str, loan_date: NaiveDate) -> Loan {
        let loan = Loan::new(Loan::format_id(self.next_seq), isbn, user_id, loan_date);
        self.next_seq += 1;
        self.loans.push(loan.clone());
        loan
    }

    /// Get a loan by ID, returned or not
    pub fn get_by_id(&self, id: &str) -> Option<&Loan> {
        self.loans.iter().find(|loan| loan.id == id)
    }

    /// Close the active loan with this id
    pub fn return_loan(&mut self, id: &str, return_date: NaiveDate) -> AppResult<Loan> {
        let loan = self
            .loans
            .iter_mut()
            .find(|loan| loan.id == id && loan.active)
            .ok_or_else(|| {
                AppError::NotFound(format!("Loan {} not found or already returned", id))
            })?;
        loan.register_return(return_date);
        Ok(loan.clone())
    }

    pub fn list(&self) -> Vec<Loan> {
        self.loans.clone()
    }

    pub fn active(&self) -> Vec<Loan> {
        self.loans.iter().filter(|loan| loan.active).cloned().collect()
    }

    pub fn active_for_user(&self, user_id: &str) -> Vec<Loan> {
        self.loans
            .iter()
            .filter(|loan| loan.active && loan.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn active_for_book(&self, isbn: &str) -> Vec<Loan> {
        self.loans
            .iter()
            .filter(|loan| loan.active && loan.isbn == isbn)
            .cloned()
            .collect()
    }

    pub fn count_active(&self) -> usize {
        self.loans.iter().filter(|loan| loan.active).count()
    }

    /// Count returned loans that came back late
    pub fn count_returned_late(&self, loan_days: u32) -> usize {
        self.loans
            .iter()
            .filter(|loan| loan.overdue_days(loan_days) > 0)
            .count()
    }
}
