//! Loan (borrow) model and related types

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Default loan window in days
pub const DEFAULT_LOAN_DAYS: u32 = 15;

/// A book lent to a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Loan {
    /// Sequential identifier (`P001`, `P002`, ...)
    pub id: String,
    pub isbn: String,
    pub user_id: String,
    pub loan_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    /// False once the book has been returned
    pub active: bool,
}

impl Loan {
    pub fn new(
        id: impl Into<String>,
        isbn: impl Into<String>,
        user_id: impl Into<String>,
        loan_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            isbn: isbn.into(),
            user_id: user_id.into(),
            loan_date,
            return_date: None,
            active: true,
        }
    }

    /// Format a loan id from its sequence number
    pub fn format_id(seq: u32) -> String {
        format!("P{:03}", seq)
    }

    /// Close the loan on `return_date`
    pub fn register_return(&mut self, return_date: NaiveDate) {
        self.return_date = Some(return_date);
        self.active = false;
    }

    /// Last day the book may be kept without being late
    pub fn due_date(&self, loan_days: u32) -> NaiveDate {
        self.loan_date
            .checked_add_days(Days::new(u64::from(loan_days)))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Days the book came back after the due date.
    ///
    /// Zero while the loan is still active or when it was returned on time.
    pub fn overdue_days(&self, loan_days: u32) -> i64 {
        match (self.active, self.return_date) {
            (false, Some(returned)) => (returned - self.due_date(loan_days)).num_days().max(0),
            _ => 0,
        }
    }

    pub fn status(&self) -> &'static str {
        if self.active {
            "Active"
        } else {
            "Finished"
        }
    }
}

impl std::fmt::Display for Loan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ID: {}, Book: {}, User: {}, Loan: {}",
            self.id, self.isbn, self.user_id, self.loan_date
        )?;
        if let Some(returned) = self.return_date {
            write!(f, ", Return: {}", returned)?;
        }
        write!(f, ", Status: {}", self.status())
    }
}

/// Loan with its computed lateness, as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoanDetails {
    #[serde(flatten)]
    pub loan: Loan,
    pub due_date: NaiveDate,
    pub overdue_days: i64,
}

impl LoanDetails {
    pub fn new(loan: Loan, loan_days: u32) -> Self {
        Self {
            due_date: loan.due_date(loan_days),
            overdue_days: loan.overdue_days(loan_days),
            loan,
        }
    }
}

/// Create loan request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateLoan {
    pub isbn: String,
    pub user_id: String,
    /// Defaults to today
    pub loan_date: Option<NaiveDate>,
}

/// Return loan request
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ReturnLoan {
    /// Defaults to today
    pub return_date: Option<NaiveDate>,
}

/// Loan list query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct LoanQuery {
    /// Only loans not yet returned
    pub active: Option<bool>,
}
