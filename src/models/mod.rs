//! Data models for SAPIENS

pub mod book;
pub mod loan;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookChanges, BookStatus};
pub use loan::{Loan, LoanDetails};
pub use user::{User, UserChanges};
