//! Repository layer for in-memory record storage

pub mod books;
pub mod loans;
pub mod users;

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::{book::Book, user::User};

/// Repository shared between services. Mutating operations hold the write
/// guard for their whole duration.
pub type SharedRepository = Arc<RwLock<Repository>>;

/// Main repository struct holding every record store
#[derive(Debug, Clone, Default)]
pub struct Repository {
    pub books: books::BooksRepository,
    pub users: users::UsersRepository,
    pub loans: loans::LoansRepository,
}

impl Repository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-loaded with the sample catalogue and patrons
    pub fn with_sample_data() -> Self {
        Self {
            books: sample_books().into_iter().collect(),
            users: sample_users().into_iter().collect(),
            loans: loans::LoansRepository::new(),
        }
    }

    pub fn into_shared(self) -> SharedRepository {
        Arc::new(RwLock::new(self))
    }
}

fn sample_books() -> Vec<Book> {
    vec![
        Book::new("978-0142437230", "1984", "George Orwell", 1949, "Science Fiction"),
        Book::new("978-0061120084", "To Kill a Mockingbird", "Harper Lee", 1960, "Fiction"),
        Book::new("978-0544003415", "The Hobbit", "J.R.R. Tolkien", 1937, "Fantasy"),
        Book::new("978-0451524935", "The Great Gatsby", "F. Scott Fitzgerald", 1925, "Fiction"),
        Book::new("978-0141439518", "Pride and Prejudice", "Jane Austen", 1813, "Romance"),
    ]
}

fn sample_users() -> Vec<User> {
    vec![
        User::new("U001", "Juan Pérez", "juan@email.com"),
        User::new("U002", "María García", "maria@email.com"),
        User::new("U003", "Carlos Rodríguez", "carlos@email.com"),
        User::new("U004", "Ana López", "ana@email.com"),
    ]
}
