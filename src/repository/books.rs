//! Books repository backed by a [`RecordList`]

use crate::{
    collections::RecordList,
    error::{AppError, AppResult},
    models::book::{Book, BookChanges},
};

#[derive(Debug, Clone, Default)]
pub struct BooksRepository {
    books: RecordList<Book>,
}

/// Case-insensitive substring match
pub(crate) fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl BooksRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.books.len()
    }

    /// Get book by ISBN
    pub fn get_by_isbn(&self, isbn: &str) -> Option<&Book> {
        self.books.find(|book| book.isbn == isbn)
    }

    /// Check if a book with this ISBN exists
    pub fn exists(&self, isbn: &str) -> bool {
        self.get_by_isbn(isbn).is_some()
    }

    /// Books whose title contains `title`, in insertion order
    pub fn search_by_title(&self, title: &str) -> Vec<Book> {
        self.books
            .iter()
            .filter(|book| contains_ci(&book.title, title))
            .cloned()
            .collect()
    }

    /// Books whose author contains `author`, in insertion order
    pub fn search_by_author(&self, author: &str) -> Vec<Book> {
        self.books
            .iter()
            .filter(|book| contains_ci(&book.author, author))
            .cloned()
            .collect()
    }

    pub fn list(&self) -> Vec<Book> {
        self.books.to_vec()
    }

    pub fn list_available(&self) -> Vec<Book> {
        self.books.iter().filter(|book| book.available).cloned().collect()
    }

    pub fn count_available(&self) -> usize {
        self.books.iter().filter(|book| book.available).count()
    }

    /// Append a new book. Fails if the ISBN is already catalogued.
    pub fn create(&mut self, book: Book) -> AppResult<Book> {
        if self.exists(&book.isbn) {
            return Err(AppError::Conflict(format!(
                "A book with ISBN {} already exists",
                book.isbn
            )));
        }
        self.books.push(book.clone());
        Ok(book)
    }

    /// Apply `changes` to the book with this ISBN
    pub fn update(&mut self, isbn: &str, changes: BookChanges) -> AppResult<Book> {
        if !self.books.update(|book| book.isbn == isbn, changes) {
            return Err(AppError::NotFound(format!("Book with ISBN {} not found", isbn)));
        }
        self.get_by_isbn(isbn)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Book with ISBN {} not found", isbn)))
    }

    /// Set the availability flag, returning the previous value
    pub fn set_available(&mut self, isbn: &str, available: bool) -> AppResult<bool> {
        let book = self
            .books
            .find_mut(|book| book.isbn == isbn)
            .ok_or_else(|| AppError::NotFound(format!("Book with ISBN {} not found", isbn)))?;
        let previous = book.available;
        book.available = available;
        Ok(previous)
    }

    /// Remove the first book with this ISBN
    pub fn delete(&mut self, isbn: &str) -> AppResult<Book> {
        self.books
            .remove(|book| book.isbn == isbn)
            .ok_or_else(|| AppError::NotFound(format!("Book with ISBN {} not found", isbn)))
    }
}

impl FromIterator<Book> for BooksRepository {
    fn from_iter<I: IntoIterator<Item = Book>>(iter: I) -> Self {
        Self {
            books: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> BooksRepository {
        vec![
            Book::new("1", "The Hobbit", "J.R.R. Tolkien", 1937, "Fantasy"),
            Book::new("2", "The Great Gatsby", "F. Scott Fitzgerald", 1925, "Fiction"),
            Book::new("3", "The Silmarillion", "J.R.R. Tolkien", 1977, "Fantasy"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_search_is_case_insensitive_and_ordered() {
        let repo = repo();
        let found: Vec<_> = repo.search_by_author("tolkien").into_iter().map(|b| b.isbn).collect();
        assert_eq!(found, vec!["1", "3"]);

        let found: Vec<_> = repo.search_by_title("GREAT").into_iter().map(|b| b.isbn).collect();
        assert_eq!(found, vec!["2"]);

        assert!(repo.search_by_title("dune").is_empty());
    }

    #[test]
    fn test_create_duplicate_isbn() {
        let mut repo = repo();
        let err = repo
            .create(Book::new("2", "Other", "Someone", 2000, ""))
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(repo.count(), 3);
    }

    #[test]
    fn test_update_and_delete() {
        let mut repo = repo();
        let updated = repo
            .update(
                "3",
                BookChanges {
                    genre: Some("Mythopoeia".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.genre, "Mythopoeia");

        assert!(matches!(
            repo.update("9", BookChanges::default()),
            Err(AppError::NotFound(_))
        ));

        let removed = repo.delete("2").unwrap();
        assert_eq!(removed.title, "The Great Gatsby");
        let remaining: Vec<_> = repo.list().into_iter().map(|b| b.isbn).collect();
        assert_eq!(remaining, vec!["1", "3"]);
        assert!(matches!(repo.delete("2"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_availability() {
        let mut repo = repo();
        assert!(repo.set_available("1", false).unwrap());
        assert_eq!(repo.count_available(), 2);
        let available: Vec<_> = repo.list_available().into_iter().map(|b| b.isbn).collect();
        assert_eq!(available, vec!["2", "3"]);
    }
}
