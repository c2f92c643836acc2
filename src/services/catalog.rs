//! Catalog management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookChanges, BookQuery, CreateBook},
    repository::{books::contains_ci, SharedRepository},
};

#[derive(Clone)]
pub struct CatalogService {
    repository: SharedRepository,
}

impl CatalogService {
    pub fn new(repository: SharedRepository) -> Self {
        Self { repository }
    }

    /// List books, optionally filtered by title, author or availability.
    ///
    /// Filters combine: a title and author query returns books matching both.
    pub async fn search_books(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        let repo = self.repository.read().await;

        let mut books = match (&query.title, &query.author) {
            (Some(title), _) => repo.books.search_by_title(title),
            (None, Some(author)) => repo.books.search_by_author(author),
            (None, None) if query.available == Some(true) => repo.books.list_available(),
            (None, None) => repo.books.list(),
        };
        if let (Some(_), Some(author)) = (&query.title, &query.author) {
            books.retain(|book| contains_ci(&book.author, author));
        }
        if query.available == Some(true) {
            books.retain(|book| book.available);
        } else if query.available == Some(false) {
            books.retain(|book| !book.available);
        }

        tracing::debug!("Catalog search {:?}: {} result(s)", query, books.len());
        Ok(books)
    }

    /// Get book by ISBN
    pub async fn get_book(&self, isbn: &str) -> AppResult<Book> {
        self.repository
            .read()
            .await
            .books
            .get_by_isbn(isbn)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Book with ISBN {} not found", isbn)))
    }

    /// Add a new book to the catalog
    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        let book = book.trimmed();
        book.validate()?;

        let created = self.repository.write().await.books.create(book.into())?;
        tracing::info!("Book added: {}", created);
        Ok(created)
    }

    /// Update editable fields of a book
    pub async fn update_book(&self, isbn: &str, changes: BookChanges) -> AppResult<Book> {
        let changes = changes.trimmed();
        changes.validate()?;
        if changes.is_empty() {
            return Err(AppError::BadRequest("No fields to update".to_string()));
        }

        let updated = self.repository.write().await.books.update(isbn, changes)?;
        tracing::info!("Book updated: {}", updated);
        Ok(updated)
    }

    /// Delete a book. Refused while the book is out on an active loan.
    pub async fn delete_book(&self, isbn: &str) -> AppResult<Book> {
        let mut repo = self.repository.write().await;

        if !repo.loans.active_for_book(isbn).is_empty() {
            tracing::warn!("Refusing to delete book {}: active loans", isbn);
            return Err(AppError::BusinessRule(
                "Cannot delete the book because it has active loans".to_string(),
            ));
        }

        let removed = repo.books.delete(isbn)?;
        tracing::info!("Book deleted: {}", removed);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::Repository;

    fn service() -> CatalogService {
        CatalogService::new(Repository::with_sample_data().into_shared())
    }

    fn create(isbn: &str, title: &str) -> CreateBook {
        CreateBook {
            isbn: isbn.to_string(),
            title: title.to_string(),
            author: "Frank Herbert".to_string(),
            publication_year: Some(1965),
            genre: Some("Science Fiction".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let catalog = service();
        catalog.create_book(create("978-0441172719", "Dune")).await.unwrap();

        let book = catalog.get_book("978-0441172719").await.unwrap();
        assert_eq!(book.title, "Dune");
        assert!(book.available);

        let all = catalog.search_books(&BookQuery::default()).await.unwrap();
        assert_eq!(all.len(), 6);
        assert_eq!(all.last().map(|b| b.title.as_str()), Some("Dune"));
    }

    #[tokio::test]
    async fn test_create_duplicate() {
        let catalog = service();
        let err = catalog.create_book(create("978-0142437230", "Dup")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_invalid() {
        let catalog = service();
        let err = catalog.create_book(create("", "No ISBN")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_blank_fields_rejected() {
        let catalog = CatalogService::new(Repository::new().into_shared());

        let err = catalog.create_book(create("   ", "Dune")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        let err = catalog.create_book(create("978-0441172719", "  ")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(catalog.search_books(&BookQuery::default()).await.unwrap().is_empty());

        let created = catalog
            .create_book(create(" 978-0441172719 ", " Dune "))
            .await
            .unwrap();
        assert_eq!(created.isbn, "978-0441172719");
        assert_eq!(created.title, "Dune");

        let err = catalog
            .update_book(
                "978-0441172719",
                BookChanges {
                    title: Some(" ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_search_filters() {
        let catalog = service();

        let query = BookQuery {
            title: Some("the".to_string()),
            ..Default::default()
        };
        let titles: Vec<_> = catalog
            .search_books(&query)
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["The Hobbit", "The Great Gatsby"]);

        let query = BookQuery {
            title: Some("the".to_string()),
            author: Some("tolkien".to_string()),
            ..Default::default()
        };
        assert_eq!(catalog.search_books(&query).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_requires_changes() {
        let catalog = service();
        let err = catalog
            .update_book("978-0142437230", BookChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = catalog
            .update_book(
                "000",
                BookChanges {
                    genre: Some("x".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let catalog = service();
        assert!(matches!(
            catalog.delete_book("000").await,
            Err(AppError::NotFound(_))
        ));
        catalog.delete_book("978-0142437230").await.unwrap();
        assert_eq!(catalog.search_books(&BookQuery::default()).await.unwrap().len(), 4);
    }
}
