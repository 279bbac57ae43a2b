//! Catalog management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::first_validation_message,
        Book, NewBook, SearchType,
    },
    repository::Repository,
};

/// Books inserted by `seed_sample_data` on an empty catalog
const SAMPLE_BOOKS: [(&str, &str, &str, i32); 3] = [
    ("The Great Gatsby", "F. Scott Fitzgerald", "9780743273565", 3),
    ("To Kill a Mockingbird", "Harper Lee", "9780061120084", 2),
    ("1984", "George Orwell", "9780451524935", 1),
];

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List every book in the catalog
    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.repository.list_books().await
    }

    /// Get a book by ID
    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository
            .get_book(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Add a new book. Title and author are trimmed; the ISBN must be unique.
    pub async fn add_book(&self, book: NewBook) -> AppResult<(Book, String)> {
        let book = book.normalized();
        book.validate()
            .map_err(|errors| AppError::Validation(first_validation_message(&errors)))?;

        if self.repository.get_book_by_isbn(&book.isbn).await?.is_some() {
            return Err(AppError::Conflict(
                "A book with this ISBN already exists.".to_string(),
            ));
        }

        let created = self.repository.insert_book(&book).await.map_err(|e| {
            tracing::error!("Catalog add: insert of isbn {} failed: {}", book.isbn, e);
            AppError::DataIntegrity("Database error occurred while adding the book.".to_string())
        })?;

        tracing::info!("Catalog add: book id={} isbn={}", created.id, created.isbn);
        let message = format!(
            "Book \"{}\" has been successfully added to the catalog.",
            created.title
        );
        Ok((created, message))
    }

    /// Search by title or author (case-insensitive substring) or by exact ISBN.
    /// Blank terms and unknown search types yield no results.
    pub async fn search_books(&self, term: &str, search_type: &str) -> AppResult<Vec<Book>> {
        let term = term.trim();
        let Some(kind) = SearchType::parse(search_type) else {
            return Ok(Vec::new());
        };
        if term.is_empty() {
            return Ok(Vec::new());
        }

        let books = self.repository.list_books().await?;
        let needle = term.to_lowercase();

        let matches = books
            .into_iter()
            .filter(|b| match kind {
                SearchType::Isbn => b.isbn == term,
                SearchType::Title => b.title.to_lowercase().contains(&needle),
                SearchType::Author => b.author.to_lowercase().contains(&needle),
            })
            .collect();
        Ok(matches)
    }

    /// Populate an empty catalog with a few well-known titles
    pub async fn seed_sample_data(&self) -> AppResult<usize> {
        if !self.repository.list_books().await?.is_empty() {
            return Ok(0);
        }

        let mut inserted = 0;
        for (title, author, isbn, copies) in SAMPLE_BOOKS {
            self.add_book(NewBook::new(title, author, isbn, copies)).await?;
            inserted += 1;
        }
        tracing::info!("Seeded {} sample books", inserted);
        Ok(inserted)
    }
}
