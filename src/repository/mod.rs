//! Repository layer for catalog and circulation storage

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    error::AppResult,
    models::{ActiveLoan, Book, BorrowHistoryEntry, BorrowRecord, NewBook},
};

pub use memory::InMemoryRepository;
pub use postgres::PgRepository;

/// Shared handle to whichever store backs the services
pub type Repository = Arc<dyn LibraryRepository>;

/// Data access used by the services. Each call is one round trip to the store;
/// implementations hold no connection between calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LibraryRepository: Send + Sync {
    /// Cheap connectivity check
    async fn ping(&self) -> AppResult<()>;

    async fn get_book(&self, id: i32) -> AppResult<Option<Book>>;

    async fn get_book_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>>;

    /// Insert with `available_copies = total_copies`
    async fn insert_book(&self, book: &NewBook) -> AppResult<Book>;

    /// Shift `available_copies` by `delta`. Returns `false` when the book does not
    /// exist or the result would leave `0..=total_copies`.
    async fn update_availability(&self, book_id: i32, delta: i32) -> AppResult<bool>;

    /// All books, ordered by title
    async fn list_books(&self) -> AppResult<Vec<Book>>;

    async fn count_active_borrows(&self, patron_id: &str) -> AppResult<i64>;

    async fn insert_borrow(
        &self,
        patron_id: &str,
        book_id: i32,
        borrow_date: DateTime<Utc>,
        due_date: DateTime<Utc>,
    ) -> AppResult<BorrowRecord>;

    /// Most recent active borrow for the pair
    async fn find_active_borrow(
        &self,
        patron_id: &str,
        book_id: i32,
    ) -> AppResult<Option<BorrowRecord>>;

    /// Close the most recent active borrow for the pair. Returns whether a row changed.
    async fn mark_returned(
        &self,
        patron_id: &str,
        book_id: i32,
        return_date: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Remove a borrow record outright. Only used to roll back a borrow whose
    /// availability update was refused.
    async fn delete_borrow(&self, id: i32) -> AppResult<bool>;

    /// Active loans with book title and author, ordered by due date
    async fn list_active_loans(&self, patron_id: &str) -> AppResult<Vec<ActiveLoan>>;

    /// Every borrow of the patron, newest first
    async fn list_borrow_history(&self, patron_id: &str) -> AppResult<Vec<BorrowHistoryEntry>>;
}
