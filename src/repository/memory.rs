//! In-process repository with the same semantics as the Postgres one.
//! Backs the test suites and the `memory` storage backend.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::LibraryRepository;
use crate::{
    error::{AppError, AppResult},
    models::{ActiveLoan, Book, BorrowHistoryEntry, BorrowRecord, NewBook},
};

#[derive(Default)]
struct Tables {
    books: Vec<Book>,
    borrows: Vec<BorrowRecord>,
}

#[derive(Default)]
pub struct InMemoryRepository {
    tables: RwLock<Tables>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> AppResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| AppError::Internal("in-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> AppResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| AppError::Internal("in-memory store lock poisoned".to_string()))
    }
}

impl Tables {
    fn book(&self, id: i32) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    fn latest_active_mut(&mut self, patron_id: &str, book_id: i32) -> Option<&mut BorrowRecord> {
        self.borrows
            .iter_mut()
            .filter(|r| r.patron_id == patron_id && r.book_id == book_id && r.return_date.is_none())
            .max_by_key(|r| r.id)
    }
}

#[async_trait]
impl LibraryRepository for InMemoryRepository {
    async fn ping(&self) -> AppResult<()> {
        self.read().map(|_| ())
    }

    async fn get_book(&self, id: i32) -> AppResult<Option<Book>> {
        Ok(self.read()?.book(id).cloned())
    }

    async fn get_book_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        Ok(self.read()?.books.iter().find(|b| b.isbn == isbn).cloned())
    }

    async fn insert_book(&self, book: &NewBook) -> AppResult<Book> {
        let mut tables = self.write()?;
        if tables.books.iter().any(|b| b.isbn == book.isbn) {
            return Err(AppError::DataIntegrity(format!(
                "duplicate key value for isbn {}",
                book.isbn
            )));
        }
        let id = tables.books.iter().map(|b| b.id).max().unwrap_or(0) + 1;
        let row = Book {
            id,
            title: book.title.clone(),
            author: book.author.clone(),
            isbn: book.isbn.clone(),
            total_copies: book.total_copies,
            available_copies: book.total_copies,
        };
        tables.books.push(row.clone());
        Ok(row)
    }

    async fn update_availability(&self, book_id: i32, delta: i32) -> AppResult<bool> {
        let mut tables = self.write()?;
        let Some(book) = tables.books.iter_mut().find(|b| b.id == book_id) else {
            return Ok(false);
        };
        let next = book.available_copies + delta;
        if !(0..=book.total_copies).contains(&next) {
            return Ok(false);
        }
        book.available_copies = next;
        Ok(true)
    }

    async fn list_books(&self) -> AppResult<Vec<Book>> {
        let mut books = self.read()?.books.clone();
        books.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(books)
    }

    async fn count_active_borrows(&self, patron_id: &str) -> AppResult<i64> {
        let count = self
            .read()?
            .borrows
            .iter()
            .filter(|r| r.patron_id == patron_id && r.return_date.is_none())
            .count();
        Ok(count as i64)
    }

    async fn insert_borrow(
        &self,
        patron_id: &str,
        book_id: i32,
        borrow_date: DateTime<Utc>,
        due_date: DateTime<Utc>,
    ) -> AppResult<BorrowRecord> {
        let mut tables = self.write()?;
        if tables.book(book_id).is_none() {
            return Err(AppError::DataIntegrity(format!(
                "borrow references unknown book {}",
                book_id
            )));
        }
        let id = tables.borrows.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let record = BorrowRecord {
            id,
            patron_id: patron_id.to_string(),
            book_id,
            borrow_date,
            due_date,
            return_date: None,
        };
        tables.borrows.push(record.clone());
        Ok(record)
    }

    async fn find_active_borrow(
        &self,
        patron_id: &str,
        book_id: i32,
    ) -> AppResult<Option<BorrowRecord>> {
        let tables = self.read()?;
        Ok(tables
            .borrows
            .iter()
            .filter(|r| r.patron_id == patron_id && r.book_id == book_id && r.return_date.is_none())
            .max_by_key(|r| r.id)
            .cloned())
    }

    async fn mark_returned(
        &self,
        patron_id: &str,
        book_id: i32,
        return_date: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut tables = self.write()?;
        match tables.latest_active_mut(patron_id, book_id) {
            Some(record) => {
                record.return_date = Some(return_date);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_borrow(&self, id: i32) -> AppResult<bool> {
        let mut tables = self.write()?;
        let before = tables.borrows.len();
        tables.borrows.retain(|r| r.id != id);
        Ok(tables.borrows.len() < before)
    }

    async fn list_active_loans(&self, patron_id: &str) -> AppResult<Vec<ActiveLoan>> {
        let tables = self.read()?;
        let mut loans: Vec<ActiveLoan> = tables
            .borrows
            .iter()
            .filter(|r| r.patron_id == patron_id && r.return_date.is_none())
            .filter_map(|r| {
                tables.book(r.book_id).map(|b| ActiveLoan {
                    borrow_id: r.id,
                    book_id: r.book_id,
                    title: b.title.clone(),
                    author: b.author.clone(),
                    borrow_date: r.borrow_date,
                    due_date: r.due_date,
                })
            })
            .collect();
        loans.sort_by_key(|l| (l.due_date, l.borrow_id));
        Ok(loans)
    }

    async fn list_borrow_history(&self, patron_id: &str) -> AppResult<Vec<BorrowHistoryEntry>> {
        let tables = self.read()?;
        let mut rows: Vec<(i32, BorrowHistoryEntry)> = tables
            .borrows
            .iter()
            .filter(|r| r.patron_id == patron_id)
            .filter_map(|r| {
                tables.book(r.book_id).map(|b| {
                    (
                        r.id,
                        BorrowHistoryEntry {
                            book_id: r.book_id,
                            title: b.title.clone(),
                            author: b.author.clone(),
                            borrow_date: r.borrow_date,
                            due_date: r.due_date,
                            return_date: r.return_date,
                        },
                    )
                })
            })
            .collect();
        rows.sort_by(|(a_id, a), (b_id, b)| {
            b.borrow_date.cmp(&a.borrow_date).then(b_id.cmp(a_id))
        });
        Ok(rows.into_iter().map(|(_, entry)| entry).collect())
    }
}
