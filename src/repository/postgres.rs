//! Postgres-backed repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use super::LibraryRepository;
use crate::{
    error::AppResult,
    models::{ActiveLoan, Book, BorrowHistoryEntry, BorrowRecord, NewBook},
};

#[derive(Clone)]
pub struct PgRepository {
    pool: Pool<Postgres>,
}

impl PgRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Apply the bundled schema migrations
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| sqlx::Error::Migrate(Box::new(e)))?;
        Ok(())
    }
}

#[async_trait]
impl LibraryRepository for PgRepository {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn get_book(&self, id: i32) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    async fn get_book_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE isbn = $1")
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    async fn insert_book(&self, book: &NewBook) -> AppResult<Book> {
        let row = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, isbn, total_copies, available_copies)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(book.total_copies)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_availability(&self, book_id: i32, delta: i32) -> AppResult<bool> {
        // The range guard makes concurrent decrements on the last copy first-writer-wins
        let result = sqlx::query(
            r#"
            UPDATE books
            SET available_copies = available_copies + $2
            WHERE id = $1
              AND available_copies + $2 BETWEEN 0 AND total_copies
            "#,
        )
        .bind(book_id)
        .bind(delta)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_books(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY title, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn count_active_borrows(&self, patron_id: &str) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrows WHERE patron_id = $1 AND return_date IS NULL",
        )
        .bind(patron_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn insert_borrow(
        &self,
        patron_id: &str,
        book_id: i32,
        borrow_date: DateTime<Utc>,
        due_date: DateTime<Utc>,
    ) -> AppResult<BorrowRecord> {
        let row = sqlx::query_as::<_, BorrowRecord>(
            r#"
            INSERT INTO borrows (patron_id, book_id, borrow_date, due_date)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(patron_id)
        .bind(book_id)
        .bind(borrow_date)
        .bind(due_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_active_borrow(
        &self,
        patron_id: &str,
        book_id: i32,
    ) -> AppResult<Option<BorrowRecord>> {
        let row = sqlx::query_as::<_, BorrowRecord>(
            r#"
            SELECT * FROM borrows
            WHERE patron_id = $1 AND book_id = $2 AND return_date IS NULL
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(patron_id)
        .bind(book_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn mark_returned(
        &self,
        patron_id: &str,
        book_id: i32,
        return_date: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE borrows SET return_date = $3
            WHERE id = (
                SELECT id FROM borrows
                WHERE patron_id = $1 AND book_id = $2 AND return_date IS NULL
                ORDER BY id DESC
                LIMIT 1
            )
            "#,
        )
        .bind(patron_id)
        .bind(book_id)
        .bind(return_date)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_borrow(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM borrows WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_active_loans(&self, patron_id: &str) -> AppResult<Vec<ActiveLoan>> {
        let rows = sqlx::query_as::<_, ActiveLoan>(
            r#"
            SELECT br.id AS borrow_id, br.book_id, b.title, b.author,
                   br.borrow_date, br.due_date
            FROM borrows br
            JOIN books b ON b.id = br.book_id
            WHERE br.patron_id = $1 AND br.return_date IS NULL
            ORDER BY br.due_date, br.id
            "#,
        )
        .bind(patron_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_borrow_history(&self, patron_id: &str) -> AppResult<Vec<BorrowHistoryEntry>> {
        let rows = sqlx::query_as::<_, BorrowHistoryEntry>(
            r#"
            SELECT br.book_id, b.title, b.author,
                   br.borrow_date, br.due_date, br.return_date
            FROM borrows br
            JOIN books b ON b.id = br.book_id
            WHERE br.patron_id = $1
            ORDER BY br.borrow_date DESC, br.id DESC
            "#,
        )
        .bind(patron_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
