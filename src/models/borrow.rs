//! Borrow (loan) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::book::RawBookId;

/// Borrow record from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowRecord {
    pub id: i32,
    pub patron_id: String,
    pub book_id: i32,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    /// `None` while the loan is active
    pub return_date: Option<DateTime<Utc>>,
}

/// Lifecycle of a borrow record. Only `Active -> Returned` exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LoanState {
    Active,
    Returned,
}

impl BorrowRecord {
    pub fn state(&self) -> LoanState {
        match self.return_date {
            None => LoanState::Active,
            Some(_) => LoanState::Returned,
        }
    }
}

/// Active loan joined with its book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ActiveLoan {
    pub borrow_id: i32,
    pub book_id: i32,
    pub title: String,
    pub author: String,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
}

/// One line of a patron's borrowing history (active and returned)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BorrowHistoryEntry {
    pub book_id: i32,
    pub title: String,
    pub author: String,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
}

/// Borrow or return request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct CirculationRequest {
    /// 6-digit library card number
    pub patron_id: String,
    /// Book ID (number or numeric string)
    #[schema(value_type = i32)]
    pub book_id: RawBookId,
}
