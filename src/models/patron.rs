//! Patron status report

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::borrow::BorrowHistoryEntry;

static PATRON_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{6}$").unwrap());

pub const INVALID_PATRON_ID: &str = "Invalid patron ID. Must be exactly 6 digits.";

/// Library card numbers are exactly six ASCII digits
pub fn is_valid_patron_id(patron_id: &str) -> bool {
    PATRON_ID.is_match(patron_id)
}

/// Active loan line in the status report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CurrentLoan {
    pub book_id: i32,
    pub title: String,
    pub author: String,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub days_overdue: i64,
    pub late_fee: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LoanCounts {
    pub currently_borrowed: usize,
    pub history_total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PatronStatusReport {
    pub patron_id: String,
    pub current_loans: Vec<CurrentLoan>,
    pub counts: LoanCounts,
    pub total_late_fees: Decimal,
    pub history: Vec<BorrowHistoryEntry>,
    /// Set only when the patron id was rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PatronStatusReport {
    /// Zeroed report carrying a rejection message
    pub fn rejected(patron_id: &str, error: &str) -> Self {
        Self {
            patron_id: patron_id.to_string(),
            current_loans: Vec::new(),
            counts: LoanCounts::default(),
            total_late_fees: Decimal::ZERO,
            history: Vec::new(),
            error: Some(error.to_string()),
        }
    }
}
