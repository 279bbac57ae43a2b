//! Data models for Shelfmark

pub mod book;
pub mod borrow;
pub mod fee;
pub mod patron;
pub mod payment;

// Re-export commonly used types
pub use book::{Book, NewBook, RawBookId, SearchType};
pub use borrow::{ActiveLoan, BorrowHistoryEntry, BorrowRecord, LoanState};
pub use fee::{FeeStatus, LateFee};
pub use patron::{is_valid_patron_id, PatronStatusReport};
pub use payment::{PaymentReceipt, PaymentResponse, RefundResponse};
