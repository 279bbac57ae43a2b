//! Payment gateway exchange types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::book::RawBookId;

/// Gateway answer to a charge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub success: bool,
    pub transaction_id: Option<String>,
    pub message: String,
}

/// Gateway answer to a refund
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundResponse {
    pub success: bool,
    pub message: String,
}

/// Outcome of a settled late fee payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaymentReceipt {
    pub transaction_id: String,
    pub amount: Decimal,
    pub message: String,
}

/// Pay late fees request
#[derive(Debug, Deserialize, ToSchema)]
pub struct PayFeesRequest {
    pub patron_id: String,
    #[schema(value_type = i32)]
    pub book_id: RawBookId,
}

/// Refund request
#[derive(Debug, Deserialize, ToSchema)]
pub struct RefundRequest {
    pub transaction_id: String,
    pub amount: Decimal,
}
