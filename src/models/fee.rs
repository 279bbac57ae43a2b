//! Late fee assessment types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FeeStatus {
    NoActiveLoan,
    OnTime,
    Late,
}

/// Late fee owed on one loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LateFee {
    /// Amount in dollars, 2 decimal places
    pub fee_amount: Decimal,
    pub days_overdue: i64,
    pub status: FeeStatus,
}

impl LateFee {
    pub fn no_active_loan() -> Self {
        Self {
            fee_amount: Decimal::ZERO,
            days_overdue: 0,
            status: FeeStatus::NoActiveLoan,
        }
    }

    pub fn on_time() -> Self {
        Self {
            fee_amount: Decimal::ZERO,
            days_overdue: 0,
            status: FeeStatus::OnTime,
        }
    }

    pub fn is_payable(&self) -> bool {
        self.status == FeeStatus::Late && self.fee_amount > Decimal::ZERO
    }
}
