//! Late fee computation

use chrono::{NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    error::AppResult,
    models::{is_valid_patron_id, FeeStatus, LateFee, RawBookId},
    repository::Repository,
};

/// Days charged at the reduced rate before the full rate applies
const REDUCED_RATE_DAYS: i64 = 7;
/// $0.50 per day for days 1-7
const REDUCED_DAILY_RATE: Decimal = Decimal::from_parts(50, 0, 0, false, 2);
/// $1.00 per day from day 8
const FULL_DAILY_RATE: Decimal = Decimal::ONE;
/// Largest fee a single loan can accrue
pub const MAX_LATE_FEE: Decimal = Decimal::from_parts(1500, 0, 0, false, 2);

/// Whole calendar days between `due_date` and `today`, floored at zero
pub fn days_overdue(due_date: NaiveDate, today: NaiveDate) -> i64 {
    (today - due_date).num_days().max(0)
}

/// Tiered, capped fee for a loan due on `due_date`, as of `today`.
pub fn assess_late_fee(due_date: NaiveDate, today: NaiveDate) -> LateFee {
    let days = days_overdue(due_date, today);
    if days == 0 {
        return LateFee::on_time();
    }

    let reduced_days = days.min(REDUCED_RATE_DAYS);
    let full_days = (days - REDUCED_RATE_DAYS).max(0);
    let fee = Decimal::from(reduced_days) * REDUCED_DAILY_RATE
        + Decimal::from(full_days) * FULL_DAILY_RATE;

    LateFee {
        fee_amount: round_money(fee.min(MAX_LATE_FEE)),
        days_overdue: days,
        status: FeeStatus::Late,
    }
}

/// Round to cents, halves away from zero
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[derive(Clone)]
pub struct FeesService {
    repository: Repository,
}

impl FeesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Fee owed today on the patron's active loan of `book_id`.
    /// Malformed ids and missing loans report `no_active_loan` rather than an error.
    pub async fn calculate_late_fee(
        &self,
        patron_id: &str,
        book_id: impl Into<RawBookId>,
    ) -> AppResult<LateFee> {
        if !is_valid_patron_id(patron_id) {
            return Ok(LateFee::no_active_loan());
        }
        let raw: RawBookId = book_id.into();
        let Some(book_id) = raw.parse() else {
            return Ok(LateFee::no_active_loan());
        };

        let Some(record) = self.repository.find_active_borrow(patron_id, book_id).await? else {
            return Ok(LateFee::no_active_loan());
        };

        let today = Utc::now().date_naive();
        Ok(assess_late_fee(record.due_date.date_naive(), today))
    }
}
