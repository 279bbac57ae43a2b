//! Patron status reporting

use chrono::Utc;
use rust_decimal::Decimal;

use super::fees::{assess_late_fee, days_overdue, round_money};
use crate::{
    error::AppResult,
    models::{
        is_valid_patron_id,
        patron::{CurrentLoan, LoanCounts, INVALID_PATRON_ID},
        PatronStatusReport,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct PatronsService {
    repository: Repository,
}

impl PatronsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Active loans with today's fees, plus the full borrowing history.
    /// A malformed id produces a zeroed report carrying an `error`.
    pub async fn status_report(&self, patron_id: &str) -> AppResult<PatronStatusReport> {
        let pid = patron_id.trim();
        if !is_valid_patron_id(pid) {
            return Ok(PatronStatusReport::rejected(patron_id, INVALID_PATRON_ID));
        }

        let today = Utc::now().date_naive();
        let active = self.repository.list_active_loans(pid).await?;

        let current_loans: Vec<CurrentLoan> = active
            .into_iter()
            .map(|loan| {
                let due = loan.due_date.date_naive();
                let fee = assess_late_fee(due, today);
                CurrentLoan {
                    book_id: loan.book_id,
                    title: loan.title,
                    author: loan.author,
                    borrow_date: loan.borrow_date,
                    due_date: loan.due_date,
                    days_overdue: days_overdue(due, today),
                    late_fee: fee.fee_amount,
                }
            })
            .collect();

        let total: Decimal = current_loans.iter().map(|l| l.late_fee).sum();
        let history = self.repository.list_borrow_history(pid).await?;

        Ok(PatronStatusReport {
            patron_id: pid.to_string(),
            counts: LoanCounts {
                currently_borrowed: current_loans.len(),
                history_total: history.len(),
            },
            current_loans,
            total_late_fees: round_money(total),
            history,
            error: None,
        })
    }
}
