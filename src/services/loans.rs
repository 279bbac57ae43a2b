//! Borrow and return workflow

use chrono::{Duration, Utc};

use super::parse_book_id;
use crate::{
    config::LoanPolicy,
    error::{AppError, AppResult},
    models::{is_valid_patron_id, patron::INVALID_PATRON_ID, BorrowRecord, RawBookId},
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    policy: LoanPolicy,
}

impl LoansService {
    pub fn new(repository: Repository, policy: LoanPolicy) -> Self {
        Self { repository, policy }
    }

    /// Lend one copy of `book_id` to `patron_id`.
    ///
    /// Inserting the borrow record and taking the copy off the shelf form one
    /// logical unit: if the availability update is refused after the insert, the
    /// new record is deleted again and a data error is reported.
    pub async fn borrow_book(
        &self,
        patron_id: &str,
        book_id: impl Into<RawBookId>,
    ) -> AppResult<(BorrowRecord, String)> {
        if !is_valid_patron_id(patron_id) {
            return Err(AppError::Validation(INVALID_PATRON_ID.to_string()));
        }
        let raw: RawBookId = book_id.into();
        let book_id = parse_book_id(&raw, "Invalid book id.")?;

        let book = self
            .repository
            .get_book(book_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found.".to_string()))?;

        if book.available_copies <= 0 {
            return Err(AppError::Unavailable(
                "This book is currently not available.".to_string(),
            ));
        }

        let active = self.repository.count_active_borrows(patron_id).await?;
        if active >= self.policy.max_active_borrows {
            tracing::warn!("Borrow refused: patron {} holds {} books", patron_id, active);
            return Err(AppError::LimitReached(format!(
                "You have reached the maximum borrowing limit of {} books.",
                self.policy.max_active_borrows
            )));
        }

        let borrow_date = Utc::now();
        let due_date = borrow_date + Duration::days(self.policy.loan_period_days);

        let record = self
            .repository
            .insert_borrow(patron_id, book_id, borrow_date, due_date)
            .await
            .map_err(|e| {
                tracing::error!("Borrow record insert failed: {}", e);
                AppError::DataIntegrity(
                    "Database error occurred while creating borrow record.".to_string(),
                )
            })?;

        let taken = match self.repository.update_availability(book_id, -1).await {
            Ok(taken) => taken,
            Err(e) => {
                tracing::error!("Availability update failed for book {}: {}", book_id, e);
                false
            }
        };
        if !taken {
            // Lost the last copy to a concurrent borrower, or the store failed
            if let Err(e) = self.repository.delete_borrow(record.id).await {
                tracing::error!("Could not roll back borrow record {}: {}", record.id, e);
            }
            return Err(AppError::DataIntegrity(
                "Database error occurred while updating book availability.".to_string(),
            ));
        }

        tracing::info!(
            "Patron {} borrowed book {} (record {}), due {}",
            patron_id,
            book_id,
            record.id,
            due_date.format("%Y-%m-%d")
        );

        let message = format!(
            "Successfully borrowed \"{}\". Due date: {}.",
            book.title,
            due_date.format("%Y-%m-%d")
        );
        Ok((record, message))
    }

    /// Close the patron's active loan of `book_id` and put the copy back on the shelf.
    pub async fn return_book(
        &self,
        patron_id: &str,
        book_id: impl Into<RawBookId>,
    ) -> AppResult<String> {
        if !is_valid_patron_id(patron_id) {
            return Err(AppError::Validation(INVALID_PATRON_ID.to_string()));
        }
        let raw: RawBookId = book_id.into();
        let book_id = parse_book_id(&raw, "Invalid book id.")?;

        let book = self
            .repository
            .get_book(book_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found.".to_string()))?;

        let returned = self
            .repository
            .mark_returned(patron_id, book_id, Utc::now())
            .await?;
        if !returned {
            return Err(AppError::BusinessRule(
                "No active borrow for this patron and book.".to_string(),
            ));
        }

        if !self.repository.update_availability(book_id, 1).await? {
            return Err(AppError::DataIntegrity(
                "Database error occurred while updating availability.".to_string(),
            ));
        }

        tracing::info!("Patron {} returned book {}", patron_id, book_id);
        Ok(format!("Returned \"{}\".", book.title))
    }
}
