//! Late fee payment and refund through the external gateway

use std::sync::Arc;

use rust_decimal::Decimal;

use super::{
    fees::{FeesService, MAX_LATE_FEE},
    gateway::{PaymentGateway, TRANSACTION_PREFIX},
    parse_book_id,
};
use crate::{
    error::{AppError, AppResult},
    models::{is_valid_patron_id, patron::INVALID_PATRON_ID, PaymentReceipt, RawBookId},
    repository::Repository,
};

const GATEWAY_REQUIRED: &str = "Payment gateway is required.";

#[derive(Clone)]
pub struct PaymentsService {
    repository: Repository,
    fees: FeesService,
    gateway: Option<Arc<dyn PaymentGateway>>,
}

impl PaymentsService {
    pub fn new(
        repository: Repository,
        fees: FeesService,
        gateway: Option<Arc<dyn PaymentGateway>>,
    ) -> Self {
        Self {
            repository,
            fees,
            gateway,
        }
    }

    fn gateway(&self) -> AppResult<&Arc<dyn PaymentGateway>> {
        self.gateway
            .as_ref()
            .ok_or_else(|| AppError::Payment(GATEWAY_REQUIRED.to_string()))
    }

    /// Charge the late fee currently owed on the patron's loan of `book_id`.
    ///
    /// The gateway is only contacted when the ids are well formed, the book exists
    /// and a late fee is due. Nothing is recorded against the loan afterwards, so a
    /// second call for the same loan charges again.
    pub async fn pay_late_fees(
        &self,
        patron_id: &str,
        book_id: impl Into<RawBookId>,
    ) -> AppResult<PaymentReceipt> {
        if !is_valid_patron_id(patron_id) {
            return Err(AppError::Validation(INVALID_PATRON_ID.to_string()));
        }
        let raw: RawBookId = book_id.into();
        let book_id = parse_book_id(&raw, "Invalid book ID.")?;

        if self.repository.get_book(book_id).await?.is_none() {
            return Err(AppError::NotFound("Book not found.".to_string()));
        }

        let fee = self.fees.calculate_late_fee(patron_id, book_id).await?;
        if !fee.is_payable() {
            return Err(AppError::BusinessRule(
                "No late fees due for this book.".to_string(),
            ));
        }

        let gateway = self.gateway()?;
        let description = format!("Late fee for book {}", book_id);

        let response = gateway
            .process_payment(patron_id, fee.fee_amount, &description)
            .await
            .map_err(|e| {
                tracing::error!("Payment gateway error for patron {}: {}", patron_id, e);
                AppError::Payment(format!("Payment failed due to a gateway error: {}", e))
            })?;

        if !response.success {
            tracing::warn!("Payment declined for patron {}: {}", patron_id, response.message);
            return Err(AppError::Payment(format!("Payment failed: {}", response.message)));
        }

        let transaction_id = response.transaction_id.ok_or_else(|| {
            AppError::Payment("Payment failed: gateway returned no transaction id".to_string())
        })?;

        tracing::info!(
            "Late fee {} paid by patron {} for book {} ({})",
            fee.fee_amount,
            patron_id,
            book_id,
            transaction_id
        );
        Ok(PaymentReceipt {
            transaction_id,
            amount: fee.fee_amount,
            message: format!("Late fee payment successful: {}", response.message),
        })
    }

    /// Refund a previous late fee charge. Amounts are bounded by the largest
    /// fee a single loan can accrue.
    pub async fn refund_late_fee_payment(
        &self,
        transaction_id: &str,
        amount: Decimal,
    ) -> AppResult<String> {
        if transaction_id.is_empty() || !transaction_id.starts_with(TRANSACTION_PREFIX) {
            return Err(AppError::Validation("Invalid transaction ID.".to_string()));
        }
        if amount <= Decimal::ZERO {
            return Err(AppError::Validation(
                "Refund amount must be greater than 0.".to_string(),
            ));
        }
        if amount > MAX_LATE_FEE {
            return Err(AppError::Validation(format!(
                "Refund amount cannot exceed ${:.2}.",
                MAX_LATE_FEE
            )));
        }

        let gateway = self.gateway()?;
        let response = gateway
            .refund_payment(transaction_id, amount)
            .await
            .map_err(|e| {
                tracing::error!("Refund gateway error for {}: {}", transaction_id, e);
                AppError::Payment(format!("Refund failed due to a gateway error: {}", e))
            })?;

        if !response.success {
            return Err(AppError::Payment(format!("Refund failed: {}", response.message)));
        }

        tracing::info!("Refunded {} on {}", amount, transaction_id);
        Ok(response.message)
    }
}
