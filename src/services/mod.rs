//! Business logic services

pub mod catalog;
pub mod fees;
pub mod gateway;
pub mod loans;
pub mod patrons;
pub mod payments;

use std::sync::Arc;

use crate::{
    config::LoanPolicy,
    error::{AppError, AppResult},
    models::RawBookId,
    repository::Repository,
};

use gateway::PaymentGateway;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
    pub fees: fees::FeesService,
    pub patrons: patrons::PatronsService,
    pub payments: payments::PaymentsService,
}

impl Services {
    /// Create all services over one repository and an optional payment gateway
    pub fn new(
        repository: Repository,
        policy: LoanPolicy,
        gateway: Option<Arc<dyn PaymentGateway>>,
    ) -> Self {
        let fees = fees::FeesService::new(repository.clone());
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            loans: loans::LoansService::new(repository.clone(), policy),
            patrons: patrons::PatronsService::new(repository.clone()),
            payments: payments::PaymentsService::new(repository.clone(), fees.clone(), gateway),
            fees,
            repository,
        }
    }
}

/// Coerce a client-supplied book id, rejecting anything non-numeric
pub(crate) fn parse_book_id(raw: &RawBookId, message: &str) -> AppResult<i32> {
    raw.parse()
        .ok_or_else(|| AppError::Validation(message.to_string()))
}
