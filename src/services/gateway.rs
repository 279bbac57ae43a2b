//! Payment gateway clients
//!
//! The payments service talks to a [`PaymentGateway`]. Two implementations exist:
//! an HTTP client for a real processor and a local sandbox used for demos.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    config::{PaymentConfig, PaymentProvider},
    models::{PaymentResponse, RefundResponse},
};

/// Prefix every gateway-issued transaction id carries
pub const TRANSACTION_PREFIX: &str = "txn_";

/// Transport or API failure while talking to the gateway.
/// A declined charge is not an error: it is a response with `success = false`.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("gateway API error: {0}")]
    Api(String),

    #[error("gateway unavailable: {0}")]
    Unavailable(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Charge `amount` to the patron. One attempt, no retry.
    async fn process_payment(
        &self,
        patron_id: &str,
        amount: Decimal,
        description: &str,
    ) -> Result<PaymentResponse, GatewayError>;

    /// Refund part or all of a previous charge
    async fn refund_payment(
        &self,
        transaction_id: &str,
        amount: Decimal,
    ) -> Result<RefundResponse, GatewayError>;
}

/// Build the gateway selected by configuration; `disabled` yields `None`.
pub fn from_config(
    config: &PaymentConfig,
) -> Result<Option<Arc<dyn PaymentGateway>>, GatewayError> {
    let gateway: Arc<dyn PaymentGateway> = match config.provider {
        PaymentProvider::Disabled => return Ok(None),
        PaymentProvider::Sandbox => Arc::new(SandboxPaymentGateway::default()),
        PaymentProvider::Http => Arc::new(HttpPaymentGateway::new(config)?),
    };
    Ok(Some(gateway))
}

#[derive(Serialize)]
struct ChargeBody<'a> {
    patron_id: &'a str,
    amount: Decimal,
    description: &'a str,
}

#[derive(Serialize)]
struct RefundBody<'a> {
    transaction_id: &'a str,
    amount: Decimal,
}

/// JSON-over-HTTP processor client
pub struct HttpPaymentGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpPaymentGateway {
    pub fn new(config: &PaymentConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, GatewayError>
    where
        B: Serialize + ?Sized + Sync,
        R: serde::de::DeserializeOwned,
    {
        let mut request = self.client.post(format!("{}{}", self.base_url, path)).json(body);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_server_error() {
            return Err(GatewayError::Unavailable(format!("HTTP {}", status)));
        }
        if !status.is_success() && status != reqwest::StatusCode::PAYMENT_REQUIRED {
            let text = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api(format!("HTTP {}: {}", status, text)));
        }

        // 402 still carries a decline body
        Ok(response.json::<R>().await?)
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn process_payment(
        &self,
        patron_id: &str,
        amount: Decimal,
        description: &str,
    ) -> Result<PaymentResponse, GatewayError> {
        let body = ChargeBody {
            patron_id,
            amount,
            description,
        };
        self.post("/payments", &body).await
    }

    async fn refund_payment(
        &self,
        transaction_id: &str,
        amount: Decimal,
    ) -> Result<RefundResponse, GatewayError> {
        let body = RefundBody {
            transaction_id,
            amount,
        };
        self.post("/refunds", &body).await
    }
}

/// Local stand-in that approves everything up to `limit`
#[derive(Debug, Clone)]
pub struct SandboxPaymentGateway {
    limit: Decimal,
}

impl SandboxPaymentGateway {
    pub fn with_limit(limit: Decimal) -> Self {
        Self { limit }
    }
}

impl Default for SandboxPaymentGateway {
    fn default() -> Self {
        Self::with_limit(Decimal::from(1000))
    }
}

#[async_trait]
impl PaymentGateway for SandboxPaymentGateway {
    async fn process_payment(
        &self,
        patron_id: &str,
        amount: Decimal,
        description: &str,
    ) -> Result<PaymentResponse, GatewayError> {
        if amount <= Decimal::ZERO {
            return Ok(PaymentResponse {
                success: false,
                transaction_id: None,
                message: "Invalid amount: must be greater than 0".to_string(),
            });
        }
        if amount > self.limit {
            return Ok(PaymentResponse {
                success: false,
                transaction_id: None,
                message: "Payment declined: amount exceeds limit".to_string(),
            });
        }

        let transaction_id = format!("{}{}", TRANSACTION_PREFIX, Uuid::new_v4().simple());
        tracing::debug!(
            "Sandbox charge {} for patron {}: {}",
            transaction_id,
            patron_id,
            description
        );
        Ok(PaymentResponse {
            success: true,
            transaction_id: Some(transaction_id),
            message: format!("Payment of ${:.2} processed successfully", amount),
        })
    }

    async fn refund_payment(
        &self,
        transaction_id: &str,
        amount: Decimal,
    ) -> Result<RefundResponse, GatewayError> {
        if !transaction_id.starts_with(TRANSACTION_PREFIX) {
            return Ok(RefundResponse {
                success: false,
                message: "Invalid transaction ID".to_string(),
            });
        }
        if amount <= Decimal::ZERO {
            return Ok(RefundResponse {
                success: false,
                message: "Invalid refund amount".to_string(),
            });
        }

        Ok(RefundResponse {
            success: true,
            message: format!(
                "Refund of ${:.2} processed successfully. Refund ID: refund_{}",
                amount,
                Uuid::new_v4().simple()
            ),
        })
    }
}
