use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::Value;
use tower::ServiceExt;

use shelfmark_server::{
    api,
    config::{
        AppConfig, DatabaseConfig, LoanPolicy, LoggingConfig, PaymentConfig, ServerConfig,
        StorageBackend,
    },
    models::NewBook,
    repository::{InMemoryRepository, LibraryRepository},
    services::{
        gateway::{PaymentGateway, SandboxPaymentGateway},
        Services,
    },
    AppState,
};

pub const PATRON: &str = "123456";

pub struct TestApp {
    pub router: Router,
    pub repository: Arc<InMemoryRepository>,
}

pub fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig::default(),
        database: DatabaseConfig {
            backend: StorageBackend::Memory,
            ..DatabaseConfig::default()
        },
        logging: LoggingConfig::default(),
        loans: LoanPolicy::default(),
        payment: PaymentConfig::default(),
    }
}

pub fn spawn_app() -> TestApp {
    spawn_app_with_gateway(Some(Arc::new(SandboxPaymentGateway::default())))
}

pub fn spawn_app_with_gateway(gateway: Option<Arc<dyn PaymentGateway>>) -> TestApp {
    let config = test_config();
    let repository = Arc::new(InMemoryRepository::new());
    let services = Services::new(repository.clone(), config.loans, gateway);
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    TestApp {
        router: api::create_router(state),
        repository,
    }
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .uri(format!("/api/v1{}", uri))
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(format!("/api/v1{}", uri))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    /// Insert a book straight into the store and return its id
    pub async fn add_book(&self, title: &str, isbn: &str, copies: i32) -> i32 {
        self.repository
            .insert_book(&NewBook::new(title, "Test Author", isbn, copies))
            .await
            .unwrap()
            .id
    }

    /// Record a loan that fell due `days_late` days ago
    pub async fn overdue_loan(&self, patron_id: &str, book_id: i32, days_late: i64) {
        let due = Utc::now() - Duration::days(days_late);
        self.repository
            .insert_borrow(patron_id, book_id, due - Duration::days(14), due)
            .await
            .unwrap();
        assert!(self.repository.update_availability(book_id, -1).await.unwrap());
    }
}
