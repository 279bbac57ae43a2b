use axum::http::StatusCode;
use serde_json::json;

use crate::common::{spawn_app, spawn_app_with_gateway, PATRON};

#[tokio::test]
async fn test_pay_and_refund_late_fee() {
    let app = spawn_app();
    let book_id = app.add_book("Late", "9780000000300", 1).await;
    app.overdue_loan(PATRON, book_id, 9).await;

    let (status, body) = app
        .post("/payments", json!({ "patron_id": PATRON, "book_id": book_id }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount"].as_f64(), Some(5.5));
    let transaction_id = body["transaction_id"].as_str().unwrap().to_string();
    assert!(transaction_id.starts_with("txn_"));
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Late fee payment successful"));

    let (status, body) = app
        .post("/refunds", json!({ "transaction_id": transaction_id, "amount": 5.5 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("Refund ID: refund_"));
}

#[tokio::test]
async fn test_payment_without_fee() {
    let app = spawn_app();
    let book_id = app.add_book("On time", "9780000000301", 1).await;
    app.post("/borrows", json!({ "patron_id": PATRON, "book_id": book_id })).await;

    let (status, body) = app
        .post("/payments", json!({ "patron_id": PATRON, "book_id": book_id }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "No late fees due for this book.");

    let (status, body) = app
        .post("/payments", json!({ "patron_id": PATRON, "book_id": "x1" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid book ID.");
}

#[tokio::test]
async fn test_payment_requires_gateway() {
    let app = spawn_app_with_gateway(None);
    let book_id = app.add_book("Late", "9780000000302", 1).await;
    app.overdue_loan(PATRON, book_id, 3).await;

    let (status, body) = app
        .post("/payments", json!({ "patron_id": PATRON, "book_id": book_id }))
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["message"], "Payment gateway is required.");
}

#[tokio::test]
async fn test_refund_validation() {
    let app = spawn_app();

    let (status, body) = app
        .post("/refunds", json!({ "transaction_id": "abc", "amount": 1.0 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid transaction ID.");

    let (status, body) = app
        .post("/refunds", json!({ "transaction_id": "txn_1", "amount": 0 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Refund amount must be greater than 0.");

    let (status, body) = app
        .post("/refunds", json!({ "transaction_id": "txn_1", "amount": 15.01 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Refund amount cannot exceed $15.00.");
}

#[tokio::test]
async fn test_refund_of_maximum_fee() {
    let app = spawn_app();

    let (status, body) = app
        .post("/refunds", json!({ "transaction_id": "txn_1", "amount": 15.0 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["message"].as_str().unwrap().contains("$15.00"));
}
