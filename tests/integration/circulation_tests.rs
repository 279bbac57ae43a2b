use axum::http::StatusCode;
use serde_json::json;

use crate::common::{spawn_app, PATRON};

#[tokio::test]
async fn test_borrow_and_return() {
    let app = spawn_app();
    let book_id = app.add_book("Dune", "9780441172719", 2).await;

    let (status, body) = app
        .post("/borrows", json!({ "patron_id": PATRON, "book_id": book_id }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Successfully borrowed \"Dune\". Due date: "));

    let (_, book) = app.get(&format!("/books/{}", book_id)).await;
    assert_eq!(book["available_copies"], 1);

    // Numeric strings are accepted as book ids
    let (status, body) = app
        .post("/returns", json!({ "patron_id": PATRON, "book_id": book_id.to_string() }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Returned \"Dune\".");

    let (_, book) = app.get(&format!("/books/{}", book_id)).await;
    assert_eq!(book["available_copies"], 2);

    let (status, body) = app
        .post("/returns", json!({ "patron_id": PATRON, "book_id": book_id }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "No active borrow for this patron and book.");
}

#[tokio::test]
async fn test_borrow_rejections() {
    let app = spawn_app();
    let book_id = app.add_book("Solo", "9780000000001", 1).await;

    let (status, body) = app
        .post("/borrows", json!({ "patron_id": "12345", "book_id": book_id }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid patron ID. Must be exactly 6 digits.");

    let (status, body) = app
        .post("/borrows", json!({ "patron_id": PATRON, "book_id": 999 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Book not found.");

    let (status, _) = app
        .post("/borrows", json!({ "patron_id": PATRON, "book_id": book_id }))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .post("/borrows", json!({ "patron_id": "654321", "book_id": book_id }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "This book is currently not available.");
}

#[tokio::test]
async fn test_borrow_limit() {
    let app = spawn_app();
    for i in 0..5 {
        let id = app.add_book(&format!("Book {}", i), &format!("978000000001{}", i), 1).await;
        let (status, _) = app
            .post("/borrows", json!({ "patron_id": PATRON, "book_id": id }))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let sixth = app.add_book("Book 5", "9780000000025", 1).await;
    let (status, body) = app
        .post("/borrows", json!({ "patron_id": PATRON, "book_id": sixth }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "MaxBorrowsReached");
    assert_eq!(
        body["message"],
        "You have reached the maximum borrowing limit of 5 books."
    );

    let (_, book) = app.get(&format!("/books/{}", sixth)).await;
    assert_eq!(book["available_copies"], 1);
}

#[tokio::test]
async fn test_late_fee_endpoint() {
    let app = spawn_app();
    let book_id = app.add_book("Late", "9780000000100", 1).await;
    app.overdue_loan(PATRON, book_id, 10).await;

    let (status, body) = app.get(&format!("/fees/{}/{}", PATRON, book_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "late");
    assert_eq!(body["days_overdue"], 10);
    assert_eq!(body["fee_amount"].as_f64(), Some(6.5));

    let (_, body) = app.get(&format!("/fees/{}/abc", PATRON)).await;
    assert_eq!(body["status"], "no_active_loan");
    assert_eq!(body["fee_amount"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn test_patron_status_report() {
    let app = spawn_app();
    let late = app.add_book("Overdue", "9780000000200", 1).await;
    let fresh = app.add_book("Fresh", "9780000000201", 1).await;
    let returned = app.add_book("Returned", "9780000000202", 1).await;

    app.overdue_loan(PATRON, late, 8).await;
    app.post("/borrows", json!({ "patron_id": PATRON, "book_id": fresh })).await;
    app.post("/borrows", json!({ "patron_id": PATRON, "book_id": returned })).await;
    app.post("/returns", json!({ "patron_id": PATRON, "book_id": returned })).await;

    let (status, body) = app.get(&format!("/patrons/{}/status", PATRON)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["counts"]["currently_borrowed"], 2);
    assert_eq!(body["counts"]["history_total"], 3);
    assert_eq!(body["total_late_fees"].as_f64(), Some(4.5));
    assert_eq!(body["current_loans"].as_array().unwrap().len(), 2);
    assert!(body.get("error").is_none());

    let (status, body) = app.get("/patrons/12ab56/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], "Invalid patron ID. Must be exactly 6 digits.");
    assert_eq!(body["counts"]["currently_borrowed"], 0);
}
