use axum::http::StatusCode;
use serde_json::json;

use crate::common::spawn_app;

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app();
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["loans"]["loan_period_days"], 14);
    assert_eq!(body["loans"]["max_active_borrows"], 5);

    let (status, body) = app.get("/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_add_book() {
    let app = spawn_app();
    let (status, body) = app
        .post(
            "/books",
            json!({
                "title": "  The Rust Programming Language ",
                "author": "Steve Klabnik",
                "isbn": "9781718503106",
                "total_copies": 3
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["book"]["title"], "The Rust Programming Language");
    assert_eq!(body["book"]["available_copies"], 3);
    assert!(body["message"].as_str().unwrap().contains("successfully added"));

    let id = body["book"]["id"].as_i64().unwrap();
    let (status, book) = app.get(&format!("/books/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(book["isbn"], "9781718503106");
}

#[tokio::test]
async fn test_add_book_rejects_bad_fields() {
    let app = spawn_app();
    let (status, body) = app
        .post(
            "/books",
            json!({ "title": "T", "author": "A", "isbn": "12345", "total_copies": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "ISBN must be exactly 13 digits.");

    let (status, body) = app
        .post(
            "/books",
            json!({ "title": "T", "author": "A", "isbn": "1234567890123", "total_copies": 0 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Total copies must be a positive integer.");

    let (status, body) = app
        .post(
            "/books",
            json!({
                "title": "x".repeat(201),
                "author": "A",
                "isbn": "1234567890123",
                "total_copies": 1
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Title must be less than 200 characters.");

    let (_, books) = app.get("/books").await;
    assert_eq!(books.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_duplicate_isbn() {
    let app = spawn_app();
    app.add_book("First", "1234567890123", 1).await;

    let (status, body) = app
        .post(
            "/books",
            json!({ "title": "Second", "author": "A", "isbn": "1234567890123", "total_copies": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "A book with this ISBN already exists.");
}

#[tokio::test]
async fn test_search_books() {
    let app = spawn_app();
    app.add_book("Fluent Python", "9781492056355", 1).await;
    app.add_book("Python Tricks", "9781775093305", 1).await;
    app.add_book("Effective Java", "9780134685991", 1).await;

    let (status, body) = app.get("/books/search?q=PYTHON").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = app.get("/books/search?q=9780134685991&type=isbn").await;
    assert_eq!(body[0]["title"], "Effective Java");

    // ISBN match is exact
    let (_, body) = app.get("/books/search?q=978013468&type=isbn").await;
    assert!(body.as_array().unwrap().is_empty());

    let (_, body) = app.get("/books/search?q=java&type=publisher").await;
    assert!(body.as_array().unwrap().is_empty());

    let (_, body) = app.get("/books/search?q=%20%20").await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_book() {
    let app = spawn_app();
    let (status, body) = app.get("/books/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchItem");
}
