//! Catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{book::BookSearchQuery, Book, NewBook},
    AppState,
};

/// Add book response
#[derive(Serialize, ToSchema)]
pub struct AddBookResponse {
    pub success: bool,
    pub message: String,
    pub book: Book,
}

/// List the whole catalog
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "All books", body = Vec<Book>)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.list_books().await?;
    Ok(Json(books))
}

/// Get a book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Add a book to the catalog
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = NewBook,
    responses(
        (status = 201, description = "Book added", body = AddBookResponse),
        (status = 400, description = "Invalid field"),
        (status = 409, description = "ISBN already in catalog")
    )
)]
pub async fn add_book(
    State(state): State<AppState>,
    Json(request): Json<NewBook>,
) -> AppResult<(StatusCode, Json<AddBookResponse>)> {
    let (book, message) = state.services.catalog.add_book(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(AddBookResponse {
            success: true,
            message,
            book,
        }),
    ))
}

/// Search the catalog by title, author or ISBN
#[utoipa::path(
    get,
    path = "/books/search",
    tag = "books",
    params(BookSearchQuery),
    responses(
        (status = 200, description = "Matching books", body = Vec<Book>)
    )
)]
pub async fn search_books(
    State(state): State<AppState>,
    Query(query): Query<BookSearchQuery>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state
        .services
        .catalog
        .search_books(
            query.q.as_deref().unwrap_or_default(),
            query.search_type.as_deref().unwrap_or("title"),
        )
        .await?;
    Ok(Json(books))
}
