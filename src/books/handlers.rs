use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tracing::{info, instrument, warn};

use super::{
    dto::{BookResponse, BooksResponse, MessageResponse, BOOK_CREATE, BOOK_UPDATE},
    repo_types::{Book, BookFilter, BookUpdate},
};
use crate::{error::ApiError, schema, state::AppState};

pub fn book_routes() -> Router<AppState> {
    Router::new()
        .route("/books", get(list_books).post(create_book))
        .route(
            "/books/:isbn",
            get(get_book).put(update_book).delete(delete_book),
        )
}

fn not_found(isbn: &str) -> ApiError {
    warn!(%isbn, "book not found");
    ApiError::NotFound(format!("There is no book with an isbn '{isbn}'"))
}

#[instrument(skip(state, filter))]
pub async fn list_books(
    State(state): State<AppState>,
    filter: Result<Query<BookFilter>, QueryRejection>,
) -> Result<Json<BooksResponse>, ApiError> {
    let Query(filter) = filter.map_err(|e| ApiError::Validation(vec![e.body_text()]))?;
    let books = state.books.find_all(&filter).await?;
    Ok(Json(BooksResponse { books }))
}

#[instrument(skip(state))]
pub async fn get_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> Result<Json<BookResponse>, ApiError> {
    let book = state
        .books
        .find_one(&isbn)
        .await?
        .ok_or_else(|| not_found(&isbn))?;
    Ok(Json(BookResponse { book }))
}

#[instrument(skip(state, payload))]
pub async fn create_book(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<BookResponse>), ApiError> {
    let Json(payload) = payload?;
    let book: Book = schema::parse(&BOOK_CREATE, payload)?;
    let book = state.books.create(&book).await?;
    info!(isbn = %book.isbn, "book created");
    Ok((StatusCode::CREATED, Json(BookResponse { book })))
}

#[instrument(skip(state, payload))]
pub async fn update_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<BookResponse>, ApiError> {
    let Json(payload) = payload?;
    let update: BookUpdate = schema::parse(&BOOK_UPDATE, payload)?;
    let book = state
        .books
        .update(&isbn, &update)
        .await?
        .ok_or_else(|| not_found(&isbn))?;
    info!(%isbn, "book updated");
    Ok(Json(BookResponse { book }))
}

#[instrument(skip(state))]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state.books.remove(&isbn).await? {
        return Err(not_found(&isbn));
    }
    info!(%isbn, "book deleted");
    Ok(Json(MessageResponse {
        message: "Book deleted",
    }))
}
