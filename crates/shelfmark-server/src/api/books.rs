use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde_json::Value;
use shelfmark_core::{Book, BookPatch, Chapter, NewBook, NewChapter};

use super::deleted;
use crate::error::AppError;
use crate::AppState;

/// List all books. Chapters are not embedded.
async fn list_books(State(state): State<AppState>) -> Result<Json<Vec<Book>>, AppError> {
    let books = state.db.list_books().await?;
    Ok(Json(books))
}

async fn add_book(
    State(state): State<AppState>,
    Json(req): Json<NewBook>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let draft = req.validated()?;
    let book = state.db.create_book(&draft).await?;
    tracing::debug!(book_id = %book.id, "book created");
    Ok((StatusCode::CREATED, Json(book)))
}

async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<BookPatch>,
) -> Result<Json<Book>, AppError> {
    let patch = req.validated()?;
    let book = state
        .db
        .update_book(id, &patch)
        .await?
        .ok_or_else(|| AppError::not_found("Book", id))?;
    Ok(Json(book))
}

async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    if !state.db.delete_book(id).await? {
        return Err(AppError::not_found("Book", id));
    }
    Ok(deleted())
}

async fn add_chapter(
    State(state): State<AppState>,
    Path(book_id): Path<i64>,
    Json(req): Json<NewChapter>,
) -> Result<(StatusCode, Json<Chapter>), AppError> {
    let draft = req.validated()?;
    let chapter = state
        .db
        .create_chapter(book_id, &draft)
        .await?
        .ok_or_else(|| AppError::not_found("Book", book_id))?;
    Ok((StatusCode::CREATED, Json(chapter)))
}

/// Chapters of a book ordered by chapter number
async fn list_chapters(
    State(state): State<AppState>,
    Path(book_id): Path<i64>,
) -> Result<Json<Vec<Chapter>>, AppError> {
    let chapters = state
        .db
        .list_chapters(book_id)
        .await?
        .ok_or_else(|| AppError::not_found("Book", book_id))?;
    Ok(Json(chapters))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/books/list/", get(list_books))
        .route("/books/add/", post(add_book))
        .route("/books/{id}/update/", patch(update_book))
        .route("/books/{id}/delete/", delete(delete_book))
        .route("/books/{id}/add-chapter/", post(add_chapter))
        .route("/books/{id}/chapters/", get(list_chapters))
}
