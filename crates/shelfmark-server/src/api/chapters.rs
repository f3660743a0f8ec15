use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde_json::Value;
use shelfmark_core::{Chapter, ChapterNote, ChapterPatch, NewNote};

use super::deleted;
use crate::error::AppError;
use crate::AppState;

async fn update_chapter(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<ChapterPatch>,
) -> Result<Json<Chapter>, AppError> {
    let patch = req.validated()?;
    let chapter = state
        .db
        .update_chapter(id, &patch)
        .await?
        .ok_or_else(|| AppError::not_found("Chapter", id))?;
    Ok(Json(chapter))
}

/// Delete a chapter and its notes
async fn delete_chapter(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    if !state.db.delete_chapter(id).await? {
        return Err(AppError::not_found("Chapter", id));
    }
    Ok(deleted())
}

async fn add_note(
    State(state): State<AppState>,
    Path(chapter_id): Path<i64>,
    Json(req): Json<NewNote>,
) -> Result<(StatusCode, Json<ChapterNote>), AppError> {
    let draft = req.validated()?;
    let note = state
        .db
        .create_note(chapter_id, &draft)
        .await?
        .ok_or_else(|| AppError::not_found("Chapter", chapter_id))?;
    Ok((StatusCode::CREATED, Json(note)))
}

async fn list_notes(
    State(state): State<AppState>,
    Path(chapter_id): Path<i64>,
) -> Result<Json<Vec<ChapterNote>>, AppError> {
    let notes = state
        .db
        .list_notes(chapter_id)
        .await?
        .ok_or_else(|| AppError::not_found("Chapter", chapter_id))?;
    Ok(Json(notes))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/books/chapter/{id}/update/", patch(update_chapter))
        .route("/books/chapter/{id}/delete/", delete(delete_chapter))
        .route("/books/chapter/{id}/add-note/", post(add_note))
        .route("/books/chapter/{id}/notes/", get(list_notes))
}
