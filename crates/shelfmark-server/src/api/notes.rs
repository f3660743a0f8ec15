use axum::{
    extract::{Path, State},
    routing::{delete, patch},
    Json, Router,
};
use serde_json::Value;
use shelfmark_core::{ChapterNote, NotePatch};

use super::deleted;
use crate::error::AppError;
use crate::AppState;

async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<NotePatch>,
) -> Result<Json<ChapterNote>, AppError> {
    let patch = req.validated()?;
    let note = state
        .db
        .update_note(id, &patch)
        .await?
        .ok_or_else(|| AppError::not_found("Note", id))?;
    Ok(Json(note))
}

async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    if !state.db.delete_note(id).await? {
        return Err(AppError::not_found("Note", id));
    }
    Ok(deleted())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/books/note/{id}/update/", patch(update_note))
        .route("/books/note/{id}/delete/", delete(delete_note))
}
