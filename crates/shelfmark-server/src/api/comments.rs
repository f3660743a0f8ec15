use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::Value;
use shelfmark_core::{NewComment, NoteComment};

use super::deleted;
use crate::error::AppError;
use crate::AppState;

/// Comments on a note, newest first
async fn list_comments(
    State(state): State<AppState>,
    Path(note_id): Path<i64>,
) -> Result<Json<Vec<NoteComment>>, AppError> {
    let comments = state
        .db
        .list_comments(note_id)
        .await?
        .ok_or_else(|| AppError::not_found("Note", note_id))?;
    Ok(Json(comments))
}

async fn add_comment(
    State(state): State<AppState>,
    Path(note_id): Path<i64>,
    Json(req): Json<NewComment>,
) -> Result<(StatusCode, Json<NoteComment>), AppError> {
    let draft = req.validated()?;
    let comment = state
        .db
        .create_comment(note_id, &draft)
        .await?
        .ok_or_else(|| AppError::not_found("Note", note_id))?;
    Ok((StatusCode::CREATED, Json(comment)))
}

async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    if !state.db.delete_comment(id).await? {
        return Err(AppError::not_found("Comment", id));
    }
    Ok(deleted())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/books/note/{id}/comments/", get(list_comments))
        .route("/books/note/{id}/add-comment/", post(add_comment))
        .route("/books/comment/{id}/delete/", delete(delete_comment))
}
