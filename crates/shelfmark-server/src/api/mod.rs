mod books;
mod chapters;
mod comments;
mod health;
mod notes;

use axum::{Json, Router};
use serde_json::{json, Value};

use crate::AppState;

/// Create the API router
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(books::router())
        .merge(chapters::router())
        .merge(notes::router())
        .merge(comments::router())
}

/// Body returned by every successful delete
pub(crate) fn deleted() -> Json<Value> {
    Json(json!({ "success": true }))
}
