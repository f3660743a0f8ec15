pub mod api;
pub mod config;
pub mod db;
pub mod error;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Database;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

/// Build the full application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(api::router())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Serve the application on an already bound listener
pub async fn serve(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    axum::serve(listener, app(state)).await?;
    Ok(())
}

/// Run the server with the given configuration
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let db = Database::connect(&config.database_url, config.max_connections).await?;
    db.migrate().await?;

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    serve(listener, AppState { db }).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn test_app() -> Router {
        let db = Database::in_memory().await.unwrap();
        db.migrate().await.unwrap();
        app(AppState { db })
    }

    async fn call(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn create_book(app: &Router) -> i64 {
        let (status, body) = call(
            app,
            Method::POST,
            "/books/add/",
            Some(json!({"title": "Dune", "author": "Herbert", "notes": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().parse().unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app().await;
        let (status, body) = call(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["database"], true);
    }

    #[tokio::test]
    async fn test_book_lifecycle() {
        let app = test_app().await;
        let id = create_book(&app).await;

        let (status, body) = call(&app, Method::GET, "/books/list/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["title"], "Dune");
        assert!(body[0]["createdAt"].is_string());

        let (status, body) = call(
            &app,
            Method::PATCH,
            &format!("/books/{}/update/", id),
            Some(json!({"title": "Dune Messiah"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Dune Messiah");
        assert_eq!(body["author"], "Herbert");

        let (status, _) = call(&app, Method::DELETE, &format!("/books/{}/delete/", id), None).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = call(&app, Method::GET, "/books/list/", None).await;
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_validation_and_not_found() {
        let app = test_app().await;

        let (status, body) = call(
            &app,
            Method::POST,
            "/books/add/",
            Some(json!({"title": "  ", "author": "Herbert"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Title cannot be empty");

        let (status, _) = call(
            &app,
            Method::PATCH,
            "/books/999/update/",
            Some(json!({"title": "X"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(&app, Method::DELETE, "/books/999/delete/", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(
            &app,
            Method::POST,
            "/books/999/add-chapter/",
            Some(json!({"title": "One", "chapterNumber": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_book_cascades() {
        let app = test_app().await;
        let book_id = create_book(&app).await;

        let (status, chapter) = call(
            &app,
            Method::POST,
            &format!("/books/{}/add-chapter/", book_id),
            Some(json!({"title": "One", "chapterNumber": 1, "bookId": book_id.to_string()})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let chapter_id = chapter["id"].as_str().unwrap().to_string();

        let (status, note) = call(
            &app,
            Method::POST,
            &format!("/books/chapter/{}/add-note/", chapter_id),
            Some(json!({"content": "Great opening", "author": "Bella"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(note["author"], "Bella");
        let note_id = note["id"].as_str().unwrap().to_string();

        call(&app, Method::DELETE, &format!("/books/{}/delete/", book_id), None).await;

        let (status, _) = call(
            &app,
            Method::GET,
            &format!("/books/chapter/{}/notes/", chapter_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(
            &app,
            Method::PATCH,
            &format!("/books/note/{}/update/", note_id),
            Some(json!({"content": "gone"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_chapters_listed_by_number() {
        let app = test_app().await;
        let book_id = create_book(&app).await;

        for (title, number) in [("Three", 3), ("One", 1), ("Two", 2)] {
            call(
                &app,
                Method::POST,
                &format!("/books/{}/add-chapter/", book_id),
                Some(json!({"title": title, "chapterNumber": number})),
            )
            .await;
        }

        let (status, body) = call(
            &app,
            Method::GET,
            &format!("/books/{}/chapters/", book_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let numbers: Vec<u64> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["chapterNumber"].as_u64().unwrap())
            .collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_chapter_and_note_updates_and_deletes() {
        let app = test_app().await;
        let book_id = create_book(&app).await;
        let (_, chapter) = call(
            &app,
            Method::POST,
            &format!("/books/{}/add-chapter/", book_id),
            Some(json!({"title": "One", "chapterNumber": 1})),
        )
        .await;
        let chapter_id = chapter["id"].as_str().unwrap().to_string();
        let (_, note) = call(
            &app,
            Method::POST,
            &format!("/books/chapter/{}/add-note/", chapter_id),
            Some(json!({"content": "draft", "author": "Serzh"})),
        )
        .await;
        let note_id = note["id"].as_str().unwrap().to_string();

        let (status, body) = call(
            &app,
            Method::PATCH,
            &format!("/books/chapter/{}/update/", chapter_id),
            Some(json!({"chapterNumber": 4})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "One");
        assert_eq!(body["chapterNumber"], 4);

        let (status, body) = call(
            &app,
            Method::PATCH,
            &format!("/books/note/{}/update/", note_id),
            Some(json!({"content": "final"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content"], "final");
        assert_eq!(body["author"], "Serzh");

        let (status, body) = call(
            &app,
            Method::DELETE,
            &format!("/books/note/{}/delete/", note_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (_, notes) = call(
            &app,
            Method::GET,
            &format!("/books/chapter/{}/notes/", chapter_id),
            None,
        )
        .await;
        assert!(notes.as_array().unwrap().is_empty());

        let (status, _) = call(
            &app,
            Method::DELETE,
            &format!("/books/chapter/{}/delete/", chapter_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, chapters) = call(
            &app,
            Method::GET,
            &format!("/books/{}/chapters/", book_id),
            None,
        )
        .await;
        assert!(chapters.as_array().unwrap().is_empty());

        let (status, _) = call(
            &app,
            Method::DELETE,
            &format!("/books/chapter/{}/delete/", chapter_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_note_author_must_be_known() {
        let app = test_app().await;
        let book_id = create_book(&app).await;
        let (_, chapter) = call(
            &app,
            Method::POST,
            &format!("/books/{}/add-chapter/", book_id),
            Some(json!({"title": "One", "chapterNumber": 1})),
        )
        .await;
        let chapter_id = chapter["id"].as_str().unwrap().to_string();

        let (status, _) = call(
            &app,
            Method::POST,
            &format!("/books/chapter/{}/add-note/", chapter_id),
            Some(json!({"content": "hi", "author": "Mallory"})),
        )
        .await;
        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn test_comments() {
        let app = test_app().await;
        let book_id = create_book(&app).await;
        let (_, chapter) = call(
            &app,
            Method::POST,
            &format!("/books/{}/add-chapter/", book_id),
            Some(json!({"title": "One", "chapterNumber": 1})),
        )
        .await;
        let chapter_id = chapter["id"].as_str().unwrap().to_string();
        let (_, note) = call(
            &app,
            Method::POST,
            &format!("/books/chapter/{}/add-note/", chapter_id),
            Some(json!({"content": "hi", "author": "Serzh"})),
        )
        .await;
        let note_id = note["id"].as_str().unwrap().to_string();

        let (status, comment) = call(
            &app,
            Method::POST,
            &format!("/books/note/{}/add-comment/", note_id),
            Some(json!({"content": "agreed", "author": "Bella"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let comment_id = comment["id"].as_str().unwrap().to_string();

        let (_, list) = call(
            &app,
            Method::GET,
            &format!("/books/note/{}/comments/", note_id),
            None,
        )
        .await;
        assert_eq!(list.as_array().unwrap().len(), 1);
        assert_eq!(list[0]["content"], "agreed");

        let (status, _) = call(
            &app,
            Method::DELETE,
            &format!("/books/comment/{}/delete/", comment_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, list) = call(
            &app,
            Method::GET,
            &format!("/books/note/{}/comments/", note_id),
            None,
        )
        .await;
        assert!(list.as_array().unwrap().is_empty());
    }
}
