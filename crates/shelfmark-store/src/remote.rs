//! Remote strategy: the HTTP backend.
//!
//! Every call returns a [`RemoteResult`]. Transport failures, non-2xx statuses
//! and undecodable bodies all come back as [`RemoteError`]; deciding what to do
//! about them is the caller's business.

use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shelfmark_core::{
    Author, Book, BookPatch, Chapter, ChapterNote, ChapterPatch, EntityId, NewBook, NewChapter,
    NewComment, NewNote, NoteComment, NotePatch,
};
use std::time::Duration;
use url::Url;

use crate::error::{RemoteError, RemoteResult};

/// Minimal acknowledgement of a created record
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Created {
    id: EntityId,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

/// Chapter as listed by the backend; `bookId` and notes are not guaranteed
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteChapter {
    id: EntityId,
    title: String,
    chapter_number: u32,
}

/// Note as returned by the backend; `chapterId` is not guaranteed
#[derive(Debug, Deserialize)]
struct RemoteNote {
    id: EntityId,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    author: Option<Author>,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug)]
pub struct RemoteStrategy {
    client: Client,
    base: Url,
}

impl RemoteStrategy {
    pub fn new(base: Url, timeout: Duration) -> RemoteResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// `{base}/seg/seg/.../` with each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> RemoteResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::InvalidBase(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments)
            .push("");
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> RemoteResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status));
        }
        Ok(response)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> RemoteResult<T> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> RemoteResult<T> {
        let url = self.endpoint(segments)?;
        let response = self.send(self.client.get(url)).await?;
        Self::read_json(response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> RemoteResult<T> {
        let url = self.endpoint(segments)?;
        let response = self.send(self.client.post(url).json(body)).await?;
        Self::read_json(response).await
    }

    async fn patch<B: Serialize + ?Sized>(&self, segments: &[&str], body: &B) -> RemoteResult<()> {
        let url = self.endpoint(segments)?;
        self.send(self.client.patch(url).json(body)).await?;
        Ok(())
    }

    async fn delete(&self, segments: &[&str]) -> RemoteResult<()> {
        let url = self.endpoint(segments)?;
        self.send(self.client.delete(url)).await?;
        Ok(())
    }

    /// Books without their chapters
    pub async fn list_books(&self) -> RemoteResult<Vec<Book>> {
        let mut books: Vec<Book> = self.get_json(&["books", "list"]).await?;
        for book in &mut books {
            book.chapters.clear();
        }
        Ok(books)
    }

    pub async fn create_book(&self, draft: &NewBook) -> RemoteResult<Book> {
        let created: Created = self.post_json(&["books", "add"], draft).await?;
        Ok(Book::new(
            created.id,
            draft.clone(),
            created.created_at.unwrap_or_else(Utc::now),
        ))
    }

    pub async fn update_book(&self, id: &EntityId, patch: &BookPatch) -> RemoteResult<()> {
        self.patch(&["books", id.as_str(), "update"], patch).await
    }

    pub async fn delete_book(&self, id: &EntityId) -> RemoteResult<()> {
        self.delete(&["books", id.as_str(), "delete"]).await
    }

    /// Chapters of a book, without notes
    pub async fn list_chapters(&self, book_id: &EntityId) -> RemoteResult<Vec<Chapter>> {
        let chapters: Vec<RemoteChapter> =
            self.get_json(&["books", book_id.as_str(), "chapters"]).await?;
        Ok(chapters
            .into_iter()
            .map(|c| Chapter {
                id: c.id,
                book_id: book_id.clone(),
                title: c.title,
                chapter_number: c.chapter_number,
                notes: Vec::new(),
            })
            .collect())
    }

    pub async fn create_chapter(
        &self,
        book_id: &EntityId,
        draft: &NewChapter,
    ) -> RemoteResult<Chapter> {
        let created: Created = self
            .post_json(
                &["books", book_id.as_str(), "add-chapter"],
                &draft.to_request(book_id),
            )
            .await?;
        Ok(Chapter::new(created.id, book_id.clone(), draft.clone()))
    }

    pub async fn update_chapter(
        &self,
        chapter_id: &EntityId,
        patch: &ChapterPatch,
    ) -> RemoteResult<()> {
        self.patch(&["books", "chapter", chapter_id.as_str(), "update"], patch)
            .await
    }

    pub async fn delete_chapter(&self, chapter_id: &EntityId) -> RemoteResult<()> {
        self.delete(&["books", "chapter", chapter_id.as_str(), "delete"])
            .await
    }

    pub async fn list_notes(&self, chapter_id: &EntityId) -> RemoteResult<Vec<ChapterNote>> {
        let notes: Vec<RemoteNote> = self
            .get_json(&["books", "chapter", chapter_id.as_str(), "notes"])
            .await?;
        notes
            .into_iter()
            .map(|n| {
                let (Some(content), Some(author), Some(timestamp)) =
                    (n.content, n.author, n.timestamp)
                else {
                    return Err(RemoteError::Decode(serde::de::Error::custom(format!(
                        "note {} is missing content, author or timestamp",
                        n.id
                    ))));
                };
                Ok(ChapterNote {
                    id: n.id,
                    chapter_id: chapter_id.clone(),
                    content,
                    author,
                    timestamp,
                })
            })
            .collect()
    }

    pub async fn create_note(
        &self,
        chapter_id: &EntityId,
        draft: &NewNote,
    ) -> RemoteResult<ChapterNote> {
        let created: RemoteNote = self
            .post_json(
                &["books", "chapter", chapter_id.as_str(), "add-note"],
                &draft.to_request(chapter_id),
            )
            .await?;
        Ok(ChapterNote {
            id: created.id,
            chapter_id: chapter_id.clone(),
            content: created.content.unwrap_or_else(|| draft.content.clone()),
            author: created.author.unwrap_or(draft.author),
            timestamp: created.timestamp.unwrap_or_else(Utc::now),
        })
    }

    pub async fn update_note(&self, note_id: &EntityId, patch: &NotePatch) -> RemoteResult<()> {
        self.patch(&["books", "note", note_id.as_str(), "update"], patch)
            .await
    }

    pub async fn delete_note(&self, note_id: &EntityId) -> RemoteResult<()> {
        self.delete(&["books", "note", note_id.as_str(), "delete"])
            .await
    }

    pub async fn list_comments(&self, note_id: &EntityId) -> RemoteResult<Vec<NoteComment>> {
        self.get_json(&["books", "note", note_id.as_str(), "comments"])
            .await
    }

    pub async fn add_comment(
        &self,
        note_id: &EntityId,
        draft: &NewComment,
    ) -> RemoteResult<NoteComment> {
        self.post_json(&["books", "note", note_id.as_str(), "add-comment"], draft)
            .await
    }

    pub async fn delete_comment(&self, comment_id: &EntityId) -> RemoteResult<()> {
        self.delete(&["books", "comment", comment_id.as_str(), "delete"])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(base: &str) -> RemoteStrategy {
        RemoteStrategy::new(Url::parse(base).unwrap(), Duration::from_secs(2)).unwrap()
    }

    #[test]
    fn test_endpoint_paths() {
        let r = remote("http://localhost:8000");
        assert_eq!(
            r.endpoint(&["books", "list"]).unwrap().as_str(),
            "http://localhost:8000/books/list/"
        );

        let r = remote("http://localhost:8000/api/");
        assert_eq!(r.base().path(), "/api/");
        assert_eq!(
            r.endpoint(&["books", "chapter", "7", "add-note"]).unwrap().as_str(),
            "http://localhost:8000/api/books/chapter/7/add-note/"
        );
    }

    #[test]
    fn test_endpoint_escapes_ids() {
        let r = remote("http://localhost:8000");
        assert_eq!(
            r.endpoint(&["books", "a/b", "delete"]).unwrap().as_str(),
            "http://localhost:8000/books/a%2Fb/delete/"
        );
    }

    #[test]
    fn test_created_accepts_integer_ids() {
        let created: Created =
            serde_json::from_str(r#"{"id": 12, "title": "Dune", "author": "Herbert"}"#).unwrap();
        assert_eq!(created.id.as_str(), "12");
        assert!(created.created_at.is_none());
    }

    #[test]
    fn test_remote_note_shape() {
        let json = r#"{
            "id": 3,
            "content": "hi",
            "author": "Serzh",
            "timestamp": "2024-05-01T10:00:00+00:00"
        }"#;
        let note: RemoteNote = serde_json::from_str(json).unwrap();
        assert_eq!(note.author, Some(Author::Serzh));
        assert!(note.timestamp.is_some());
    }
}
