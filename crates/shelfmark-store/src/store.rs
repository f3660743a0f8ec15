//! # Library store
//!
//! [`LibraryStore`] is the single persistence entry point for books, chapters
//! and notes. It owns a [`LocalStrategy`] and, when a backend URL is configured,
//! a [`RemoteStrategy`].
//!
//! ## Fallback protocol
//!
//! 1. Drafts and patches are trimmed and checked first. Failures return
//!    [`StoreError::Validation`] and nothing is persisted. An empty patch
//!    stops here as well.
//! 2. With a backend configured, the matching HTTP call is attempted. A 2xx
//!    response ends the operation.
//! 3. Without a backend, or after any [`RemoteError`], the same change is
//!    applied to the local library.
//!
//! The two sources are never merged or reconciled. Unknown ids are silent
//! no-ops on the local path. Comments exist only on the backend and have no
//! local fallback.

use shelfmark_core::{
    Book, BookPatch, Chapter, ChapterNote, ChapterPatch, EntityId, NewBook, NewChapter,
    NewComment, NewNote, NoteComment, NotePatch,
};
use tracing::{debug, warn};

use crate::error::{RemoteError, RemoteResult, StoreError};
use crate::local::LocalStrategy;
use crate::remote::RemoteStrategy;
use crate::storage::KeyValueStorage;

/// Keep a remote result, or log why the local path is being taken
fn remote_outcome<T>(operation: &'static str, result: RemoteResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(operation, error = %err, "remote call failed, falling back to local storage");
            None
        }
    }
}

fn log_remote_only<T>(operation: &'static str, result: RemoteResult<T>) -> Option<T> {
    result
        .map_err(|err: RemoteError| {
            warn!(operation, error = %err, "remote call failed");
        })
        .ok()
}

pub struct LibraryStore<S> {
    remote: Option<RemoteStrategy>,
    local: LocalStrategy<S>,
}

impl<S: KeyValueStorage> LibraryStore<S> {
    pub fn new(storage: S, remote: Option<RemoteStrategy>) -> Self {
        Self {
            remote,
            local: LocalStrategy::new(storage),
        }
    }

    /// A store that never talks to a backend
    pub fn local_only(storage: S) -> Self {
        Self::new(storage, None)
    }

    pub fn with_remote(storage: S, remote: RemoteStrategy) -> Self {
        Self::new(storage, Some(remote))
    }

    pub fn is_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub fn local(&self) -> &LocalStrategy<S> {
        &self.local
    }

    /// All books from one source.
    ///
    /// Books listed from the backend carry no chapters; use
    /// [`load_chapters`](Self::load_chapters) for a book's detail view.
    pub async fn list_books(&self) -> Result<Vec<Book>, StoreError> {
        if let Some(remote) = &self.remote {
            if let Some(books) = remote_outcome("list_books", remote.list_books().await) {
                return Ok(books);
            }
        }
        debug!("listing books from local storage");
        self.local.list_books().await
    }

    pub async fn create_book(&self, fields: NewBook) -> Result<Book, StoreError> {
        let draft = fields.validated()?;
        if let Some(remote) = &self.remote {
            if let Some(book) = remote_outcome("create_book", remote.create_book(&draft).await) {
                return Ok(book);
            }
        }
        self.local.create_book(draft).await
    }

    pub async fn update_book(&self, id: &EntityId, patch: BookPatch) -> Result<(), StoreError> {
        let patch = patch.validated()?;
        if patch.is_empty() {
            debug!(book_id = %id, "update_book: nothing to change");
            return Ok(());
        }
        if let Some(remote) = &self.remote {
            if remote_outcome("update_book", remote.update_book(id, &patch).await).is_some() {
                return Ok(());
            }
        }
        if !self.local.update_book(id, &patch).await? {
            debug!(book_id = %id, "update_book: no such book");
        }
        Ok(())
    }

    /// Delete a book with all of its chapters and notes
    pub async fn delete_book(&self, id: &EntityId) -> Result<(), StoreError> {
        if let Some(remote) = &self.remote {
            if remote_outcome("delete_book", remote.delete_book(id).await).is_some() {
                return Ok(());
            }
        }
        self.local.delete_book(id).await?;
        Ok(())
    }

    /// Chapters of one book with their notes, for a detail view.
    ///
    /// With a backend, chapters and every chapter's notes are fetched remotely;
    /// if any of those requests fails the local copy is returned instead.
    pub async fn load_chapters(&self, book_id: &EntityId) -> Result<Vec<Chapter>, StoreError> {
        if let Some(remote) = &self.remote {
            if let Some(chapters) =
                remote_outcome("load_chapters", Self::fetch_chapters(remote, book_id).await)
            {
                return Ok(chapters);
            }
        }
        self.local.chapters(book_id).await
    }

    async fn fetch_chapters(
        remote: &RemoteStrategy,
        book_id: &EntityId,
    ) -> RemoteResult<Vec<Chapter>> {
        let mut chapters = remote.list_chapters(book_id).await?;
        for chapter in &mut chapters {
            chapter.notes = remote.list_notes(&chapter.id).await?;
        }
        Ok(chapters)
    }

    /// `Ok(None)` when the book does not exist locally
    pub async fn create_chapter(
        &self,
        book_id: &EntityId,
        fields: NewChapter,
    ) -> Result<Option<Chapter>, StoreError> {
        let draft = fields.validated()?;
        if let Some(remote) = &self.remote {
            if let Some(chapter) =
                remote_outcome("create_chapter", remote.create_chapter(book_id, &draft).await)
            {
                return Ok(Some(chapter));
            }
        }
        self.local.create_chapter(book_id, draft).await
    }

    pub async fn update_chapter(
        &self,
        book_id: &EntityId,
        chapter_id: &EntityId,
        patch: ChapterPatch,
    ) -> Result<(), StoreError> {
        let patch = patch.validated()?;
        if patch.is_empty() {
            debug!(%chapter_id, "update_chapter: nothing to change");
            return Ok(());
        }
        if let Some(remote) = &self.remote {
            if remote_outcome("update_chapter", remote.update_chapter(chapter_id, &patch).await)
                .is_some()
            {
                return Ok(());
            }
        }
        self.local
            .update_chapter(book_id, chapter_id, &patch)
            .await?;
        Ok(())
    }

    /// Delete a chapter with its notes
    pub async fn delete_chapter(
        &self,
        book_id: &EntityId,
        chapter_id: &EntityId,
    ) -> Result<(), StoreError> {
        if let Some(remote) = &self.remote {
            if remote_outcome("delete_chapter", remote.delete_chapter(chapter_id).await).is_some() {
                return Ok(());
            }
        }
        self.local.delete_chapter(book_id, chapter_id).await?;
        Ok(())
    }

    /// `Ok(None)` when the book or chapter does not exist locally
    pub async fn create_note(
        &self,
        book_id: &EntityId,
        chapter_id: &EntityId,
        fields: NewNote,
    ) -> Result<Option<ChapterNote>, StoreError> {
        let draft = fields.validated()?;
        if let Some(remote) = &self.remote {
            if let Some(note) =
                remote_outcome("create_note", remote.create_note(chapter_id, &draft).await)
            {
                return Ok(Some(note));
            }
        }
        self.local.create_note(book_id, chapter_id, draft).await
    }

    pub async fn update_note(
        &self,
        book_id: &EntityId,
        chapter_id: &EntityId,
        note_id: &EntityId,
        patch: NotePatch,
    ) -> Result<(), StoreError> {
        let patch = patch.validated()?;
        if patch.is_empty() {
            debug!(%note_id, "update_note: nothing to change");
            return Ok(());
        }
        if let Some(remote) = &self.remote {
            if remote_outcome("update_note", remote.update_note(note_id, &patch).await).is_some() {
                return Ok(());
            }
        }
        self.local
            .update_note(book_id, chapter_id, note_id, &patch)
            .await?;
        Ok(())
    }

    pub async fn delete_note(
        &self,
        book_id: &EntityId,
        chapter_id: &EntityId,
        note_id: &EntityId,
    ) -> Result<(), StoreError> {
        if let Some(remote) = &self.remote {
            if remote_outcome("delete_note", remote.delete_note(note_id).await).is_some() {
                return Ok(());
            }
        }
        self.local.delete_note(book_id, chapter_id, note_id).await?;
        Ok(())
    }

    /// Comments on a note, newest first. Empty without a reachable backend.
    pub async fn list_comments(&self, note_id: &EntityId) -> Vec<NoteComment> {
        let Some(remote) = &self.remote else {
            return Vec::new();
        };
        log_remote_only("list_comments", remote.list_comments(note_id).await).unwrap_or_default()
    }

    /// `Ok(None)` when there is no reachable backend
    pub async fn add_comment(
        &self,
        note_id: &EntityId,
        fields: NewComment,
    ) -> Result<Option<NoteComment>, StoreError> {
        let draft = fields.validated()?;
        let Some(remote) = &self.remote else {
            return Ok(None);
        };
        Ok(log_remote_only(
            "add_comment",
            remote.add_comment(note_id, &draft).await,
        ))
    }

    /// Whether the backend confirmed the delete
    pub async fn delete_comment(&self, comment_id: &EntityId) -> bool {
        let Some(remote) = &self.remote else {
            return false;
        };
        log_remote_only("delete_comment", remote.delete_comment(comment_id).await).is_some()
    }
}
