//! Local strategy: the whole library as one JSON document in key/value storage.
//!
//! Every mutation is a read-modify-write of the full collection. Cycles issued
//! through the same [`LocalStrategy`] are serialized by an async mutex; two
//! processes sharing one storage location can still overwrite each other.

use chrono::Utc;
use shelfmark_core::{
    Book, BookPatch, Chapter, ChapterNote, ChapterPatch, EntityId, Library, NewBook, NewChapter,
    NewNote, NotePatch,
};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::StoreError;
use crate::storage::KeyValueStorage;

/// Fixed key under which the library is persisted
pub const STORAGE_KEY: &str = "books-notes-data";

pub struct LocalStrategy<S> {
    storage: S,
    key: String,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStorage> LocalStrategy<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, STORAGE_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Load the persisted library; an absent document is an empty library
    pub async fn load(&self) -> Result<Library, StoreError> {
        let Some(raw) = self.storage.get_item(&self.key).await? else {
            return Ok(Library::new());
        };
        Library::from_json(&raw).map_err(|source| StoreError::Corrupted {
            key: self.key.clone(),
            source,
        })
    }

    pub async fn save(&self, library: &Library) -> Result<(), StoreError> {
        let raw = library.to_json()?;
        debug!(key = %self.key, books = library.len(), "saving library");
        self.storage.set_item(&self.key, raw).await
    }

    /// Run one read-modify-write cycle.
    ///
    /// The library is written back only when `f` returns `Some`.
    pub async fn modify<T, F>(&self, f: F) -> Result<Option<T>, StoreError>
    where
        F: FnOnce(&mut Library) -> Option<T>,
    {
        let _guard = self.write_lock.lock().await;
        let mut library = self.load().await?;
        let outcome = f(&mut library);
        if outcome.is_some() {
            self.save(&library).await?;
        }
        Ok(outcome)
    }

    pub async fn list_books(&self) -> Result<Vec<Book>, StoreError> {
        Ok(self.load().await?.into_books())
    }

    /// Chapters of one book in stored order; empty when the book is unknown
    pub async fn chapters(&self, book_id: &EntityId) -> Result<Vec<Chapter>, StoreError> {
        let library = self.load().await?;
        Ok(library
            .book(book_id)
            .map(|b| b.chapters.clone())
            .unwrap_or_default())
    }

    pub async fn create_book(&self, draft: NewBook) -> Result<Book, StoreError> {
        let book = Book::new(EntityId::generate(), draft, Utc::now());
        let _guard = self.write_lock.lock().await;
        let mut library = self.load().await?;
        library.add_book(book.clone());
        self.save(&library).await?;
        Ok(book)
    }

    pub async fn update_book(&self, id: &EntityId, patch: &BookPatch) -> Result<bool, StoreError> {
        self.modify(|library| library.update_book(id, patch).then_some(()))
            .await
            .map(|o| o.is_some())
    }

    pub async fn delete_book(&self, id: &EntityId) -> Result<bool, StoreError> {
        self.modify(|library| library.remove_book(id).then_some(()))
            .await
            .map(|o| o.is_some())
    }

    /// `None` when the owning book does not exist
    pub async fn create_chapter(
        &self,
        book_id: &EntityId,
        draft: NewChapter,
    ) -> Result<Option<Chapter>, StoreError> {
        let chapter = Chapter::new(EntityId::generate(), book_id.clone(), draft);
        self.modify(|library| {
            library
                .add_chapter(book_id, chapter.clone())
                .then_some(chapter)
        })
        .await
    }

    pub async fn update_chapter(
        &self,
        book_id: &EntityId,
        chapter_id: &EntityId,
        patch: &ChapterPatch,
    ) -> Result<bool, StoreError> {
        self.modify(|library| library.update_chapter(book_id, chapter_id, patch).then_some(()))
            .await
            .map(|o| o.is_some())
    }

    pub async fn delete_chapter(
        &self,
        book_id: &EntityId,
        chapter_id: &EntityId,
    ) -> Result<bool, StoreError> {
        self.modify(|library| library.remove_chapter(book_id, chapter_id).then_some(()))
            .await
            .map(|o| o.is_some())
    }

    /// `None` when the book or chapter does not exist
    pub async fn create_note(
        &self,
        book_id: &EntityId,
        chapter_id: &EntityId,
        draft: NewNote,
    ) -> Result<Option<ChapterNote>, StoreError> {
        let note = ChapterNote::new(EntityId::generate(), chapter_id.clone(), draft, Utc::now());
        self.modify(|library| {
            library
                .add_note(book_id, chapter_id, note.clone())
                .then_some(note)
        })
        .await
    }

    pub async fn update_note(
        &self,
        book_id: &EntityId,
        chapter_id: &EntityId,
        note_id: &EntityId,
        patch: &NotePatch,
    ) -> Result<bool, StoreError> {
        self.modify(|library| {
            library
                .update_note(book_id, chapter_id, note_id, patch)
                .then_some(())
        })
        .await
        .map(|o| o.is_some())
    }

    pub async fn delete_note(
        &self,
        book_id: &EntityId,
        chapter_id: &EntityId,
        note_id: &EntityId,
    ) -> Result<bool, StoreError> {
        self.modify(|library| library.remove_note(book_id, chapter_id, note_id).then_some(()))
            .await
            .map(|o| o.is_some())
    }
}
