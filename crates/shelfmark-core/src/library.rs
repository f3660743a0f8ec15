use serde::{Deserialize, Serialize};

use crate::book::{Book, Chapter, ChapterNote};
use crate::id::EntityId;
use crate::patch::{BookPatch, ChapterPatch, NotePatch};

/// The full book collection, as persisted in one JSON document.
///
/// Every lookup is a linear scan by id. Mutators return `false` when the
/// addressed entity does not exist and leave the collection unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Library {
    books: Vec<Book>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn into_books(self) -> Vec<Book> {
        self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn book(&self, id: &EntityId) -> Option<&Book> {
        self.books.iter().find(|b| &b.id == id)
    }

    fn book_mut(&mut self, id: &EntityId) -> Option<&mut Book> {
        self.books.iter_mut().find(|b| &b.id == id)
    }

    pub fn chapter(&self, book_id: &EntityId, chapter_id: &EntityId) -> Option<&Chapter> {
        self.book(book_id)?.chapter(chapter_id)
    }

    fn chapter_mut(&mut self, book_id: &EntityId, chapter_id: &EntityId) -> Option<&mut Chapter> {
        self.book_mut(book_id)?.chapter_mut(chapter_id)
    }

    /// Append a book
    pub fn add_book(&mut self, book: Book) {
        self.books.push(book);
    }

    pub fn update_book(&mut self, id: &EntityId, patch: &BookPatch) -> bool {
        match self.book_mut(id) {
            Some(book) => {
                book.apply(patch);
                true
            }
            None => false,
        }
    }

    /// Remove a book together with its chapters and notes
    pub fn remove_book(&mut self, id: &EntityId) -> bool {
        let before = self.books.len();
        self.books.retain(|b| &b.id != id);
        self.books.len() != before
    }

    /// Append a chapter to its owning book
    pub fn add_chapter(&mut self, book_id: &EntityId, chapter: Chapter) -> bool {
        match self.book_mut(book_id) {
            Some(book) => {
                book.chapters.push(chapter);
                true
            }
            None => false,
        }
    }

    pub fn update_chapter(
        &mut self,
        book_id: &EntityId,
        chapter_id: &EntityId,
        patch: &ChapterPatch,
    ) -> bool {
        match self.chapter_mut(book_id, chapter_id) {
            Some(chapter) => {
                chapter.apply(patch);
                true
            }
            None => false,
        }
    }

    /// Remove a chapter together with its notes
    pub fn remove_chapter(&mut self, book_id: &EntityId, chapter_id: &EntityId) -> bool {
        let Some(book) = self.book_mut(book_id) else {
            return false;
        };
        let before = book.chapters.len();
        book.chapters.retain(|c| &c.id != chapter_id);
        book.chapters.len() != before
    }

    pub fn add_note(
        &mut self,
        book_id: &EntityId,
        chapter_id: &EntityId,
        note: ChapterNote,
    ) -> bool {
        match self.chapter_mut(book_id, chapter_id) {
            Some(chapter) => {
                chapter.notes.push(note);
                true
            }
            None => false,
        }
    }

    pub fn update_note(
        &mut self,
        book_id: &EntityId,
        chapter_id: &EntityId,
        note_id: &EntityId,
        patch: &NotePatch,
    ) -> bool {
        let note = self
            .chapter_mut(book_id, chapter_id)
            .and_then(|c| c.note_mut(note_id));
        match note {
            Some(note) => {
                note.apply(patch);
                true
            }
            None => false,
        }
    }

    pub fn remove_note(
        &mut self,
        book_id: &EntityId,
        chapter_id: &EntityId,
        note_id: &EntityId,
    ) -> bool {
        let Some(chapter) = self.chapter_mut(book_id, chapter_id) else {
            return false;
        };
        let before = chapter.notes.len();
        chapter.notes.retain(|n| &n.id != note_id);
        chapter.notes.len() != before
    }

    /// Serialize the collection to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize a collection from JSON, rejecting malformed records
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
