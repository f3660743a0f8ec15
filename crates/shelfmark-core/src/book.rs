use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::cover::CoverKind;
use crate::draft::{NewBook, NewChapter, NewNote};
use crate::error::ShelfError;
use crate::id::EntityId;
use crate::patch::{BookPatch, ChapterPatch, NotePatch};

/// The two household members who write chapter notes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Author {
    Serzh,
    Bella,
}

impl Author {
    pub const ALL: [Author; 2] = [Author::Serzh, Author::Bella];

    pub fn as_str(&self) -> &'static str {
        match self {
            Author::Serzh => "Serzh",
            Author::Bella => "Bella",
        }
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Author {
    type Err = ShelfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Author::ALL
            .into_iter()
            .find(|a| a.as_str() == s.trim())
            .ok_or_else(|| ShelfError::UnknownAuthor(s.to_string()))
    }
}

/// A catalogued book with its chapters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: EntityId,
    pub title: String,
    pub author: String,
    /// Either an http(s) URL or a base64 data URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    /// Insertion order; sort with [`crate::display`] for presentation
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

impl Book {
    /// Build a book from already validated fields
    pub fn new(id: EntityId, draft: NewBook, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            author: draft.author,
            cover_image: draft.cover_image,
            notes: draft.notes,
            created_at,
            chapters: Vec::new(),
        }
    }

    /// Merge a patch over this book, leaving omitted fields untouched
    pub fn apply(&mut self, patch: &BookPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(author) = &patch.author {
            self.author = author.clone();
        }
        if let Some(notes) = &patch.notes {
            self.notes = notes.clone();
        }
        if let Some(cover) = &patch.cover_image {
            self.cover_image = cover.clone();
        }
    }

    pub fn cover_kind(&self) -> Option<CoverKind> {
        self.cover_image.as_deref().and_then(CoverKind::classify)
    }

    pub fn chapter(&self, chapter_id: &EntityId) -> Option<&Chapter> {
        self.chapters.iter().find(|c| &c.id == chapter_id)
    }

    pub fn chapter_mut(&mut self, chapter_id: &EntityId) -> Option<&mut Chapter> {
        self.chapters.iter_mut().find(|c| &c.id == chapter_id)
    }

    /// Total number of notes across all chapters
    pub fn note_count(&self) -> usize {
        self.chapters.iter().map(|c| c.notes.len()).sum()
    }
}

/// A numbered subdivision of a book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: EntityId,
    pub book_id: EntityId,
    pub title: String,
    pub chapter_number: u32,
    #[serde(default)]
    pub notes: Vec<ChapterNote>,
}

impl Chapter {
    pub fn new(id: EntityId, book_id: EntityId, draft: NewChapter) -> Self {
        Self {
            id,
            book_id,
            title: draft.title,
            chapter_number: draft.chapter_number,
            notes: Vec::new(),
        }
    }

    pub fn apply(&mut self, patch: &ChapterPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(number) = patch.chapter_number {
            self.chapter_number = number;
        }
    }

    pub fn note(&self, note_id: &EntityId) -> Option<&ChapterNote> {
        self.notes.iter().find(|n| &n.id == note_id)
    }

    pub fn note_mut(&mut self, note_id: &EntityId) -> Option<&mut ChapterNote> {
        self.notes.iter_mut().find(|n| &n.id == note_id)
    }
}

/// A timestamped note attached to a chapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterNote {
    pub id: EntityId,
    pub chapter_id: EntityId,
    pub content: String,
    pub author: Author,
    pub timestamp: DateTime<Utc>,
}

impl ChapterNote {
    pub fn new(
        id: EntityId,
        chapter_id: EntityId,
        draft: NewNote,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            chapter_id,
            content: draft.content,
            author: draft.author,
            timestamp,
        }
    }

    /// Merge a patch; the timestamp only moves when the patch carries one
    pub fn apply(&mut self, patch: &NotePatch) {
        if let Some(content) = &patch.content {
            self.content = content.clone();
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        if let Some(timestamp) = patch.timestamp {
            self.timestamp = timestamp;
        }
    }
}

/// A remote-only comment on a chapter note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteComment {
    pub id: EntityId,
    pub content: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
}
