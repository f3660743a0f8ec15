//! Field sets for creating new entities.
//!
//! Drafts carry only the caller-supplied fields. Identifiers and timestamps are
//! assigned by whichever store ends up persisting the entity. Call
//! `validated()` before handing a draft to a store: it trims text and rejects
//! blank required fields.

use serde::{Deserialize, Serialize};

use crate::book::Author;
use crate::error::ShelfError;
use crate::id::EntityId;

pub(crate) fn required(value: &str, field: &'static str) -> Result<String, ShelfError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ShelfError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}

/// Empty or whitespace-only covers are treated as "no cover"
pub(crate) fn normalize_cover(cover: Option<String>) -> Option<String> {
    cover.and_then(|c| {
        let trimmed = c.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

/// Fields for a new book
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
}

impl NewBook {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            ..Default::default()
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_cover(mut self, cover: impl Into<String>) -> Self {
        self.cover_image = Some(cover.into());
        self
    }

    pub fn validated(self) -> Result<Self, ShelfError> {
        Ok(Self {
            title: required(&self.title, "Title")?,
            author: required(&self.author, "Author")?,
            notes: self.notes.trim().to_string(),
            cover_image: normalize_cover(self.cover_image),
        })
    }
}

/// Fields for a new chapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChapter {
    pub title: String,
    pub chapter_number: u32,
}

impl NewChapter {
    pub fn new(title: impl Into<String>, chapter_number: u32) -> Self {
        Self {
            title: title.into(),
            chapter_number,
        }
    }

    pub fn validated(self) -> Result<Self, ShelfError> {
        if self.chapter_number == 0 {
            return Err(ShelfError::InvalidChapterNumber);
        }
        Ok(Self {
            title: required(&self.title, "Title")?,
            chapter_number: self.chapter_number,
        })
    }

    /// Request body for the remote `add-chapter` endpoint
    pub fn to_request(&self, book_id: &EntityId) -> serde_json::Value {
        serde_json::json!({
            "title": self.title,
            "chapterNumber": self.chapter_number,
            "bookId": book_id,
        })
    }
}

/// Fields for a new chapter note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNote {
    pub content: String,
    pub author: Author,
}

impl NewNote {
    pub fn new(content: impl Into<String>, author: Author) -> Self {
        Self {
            content: content.into(),
            author,
        }
    }

    pub fn validated(self) -> Result<Self, ShelfError> {
        Ok(Self {
            content: required(&self.content, "Content")?,
            author: self.author,
        })
    }

    /// Request body for the remote `add-note` endpoint
    pub fn to_request(&self, chapter_id: &EntityId) -> serde_json::Value {
        serde_json::json!({
            "content": self.content,
            "author": self.author,
            "chapterId": chapter_id,
        })
    }
}

/// Fields for a new note comment. Comment authors are free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewComment {
    pub content: String,
    pub author: String,
}

impl NewComment {
    pub fn new(content: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            author: author.into(),
        }
    }

    pub fn validated(self) -> Result<Self, ShelfError> {
        Ok(Self {
            content: required(&self.content, "Content")?,
            author: required(&self.author, "Author")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_draft_trims() {
        let draft = NewBook::new("  Dune ", " Herbert")
            .with_notes(" classic ")
            .with_cover("   ")
            .validated()
            .unwrap();

        assert_eq!(draft.title, "Dune");
        assert_eq!(draft.author, "Herbert");
        assert_eq!(draft.notes, "classic");
        assert!(draft.cover_image.is_none());
    }

    #[test]
    fn test_book_draft_requires_title_and_author() {
        assert_eq!(
            NewBook::new("  ", "Herbert").validated(),
            Err(ShelfError::EmptyField("Title"))
        );
        assert_eq!(
            NewBook::new("Dune", "").validated(),
            Err(ShelfError::EmptyField("Author"))
        );
    }

    #[test]
    fn test_chapter_draft_validation() {
        assert_eq!(
            NewChapter::new("Intro", 0).validated(),
            Err(ShelfError::InvalidChapterNumber)
        );
        assert_eq!(
            NewChapter::new(" ", 1).validated(),
            Err(ShelfError::EmptyField("Title"))
        );
        assert_eq!(
            NewChapter::new(" Intro ", 1).validated().unwrap().title,
            "Intro"
        );
    }

    #[test]
    fn test_note_draft_validation() {
        assert!(NewNote::new("\n\t", Author::Serzh).validated().is_err());
        let note = NewNote::new(" good line ", Author::Serzh).validated().unwrap();
        assert_eq!(note.content, "good line");
    }

    #[test]
    fn test_comment_requires_author() {
        assert_eq!(
            NewComment::new("nice", " ").validated(),
            Err(ShelfError::EmptyField("Author"))
        );
    }

    #[test]
    fn test_request_bodies() {
        let body = NewChapter::new("Intro", 2).to_request(&EntityId::from("b1"));
        assert_eq!(
            body,
            serde_json::json!({"title": "Intro", "chapterNumber": 2, "bookId": "b1"})
        );

        let body = NewNote::new("hi", Author::Bella).to_request(&EntityId::from("c1"));
        assert_eq!(
            body,
            serde_json::json!({"content": "hi", "author": "Bella", "chapterId": "c1"})
        );
    }
}
