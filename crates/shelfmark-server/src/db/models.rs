use chrono::{DateTime, Utc};
use shelfmark_core::{Author, Book, Chapter, ChapterNote, EntityId, NoteComment};

use crate::error::AppError;

/// Book database model
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookRow {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub notes: String,
    pub cover_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Self {
            id: EntityId::from(row.id),
            title: row.title,
            author: row.author,
            cover_image: row.cover_image,
            notes: row.notes,
            created_at: row.created_at,
            chapters: Vec::new(),
        }
    }
}

/// Chapter database model
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChapterRow {
    pub id: i64,
    pub book_id: i64,
    pub title: String,
    pub chapter_number: i64,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ChapterRow> for Chapter {
    type Error = AppError;

    fn try_from(row: ChapterRow) -> Result<Self, Self::Error> {
        let chapter_number = u32::try_from(row.chapter_number).map_err(|_| {
            AppError::Internal(format!(
                "chapter {} has out-of-range number {}",
                row.id, row.chapter_number
            ))
        })?;
        Ok(Self {
            id: EntityId::from(row.id),
            book_id: EntityId::from(row.book_id),
            title: row.title,
            chapter_number,
            notes: Vec::new(),
        })
    }
}

/// Chapter note database model
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NoteRow {
    pub id: i64,
    pub chapter_id: i64,
    pub content: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
}

impl TryFrom<NoteRow> for ChapterNote {
    type Error = AppError;

    fn try_from(row: NoteRow) -> Result<Self, Self::Error> {
        let author: Author = row
            .author
            .parse()
            .map_err(|e| AppError::Internal(format!("note {}: {}", row.id, e)))?;
        Ok(Self {
            id: EntityId::from(row.id),
            chapter_id: EntityId::from(row.chapter_id),
            content: row.content,
            author,
            timestamp: row.timestamp,
        })
    }
}

/// Note comment database model
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentRow {
    pub id: i64,
    pub note_id: i64,
    pub content: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
}

impl From<CommentRow> for NoteComment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: EntityId::from(row.id),
            content: row.content,
            author: row.author,
            timestamp: row.timestamp,
        }
    }
}
