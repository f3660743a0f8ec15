use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::book::Author;
use crate::draft::{normalize_cover, required};
use crate::error::ShelfError;

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`)
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Partial update of a book. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// `Some(None)` removes the cover
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub cover_image: Option<Option<String>>,
}

impl BookPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.notes.is_none()
            && self.cover_image.is_none()
    }

    pub fn validated(self) -> Result<Self, ShelfError> {
        Ok(Self {
            title: self.title.map(|t| required(&t, "Title")).transpose()?,
            author: self.author.map(|a| required(&a, "Author")).transpose()?,
            notes: self.notes.map(|n| n.trim().to_string()),
            cover_image: self.cover_image.map(normalize_cover),
        })
    }
}

/// Partial update of a chapter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_number: Option<u32>,
}

impl ChapterPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.chapter_number.is_none()
    }

    pub fn validated(self) -> Result<Self, ShelfError> {
        if self.chapter_number == Some(0) {
            return Err(ShelfError::InvalidChapterNumber);
        }
        Ok(Self {
            title: self.title.map(|t| required(&t, "Title")).transpose()?,
            chapter_number: self.chapter_number,
        })
    }
}

/// Partial update of a chapter note
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl NotePatch {
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.author.is_none() && self.timestamp.is_none()
    }

    pub fn validated(self) -> Result<Self, ShelfError> {
        Ok(Self {
            content: self.content.map(|c| required(&c, "Content")).transpose()?,
            author: self.author,
            timestamp: self.timestamp,
        })
    }
}
