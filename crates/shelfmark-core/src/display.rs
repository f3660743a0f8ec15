//! Presentation ordering. Stored collections keep insertion order; these
//! helpers sort views of them without touching the underlying data.

use crate::book::{Book, Chapter, ChapterNote};

/// Chapters ascending by chapter number
pub fn chapters_for_display(book: &Book) -> Vec<&Chapter> {
    let mut chapters: Vec<&Chapter> = book.chapters.iter().collect();
    chapters.sort_by_key(|c| c.chapter_number);
    chapters
}

/// Notes newest first
pub fn notes_for_display(chapter: &Chapter) -> Vec<&ChapterNote> {
    let mut notes: Vec<&ChapterNote> = chapter.notes.iter().collect();
    notes.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    notes
}

/// Number to assign to the next chapter created on `book`.
///
/// This is the existing count plus one; numbers are never compacted after a
/// delete, so the result can collide with a surviving chapter.
pub fn next_chapter_number(book: &Book) -> u32 {
    u32::try_from(book.chapters.len()).unwrap_or(u32::MAX - 1) + 1
}
