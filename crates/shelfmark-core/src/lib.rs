pub mod book;
pub mod cover;
pub mod display;
pub mod draft;
pub mod error;
pub mod id;
pub mod library;
pub mod patch;

pub use book::{Author, Book, Chapter, ChapterNote, NoteComment};
pub use cover::{encode_data_url, validate_image_file, validate_image_url, CoverKind};
pub use display::{chapters_for_display, next_chapter_number, notes_for_display};
pub use draft::{NewBook, NewChapter, NewComment, NewNote};
pub use error::ShelfError;
pub use id::EntityId;
pub use library::Library;
pub use patch::{BookPatch, ChapterPatch, NotePatch};
