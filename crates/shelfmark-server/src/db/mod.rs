pub mod models;

use chrono::Utc;
use shelfmark_core::{
    Book, BookPatch, Chapter, ChapterNote, ChapterPatch, NewBook, NewChapter, NewComment,
    NewNote, NoteComment, NotePatch,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

use crate::error::AppError;
use models::{BookRow, ChapterRow, CommentRow, NoteRow};

const BOOK_COLUMNS: &str = "id, title, author, notes, cover_image, created_at";
const CHAPTER_COLUMNS: &str = "id, book_id, title, chapter_number, created_at";
const NOTE_COLUMNS: &str = "id, chapter_id, content, author, timestamp";
const COMMENT_COLUMNS: &str = "id, note_id, content, author, timestamp";

/// Database connection wrapper
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the database, creating the file if needed
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Open a private in-memory database.
    ///
    /// The pool is pinned to one connection that never expires, since every
    /// SQLite memory connection is its own database.
    pub async fn in_memory() -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Cheap connectivity probe for health checks
    pub async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    async fn exists(&self, table: &str, id: i64) -> Result<bool, AppError> {
        let row: Option<(i64,)> = sqlx::query_as(&format!("SELECT id FROM {} WHERE id = ?", table))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn delete_from(&self, table: &str, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = ?", table))
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List all books in creation order
    pub async fn list_books(&self) -> Result<Vec<Book>, AppError> {
        let rows = sqlx::query_as::<_, BookRow>(&format!(
            "SELECT {} FROM books ORDER BY id",
            BOOK_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Book::from).collect())
    }

    pub async fn get_book(&self, id: i64) -> Result<Option<Book>, AppError> {
        let row = sqlx::query_as::<_, BookRow>(&format!(
            "SELECT {} FROM books WHERE id = ?",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Book::from))
    }

    /// Create a new book
    pub async fn create_book(&self, draft: &NewBook) -> Result<Book, AppError> {
        let row = sqlx::query_as::<_, BookRow>(&format!(
            "INSERT INTO books (title, author, notes, cover_image, created_at) \
             VALUES (?, ?, ?, ?, ?) RETURNING {}",
            BOOK_COLUMNS
        ))
        .bind(&draft.title)
        .bind(&draft.author)
        .bind(&draft.notes)
        .bind(&draft.cover_image)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    /// Apply a partial update; `None` when the book does not exist
    pub async fn update_book(&self, id: i64, patch: &BookPatch) -> Result<Option<Book>, AppError> {
        let Some(mut book) = self.get_book(id).await? else {
            return Ok(None);
        };
        book.apply(patch);

        sqlx::query(
            "UPDATE books SET title = ?, author = ?, notes = ?, cover_image = ? WHERE id = ?",
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.notes)
        .bind(&book.cover_image)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(Some(book))
    }

    /// Delete a book; chapters, notes and comments go with it
    pub async fn delete_book(&self, id: i64) -> Result<bool, AppError> {
        self.delete_from("books", id).await
    }

    /// Chapters of a book ordered by number; `None` when the book does not exist
    pub async fn list_chapters(&self, book_id: i64) -> Result<Option<Vec<Chapter>>, AppError> {
        if !self.exists("books", book_id).await? {
            return Ok(None);
        }
        let rows = sqlx::query_as::<_, ChapterRow>(&format!(
            "SELECT {} FROM chapters WHERE book_id = ? ORDER BY chapter_number, id",
            CHAPTER_COLUMNS
        ))
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Chapter::try_from).collect::<Result<_, _>>().map(Some)
    }

    async fn get_chapter(&self, id: i64) -> Result<Option<Chapter>, AppError> {
        let row = sqlx::query_as::<_, ChapterRow>(&format!(
            "SELECT {} FROM chapters WHERE id = ?",
            CHAPTER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Chapter::try_from).transpose()
    }

    pub async fn create_chapter(
        &self,
        book_id: i64,
        draft: &NewChapter,
    ) -> Result<Option<Chapter>, AppError> {
        if !self.exists("books", book_id).await? {
            return Ok(None);
        }
        let row = sqlx::query_as::<_, ChapterRow>(&format!(
            "INSERT INTO chapters (book_id, title, chapter_number, created_at) \
             VALUES (?, ?, ?, ?) RETURNING {}",
            CHAPTER_COLUMNS
        ))
        .bind(book_id)
        .bind(&draft.title)
        .bind(i64::from(draft.chapter_number))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Chapter::try_from(row).map(Some)
    }

    pub async fn update_chapter(
        &self,
        id: i64,
        patch: &ChapterPatch,
    ) -> Result<Option<Chapter>, AppError> {
        let Some(mut chapter) = self.get_chapter(id).await? else {
            return Ok(None);
        };
        chapter.apply(patch);

        sqlx::query("UPDATE chapters SET title = ?, chapter_number = ? WHERE id = ?")
            .bind(&chapter.title)
            .bind(i64::from(chapter.chapter_number))
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(Some(chapter))
    }

    pub async fn delete_chapter(&self, id: i64) -> Result<bool, AppError> {
        self.delete_from("chapters", id).await
    }

    /// Notes of a chapter, newest first; `None` when the chapter does not exist
    pub async fn list_notes(&self, chapter_id: i64) -> Result<Option<Vec<ChapterNote>>, AppError> {
        if !self.exists("chapters", chapter_id).await? {
            return Ok(None);
        }
        let rows = sqlx::query_as::<_, NoteRow>(&format!(
            "SELECT {} FROM chapter_notes WHERE chapter_id = ? ORDER BY timestamp DESC, id DESC",
            NOTE_COLUMNS
        ))
        .bind(chapter_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ChapterNote::try_from).collect::<Result<_, _>>().map(Some)
    }

    async fn get_note(&self, id: i64) -> Result<Option<ChapterNote>, AppError> {
        let row = sqlx::query_as::<_, NoteRow>(&format!(
            "SELECT {} FROM chapter_notes WHERE id = ?",
            NOTE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ChapterNote::try_from).transpose()
    }

    pub async fn create_note(
        &self,
        chapter_id: i64,
        draft: &NewNote,
    ) -> Result<Option<ChapterNote>, AppError> {
        if !self.exists("chapters", chapter_id).await? {
            return Ok(None);
        }
        let row = sqlx::query_as::<_, NoteRow>(&format!(
            "INSERT INTO chapter_notes (chapter_id, content, author, timestamp) \
             VALUES (?, ?, ?, ?) RETURNING {}",
            NOTE_COLUMNS
        ))
        .bind(chapter_id)
        .bind(&draft.content)
        .bind(draft.author.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        ChapterNote::try_from(row).map(Some)
    }

    pub async fn update_note(
        &self,
        id: i64,
        patch: &NotePatch,
    ) -> Result<Option<ChapterNote>, AppError> {
        let Some(mut note) = self.get_note(id).await? else {
            return Ok(None);
        };
        note.apply(patch);

        sqlx::query("UPDATE chapter_notes SET content = ?, author = ?, timestamp = ? WHERE id = ?")
            .bind(&note.content)
            .bind(note.author.as_str())
            .bind(note.timestamp)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(Some(note))
    }

    pub async fn delete_note(&self, id: i64) -> Result<bool, AppError> {
        self.delete_from("chapter_notes", id).await
    }

    /// Comments of a note, newest first; `None` when the note does not exist
    pub async fn list_comments(&self, note_id: i64) -> Result<Option<Vec<NoteComment>>, AppError> {
        if !self.exists("chapter_notes", note_id).await? {
            return Ok(None);
        }
        let rows = sqlx::query_as::<_, CommentRow>(&format!(
            "SELECT {} FROM note_comments WHERE note_id = ? ORDER BY timestamp DESC, id DESC",
            COMMENT_COLUMNS
        ))
        .bind(note_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(rows.into_iter().map(NoteComment::from).collect()))
    }

    pub async fn create_comment(
        &self,
        note_id: i64,
        draft: &NewComment,
    ) -> Result<Option<NoteComment>, AppError> {
        if !self.exists("chapter_notes", note_id).await? {
            return Ok(None);
        }
        let row = sqlx::query_as::<_, CommentRow>(&format!(
            "INSERT INTO note_comments (note_id, content, author, timestamp) \
             VALUES (?, ?, ?, ?) RETURNING {}",
            COMMENT_COLUMNS
        ))
        .bind(note_id)
        .bind(&draft.content)
        .bind(&draft.author)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(Some(row.into()))
    }

    pub async fn delete_comment(&self, id: i64) -> Result<bool, AppError> {
        self.delete_from("note_comments", id).await
    }
}
