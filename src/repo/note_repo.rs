use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

use crate::context::AppContext;
use crate::entity::Note;
use crate::error::{MemopadError, Result};
use crate::storage::StorageProvider;

/// Sentinel id returned by [`NoteRepository::add`] when the insert fails.
pub const INSERT_FAILED: i64 = -1;

/// CRUD operations for notes over the shared store handle.
///
/// Store failures never escape as errors: reads degrade to an empty or
/// absent result, writes report failure through their numeric return
/// (the [`INSERT_FAILED`] sentinel or an affected count of zero), and the
/// cause goes to the log. Statement and row cursors are scoped to each
/// query and released on every exit path by drop.
pub struct NoteRepository {
    provider: StorageProvider,
}

impl NoteRepository {
    pub fn new() -> Self {
        Self {
            provider: StorageProvider::new(),
        }
    }

    /// Insert a note and return the store-assigned id, or [`INSERT_FAILED`].
    /// Any id already on `note` is ignored.
    pub async fn add(&self, ctx: &AppContext, note: &Note) -> i64 {
        match self.try_add(ctx, note).await {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(error = %e, title = %note.title, "failed to insert note");
                INSERT_FAILED
            }
        }
    }

    /// All notes, most recently modified first. Empty on failure.
    pub async fn query_all(&self, ctx: &AppContext) -> Vec<Note> {
        self.query_by_title(ctx, "").await
    }

    /// Notes whose title contains `keyword`, most recently modified first.
    /// A blank keyword matches every note. Empty on failure.
    pub async fn query_by_title(&self, ctx: &AppContext, keyword: &str) -> Vec<Note> {
        match self.try_query_by_title(ctx, keyword.trim()).await {
            Ok(notes) => notes,
            Err(e) => {
                tracing::error!(error = %e, keyword, "note query failed");
                Vec::new()
            }
        }
    }

    /// The note with this id, or `None`. A query failure also reads as
    /// `None`; callers cannot tell the two apart here and must treat both
    /// as "nothing to show".
    pub async fn query_by_id(&self, ctx: &AppContext, id: i64) -> Option<Note> {
        match self.try_query_by_id(ctx, id).await {
            Ok(note) => note,
            Err(e) => {
                tracing::error!(error = %e, id, "note lookup failed");
                None
            }
        }
    }

    /// Overwrite title and content of the row keyed by `note.id`, stamping
    /// `modified_date` with the current time (the value on `note` is not
    /// trusted for that field). Returns the affected count, 0 on failure or
    /// when `note.id` is absent.
    pub async fn update(&self, ctx: &AppContext, note: &Note) -> usize {
        match self.try_update(ctx, note).await {
            Ok(affected) => affected,
            Err(e) => {
                tracing::error!(error = %e, "failed to update note");
                0
            }
        }
    }

    /// Remove the row with this id. Returns the affected count (0 or 1).
    pub async fn delete(&self, ctx: &AppContext, id: i64) -> usize {
        match self.try_delete(ctx, id).await {
            Ok(affected) => affected,
            Err(e) => {
                tracing::error!(error = %e, id, "failed to delete note");
                0
            }
        }
    }

    async fn try_add(&self, ctx: &AppContext, note: &Note) -> Result<i64> {
        let handle = self.provider.handle(ctx).await?;
        let conn = handle.lock().await;
        conn.execute(
            "INSERT INTO memo (title, content, created_date, modified_date)
             VALUES (?1, ?2, ?3, ?4)",
            params![note.title, note.content, note.created_date, note.modified_date],
        )?;
        Ok(conn.last_insert_rowid())
    }

    async fn try_query_by_title(&self, ctx: &AppContext, keyword: &str) -> Result<Vec<Note>> {
        let handle = self.provider.handle(ctx).await?;
        let conn = handle.lock().await;

        // Ties on modified_date break by id so the order is deterministic.
        let notes = if keyword.is_empty() {
            let mut stmt = conn.prepare(
                "SELECT id, title, content, created_date, modified_date
                 FROM memo ORDER BY modified_date DESC, id DESC",
            )?;
            let rows = stmt.query_map([], note_from_row)?;
            rows.collect::<std::result::Result<Vec<_>, _>>()?
        } else {
            let mut stmt = conn.prepare(
                "SELECT id, title, content, created_date, modified_date
                 FROM memo WHERE title LIKE '%' || ?1 || '%'
                 ORDER BY modified_date DESC, id DESC",
            )?;
            let rows = stmt.query_map([keyword], note_from_row)?;
            rows.collect::<std::result::Result<Vec<_>, _>>()?
        };

        Ok(notes)
    }

    async fn try_query_by_id(&self, ctx: &AppContext, id: i64) -> Result<Option<Note>> {
        let handle = self.provider.handle(ctx).await?;
        let conn = handle.lock().await;
        let note = conn
            .query_row(
                "SELECT id, title, content, created_date, modified_date
                 FROM memo WHERE id = ?1",
                [id],
                note_from_row,
            )
            .optional()?;
        Ok(note)
    }

    async fn try_update(&self, ctx: &AppContext, note: &Note) -> Result<usize> {
        let id = note.id.ok_or(MemopadError::MissingId)?;
        let modified = Utc::now().timestamp_millis();

        let handle = self.provider.handle(ctx).await?;
        let conn = handle.lock().await;
        let affected = conn.execute(
            "UPDATE memo SET title = ?1, content = ?2, modified_date = ?3 WHERE id = ?4",
            params![note.title, note.content, modified, id],
        )?;
        Ok(affected)
    }

    async fn try_delete(&self, ctx: &AppContext, id: i64) -> Result<usize> {
        let handle = self.provider.handle(ctx).await?;
        let conn = handle.lock().await;
        let affected = conn.execute("DELETE FROM memo WHERE id = ?1", [id])?;
        Ok(affected)
    }
}

impl Default for NoteRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn note_from_row(row: &Row) -> rusqlite::Result<Note> {
    Ok(Note {
        id: Some(row.get(0)?),
        title: row.get(1)?,
        content: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        created_date: row.get(3)?,
        modified_date: row.get(4)?,
    })
}
