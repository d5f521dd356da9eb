use std::sync::Arc;

use rusqlite::Connection;
use tokio::sync::{Mutex, OnceCell};

use crate::context::AppContext;
use crate::error::{MemopadError, Result};

const MEMO_DB: &str = "memo.db";
const SCHEMA_VERSION: i32 = 1;

/// Shared handle to the open note store. Cloning is cheap; the underlying
/// connection is serialized by the mutex and lives until process teardown.
pub type StorageHandle = Arc<Mutex<Connection>>;

/// Lazily opens `memo.db` and memoizes the connection.
///
/// The first `handle` call opens (or creates) the database and runs schema
/// initialization; every later call returns the same handle. Concurrent
/// first calls are serialized by the cell, so at most one open sequence runs
/// and all callers see the same connection. A failed open is not memoized:
/// the cell stays empty and a later call may retry.
pub struct StorageProvider {
    handle: OnceCell<StorageHandle>,
}

impl StorageProvider {
    pub fn new() -> Self {
        Self {
            handle: OnceCell::new(),
        }
    }

    /// Get the memoized store handle, opening the database on first use.
    pub async fn handle(&self, ctx: &AppContext) -> Result<StorageHandle> {
        let handle = self
            .handle
            .get_or_try_init(|| async { open_store(ctx) })
            .await?;
        Ok(Arc::clone(handle))
    }
}

impl Default for StorageProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn open_store(ctx: &AppContext) -> Result<StorageHandle> {
    let path = ctx.data_dir().join(MEMO_DB);
    let conn =
        Connection::open(&path).map_err(|e| MemopadError::StorageUnavailable { source: e })?;

    init_schema(&conn).map_err(|e| MemopadError::StorageUnavailable { source: e })?;

    tracing::debug!(path = %path.display(), "opened note store");
    Ok(Arc::new(Mutex::new(conn)))
}

/// Initialize the database schema, stamping `user_version` on first create.
fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS memo (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            content TEXT,
            created_date INTEGER NOT NULL,
            modified_date INTEGER NOT NULL
        )",
        [],
    )?;

    let version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if version < SCHEMA_VERSION {
        upgrade_schema(conn, version, SCHEMA_VERSION)?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    }

    Ok(())
}

/// Extension point for future schema migrations. No released version needs
/// one yet, so this is a no-op.
fn upgrade_schema(_conn: &Connection, _from: i32, _to: i32) -> rusqlite::Result<()> {
    Ok(())
}

// Map plain query/write failures onto the storage variant. Open failures are
// wrapped explicitly at the call site instead.
impl From<rusqlite::Error> for MemopadError {
    fn from(e: rusqlite::Error) -> Self {
        MemopadError::Storage(format!("SQLite error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_handle_creates_db_file() {
        let tmp = TempDir::new().unwrap();
        let ctx = AppContext::new(tmp.path()).unwrap();
        let provider = StorageProvider::new();

        let _handle = provider.handle(&ctx).await.unwrap();
        assert!(tmp.path().join("memo.db").exists());
    }

    #[tokio::test]
    async fn test_handle_is_memoized() {
        let tmp = TempDir::new().unwrap();
        let ctx = AppContext::new(tmp.path()).unwrap();
        let provider = StorageProvider::new();

        let first = provider.handle(&ctx).await.unwrap();
        let second = provider.handle(&ctx).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_concurrent_first_calls_share_one_handle() {
        let tmp = TempDir::new().unwrap();
        let ctx = AppContext::new(tmp.path()).unwrap();
        let provider = StorageProvider::new();

        let (a, b) = tokio::join!(provider.handle(&ctx), provider.handle(&ctx));
        assert!(Arc::ptr_eq(&a.unwrap(), &b.unwrap()));
    }

    #[tokio::test]
    async fn test_schema_version_is_stamped() {
        let tmp = TempDir::new().unwrap();
        let ctx = AppContext::new(tmp.path()).unwrap();
        let provider = StorageProvider::new();

        let handle = provider.handle(&ctx).await.unwrap();
        let conn = handle.lock().await;
        let version: i32 = conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[tokio::test]
    async fn test_open_failure_propagates() {
        let tmp = TempDir::new().unwrap();
        let ctx = AppContext::new(tmp.path()).unwrap();
        // A directory where the db file should be makes the open fail.
        std::fs::create_dir(tmp.path().join("memo.db")).unwrap();

        let provider = StorageProvider::new();
        let err = provider.handle(&ctx).await.unwrap_err();
        assert!(matches!(err, MemopadError::StorageUnavailable { .. }));
    }
}
