use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemopadError {
    #[error("Note store unavailable: {source}")]
    StorageUnavailable {
        #[source]
        source: rusqlite::Error,
    },

    #[error("Preference store unavailable: {0}")]
    PrefsUnavailable(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Note has no id; persist it before updating")]
    MissingId,

    #[error("Note not found: {0}")]
    NoteNotFound(i64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MemopadError>;
