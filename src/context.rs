use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Environment handle threaded through every storage and preference call.
///
/// Holds the directory that owns `memo.db` and `settings.json`. Passing it
/// explicitly (rather than reading ambient global state) keeps every
/// operation testable against a throwaway directory.
#[derive(Debug, Clone)]
pub struct AppContext {
    data_dir: PathBuf,
}

impl AppContext {
    /// Create a context rooted at `data_dir`, creating the directory if
    /// it does not exist yet.
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        if !data_dir.exists() {
            fs::create_dir_all(&data_dir)?;
        }
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
