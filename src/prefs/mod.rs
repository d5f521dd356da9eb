//! Small persistent key-value settings, stored as one flat JSON object.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::{Mutex, OnceCell};

use crate::context::AppContext;
use crate::error::{MemopadError, Result};

const SETTINGS_FILE: &str = "settings.json";

const KEY_TITLE_FONT_SIZE: &str = "title_font_size";
const KEY_CONTENT_FONT_SIZE: &str = "content_font_size";

pub const DEFAULT_TITLE_FONT_SIZE: u32 = 18;
pub const DEFAULT_CONTENT_FONT_SIZE: u32 = 14;

/// Font sizes for the note list, persisted independently of notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSettings {
    pub title_size: u32,
    pub content_size: u32,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            title_size: DEFAULT_TITLE_FONT_SIZE,
            content_size: DEFAULT_CONTENT_FONT_SIZE,
        }
    }
}

/// The open settings file: its path plus the parsed key-value map.
pub struct PrefFile {
    path: PathBuf,
    values: Map<String, Value>,
}

impl PrefFile {
    /// Read and parse the settings file; a missing file is an empty map.
    fn open(path: &Path) -> Result<Self> {
        let values = if path.exists() {
            let raw = fs::read_to_string(path)
                .map_err(|e| MemopadError::PrefsUnavailable(e.to_string()))?;
            match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Object(map)) => map,
                Ok(other) => {
                    return Err(MemopadError::PrefsUnavailable(format!(
                        "expected a JSON object in {}, found {}",
                        path.display(),
                        other
                    )))
                }
                Err(e) => return Err(MemopadError::PrefsUnavailable(e.to_string())),
            }
        } else {
            Map::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    fn get_u32(&self, key: &str) -> Option<u32> {
        self.values.get(key)?.as_u64()?.try_into().ok()
    }

    fn put_u32(&mut self, key: &str, value: u32) {
        self.values.insert(key.to_string(), Value::from(value));
    }

    /// Durably write the map: temp file, fsync, rename over the original.
    fn flush(&self) -> Result<()> {
        let tmp = self.path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(serde_json::to_string_pretty(&self.values)?.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Shared handle to the open settings file.
pub type PrefHandle = Arc<Mutex<PrefFile>>;

/// Lazily opens the settings file and memoizes the handle, with the same
/// one-open-sequence guarantee as [`crate::storage::StorageProvider`].
pub struct PreferenceStore {
    handle: OnceCell<PrefHandle>,
}

impl PreferenceStore {
    pub fn new() -> Self {
        Self {
            handle: OnceCell::new(),
        }
    }

    /// Get the memoized settings handle, opening the file on first use.
    pub async fn handle(&self, ctx: &AppContext) -> Result<PrefHandle> {
        let handle = self
            .handle
            .get_or_try_init(|| async {
                let path = ctx.data_dir().join(SETTINGS_FILE);
                let file = PrefFile::open(&path)?;
                Ok::<PrefHandle, MemopadError>(Arc::new(Mutex::new(file)))
            })
            .await?;
        Ok(Arc::clone(handle))
    }

    /// Persist both font sizes and flush to disk.
    ///
    /// Best-effort by design: a failure here must not break the caller's
    /// flow, so it is logged at error level and swallowed.
    pub async fn save_font_sizes(&self, ctx: &AppContext, title_size: u32, content_size: u32) {
        if let Err(e) = self.try_save_font_sizes(ctx, title_size, content_size).await {
            tracing::error!(error = %e, "failed to save font sizes");
        }
    }

    async fn try_save_font_sizes(
        &self,
        ctx: &AppContext,
        title_size: u32,
        content_size: u32,
    ) -> Result<()> {
        let handle = self.handle(ctx).await?;
        let mut file = handle.lock().await;
        file.put_u32(KEY_TITLE_FONT_SIZE, title_size);
        file.put_u32(KEY_CONTENT_FONT_SIZE, content_size);
        file.flush()
    }

    /// Read both font sizes, substituting the default for any missing key.
    /// Any failure degrades to the full defaults rather than propagating.
    pub async fn load_font_sizes(&self, ctx: &AppContext) -> FontSettings {
        match self.handle(ctx).await {
            Ok(handle) => {
                let file = handle.lock().await;
                FontSettings {
                    title_size: file
                        .get_u32(KEY_TITLE_FONT_SIZE)
                        .unwrap_or(DEFAULT_TITLE_FONT_SIZE),
                    content_size: file
                        .get_u32(KEY_CONTENT_FONT_SIZE)
                        .unwrap_or(DEFAULT_CONTENT_FONT_SIZE),
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load font sizes, using defaults");
                FontSettings::default()
            }
        }
    }
}

impl Default for PreferenceStore {
    fn default() -> Self {
        Self::new()
    }
}
