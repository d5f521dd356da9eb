// src/entity/note.rs
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// One memo: a title, free-form content, and epoch-millisecond timestamps.
///
/// `id` stays `None` until the store assigns one on insert and is immutable
/// afterwards. For a persisted note `created_date <= modified_date` always
/// holds; the repository stamps `modified_date` itself on update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Note {
    pub id: Option<i64>,
    pub title: String,
    pub content: String,
    pub created_date: i64,
    pub modified_date: i64,
}

impl Note {
    /// Build an unpersisted note, stamping both timestamps with the same now.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now().timestamp_millis();
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
            created_date: now,
            modified_date: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stamps_both_dates_equal() {
        let note = Note::new("Groceries", "milk, eggs");
        assert!(note.id.is_none());
        assert_eq!(note.created_date, note.modified_date);
        assert!(note.created_date > 0);
    }
}
