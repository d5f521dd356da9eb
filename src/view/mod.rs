//! Presentation-facing snapshot of the note store.
//!
//! `ViewState` owns the repository and preference store, and re-derives its
//! `notes` list from the store after every successful mutation instead of
//! patching it in place. Callers awaiting `save` or `remove` therefore see
//! an up-to-date snapshot once the call resolves.

use chrono::Utc;

use crate::context::AppContext;
use crate::entity::Note;
use crate::prefs::{FontSettings, PreferenceStore};
use crate::repo::NoteRepository;

pub struct ViewState {
    repository: NoteRepository,
    prefs: PreferenceStore,
    ctx: Option<AppContext>,

    /// Notes currently visible, filtered by `search_keyword`.
    pub notes: Vec<Note>,
    pub is_loading: bool,
    /// Active filter text, always stored trimmed.
    pub search_keyword: String,
    /// The note being edited, or `None` when composing a new one.
    pub current_note: Option<Note>,
    pub font_settings: FontSettings,
}

impl ViewState {
    pub fn new(repository: NoteRepository, prefs: PreferenceStore) -> Self {
        Self {
            repository,
            prefs,
            ctx: None,
            notes: Vec::new(),
            is_loading: false,
            search_keyword: String::new(),
            current_note: None,
            font_settings: FontSettings::default(),
        }
    }

    /// Attach the environment context. Every operation is a logged no-op
    /// until this has been called.
    pub fn bind(&mut self, ctx: AppContext) {
        self.ctx = Some(ctx);
    }

    fn bound(&self) -> Option<AppContext> {
        if self.ctx.is_none() {
            tracing::error!("view state used before bind, ignoring operation");
        }
        self.ctx.clone()
    }

    /// First load: font settings, then the note list. Sequential on purpose;
    /// the presentation layer reads font sizes while rendering the list.
    pub async fn load_initial(&mut self) {
        let Some(ctx) = self.bound() else { return };
        self.is_loading = true;
        self.font_settings = self.prefs.load_font_sizes(&ctx).await;
        let keyword = self.search_keyword.clone();
        self.search(&keyword).await;
    }

    /// Filter the list by `keyword` (trimmed; blank shows everything).
    pub async fn search(&mut self, keyword: &str) {
        let Some(ctx) = self.bound() else { return };
        self.search_keyword = keyword.trim().to_string();
        self.is_loading = true;
        self.notes = self
            .repository
            .query_by_title(&ctx, &self.search_keyword)
            .await;
        self.is_loading = false;
    }

    /// Load one note into `current_note` for editing; absent when the id is
    /// unknown (or the lookup failed).
    pub async fn load_by_id(&mut self, id: i64) {
        let Some(ctx) = self.bound() else { return };
        self.is_loading = true;
        self.current_note = self.repository.query_by_id(&ctx, id).await;
        self.is_loading = false;
    }

    /// Switch to composing a new note.
    pub fn prepare_new(&mut self) {
        self.current_note = None;
    }

    /// Persist `title`/`content`: an update when a note is loaded in
    /// `current_note`, an insert otherwise. On success the visible list is
    /// re-derived from the store with the active keyword.
    pub async fn save(&mut self, title: &str, content: &str) -> bool {
        let Some(ctx) = self.bound() else {
            return false;
        };

        let success = match &self.current_note {
            Some(existing) => {
                let mut note = existing.clone();
                note.title = title.to_string();
                note.content = content.to_string();
                note.modified_date = Utc::now().timestamp_millis();
                self.repository.update(&ctx, &note).await > 0
            }
            None => {
                let note = Note::new(title, content);
                self.repository.add(&ctx, &note).await > 0
            }
        };

        if success {
            let keyword = self.search_keyword.clone();
            self.search(&keyword).await;
        }
        success
    }

    /// Delete by id and refresh the list; a miss leaves the list untouched.
    pub async fn remove(&mut self, id: i64) {
        let Some(ctx) = self.bound() else { return };

        if self.repository.delete(&ctx, id).await > 0 {
            let keyword = self.search_keyword.clone();
            self.search(&keyword).await;
        } else {
            tracing::warn!(id, "delete affected no rows, list left unchanged");
        }
    }

    pub async fn load_font_settings(&mut self) {
        let Some(ctx) = self.bound() else { return };
        self.font_settings = self.prefs.load_font_sizes(&ctx).await;
    }

    pub async fn save_font_settings(&mut self, title_size: u32, content_size: u32) {
        let Some(ctx) = self.bound() else { return };
        self.prefs
            .save_font_sizes(&ctx, title_size, content_size)
            .await;
        self.font_settings = FontSettings {
            title_size,
            content_size,
        };
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(NoteRepository::new(), PreferenceStore::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn bound_state(tmp: &TempDir) -> ViewState {
        let mut state = ViewState::default();
        state.bind(AppContext::new(tmp.path()).unwrap());
        state
    }

    #[tokio::test]
    async fn test_operations_before_bind_are_no_ops() {
        let mut state = ViewState::default();

        state.load_initial().await;
        state.search("anything").await;
        assert!(!state.save("title", "content").await);
        state.remove(1).await;

        assert!(state.notes.is_empty());
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_load_initial_populates_fonts_and_notes() {
        let tmp = TempDir::new().unwrap();
        let mut state = bound_state(&tmp);

        assert!(state.save("First", "hello").await);
        state.load_initial().await;

        assert_eq!(state.font_settings, FontSettings::default());
        assert_eq!(state.notes.len(), 1);
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_save_adds_and_list_refreshes_without_reload() {
        let tmp = TempDir::new().unwrap();
        let mut state = bound_state(&tmp);

        assert!(state.save("Groceries", "milk").await);

        let matches: Vec<_> = state
            .notes
            .iter()
            .filter(|n| n.title == "Groceries")
            .collect();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].content, "milk");
    }

    #[tokio::test]
    async fn test_save_updates_when_a_note_is_loaded() {
        let tmp = TempDir::new().unwrap();
        let mut state = bound_state(&tmp);

        assert!(state.save("Draft", "v1").await);
        let id = state.notes[0].id.unwrap();
        let created = state.notes[0].created_date;

        state.load_by_id(id).await;
        assert!(state.current_note.is_some());
        assert!(state.save("Final", "v2").await);

        assert_eq!(state.notes.len(), 1);
        let note = &state.notes[0];
        assert_eq!(note.id, Some(id));
        assert_eq!(note.title, "Final");
        assert_eq!(note.content, "v2");
        assert_eq!(note.created_date, created);
        assert!(note.modified_date >= created);
    }

    #[tokio::test]
    async fn test_prepare_new_switches_to_add_path() {
        let tmp = TempDir::new().unwrap();
        let mut state = bound_state(&tmp);

        assert!(state.save("One", "").await);
        let id = state.notes[0].id.unwrap();
        state.load_by_id(id).await;

        state.prepare_new();
        assert!(state.current_note.is_none());
        assert!(state.save("Two", "").await);
        assert_eq!(state.notes.len(), 2);
    }

    #[tokio::test]
    async fn test_search_trims_and_filters() {
        let tmp = TempDir::new().unwrap();
        let mut state = bound_state(&tmp);

        assert!(state.save("Alpha", "").await);
        assert!(state.save("Beta", "").await);
        assert!(state.save("Alphabet", "").await);

        state.search("  Alpha ").await;
        assert_eq!(state.search_keyword, "Alpha");
        let titles: Vec<&str> = state.notes.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Alphabet", "Alpha"]);
    }

    #[tokio::test]
    async fn test_save_refreshes_under_the_active_keyword() {
        let tmp = TempDir::new().unwrap();
        let mut state = bound_state(&tmp);

        assert!(state.save("Alpha", "").await);
        state.search("Alpha").await;

        // The new note does not match the filter, so the visible list
        // re-derives to the same single entry.
        assert!(state.save("Beta", "").await);
        assert_eq!(state.notes.len(), 1);
        assert_eq!(state.notes[0].title, "Alpha");
    }

    #[tokio::test]
    async fn test_remove_refreshes_only_on_a_hit() {
        let tmp = TempDir::new().unwrap();
        let mut state = bound_state(&tmp);

        assert!(state.save("Keep", "").await);
        assert!(state.save("Drop", "").await);
        let drop_id = state
            .notes
            .iter()
            .find(|n| n.title == "Drop")
            .unwrap()
            .id
            .unwrap();

        state.remove(drop_id).await;
        assert_eq!(state.notes.len(), 1);
        assert_eq!(state.notes[0].title, "Keep");

        state.remove(999).await;
        assert_eq!(state.notes.len(), 1);
    }

    #[tokio::test]
    async fn test_font_settings_round_trip_through_view() {
        let tmp = TempDir::new().unwrap();
        let mut state = bound_state(&tmp);

        state.save_font_settings(22, 16).await;
        assert_eq!(state.font_settings.title_size, 22);

        let mut reread = bound_state(&tmp);
        reread.load_font_settings().await;
        assert_eq!(reread.font_settings.title_size, 22);
        assert_eq!(reread.font_settings.content_size, 16);
    }
}
