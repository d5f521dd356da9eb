use std::path::Path;

use chrono::DateTime;

use crate::context::AppContext;
use crate::entity::Note;
use crate::error::{MemopadError, Result};
use crate::view::ViewState;

fn bound_view(dir: &Path) -> Result<ViewState> {
    let ctx = AppContext::new(dir)?;
    let mut state = ViewState::default();
    state.bind(ctx);
    Ok(state)
}

fn format_date(epoch_ms: i64) -> String {
    DateTime::from_timestamp_millis(epoch_ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| epoch_ms.to_string())
}

fn print_note(note: &Note) {
    println!("{:>4}  {}", note.id.unwrap_or_default(), note.title);
    println!("      created  {}", format_date(note.created_date));
    println!("      modified {}", format_date(note.modified_date));
    if !note.content.is_empty() {
        println!();
        println!("{}", note.content);
    }
}

pub async fn handle_add(dir: &Path, title: String, content: String, json: bool) -> Result<()> {
    let mut state = bound_view(dir)?;
    state.prepare_new();

    if !state.save(&title, &content).await {
        return Err(MemopadError::Storage("insert failed".to_string()));
    }

    // The saved note tops the refreshed list (newest modified first).
    let note = state
        .notes
        .first()
        .ok_or_else(|| MemopadError::Storage("saved note missing from list".to_string()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(note)?);
    } else {
        println!(
            "Created note {} - {}",
            note.id.unwrap_or_default(),
            note.title
        );
    }

    Ok(())
}

pub async fn handle_list(dir: &Path, search: Option<String>, json: bool) -> Result<()> {
    let mut state = bound_view(dir)?;
    state.search(search.as_deref().unwrap_or("")).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&state.notes)?);
        return Ok(());
    }

    if state.notes.is_empty() {
        println!("No notes");
        return Ok(());
    }

    for note in &state.notes {
        println!(
            "{:>4}  {}  ({})",
            note.id.unwrap_or_default(),
            note.title,
            format_date(note.modified_date)
        );
    }

    Ok(())
}

pub async fn handle_get(dir: &Path, id: i64, json: bool) -> Result<()> {
    let mut state = bound_view(dir)?;
    state.load_by_id(id).await;

    let note = state
        .current_note
        .as_ref()
        .ok_or(MemopadError::NoteNotFound(id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(note)?);
    } else {
        print_note(note);
    }

    Ok(())
}

pub async fn handle_edit(
    dir: &Path,
    id: i64,
    title: Option<String>,
    content: Option<String>,
) -> Result<()> {
    let mut state = bound_view(dir)?;
    state.load_by_id(id).await;

    let existing = state
        .current_note
        .clone()
        .ok_or(MemopadError::NoteNotFound(id))?;

    let title = title.unwrap_or_else(|| existing.title.clone());
    let content = content.unwrap_or_else(|| existing.content.clone());

    if !state.save(&title, &content).await {
        return Err(MemopadError::Storage(format!("update of note {} failed", id)));
    }

    println!("Updated note {} - {}", id, title);
    Ok(())
}

pub async fn handle_delete(dir: &Path, id: i64) -> Result<()> {
    let mut state = bound_view(dir)?;

    // Confirm existence up front so a miss becomes an error exit.
    state.load_by_id(id).await;
    if state.current_note.is_none() {
        return Err(MemopadError::NoteNotFound(id));
    }

    state.remove(id).await;
    println!("Deleted note {}", id);
    Ok(())
}

pub async fn handle_font(
    dir: &Path,
    title_size: Option<u32>,
    content_size: Option<u32>,
) -> Result<()> {
    let mut state = bound_view(dir)?;

    match (title_size, content_size) {
        (Some(title), Some(content)) => {
            state.save_font_settings(title, content).await;
        }
        (None, None) => {
            state.load_font_settings().await;
        }
        _ => {
            return Err(MemopadError::Storage(
                "both --title-size and --content-size are required to set".to_string(),
            ));
        }
    }

    println!("title font size:   {}", state.font_settings.title_size);
    println!("content font size: {}", state.font_settings.content_size);
    Ok(())
}
