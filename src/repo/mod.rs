mod note_repo;

pub use note_repo::{NoteRepository, INSERT_FAILED};
