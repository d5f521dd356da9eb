pub mod cli;
pub mod context;
pub mod entity;
pub mod error;
pub mod prefs;
pub mod repo;
pub mod storage;
pub mod view;

pub use context::AppContext;
pub use entity::Note;
pub use error::{MemopadError, Result};
pub use view::ViewState;
