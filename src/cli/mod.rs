mod commands;
mod handlers;

pub use commands::{Cli, Commands};
pub use handlers::{
    handle_add, handle_delete, handle_edit, handle_font, handle_get, handle_list,
};
