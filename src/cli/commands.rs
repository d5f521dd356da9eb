use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "memopad")]
#[command(version, about = "A local-first note store with keyword search")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding memo.db and settings.json
    #[arg(long, global = true, default_value = ".", value_name = "PATH")]
    pub dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new note
    Add {
        /// Note title
        title: String,

        /// Note content
        #[arg(long, default_value = "")]
        content: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List notes, most recently modified first
    List {
        /// Only show notes whose title contains this keyword
        #[arg(long, short = 's', value_name = "KEYWORD")]
        search: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single note by id
    Get {
        id: i64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit an existing note
    Edit {
        id: i64,

        /// New title (unchanged when omitted)
        #[arg(long)]
        title: Option<String>,

        /// New content (unchanged when omitted)
        #[arg(long)]
        content: Option<String>,
    },

    /// Delete a note by id
    Delete { id: i64 },

    /// Show the font sizes, or set them when both flags are given
    Font {
        /// Title font size
        #[arg(long, value_name = "N")]
        title_size: Option<u32>,

        /// Content font size
        #[arg(long, value_name = "N")]
        content_size: Option<u32>,
    },
}
