use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use memopad::cli::{
    handle_add, handle_delete, handle_edit, handle_font, handle_get, handle_list, Cli, Commands,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memopad=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let dir = cli.dir;

    let result = match cli.command {
        Commands::Add {
            title,
            content,
            json,
        } => handle_add(&dir, title, content, json).await,
        Commands::List { search, json } => handle_list(&dir, search, json).await,
        Commands::Get { id, json } => handle_get(&dir, id, json).await,
        Commands::Edit { id, title, content } => handle_edit(&dir, id, title, content).await,
        Commands::Delete { id } => handle_delete(&dir, id).await,
        Commands::Font {
            title_size,
            content_size,
        } => handle_font(&dir, title_size, content_size).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
