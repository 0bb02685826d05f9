use anyhow::Result;
use autodelete_core::{DeletionKey, db_path_from_env};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "autodelete")]
#[command(about = "Deletes Telegram chat messages after a fixed delay", long_about = None)]
struct Cli {
    /// Database path; overrides AUTODELETE_DB_PATH
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bot: delete every new message in the configured chat after the delay
    Run,
    /// List pending deletions with their age
    Pending,
    /// Show when a message was registered for deletion
    Get {
        #[arg(allow_negative_numbers = true)]
        chat_id: i64,
        message_id: i64,
    },
    /// Drop a pending deletion without deleting the message
    Forget {
        #[arg(allow_negative_numbers = true)]
        chat_id: i64,
        message_id: i64,
    },
}

pub(crate) fn get_db_path(db_override: Option<PathBuf>) -> PathBuf {
    db_override.unwrap_or_else(db_path_from_env)
}

pub(crate) fn ensure_db_dir(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => commands::run::run(cli.db).await?,
        Commands::Pending => commands::records::run_pending(get_db_path(cli.db))?,
        Commands::Get { chat_id, message_id } => {
            commands::records::run_get(get_db_path(cli.db), DeletionKey::new(chat_id, message_id))?;
        },
        Commands::Forget { chat_id, message_id } => {
            commands::records::run_forget(
                get_db_path(cli.db),
                DeletionKey::new(chat_id, message_id),
            )?;
        },
    }

    Ok(())
}
