use clap::Parser;
use dotenv::dotenv;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use notion_sync::config::{self, env_vars};
use notion_sync::integrations::{ConsoleNotifier, Language};
use notion_sync::models::Settings;
use notion_sync::notes::file_ops;
use notion_sync::notes::{DocumentHandle, FsVault};
use notion_sync::notion::NotionClient;
use notion_sync::Syncer;

/// Publish Obsidian notes to a Notion database.
#[derive(Debug, Parser)]
#[command(name = "notion-sync", version)]
struct Args {
    /// Target database id, overriding the configured one
    #[arg(long)]
    database: Option<String>,

    /// Settings file (defaults to NOTION_SYNC_CONFIG, then the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Notes or directories of notes to sync
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    let settings_path = args.config.clone().unwrap_or_else(config::settings_path);
    let settings = Settings::load_from(&settings_path).with_overrides(config::env_string);
    log::info!("[CONFIG] Using settings from {}", settings_path.display());

    let language = Language::resolve(
        settings.language.as_deref(),
        config::env_string(env_vars::HOST_LANG).as_deref(),
    );

    let files = match file_ops::expand_paths(&args.files) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("Could not list notes: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if files.is_empty() {
        eprintln!("No markdown notes found");
        return ExitCode::FAILURE;
    }

    let store = Arc::new(NotionClient::from_settings(&settings));
    let syncer = Syncer::new(settings, store, Arc::new(FsVault::new()))
        .with_notifier(Arc::new(ConsoleNotifier::new(language)));

    let documents: Vec<DocumentHandle> = files.iter().map(DocumentHandle::new).collect();
    let summary = syncer.upload_all(&documents, args.database.as_deref()).await;

    log::info!("[SYNC] {} of {} notes synced", summary.synced, documents.len());
    if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        for document in &summary.failed {
            eprintln!("Not synced: {}", document);
        }
        ExitCode::FAILURE
    }
}
