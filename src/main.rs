// src/main.rs

mod app_logic;
mod core;
mod platform_layer;

use crate::app_logic::handler::APP_NAME;
use crate::app_logic::{SyncOrchestrator, explorer_items_from_documents};
use crate::core::{
    AppSettings, ConfigManagerOperations, CoreConfigManager, CoreDocumentStore, CountStore,
    DocumentStoreOperations, MarkdownCharacterCounter, path_utils,
};
use crate::platform_layer::{AppEvent, MenuAction, PlatformCommand, PlatformEventHandler};

use clap::Parser;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

const LOG_FILENAME: &str = "vault_tally.log";

/*
 * Command line of the headless host. Counts every document under
 * `vault_root` and prints the resulting host commands to stdout.
 */
#[derive(Parser, Debug)]
#[command(name = "vault_tally")]
#[command(about = "Character counts for the documents and folders of a Markdown vault", long_about = None)]
#[command(version)]
struct HostArgs {
    /// Root directory of the vault
    vault_root: PathBuf,

    /// Apply the "Formatting" action to this vault path before exiting
    #[arg(long = "format", value_name = "DOCUMENT")]
    format_document: Option<String>,

    /// Read settings from and write the log file to this directory
    #[arg(long, value_name = "DIRECTORY")]
    config_dir: Option<PathBuf>,
}

/*
 * Initializes logging to stderr and, when a configuration directory is
 * available, to a log file inside it. Stdout is reserved for the host
 * commands printed by `main`.
 */
fn initialize_logging(settings: &AppSettings, log_dir: Option<PathBuf>) {
    let level = settings.log_level_filter();
    let config = ConfigBuilder::new()
        .set_thread_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    loggers.push(TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ));
    if let Some(log_dir) = log_dir {
        match File::create(log_dir.join(LOG_FILENAME)) {
            Ok(file) => loggers.push(WriteLogger::new(level, config, file)),
            Err(e) => eprintln!("Failed to create log file in {log_dir:?}: {e}"),
        }
    }

    if let Err(e) = CombinedLogger::init(loggers) {
        eprintln!("Failed to initialize logging: {e}");
    }
}

fn describe_command(command: &PlatformCommand) -> String {
    match command {
        PlatformCommand::SetExplorerItemCount { path, label } => format!("explorer {path}{label}"),
        PlatformCommand::UpdateStatusText { text } => format!("status   {text}"),
        PlatformCommand::ShowNotice { text } => format!("notice   {text}"),
        PlatformCommand::RegisterFileMenuItem { action, title } => {
            format!("menu     {title} ({action:?})")
        }
    }
}

fn drain_commands(handler: &mut impl PlatformEventHandler) {
    while let Some(command) = handler.try_dequeue_command() {
        println!("{}", describe_command(&command));
    }
}

/*
 * Headless host: counts every document of a vault directory, prints the
 * resulting explorer labels and status text, and optionally applies the
 * "Formatting" action to one document first.
 */
fn main() -> ExitCode {
    let host_args = HostArgs::parse();

    let config_manager = match &host_args.config_dir {
        Some(dir) => CoreConfigManager::with_config_dir(dir),
        None => CoreConfigManager::new(),
    };
    let settings_result = config_manager.load_settings(APP_NAME);
    let settings = settings_result.as_ref().cloned().unwrap_or_default();
    let log_dir = host_args
        .config_dir
        .clone()
        .or_else(|| path_utils::get_base_app_config_local_dir(APP_NAME));
    initialize_logging(&settings, log_dir);
    if let Err(e) = &settings_result {
        log::warn!("Main: Could not load settings, using defaults: {e}");
    }
    log::debug!("Main: Settings {settings:?}");

    let document_store = Arc::new(CoreDocumentStore::new(
        &host_args.vault_root,
        &settings.document_extensions,
    ));
    let documents = match document_store.list_all_documents() {
        Ok(documents) => documents,
        Err(e) => {
            log::error!("Main: Cannot scan vault {:?}: {e}", host_args.vault_root);
            return ExitCode::FAILURE;
        }
    };

    let count_store = CountStore::new(Arc::new(MarkdownCharacterCounter::new()));
    let mut orchestrator =
        SyncOrchestrator::new(count_store, document_store, settings.debounce_delay());
    orchestrator.handle_event(AppEvent::ExplorerItemsListed {
        items: explorer_items_from_documents(&documents),
    });
    // The listing repaints with empty counts; only the post-scan state is shown.
    while orchestrator.try_dequeue_command().is_some() {}

    orchestrator.initialize_counts();
    drain_commands(&mut orchestrator);

    if let Some(document) = host_args.format_document {
        orchestrator.handle_event(AppEvent::MenuActionClicked {
            action: MenuAction::Formatting,
            path: document.clone(),
        });
        // The write-back surfaces as a save, which the host reports like any other.
        orchestrator.handle_event(AppEvent::DocumentModified {
            path: document.clone(),
            at: Instant::now(),
        });
        orchestrator.handle_event(AppEvent::ActiveDocumentChanged {
            path: Some(document),
        });
        while let Some(deadline) = orchestrator.next_recount_deadline() {
            orchestrator.handle_event(AppEvent::Tick { now: deadline });
        }
        drain_commands(&mut orchestrator);
    }

    log::info!(
        "Main: Tracked {} documents in {:?}.",
        orchestrator.count_store().tracked_file_count(),
        host_args.vault_root
    );

    orchestrator.on_quit();
    ExitCode::SUCCESS
}
