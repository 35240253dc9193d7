//! Sekai RPC Server - JSON-RPC backend for the sticker picker UI.
//!
//! This binary wraps the sekai-core repository cache in a JSON-RPC 2.0 server
//! so a host process can load repositories, search characters, and collect
//! load-failure notifications over HTTP.

mod handler;
mod server;
mod wrapper;

use anyhow::{Context, Result};
use clap::Parser;
use sekai_core::config::AppConfig;
use sekai_core::{reload_repositories, QueueNotifier, RepositoryManager, RepositorySettings};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "sekai-rpc")]
#[command(about = "JSON-RPC server for Sekai sticker repositories")]
struct Args {
    /// Port to listen on (0 = auto-assign)
    #[arg(short, long, default_value = "0")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Repository settings file (defaults to the user config directory)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Per-request timeout for repository documents, in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Skip loading the configured repositories at startup
    #[arg(long)]
    no_preload: bool,
}

/// Default settings location: `<config dir>/SekaiPlus/repositories.json`.
fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(AppConfig::APP_NAME).join("repositories.json"))
}

/// Read settings from `path`, falling back to the built-in repository list
/// when the file does not exist yet.
fn load_settings(path: Option<&Path>) -> Result<RepositorySettings> {
    match path {
        Some(path) if path.exists() => RepositorySettings::from_file(path)
            .with_context(|| format!("failed to read settings from {}", path.display())),
        Some(path) => {
            info!("No settings at {}, using defaults", path.display());
            Ok(RepositorySettings::default())
        }
        None => Ok(RepositorySettings::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    info!("Starting Sekai RPC Server");

    let settings_path = args.settings.or_else(default_settings_path);
    let settings = load_settings(settings_path.as_deref())?;
    if settings.incomplete_count() > 0 {
        warn!(
            "{} repository entries are missing a name or URL and will be skipped",
            settings.incomplete_count()
        );
    }

    let notifications = Arc::new(QueueNotifier::new());
    let mut builder = RepositoryManager::builder().notifier(notifications.clone());
    if let Some(secs) = args.timeout_secs {
        builder = builder.request_timeout(Duration::from_secs(secs));
    }
    let manager = builder.build()?;

    if !args.no_preload {
        let report = reload_repositories(&manager, &settings).await;
        info!(
            "Preloaded {} repositories ({} failed, {} skipped)",
            report.loaded.len(),
            report.failed.len(),
            report.skipped
        );
    }

    let state = server::AppState::new(manager.clone(), notifications, settings, settings_path);
    let addr = server::start_server(state, &args.host, args.port).await?;

    // Print port for the host process to read (intentional stdout for IPC)
    println!("RPC_PORT={}", addr.port());

    info!("RPC server running on {}", addr);

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, exiting");
    manager.clear_cache();

    Ok(())
}
