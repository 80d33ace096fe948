//! LoadApp - terminal download demo
//!
//! Pick a download target, press the progress button, watch it animate while
//! the file downloads, then open the completion notification to see whether it
//! worked.

mod config;
mod core;
mod download;
mod frontend;
mod notification;
mod widgets;

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use download::{DownloadService, HttpDownloadService};
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(ClapParser)]
#[command(name = "loadapp")]
#[command(about = "Download a file and get notified when it's done", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Custom data directory (default: ~/.loadapp)
    /// Can also be set via LOADAPP_DIR environment variable
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Directory downloads are written to (overrides the config)
    #[arg(long, value_name = "DIR")]
    download_dir: Option<PathBuf>,

    /// Log file (the TUI owns stdout)
    #[arg(long, value_name = "FILE", default_value = "loadapp.log")]
    log_file: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the configured download targets
    Targets,
    /// Download one target without the TUI and print the resulting notification
    Fetch {
        /// Target key (see `targets`)
        key: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging to file (use RUST_LOG env var to control level, e.g. RUST_LOG=debug)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&cli.log_file)
        .context(format!("Failed to open log file {:?}", cli.log_file))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false) // No color codes in log file
        .init();

    // Set custom data directory if specified (via CLI or environment variable)
    if let Some(data_dir) = &cli.data_dir {
        std::env::set_var(config::DATA_DIR_ENV, data_dir);
        tracing::info!("Using custom data directory: {:?}", data_dir);
    } else if let Ok(env_dir) = std::env::var(config::DATA_DIR_ENV) {
        tracing::info!("Using data directory from {}: {}", config::DATA_DIR_ENV, env_dir);
    }

    let mut config = match &cli.config {
        Some(path) => config::Config::load_from_path(path)?,
        None => config::Config::load()?,
    };
    if let Some(dir) = &cli.download_dir {
        config.downloads.directory = Some(dir.clone());
    }

    match cli.command {
        Some(Commands::Targets) => {
            for target in &config.downloads.targets {
                println!("{:<10} {}", target.key, target.label);
                println!("{:<10} {}", "", target.url);
            }
            Ok(())
        }
        Some(Commands::Fetch { key }) => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(fetch(config, &key))
        }
        None => {
            // Use tokio runtime for the download tasks
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(async_run_tui(config))
        }
    }
}

/// Headless download of one target through the same core the TUI uses.
async fn fetch(config: config::Config, key: &str) -> Result<()> {
    let idx = config
        .downloads
        .targets
        .iter()
        .position(|t| t.key == key)
        .context(format!("Unknown download target '{}'", key))?;

    let mut service = HttpDownloadService::new(config.download_dir()?)?;
    let mut download_rx = service.subscribe();
    let mut app_core = crate::core::AppCore::new(config);

    app_core.select_target(idx);
    app_core.click_button(&mut service, Instant::now());
    if let Some(toast) = &app_core.toast {
        anyhow::bail!("{}", toast.message);
    }

    println!("Downloading {}...", app_core.targets()[idx].url);
    while app_core.active_download().is_some() {
        let event = download_rx
            .recv()
            .await
            .context("Download service stopped before completing")?;
        app_core.handle_download_event(event, &service);
    }
    service.unsubscribe();

    let notification = app_core
        .notifications
        .latest()
        .context("No notification was posted")?;
    let body = notification.body()?;
    println!("{}: {}", notification.content_title, notification.content_text);
    println!("  title:  {}", body.title);
    println!("  status: {}", body.status);
    Ok(())
}

/// Async TUI main loop
async fn async_run_tui(config: config::Config) -> Result<()> {
    use crate::core::{route_key, AppCore};
    use crossterm::event::{MouseButton, MouseEventKind};
    use crate::frontend::{Frontend, FrontendEvent, TuiFrontend};

    let poll_timeout = Duration::from_millis(config.ui.poll_timeout_ms);
    let download_dir = config.download_dir()?;

    // Subscribe once for the lifetime of the UI
    let mut service = HttpDownloadService::new(download_dir.clone())?;
    let mut download_rx = service.subscribe();
    tracing::info!("Downloads go to {:?}", download_dir);

    let mut app_core = AppCore::new(config);

    let mut frontend = TuiFrontend::new()?;
    frontend.set_poll_timeout(poll_timeout);

    // Main event loop
    while app_core.running {
        let events = frontend.poll_events()?;
        let now = Instant::now();

        for event in events {
            match event {
                FrontendEvent::Key { code, modifiers } => {
                    let action = route_key(code, modifiers, &app_core.screen);
                    app_core.apply(action, &mut service, now);
                }
                FrontendEvent::Mouse {
                    kind: MouseEventKind::Down(MouseButton::Left),
                    x,
                    y,
                } => {
                    let action = frontend.hit_test(x, y);
                    app_core.apply(action, &mut service, now);
                }
                FrontendEvent::Mouse { .. } => {}
                FrontendEvent::Resize { width, height } => {
                    tracing::debug!("Terminal resized to {}x{}", width, height);
                    app_core.needs_render = true;
                }
            }
        }

        // Completion broadcasts from the download tasks
        while let Ok(event) = download_rx.try_recv() {
            app_core.handle_download_event(event, &service);
        }

        app_core.tick(Instant::now());

        if app_core.needs_render {
            frontend.render(&mut app_core)?;
            app_core.needs_render = false;
        }
    }

    service.unsubscribe();
    frontend.cleanup()?;
    Ok(())
}
