mod action;
mod app;
mod app_state;
mod commands;
mod component;
mod components;
mod effects;
mod icons;
mod periodic;
mod theme;
mod timefmt;
mod view_model;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use trash_proto::{
    config::{Config, IconStyle},
    TrashClient,
};

#[derive(Parser)]
#[command(name = "trashpanel")]
#[command(about = "Terminal sidebar for a notebook server's trash", long_about = None)]
struct Cli {
    /// Notebook server base URL (overrides the config file)
    #[arg(long)]
    base_url: Option<String>,

    /// Seconds between background refreshes while the panel is shown
    #[arg(long)]
    refresh_secs: Option<u64>,

    /// Use plain ASCII icons
    #[arg(long)]
    ascii_icons: bool,

    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = trash_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = data_dir.join("trashpanel.log");

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; keep HTTP client internals quiet by default.
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("trashpanel log: {}", log_path.display());

    tracing::info!("trashpanel starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            tracing::warn!("config unreadable, using defaults: {}", e);
            Config::default()
        }),
    };
    if let Some(url) = cli.base_url {
        config.server.base_url = url;
    }
    if let Some(secs) = cli.refresh_secs {
        config.panel.refresh_interval_secs = secs;
    }
    if cli.ascii_icons {
        config.panel.icons = IconStyle::Ascii;
    }

    let client = TrashClient::new(&config.server)?;

    // ── Capability probe ─────────────────────────────────────────────────────
    // A server that says trash is disabled gets no panel at all.
    if !client.probe_trash_enabled().await {
        tracing::info!("trash disabled on {}; not showing panel", config.server.base_url);
        eprintln!("Trash is disabled on {}", config.server.base_url);
        return Ok(());
    }

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let app = app::App::new(client, &config);
    app.run().await?;

    Ok(())
}
