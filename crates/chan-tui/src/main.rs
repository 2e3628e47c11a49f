//! chandash: terminal dashboard for Lightning node channels.
//!
//! Binary entry point: CLI, logging, config and snapshot loading. The UI
//! lives in the library.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};

use chan_proto::channel::ChannelSnapshot;
use chan_proto::config::Config;
use chan_proto::format::Currency;
use chan_tui::app::App;
use chan_tui::app_state::AppState;
use chan_tui::close_flow::LoggingCloser;
use chan_tui::view::{Capability, DisplayContext};

/// Terminal dashboard for the channels of a Lightning node
#[derive(Parser, Debug)]
#[command(name = "chandash")]
#[command(about = "Terminal dashboard for Lightning node channels", long_about = None)]
struct Args {
    /// Channel snapshot (JSON); defaults to the configured path
    #[arg(value_name = "SNAPSHOT")]
    snapshot: Option<PathBuf>,

    /// Show privileged actions such as closing channels
    #[arg(long)]
    admin: bool,

    /// Amount unit: sat, btc or msat
    #[arg(long, value_name = "UNIT")]
    currency: Option<Currency>,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let data_dir = chan_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let log_path = chan_proto::platform::log_path();
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("chandash log: {}", log_path.display());
    info!("chandash starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let loaded = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let mut config = loaded.unwrap_or_else(|e| {
        warn!("config unreadable, using defaults: {:#}", e);
        Config::default()
    });
    if let Some(currency) = args.currency {
        config.display.currency = currency;
    }
    let admin = args.admin || config.access.admin;

    // ── Load snapshot ────────────────────────────────────────────────────────
    let snapshot_path = args
        .snapshot
        .unwrap_or_else(|| config.snapshot.path.clone());
    let snapshot = match ChannelSnapshot::load(&snapshot_path) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("❌ Cannot load channel snapshot: {}", e);
            eprintln!("   Pass a snapshot path: chandash /path/to/channels.json");
            std::process::exit(1);
        }
    };
    info!(
        "loaded {} channels from {}",
        snapshot.len(),
        snapshot_path.display()
    );

    let reload_debounce = config
        .snapshot
        .watch
        .then(|| Duration::from_millis(config.snapshot.debounce_ms));

    let state = AppState::new(
        snapshot,
        snapshot_path,
        DisplayContext::from_config(&config),
        Capability::from_admin(admin),
    );

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let app = App::new(state, Box::new(LoggingCloser), reload_debounce);
    app.run().await?;

    Ok(())
}
