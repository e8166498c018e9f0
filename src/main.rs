// ABOUTME: Entry point for supportchat, a terminal live-chat widget for customer support.
// ABOUTME: Parses CLI args, loads config, sets up file logging, and launches the app.

use std::fs::OpenOptions;
use std::sync::Mutex;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use supportchat::app::App;
use supportchat::config::Config;

#[derive(Parser)]
#[command(name = "supportchat")]
#[command(about = "Live chat with a support agent from your terminal")]
struct Cli {
    /// Base URL of the session API (overrides config and env)
    #[arg(long)]
    api_url: Option<String>,

    /// Base URL of the WebSocket server (overrides config and env)
    #[arg(long)]
    ws_url: Option<String>,

    /// Start with the chat panel open
    #[arg(long)]
    open: bool,

    /// Forget the cached session and start a new one
    #[arg(long)]
    reset_session: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load .env file
    dotenvy::dotenv().ok();

    let mut config = Config::load()?;
    config.apply_env();
    config.apply_overrides(cli.api_url, cli.ws_url);
    if cli.open {
        config.widget.start_open = true;
    }

    init_tracing()?;
    tracing::info!(
        api_url = %config.server.api_url,
        ws_url = %config.server.ws_url,
        "starting chat widget"
    );

    App::new(config, cli.reset_session).run().await
}

/// Log to a file: the terminal belongs to the TUI.
fn init_tracing() -> anyhow::Result<()> {
    let path = Config::log_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,supportchat=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .try_init()?;
    Ok(())
}
