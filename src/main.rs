use anyhow::{Context, Result};
use clap::Parser;
use panchax::api::ApiClient;
use panchax::config::{Config, ENV_TOKEN};
use panchax::dashboard::{DashboardError, DashboardEvent, DashboardStore};
use panchax::session::Session;
use secrecy::SecretString;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

mod app;
mod ui;

use app::App;

/// Get the config directory path (~/.config/panchax/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("panchax"))
}

#[derive(Parser, Debug)]
#[command(name = "panchax", about = "Terminal dashboard for the Panchax movie recommendation service")]
struct Args {
    /// Base URL of the API (overrides config and PANCHAX_API_URL)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Config file (default: ~/.config/panchax/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Session file (default: ~/.config/panchax/session.json)
    #[arg(long, value_name = "FILE")]
    session: Option<PathBuf>,

    /// Check that the service is up, then exit
    #[arg(long)]
    health: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file.as_ref())?;

    let config_dir = get_config_dir()?;
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let session_path = args
        .session
        .clone()
        .unwrap_or_else(|| config_dir.join("session.json"));

    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config: {}", config_path.display()))?
        .with_env_overrides(|key| std::env::var(key).ok());
    if let Some(url) = &args.api_url {
        config.api_url = url.clone();
    }
    tracing::debug!(config = ?config, "Effective configuration");

    // Token precedence: PANCHAX_TOKEN, then the session file, then config.
    let env_token = std::env::var(ENV_TOKEN).ok().map(SecretString::from);
    let mut session = Session::load(&session_path)
        .with_context(|| format!("Failed to load session: {}", session_path.display()))?
        .with_token_override(env_token);
    if session.token().is_none() {
        session = session.with_token_override(config.token());
    }

    let client = ApiClient::new(&config.api_url, session.token(), config.request_timeout())
        .context("Failed to create API client")?;

    if args.health {
        let status = client
            .health()
            .await
            .with_context(|| format!("Service at {} is not reachable", client.base_url()))?;
        println!("{}: {} {}", client.base_url(), status.status, status.message);
        return Ok(());
    }

    let client = Arc::new(client);
    let (event_tx, event_rx) = mpsc::channel::<DashboardEvent>(32);
    let mut store = DashboardStore::new(client.clone(), client, event_tx, config.store_options());

    match store.initialize(session.identity()) {
        Ok(()) => {}
        Err(DashboardError::Unauthenticated) => {
            eprintln!(
                "Not signed in. Sign in to Panchax and save your session to {} (or set {}).",
                session_path.display(),
                ENV_TOKEN
            );
            std::process::exit(2);
        }
        Err(e) => return Err(e).context("Failed to open dashboard"),
    }

    let mut app = App::new(store);
    ui::run(&mut app, event_rx).await?;

    println!("Goodbye!");
    Ok(())
}
