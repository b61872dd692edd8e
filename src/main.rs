use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;
use url::Url;

use tidings::api::ApiClient;
use tidings::app::{App, AppEvent};
use tidings::config::Config;
use tidings::session::Session;
use tidings::ui;

/// Get the config directory path (~/.config/tidings/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("tidings"))
}

#[derive(Parser, Debug)]
#[command(name = "tidings", about = "Terminal client for GReader-compatible feed servers")]
struct Args {
    /// Server base URL (overrides the config file)
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Forget the stored session token and exit
    #[arg(long)]
    logout: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // Set up config directory
    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        println!("Created config directory: {}", config_dir.display());
    }

    // Directory holds the session token: user-only access on Unix.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(&config_dir) {
            Ok(metadata) => {
                let mut perms = metadata.permissions();
                perms.set_mode(0o700);
                if let Err(e) = std::fs::set_permissions(&config_dir, perms) {
                    tracing::warn!(
                        path = %config_dir.display(),
                        error = %e,
                        "Failed to set config directory permissions to 0700"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %config_dir.display(),
                    error = %e,
                    "Failed to read config directory metadata"
                );
            }
        }
    }

    let config = Config::load(&config_dir.join("config.toml")).context("Failed to load config")?;

    let mut session = Session::load(&config_dir).context("Failed to load session")?;

    // Handle --logout flag
    if args.logout {
        session.clear().context("Failed to clear session")?;
        println!("Logged out.");
        return Ok(());
    }

    let endpoint_str = args.endpoint.unwrap_or_else(|| config.endpoint.clone());
    let endpoint = Url::parse(&endpoint_str)
        .with_context(|| format!("Invalid endpoint URL: {}", endpoint_str))?;

    let api = ApiClient::new(endpoint, session.token(), config.unread_limit)
        .context("Failed to create API client")?;

    // Login status is derived from token presence; the first page loads
    // inside the UI bootstrap when logged in.
    let mut app = App::new(api, session, &config);

    // Create event channel for background tasks
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    ui::run(&mut app, event_tx, event_rx).await?;

    println!("Goodbye!");
    Ok(())
}
