//! anthology server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! pool and probes it, then serves the JSON API over HTTP. Any failure before
//! the listener is up exits the process with an error.

use std::path::{Path, PathBuf};

use anthology_api::AppState;
use anthology_server::{ServerConfig, startup::Startup};
use anthology_store_sqlite::SqlitePool;
use anyhow::Context as _;
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Anthology poetry API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let server_cfg = ServerConfig::load(&cli.config).context("failed to read configuration")?;
  let classifier = server_cfg.classifier();

  // Expand `~` in the database path.
  let database_path = expand_tilde(&server_cfg.database_path);
  let pool_size = server_cfg.pool_size;

  // Pool, probe, listen; strictly in that order.
  let mut startup = Startup::new();
  startup
    .acquire(|| SqlitePool::open(&database_path, pool_size))
    .await
    .with_context(|| format!("failed to open database at {database_path:?}"))?;

  let address = server_cfg.address();
  let (listener, store) = startup.listen(&address).await.context("failed to start listener")?;

  let app = anthology_server::app(AppState::new(store, classifier));

  tracing::info!("Listening on http://{address}");
  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
