//! # Cyber Market Terminal
//!
//! Line-oriented front end for the session store.
//!
//! ## Module Organization
//! ```text
//! cyber_terminal/
//! ├── lib.rs          ◄─── You are here (startup + tracing)
//! ├── command.rs      ◄─── Command::parse (pure)
//! ├── dispatch.rs     ◄─── Command → SessionStore → text
//! ├── render.rs       ◄─── Catalog, loadout, history views
//! └── repl.rs         ◄─── stdin/stdout loop
//! ```

pub mod command;
pub mod dispatch;
pub mod render;
pub mod repl;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cyber_db::{Database, DbConfig};
use cyber_session::{SessionConfig, SessionStore, SqliteBackend};

/// Starts a session against the configured SQLite provider and runs the
/// loop on stdin/stdout.
///
/// ## Startup Sequence
/// 1. Load `SessionConfig` (defaults → market.toml → `CYBER_*` env)
/// 2. Apply the `--database` override, if any
/// 3. Open the database and run migrations
/// 4. Build the `SessionStore` and hand it to the loop
pub async fn run(config_path: Option<PathBuf>, database: Option<PathBuf>) -> anyhow::Result<()> {
    let mut config = SessionConfig::load(config_path).context("loading market config")?;
    if database.is_some() {
        config.database_path = database;
    }

    let db_path = config.database_path();
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating data directory {}", parent.display()))?;
    }
    info!(?db_path, "Database path determined");

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .with_context(|| format!("opening database {}", db_path.display()))?;

    let backend = Arc::new(SqliteBackend::new(db.clone(), &config));
    let mut store = SessionStore::new(backend, config);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    repl::run(&mut store, stdin, &mut stdout).await?;

    db.close().await;
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - Default: `info,cyber=debug,sqlx=warn`
/// - Override with `RUST_LOG`
///
/// Logs go to stderr so they never interleave with command output.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cyber=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
