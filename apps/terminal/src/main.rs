//! # Cyber Market Terminal Entry Point
//!
//! ```bash
//! cyber-market                          # platform config and data dirs
//! cyber-market --config ./market.toml   # explicit config file
//! cyber-market --database /tmp/cm.db    # explicit SQLite file
//! RUST_LOG=cyber=trace cyber-market     # louder logs on stderr
//! ```

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "cyber-market")]
#[command(author, version, about = "Cyber Market terminal storefront")]
struct Cli {
    /// Config file (default: market.toml in the platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// SQLite database file (overrides config and CYBER_DB_PATH)
    #[arg(short, long)]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cyber_terminal::init_tracing();

    let cli = Cli::parse();
    info!("Starting Cyber Market terminal");

    cyber_terminal::run(cli.config, cli.database).await
}
