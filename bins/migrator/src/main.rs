//! Schema synchronization runner for userlog.
//!
//! Usage:
//!   migrator          - Apply the mode from configuration (`database.sync`)
//!   migrator sync     - Create missing tables, never drop anything
//!   migrator reset    - Drop and recreate the users and logs tables

use anyhow::bail;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use userlog_shared::{AppConfig, SyncMode};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "migrator=info,userlog_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;
    let mode = match std::env::args().nth(1).as_deref() {
        None => config.database.sync,
        Some("sync") => SyncMode::CreateMissing,
        Some("reset") => SyncMode::Recreate,
        Some(other) => bail!("unknown command '{other}', expected 'sync' or 'reset'"),
    };

    let db = userlog_db::connect(&config.database).await?;
    userlog_db::sync(&db, mode).await?;
    info!(?mode, "Done");

    userlog_db::disconnect(db).await?;
    Ok(())
}
