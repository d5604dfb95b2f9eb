//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for `users` and `logs`
//! - Repositories: build/save/create/update and filtered, eager-loaded reads
//! - A transaction coordinator over the database's native transactions
//! - Schema synchronization driven by migrations

pub mod entities;
pub mod error;
pub mod migration;
pub mod repositories;
pub mod sync;
pub mod transaction;

pub use error::{DataError, DataResult};
pub use repositories::{
    LogFilter, LogRecord, LogRepository, LogWithUser, ProjectedUser, UserAttribute, UserFilter,
    UserInclude, UserRecord, UserRepository,
};
pub use sync::sync;
pub use transaction::{UnitFuture, in_transaction};

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;
use userlog_shared::DatabaseConfig;

/// Establishes a connection pool to the configured database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> DataResult<DatabaseConnection> {
    let mut options = ConnectOptions::new(config.url());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections);

    let db = Database::connect(options).await?;
    info!(
        dialect = ?config.dialect,
        host = %config.host,
        database = %config.database,
        "Connected to database"
    );
    Ok(db)
}

/// Closes the pool, waiting for checked-out connections to be returned.
///
/// # Errors
///
/// Returns an error if the pool cannot be closed cleanly.
pub async fn disconnect(db: DatabaseConnection) -> DataResult<()> {
    db.close().await?;
    info!("Database connection closed");
    Ok(())
}
