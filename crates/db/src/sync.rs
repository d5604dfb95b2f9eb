//! Schema synchronization.

use sea_orm::DatabaseConnection;
use sea_orm_migration::{
    MigratorTrait, SchemaManager,
    prelude::{Alias, Table},
};
use tracing::{info, warn};
use userlog_core::Registry;
use userlog_shared::SyncMode;

use crate::error::DataResult;
use crate::migration::Migrator;

/// Brings the database schema in line with the entity declarations.
///
/// The registry is checked first so an inconsistent declaration fails at
/// startup, before any DDL runs.
///
/// # Errors
///
/// Returns an error if the declarations are inconsistent or the DDL fails.
pub async fn sync(db: &DatabaseConnection, mode: SyncMode) -> DataResult<()> {
    let registry = Registry::standard();
    registry.check()?;

    match mode {
        SyncMode::Recreate => {
            warn!("Dropping and recreating the users and logs tables");
            Migrator::reset(db).await?;
            drop_declared_tables(db, &registry).await?;
            Migrator::up(db, None).await?;
        }
        SyncMode::CreateMissing => Migrator::up(db, None).await?,
    }

    info!(?mode, "Schema synchronized");
    Ok(())
}

/// Drops the declared tables left behind without a migration record.
///
/// Children go before parents; tables outside the registry are never touched.
async fn drop_declared_tables(db: &DatabaseConnection, registry: &Registry) -> DataResult<()> {
    let manager = SchemaManager::new(db);

    for schema in registry.entities().iter().rev() {
        manager
            .drop_table(
                Table::drop()
                    .table(Alias::new(schema.table))
                    .if_exists()
                    .to_owned(),
            )
            .await?;
    }

    Ok(())
}
