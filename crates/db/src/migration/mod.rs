//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration. Schema synchronization
//! (`crate::sync`) drives them; the `migrator` binary exposes the same modes.

pub use sea_orm_migration::prelude::*;

mod m20261018_000001_create_users_and_logs;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20261018_000001_create_users_and_logs::Migration)]
    }
}
