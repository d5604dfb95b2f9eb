//! Shared setup for integration tests.
//!
//! Every test gets its own in-memory SQLite database with a freshly created
//! schema, so tests never need a running server and never see each other's rows.

use sea_orm::DatabaseConnection;
use userlog_core::NewUser;
use userlog_shared::{DatabaseConfig, SyncMode};

/// Connects to a new in-memory database and creates the schema.
pub async fn setup() -> DatabaseConnection {
    let db = userlog_db::connect(&DatabaseConfig::in_memory())
        .await
        .expect("Failed to connect to database");
    userlog_db::sync(&db, SyncMode::Recreate)
        .await
        .expect("Failed to synchronize schema");
    db
}

/// Input for a user with the given name and email.
#[allow(dead_code)]
pub fn new_user(name: &str, surname: &str, email: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        surname: Some(surname.to_string()),
        email: Some(email.to_string()),
    }
}
