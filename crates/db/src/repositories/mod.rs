//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Each one borrows a connection, which may be the pool or an open transaction.

pub mod log;
pub mod user;

pub use log::{
    LogFilter, LogRecord, LogRepository, LogWithUser, ProjectedUser, UserAttribute, UserInclude,
};
pub use user::{UserFilter, UserRecord, UserRepository};
