//! `SeaORM` entity definitions.
//!
//! Column names and nullability mirror the declarations in
//! `userlog_core::schema`; the `schema_test` integration test keeps them in step.

pub mod logs;
pub mod users;
