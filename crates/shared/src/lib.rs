//! Shared configuration for the userlog workspace.
//!
//! This crate provides the settings every other crate and binary reads:
//! - Database connection bundle (dialect, host, credentials, pool size)
//! - Schema synchronization mode

pub mod config;

pub use config::{AppConfig, DatabaseConfig, Dialect, SyncMode};
