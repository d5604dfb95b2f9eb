//! Core domain logic for userlog.
//!
//! This crate contains pure domain logic with ZERO database dependencies.
//! Entity declarations, validation rules and field transforms live here.
//!
//! # Modules
//!
//! - `schema` - Static entity declarations and the registry that checks them
//! - `validation` - Ordered per-field rules and collected violations
//! - `user` - User drafts, rule set, name/email transforms
//! - `log` - Log drafts and rule set

pub mod log;
pub mod schema;
pub mod user;
pub mod validation;

pub use log::{LogDraft, NewLog};
pub use schema::{Registry, SchemaError};
pub use user::{NewUser, UserChanges, UserDraft, normalize_email, present_name};
pub use validation::{FieldRules, FieldViolation, Rule, ValidationErrors};
