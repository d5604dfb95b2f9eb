//! Field validation.
//!
//! Each entity describes its rules as an ordered list of `FieldRules`. A save
//! attempt evaluates all of them and gathers every violation, so a caller can
//! report all problems at once rather than just the first.

pub mod error;
pub mod rules;

pub use error::{FieldViolation, ValidationErrors};
pub use rules::{FieldRules, Rule};
