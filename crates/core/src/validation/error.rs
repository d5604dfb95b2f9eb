//! Collected validation failures.

use std::fmt;

use super::rules::Rule;

/// One failed rule on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Field name.
    pub field: &'static str,
    /// The rule that failed.
    pub rule: Rule,
    /// Human-readable message.
    pub message: String,
}

/// Every rule violation found in one save attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    /// Creates an empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            violations: Vec::new(),
        }
    }

    /// Records a violation.
    pub fn push(&mut self, violation: FieldViolation) {
        self.violations.push(violation);
    }

    /// Returns `true` when nothing failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// All violations in evaluation order.
    #[must_use]
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// The first violation.
    #[must_use]
    pub fn first(&self) -> Option<&FieldViolation> {
        self.violations.first()
    }

    /// Returns `true` if `field` failed `rule`.
    #[must_use]
    pub fn has(&self, field: &str, rule: Rule) -> bool {
        self.violations
            .iter()
            .any(|v| v.field == field && v.rule == rule)
    }

    /// Violations recorded against `field`.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldViolation> {
        self.violations.iter().filter(move |v| v.field == field)
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns `self` if at least one violation was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut iter = self.violations.iter();
        match iter.next() {
            Some(first) => f.write_str(&first.message)?,
            None => return f.write_str("no validation errors"),
        }
        for violation in iter {
            write!(f, "; {}", violation.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
