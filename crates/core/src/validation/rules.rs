//! Field rules evaluated before a write reaches storage.

use validator::ValidateEmail;

use super::error::{FieldViolation, ValidationErrors};

/// A single field rule.
///
/// Rules other than `Required` pass on a missing value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Value must be present.
    Required,
    /// At least this many characters.
    MinLength(usize),
    /// At most this many characters.
    MaxLength(usize),
    /// Must not contain the character.
    Forbids(char),
    /// Must be a syntactically valid email address.
    Email,
}

impl Rule {
    /// Returns `true` if the value satisfies the rule.
    #[must_use]
    pub fn accepts(self, value: Option<&str>) -> bool {
        let Some(value) = value else {
            return !matches!(self, Self::Required);
        };

        match self {
            Self::Required => true,
            Self::MinLength(min) => value.chars().count() >= min,
            Self::MaxLength(max) => value.chars().count() <= max,
            Self::Forbids(c) => !value.contains(c),
            Self::Email => value.validate_email(),
        }
    }
}

/// Ordered rules for one field, each paired with its message.
#[derive(Debug, Clone)]
pub struct FieldRules {
    field: &'static str,
    rules: Vec<(Rule, String)>,
}

impl FieldRules {
    /// Starts an empty rule list for `field`.
    #[must_use]
    pub const fn new(field: &'static str) -> Self {
        Self {
            field,
            rules: Vec::new(),
        }
    }

    /// Appends a rule with its failure message.
    #[must_use]
    pub fn rule(mut self, rule: Rule, message: impl Into<String>) -> Self {
        self.rules.push((rule, message.into()));
        self
    }

    /// Appends a `MaxLength` rule with the standard message.
    #[must_use]
    pub fn max_len(self, max: usize) -> Self {
        let message = format!("{} must be at most {max} characters", self.field);
        self.rule(Rule::MaxLength(max), message)
    }

    /// Field the rules apply to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        self.field
    }

    /// Evaluates every rule in order, recording each failure.
    pub fn check(&self, value: Option<&str>, errors: &mut ValidationErrors) {
        for (rule, message) in &self.rules {
            if !rule.accepts(value) {
                errors.push(FieldViolation {
                    field: self.field,
                    rule: *rule,
                    message: message.clone(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Rule::Required, None, false)]
    #[case(Rule::Required, Some(""), true)]
    #[case(Rule::MinLength(3), Some("Al"), false)]
    #[case(Rule::MinLength(3), Some("Ana"), true)]
    #[case(Rule::MinLength(3), Some("Zoë"), true)]
    #[case(Rule::MinLength(3), None, true)]
    #[case(Rule::MaxLength(4), Some("abcde"), false)]
    #[case(Rule::MaxLength(4), Some("abcd"), true)]
    #[case(Rule::Forbids('-'), Some("Ana-Maria"), false)]
    #[case(Rule::Forbids('-'), Some("Ana Maria"), true)]
    #[case(Rule::Email, Some("ana@gmail.com"), true)]
    #[case(Rule::Email, Some("ana.gmail.com"), false)]
    #[case(Rule::Email, Some("ana@"), false)]
    #[case(Rule::Email, None, true)]
    fn test_rule_accepts(#[case] rule: Rule, #[case] value: Option<&str>, #[case] expected: bool) {
        assert_eq!(rule.accepts(value), expected);
    }

    #[test]
    fn test_check_collects_every_failure_in_order() {
        let rules = FieldRules::new("name")
            .rule(Rule::MinLength(3), "too short")
            .rule(Rule::Forbids('-'), "no dashes");

        let mut errors = ValidationErrors::new();
        rules.check(Some("a-"), &mut errors);

        let messages: Vec<_> = errors.violations().iter().map(|v| v.message.as_str()).collect();
        assert_eq!(messages, ["too short", "no dashes"]);
    }

    #[test]
    fn test_max_len_message() {
        let mut errors = ValidationErrors::new();
        FieldRules::new("surname")
            .max_len(2)
            .check(Some("abc"), &mut errors);

        assert_eq!(
            errors.first().map(|v| v.message.as_str()),
            Some("surname must be at most 2 characters")
        );
    }
}
