//! Log drafts.

use serde::{Deserialize, Serialize};

use crate::schema::LOG_TEXT_MAX_LEN;
use crate::validation::{FieldRules, ValidationErrors};

/// Input for creating a log row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLog {
    /// Log text.
    pub log: Option<String>,
    /// Owning user.
    pub user_id: Option<i32>,
}

/// Unsaved or previously loaded log row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogDraft {
    id: Option<i32>,
    log: Option<String>,
    user_id: Option<i32>,
}

impl LogDraft {
    /// Builds a draft that has never been stored.
    #[must_use]
    pub fn new(input: NewLog) -> Self {
        Self {
            id: None,
            log: input.log,
            user_id: input.user_id,
        }
    }

    /// Rebuilds a draft from a stored row.
    #[must_use]
    pub const fn existing(id: i32, log: Option<String>, user_id: Option<i32>) -> Self {
        Self {
            id: Some(id),
            log,
            user_id,
        }
    }

    /// Surrogate key, once stored.
    #[must_use]
    pub const fn id(&self) -> Option<i32> {
        self.id
    }

    /// Log text.
    #[must_use]
    pub fn log(&self) -> Option<&str> {
        self.log.as_deref()
    }

    /// Owning user.
    #[must_use]
    pub const fn user_id(&self) -> Option<i32> {
        self.user_id
    }

    /// Assigns the text.
    pub fn set_log(&mut self, log: Option<String>) {
        self.log = log;
    }

    /// Links the row to a user, or unlinks it.
    pub fn set_user_id(&mut self, user_id: Option<i32>) {
        self.user_id = user_id;
    }

    /// Records the key assigned by storage.
    pub fn mark_stored(&mut self, id: i32) {
        self.id = Some(id);
    }

    /// Runs every log rule.
    ///
    /// # Errors
    ///
    /// Returns all violations when at least one rule fails.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        FieldRules::new("log")
            .max_len(LOG_TEXT_MAX_LEN)
            .check(self.log.as_deref(), &mut errors);
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_length_limit() {
        let mut draft = LogDraft::new(NewLog {
            log: Some("login 1".to_string()),
            user_id: Some(1),
        });
        assert!(draft.validate().is_ok());

        draft.set_log(Some("x".repeat(101)));
        let err = draft.validate().unwrap_err();
        assert_eq!(err.to_string(), "log must be at most 100 characters");
    }

    #[test]
    fn test_unlinked_log_is_valid() {
        let draft = LogDraft::new(NewLog::default());
        assert!(draft.validate().is_ok());
        assert_eq!(draft.user_id(), None);
        assert_eq!(draft.id(), None);
    }
}
