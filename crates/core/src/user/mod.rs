//! User drafts, rules and field transforms.
//!
//! A `UserDraft` is the in-memory candidate that is built, mutated and then
//! handed to the repository for saving. Names are kept exactly as entered and
//! only upper-cased for presentation; emails are lower-cased when assigned.

use serde::{Deserialize, Serialize};

use crate::schema::{USER_EMAIL_MAX_LEN, USER_NAME_MAX_LEN, USER_NAME_MIN_LEN, USER_SURNAME_MAX_LEN};
use crate::validation::{FieldRules, Rule, ValidationErrors};

/// Presentation form of a stored name.
#[must_use]
pub fn present_name(raw: &str) -> String {
    raw.to_uppercase()
}

/// Storage form of an email address.
#[must_use]
pub fn normalize_email(raw: &str) -> String {
    raw.to_lowercase()
}

/// Input for creating a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    /// Given name.
    pub name: String,
    /// Family name.
    pub surname: Option<String>,
    /// Email address.
    pub email: Option<String>,
}

/// Input for updating a user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    /// New name.
    pub name: Option<String>,
    /// New surname (`Some(None)` clears it).
    pub surname: Option<Option<String>>,
    /// New email (`Some(None)` clears it).
    pub email: Option<Option<String>>,
}

/// Unsaved or previously loaded user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    id: Option<i32>,
    name: String,
    surname: Option<String>,
    email: Option<String>,
}

impl UserDraft {
    /// Builds a draft that has never been stored.
    #[must_use]
    pub fn new(input: NewUser) -> Self {
        Self {
            id: None,
            name: input.name,
            surname: input.surname,
            email: input.email.as_deref().map(normalize_email),
        }
    }

    /// Rebuilds a draft from a stored row.
    #[must_use]
    pub fn existing(id: i32, name: String, surname: Option<String>, email: Option<String>) -> Self {
        Self {
            id: Some(id),
            name,
            surname,
            email,
        }
    }

    /// Surrogate key, once stored.
    #[must_use]
    pub const fn id(&self) -> Option<i32> {
        self.id
    }

    /// Returns `true` if the draft has not been stored yet.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Name as it will be stored.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Surname.
    #[must_use]
    pub fn surname(&self) -> Option<&str> {
        self.surname.as_deref()
    }

    /// Normalized email.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Assigns the name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Assigns the surname.
    pub fn set_surname(&mut self, surname: Option<String>) {
        self.surname = surname;
    }

    /// Assigns the email, lower-casing it.
    pub fn set_email(&mut self, email: Option<&str>) {
        self.email = email.map(normalize_email);
    }

    /// Applies every field present in `changes`.
    pub fn apply(&mut self, changes: UserChanges) {
        if let Some(name) = changes.name {
            self.set_name(name);
        }
        if let Some(surname) = changes.surname {
            self.set_surname(surname);
        }
        if let Some(email) = changes.email {
            self.set_email(email.as_deref());
        }
    }

    /// Records the key assigned by storage.
    pub fn mark_stored(&mut self, id: i32) {
        self.id = Some(id);
    }

    /// Runs every user rule.
    ///
    /// # Errors
    ///
    /// Returns all violations when at least one rule fails.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let [name, surname, email] = rules();

        // An empty name counts as missing.
        name.check(Some(self.name.as_str()).filter(|n| !n.is_empty()), &mut errors);
        surname.check(self.surname.as_deref(), &mut errors);
        email.check(self.email.as_deref(), &mut errors);

        errors.into_result()
    }
}

fn rules() -> [FieldRules; 3] {
    [
        FieldRules::new("name")
            .rule(Rule::Required, "name is required")
            .rule(
                Rule::MinLength(USER_NAME_MIN_LEN),
                format!("name must have at least {USER_NAME_MIN_LEN} characters"),
            )
            .rule(Rule::Forbids('-'), "name cannot contain character -")
            .max_len(USER_NAME_MAX_LEN),
        FieldRules::new("surname").max_len(USER_SURNAME_MAX_LEN),
        FieldRules::new("email")
            .rule(Rule::Email, "email must be a valid email address")
            .max_len(USER_EMAIL_MAX_LEN),
    ]
}

#[cfg(test)]
mod props;

#[cfg(test)]
mod tests {
    use super::*;

    fn ana() -> NewUser {
        NewUser {
            name: "Ana".to_string(),
            surname: Some("Castillo".to_string()),
            email: Some("Ana@Gmail.com".to_string()),
        }
    }

    #[test]
    fn test_new_draft_is_unsaved_and_normalized() {
        let draft = UserDraft::new(ana());

        assert!(draft.is_new());
        assert_eq!(draft.name(), "Ana");
        assert_eq!(draft.email(), Some("ana@gmail.com"));
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_short_name_message() {
        let mut draft = UserDraft::new(ana());
        draft.set_name("Al");

        let err = draft.validate().unwrap_err();
        assert_eq!(
            err.first().map(|v| v.message.as_str()),
            Some("name must have at least 3 characters")
        );
    }

    #[test]
    fn test_empty_name_is_required() {
        let mut draft = UserDraft::new(ana());
        draft.set_name("");

        let err = draft.validate().unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert!(err.has("name", Rule::Required));
        assert_eq!(err.to_string(), "name is required");
    }

    #[test]
    fn test_dash_in_name_message() {
        let mut draft = UserDraft::new(ana());
        draft.set_name("Ana-Maria");

        let err = draft.validate().unwrap_err();
        assert!(err.has("name", Rule::Forbids('-')));
        assert_eq!(err.to_string(), "name cannot contain character -");
    }

    #[test]
    fn test_all_failures_are_collected() {
        let draft = UserDraft::new(NewUser {
            name: "A-".to_string(),
            surname: Some("x".repeat(51)),
            email: Some("not-an-email".to_string()),
        });

        let err = draft.validate().unwrap_err();
        assert_eq!(err.violations().len(), 4);
        assert!(err.has("name", Rule::MinLength(3)));
        assert!(err.has("name", Rule::Forbids('-')));
        assert!(err.has("surname", Rule::MaxLength(50)));
        assert!(err.has("email", Rule::Email));
    }

    #[test]
    fn test_missing_email_and_surname_are_allowed() {
        let draft = UserDraft::new(NewUser {
            name: "Pedro".to_string(),
            ..NewUser::default()
        });
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_apply_changes() {
        let mut draft = UserDraft::existing(7, "Ana".to_string(), None, None);
        draft.apply(UserChanges {
            name: Some("Juan".to_string()),
            surname: Some(Some("Perez".to_string())),
            email: Some(Some("JUAN@Example.com".to_string())),
        });

        assert_eq!(draft.id(), Some(7));
        assert_eq!(draft.name(), "Juan");
        assert_eq!(draft.surname(), Some("Perez"));
        assert_eq!(draft.email(), Some("juan@example.com"));

        draft.apply(UserChanges {
            email: Some(None),
            ..UserChanges::default()
        });
        assert_eq!(draft.email(), None);
        assert_eq!(draft.name(), "Juan");
    }

    #[test]
    fn test_present_name() {
        assert_eq!(present_name("Pedro"), "PEDRO");
        assert_eq!(present_name("josé"), "JOSÉ");
    }
}
