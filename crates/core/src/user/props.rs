//! Property-based tests for user rules and transforms.

use proptest::prelude::*;

use super::{NewUser, UserDraft, normalize_email, present_name};
use crate::validation::Rule;

fn draft_named(name: String) -> UserDraft {
    UserDraft::new(NewUser {
        name,
        surname: None,
        email: None,
    })
}

/// Strategy for names that pass every rule.
fn valid_name() -> impl Strategy<Value = String> {
    "[A-Za-z][a-z ]{2,40}"
}

/// Strategy for addresses the email rule accepts, in mixed case.
fn mixed_case_email() -> impl Strategy<Value = String> {
    ("[A-Za-z][A-Za-z0-9]{0,15}", "[A-Za-z]{1,12}", "[A-Za-z]{2,5}")
        .prop_map(|(local, domain, tld)| format!("{local}@{domain}.{tld}"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any non-empty name shorter than three characters is rejected.
    #[test]
    fn prop_short_names_rejected(name in "[A-Za-z]{1,2}") {
        let err = draft_named(name).validate().unwrap_err();
        prop_assert!(err.has("name", Rule::MinLength(3)));
    }

    /// Any name containing a dash is rejected, whatever surrounds it.
    #[test]
    fn prop_dashed_names_rejected(prefix in "[A-Za-z]{0,10}", suffix in "[A-Za-z]{0,10}") {
        let err = draft_named(format!("{prefix}-{suffix}")).validate().unwrap_err();
        prop_assert!(err.has("name", Rule::Forbids('-')));
    }

    /// Well-formed names pass.
    #[test]
    fn prop_valid_names_accepted(name in valid_name()) {
        prop_assert!(draft_named(name).validate().is_ok());
    }

    /// Assigned emails are stored lower-cased and still validate.
    #[test]
    fn prop_emails_lower_cased_on_assignment(email in mixed_case_email()) {
        let lowered = email.to_lowercase();
        let mut draft = draft_named("Ana".to_string());
        draft.set_email(Some(&email));

        prop_assert_eq!(draft.email(), Some(lowered.as_str()));
        prop_assert!(draft.validate().is_ok());
        prop_assert_eq!(normalize_email(&email), normalize_email(&normalize_email(&email)));
    }

    /// Presentation never changes the stored name.
    #[test]
    fn prop_present_name_is_upper_case(name in valid_name()) {
        let draft = draft_named(name.clone());
        let shown = present_name(draft.name());

        prop_assert_eq!(&shown, &name.to_uppercase());
        prop_assert_eq!(draft.name(), name.as_str());
    }
}
