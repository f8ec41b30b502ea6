//! Integration tests for formguard-validation

use formguard_validation::validators::*;
use formguard_validation::*;
use serde_json::json;

fn email_form() -> FormValidator {
    FormValidator::new(RuleSet::new().field("email", [required("Email"), email()]))
}

#[test]
fn test_email_submission_scenario() {
    let mut form = email_form();

    assert!(!form.validate_all(&json!({ "email": "" })));
    assert_eq!(form.field_error("email"), Some("Email is required"));

    assert!(!form.validate_all(&json!({ "email": "bad" })));
    assert_eq!(
        form.field_error("email"),
        Some("Please enter a valid email address")
    );

    assert!(form.validate_all(&json!({ "email": "a@b.com" })));
    assert_eq!(form.field_error("email"), None);
}

#[test]
fn test_nothing_visible_after_construction() {
    let form = FormValidator::new(
        RuleSet::new()
            .field("email", [required("Email"), email()])
            .field("password", [required("Password"), password_strength()]),
    );

    assert!(form.validate_field("email", "").is_some());
    assert!(form.validate_field("password", "weak").is_some());
    assert_eq!(form.field_error("email"), None);
    assert_eq!(form.field_error("password"), None);
    assert_eq!(form.field_error("never-declared"), None);
}

#[test]
fn test_validate_field_repeatable_and_side_effect_free() {
    let mut form = email_form();
    form.on_blur("email", "a@b.com");

    for _ in 0..3 {
        assert_eq!(
            form.validate_field("email", "bad"),
            Some("Please enter a valid email address".to_string())
        );
    }
    // The stored (passing) result is untouched by the pure checks.
    assert_eq!(form.field_error("email"), None);
}

#[test]
fn test_touch_then_show_matches_validate_field() {
    let mut form = FormValidator::new(RuleSet::new().field("qty", [positive_number("Quantity")]));
    let expected = form.validate_field("qty", 0);

    form.on_blur("qty", 0);

    assert_eq!(form.field_error("qty").map(str::to_string), expected);
    assert_eq!(form.field_error("qty"), Some("Quantity must be greater than 0"));
}

#[test]
fn test_lazy_then_eager_sequence() {
    let mut form = email_form();

    form.on_change("email", "a");
    form.on_change("email", "ad");
    assert_eq!(form.field_error("email"), None);

    form.on_blur("email", "ad");
    assert!(form.field_error("email").is_some());

    form.on_change("email", "ada@example.com");
    assert_eq!(form.field_error("email"), None);
}

#[test]
fn test_validate_all_touches_passing_fields_too() {
    let mut form = FormValidator::new(
        RuleSet::new()
            .field("name", [required("Name")])
            .field("email", [required("Email"), email()])
            .field("phone", [phone()]),
    );

    form.validate_all(&json!({ "name": "Ada", "email": "", "phone": "" }));

    assert!(form.is_touched("name"));
    assert!(form.is_touched("email"));
    assert!(form.is_touched("phone"));

    // Now that they are touched, later edits surface errors immediately.
    form.on_change("name", "");
    assert_eq!(form.field_error("name"), Some("Name is required"));
}

#[test]
fn test_clear_errors_returns_to_clean_state() {
    let mut form = email_form();
    form.validate_all(&json!({ "email": "" }));
    form.clear_errors();

    assert!(!form.is_touched("email"));
    assert_eq!(form.field_error("email"), None);
    assert!(!form.has_visible_errors());
}

#[test]
fn test_date_after_scenario() {
    let start_date = "2025-01-10";
    let validator = date_after(start_date, "End date");

    assert!(validator.check(&"2025-01-05".into()).is_some());
    assert!(validator.check(&"2025-01-15".into()).is_none());
    assert!(validator.check(&"".into()).is_none());

    let end_date = "";
    let validator = date_before(end_date, "Start date");
    assert!(validator.check(&"2025-01-01".into()).is_none());
}

#[test]
fn test_validate_all_drops_unruled_touched_fields() {
    let mut form = email_form();
    form.on_blur("nickname", "ada");
    assert!(form.is_touched("nickname"));

    form.validate_all(&json!({ "email": "ada@example.com", "nickname": "ada" }));

    assert!(form.is_touched("email"));
    assert!(!form.is_touched("nickname"));
}

#[test]
fn test_password_match_scenario() {
    let validator = password_match("Secret1");

    assert!(validator.check(&"Secret1".into()).is_none());
    assert_eq!(
        validator.check(&"secret1".into()),
        Some("Passwords do not match".to_string())
    );
}

#[test]
fn test_registration_form() {
    let password = "Str0ngPass";
    let rules = RuleSet::new()
        .field("email", [required("Email"), email()])
        .field("password", [required("Password"), password_strength()])
        .field("confirm", [required("Confirmation"), password_match(password)])
        .field("phone", [phone()])
        .field("age", [min_value(18.0, "Age"), max_value(120.0, "Age")]);
    let mut form = FormValidator::new(rules);

    let errors = form
        .validate_all_report(&json!({
            "email": "ada@example.com",
            "password": password,
            "confirm": "Str0ngPas",
            "phone": "+44 20 7946 0958",
            "age": "17",
        }))
        .unwrap_err();

    let failed: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(failed, vec!["confirm", "age"]);
    assert_eq!(errors.get("age").unwrap().message, "Age must be at least 18");
    assert_eq!(errors.get("confirm").unwrap().constraint, "password_match");
}

#[test]
fn test_required_list_field() {
    let mut form = FormValidator::new(RuleSet::new().field("tags", [required("Tags")]));

    assert!(!form.validate_all(&json!({ "tags": [] })));
    assert_eq!(form.field_error("tags"), Some("Tags is required"));

    assert!(form.validate_all(&json!({ "tags": ["rust"] })));
}

#[test]
fn test_unparsable_number_is_not_rejected_by_bounds() {
    let mut form = FormValidator::new(
        RuleSet::new().field("amount", [min_value(1.0, "Amount"), max_value(10.0, "Amount")]),
    );
    assert!(form.validate_all(&json!({ "amount": "twelve" })));
}

#[test]
fn test_custom_validator_in_rule_set() {
    let no_spaces = Validator::new(|value| {
        value
            .as_text()
            .contains(' ')
            .then(|| "Username cannot contain spaces".to_string())
    });
    let mut form = FormValidator::new(
        RuleSet::new().field(
            "username",
            [required("Username"), no_spaces, max_length(12, "Username")],
        ),
    );

    form.on_blur("username", "ada lovelace");
    assert_eq!(form.field_error("username"), Some("Username cannot contain spaces"));
}
