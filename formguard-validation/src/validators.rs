// Built-in validators
//
// Every factory returns a `Validator` closure. Apart from `required`, all of
// them pass on an absent value (null or empty string) so presence stays the
// job of `required` alone.

use crate::FieldValue;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9\s-]{7,15}$").expect("phone pattern compiles"));

const DATE_FORMAT: &str = "%Y-%m-%d";

type CheckFn = dyn Fn(&FieldValue) -> Option<String> + Send + Sync;

/// A single validation rule: a value in, an optional error message out.
#[derive(Clone)]
pub struct Validator {
    name: &'static str,
    check: Arc<CheckFn>,
}

impl Validator {
    /// Wrap a custom rule.
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&FieldValue) -> Option<String> + Send + Sync + 'static,
    {
        Self::named("custom", check)
    }

    /// Wrap a rule under a constraint name, used in logs and error summaries.
    pub fn named<F>(name: &'static str, check: F) -> Self
    where
        F: Fn(&FieldValue) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            name,
            check: Arc::new(check),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Run the rule. `None` means the value passes.
    pub fn check(&self, value: &FieldValue) -> Option<String> {
        (self.check)(value)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator").field("name", &self.name).finish()
    }
}

/// Fails on null, the empty string, and an empty list.
pub fn required(label: impl Into<String>) -> Validator {
    let message = format!("{} is required", label.into());
    Validator::named("required", move |value| {
        let missing = match value {
            FieldValue::List(items) => items.is_empty(),
            other => other.is_absent(),
        };
        missing.then(|| message.clone())
    })
}

pub fn email() -> Validator {
    Validator::named("email", |value| {
        if value.is_absent() || EMAIL_REGEX.is_match(&value.as_text()) {
            None
        } else {
            Some("Please enter a valid email address".to_string())
        }
    })
}

/// Minimum length in characters.
pub fn min_length(min: usize, label: impl Into<String>) -> Validator {
    let message = format!("{} must be at least {} characters", label.into(), min);
    Validator::named("min_length", move |value| match value {
        FieldValue::Text(s) if !s.is_empty() && s.chars().count() < min => Some(message.clone()),
        _ => None,
    })
}

/// Maximum length in characters.
pub fn max_length(max: usize, label: impl Into<String>) -> Validator {
    let message = format!("{} must be at most {} characters", label.into(), max);
    Validator::named("max_length", move |value| match value {
        FieldValue::Text(s) if s.chars().count() > max => Some(message.clone()),
        _ => None,
    })
}

/// Lower numeric bound. Values that do not parse as a number pass.
pub fn min_value(min: f64, label: impl Into<String>) -> Validator {
    let message = format!("{} must be at least {}", label.into(), min);
    Validator::named("min_value", move |value| match value.as_number() {
        Some(n) if n < min => Some(message.clone()),
        _ => None,
    })
}

/// Upper numeric bound. Values that do not parse as a number pass.
pub fn max_value(max: f64, label: impl Into<String>) -> Validator {
    let message = format!("{} must be at most {}", label.into(), max);
    Validator::named("max_value", move |value| match value.as_number() {
        Some(n) if n > max => Some(message.clone()),
        _ => None,
    })
}

/// Fails on zero and negatives, including the number 0 itself.
pub fn positive_number(label: impl Into<String>) -> Validator {
    let message = format!("{} must be greater than 0", label.into());
    Validator::named("positive_number", move |value| match value.as_number() {
        Some(n) if n <= 0.0 => Some(message.clone()),
        _ => None,
    })
}

/// ISO date (`YYYY-MM-DD`) not earlier than today on the local clock.
///
/// Today is read on every check, so a long-lived rule set stays correct
/// across midnight.
pub fn date_not_in_past(label: impl Into<String>) -> Validator {
    let message = format!("{} cannot be in the past", label.into());
    Validator::named("date_not_in_past", move |value| {
        let today = chrono::Local::now().date_naive();
        earlier_than(value, &today.format(DATE_FORMAT).to_string()).then(|| message.clone())
    })
}

/// [`date_not_in_past`] against a fixed `today`.
pub fn date_not_in_past_on(label: impl Into<String>, today: NaiveDate) -> Validator {
    let message = format!("{} cannot be in the past", label.into());
    let today = today.format(DATE_FORMAT).to_string();
    Validator::named("date_not_in_past", move |value| {
        earlier_than(value, &today).then(|| message.clone())
    })
}

/// ISO date no later than `other`. Passes when either side is empty.
pub fn date_before(other: impl Into<String>, label: impl Into<String>) -> Validator {
    let other = other.into();
    let message = format!("{} must be before {}", label.into(), other);
    Validator::named("date_before", move |value| {
        if value.is_absent() || other.is_empty() {
            return None;
        }
        (&*value.as_text() > other.as_str()).then(|| message.clone())
    })
}

/// ISO date no earlier than `other`. Passes when either side is empty.
pub fn date_after(other: impl Into<String>, label: impl Into<String>) -> Validator {
    let other = other.into();
    let message = format!("{} must be after {}", label.into(), other);
    Validator::named("date_after", move |value| {
        if value.is_absent() || other.is_empty() {
            return None;
        }
        earlier_than(value, &other).then(|| message.clone())
    })
}

// Zero-padded ISO dates order lexically the same way they order on the calendar.
fn earlier_than(value: &FieldValue, bound: &str) -> bool {
    !value.is_absent() && &*value.as_text() < bound
}

/// At least 8 characters with an uppercase letter, a lowercase letter and a
/// digit. Conditions are checked in that order; the first miss is reported.
pub fn password_strength() -> Validator {
    Validator::named("password_strength", |value| {
        if value.is_absent() {
            return None;
        }
        let password = value.as_text();
        if password.chars().count() < 8 {
            Some("Password must be at least 8 characters".to_string())
        } else if !password.chars().any(|c| c.is_ascii_uppercase()) {
            Some("Password must contain an uppercase letter".to_string())
        } else if !password.chars().any(|c| c.is_ascii_lowercase()) {
            Some("Password must contain a lowercase letter".to_string())
        } else if !password.chars().any(|c| c.is_ascii_digit()) {
            Some("Password must contain a number".to_string())
        } else {
            None
        }
    })
}

/// Equality with the password captured when the rule was built.
///
/// The capture is a snapshot: rebuild the rule whenever the password field
/// changes.
pub fn password_match(password: impl Into<String>) -> Validator {
    let password = password.into();
    Validator::named("password_match", move |value| {
        (value.as_text() != password.as_str()).then(|| "Passwords do not match".to_string())
    })
}

/// `+`, digits, spaces and hyphens, 7 to 15 characters after the optional `+`.
pub fn phone() -> Validator {
    Validator::named("phone", |value| {
        if value.is_absent() || PHONE_REGEX.is_match(&value.as_text()) {
            None
        } else {
            Some("Please enter a valid phone number".to_string())
        }
    })
}

/// Custom regex rule with a caller-supplied message.
pub fn pattern(regex: Regex, message: impl Into<String>) -> Validator {
    let message = message.into();
    Validator::named("pattern", move |value| {
        if value.is_absent() || regex.is_match(&value.as_text()) {
            None
        } else {
            Some(message.clone())
        }
    })
}
