//! Field validation for interactive forms
//!
//! Two layers:
//!
//! - [`validators`]: factories for pure rules, each a [`Validator`] that maps
//!   a [`FieldValue`] to an optional error message.
//! - [`FormValidator`]: per-form state that tracks which fields are touched,
//!   stores the last error per field, and only reveals an error once its
//!   field has been blurred or a full validation has run.
//!
//! # Examples
//!
//! ## Submission gate
//!
//! ```
//! use formguard_validation::{FormValidator, RuleSet, validators};
//! use serde_json::json;
//!
//! let rules = RuleSet::new()
//!     .field("email", [validators::required("Email"), validators::email()])
//!     .field("age", [validators::min_value(18.0, "Age")]);
//!
//! let mut form = FormValidator::new(rules);
//!
//! assert!(!form.validate_all(&json!({ "email": "", "age": "21" })));
//! assert_eq!(form.field_error("email"), Some("Email is required"));
//!
//! assert!(form.validate_all(&json!({ "email": "ada@example.com", "age": 21 })));
//! assert_eq!(form.field_error("email"), None);
//! ```
//!
//! ## Cross-field rules
//!
//! Rules that depend on another field capture that field's value when they
//! are built. Rebuild the rule set whenever the dependency changes:
//!
//! ```
//! use formguard_validation::{FormValidator, RuleSet, validators};
//!
//! fn rules(start_date: &str) -> RuleSet {
//!     RuleSet::new().field("end_date", [validators::date_after(start_date, "End date")])
//! }
//!
//! let mut form = FormValidator::new(rules("2025-01-10"));
//! form.on_blur("end_date", "2025-01-05");
//! assert!(form.field_error("end_date").is_some());
//!
//! form.set_rules(rules("2025-01-01"));
//! form.on_change("end_date", "2025-01-05");
//! assert!(form.field_error("end_date").is_none());
//! ```

mod engine;
mod errors;
mod rules;
mod traits;
mod value;
pub mod validators;

pub use engine::FormValidator;
pub use errors::{ValidationError, ValidationErrors};
pub use rules::{FieldRules, RuleSet};
pub use traits::Record;
pub use validators::Validator;
pub use value::FieldValue;
