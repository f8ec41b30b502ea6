// Validation engine
//
// Per-form interaction state on top of a rule set. Errors are computed as the
// user edits, but a field's error only becomes visible once the field has been
// blurred or swept by `validate_all`.

use crate::{FieldValue, Record, RuleSet, ValidationError, ValidationErrors};
use formguard_log::{debug, trace};
use std::collections::{HashMap, HashSet};

const TARGET: &str = "formguard::engine";

/// Lazy-then-eager validation state for one form.
///
/// Holds the rule set, which fields are touched, and the last error computed
/// for each field. Field values are never stored; every call receives the
/// current value from the caller.
///
/// ```
/// use formguard_validation::{FormValidator, RuleSet, validators};
///
/// let mut form = FormValidator::new(
///     RuleSet::new().field("email", [validators::required("Email"), validators::email()]),
/// );
///
/// // Typing before the first blur shows nothing.
/// form.on_change("email", "not-an");
/// assert_eq!(form.field_error("email"), None);
///
/// form.on_blur("email", "not-an-email");
/// assert_eq!(form.field_error("email"), Some("Please enter a valid email address"));
///
/// // After first contact, every change re-validates.
/// form.on_change("email", "ada@example.com");
/// assert_eq!(form.field_error("email"), None);
/// ```
#[derive(Debug, Default)]
pub struct FormValidator {
    rules: RuleSet,
    touched: HashSet<String>,
    errors: HashMap<String, ValidationError>,
}

impl FormValidator {
    /// Create an engine with nothing touched and no errors.
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            touched: HashSet::new(),
            errors: HashMap::new(),
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Swap in a rebuilt rule set.
    ///
    /// Touched state is kept. Stored errors of fields the new set no longer
    /// covers are dropped, since an unruled field is always valid.
    pub fn set_rules(&mut self, rules: RuleSet) {
        self.errors.retain(|field, _| rules.contains(field));
        self.rules = rules;
        trace!(target: TARGET, { fields = self.rules.len() }, "rule set replaced");
    }

    /// Run the field's validators in order and return the first error.
    ///
    /// Touches no state. A field without rules is always valid.
    pub fn validate_field(&self, field: &str, value: impl Into<FieldValue>) -> Option<String> {
        self.check(field, &value.into()).map(|error| error.message)
    }

    /// Validate every field in the rule set against `record`.
    ///
    /// Every ruled field becomes touched, failing or not, and the error and
    /// touched sets are replaced wholesale. Returns `true` iff nothing failed.
    ///
    /// Fields touched earlier that have no rules (e.g. blurred before their
    /// rules were removed) are not carried over and read as untouched after.
    pub fn validate_all<R: Record + ?Sized>(&mut self, record: &R) -> bool {
        let mut errors = HashMap::new();
        let mut touched = HashSet::with_capacity(self.rules.len());

        for rules in self.rules.iter() {
            let field = rules.field();
            if let Some(error) = self.check(field, &record.value(field)) {
                errors.insert(field.to_string(), error);
            }
            touched.insert(field.to_string());
        }

        self.errors = errors;
        self.touched = touched;

        debug!(
            target: TARGET,
            { fields = self.rules.len(), failed = self.errors.len() },
            "full validation"
        );
        self.errors.is_empty()
    }

    /// [`validate_all`](Self::validate_all), returning the failures on error.
    pub fn validate_all_report<R: Record + ?Sized>(
        &mut self,
        record: &R,
    ) -> Result<(), ValidationErrors> {
        if self.validate_all(record) {
            Ok(())
        } else {
            Err(self.errors())
        }
    }

    /// Mark the field touched and store its current error, clearing a stale
    /// one when the value now passes.
    pub fn on_blur(&mut self, field: &str, value: impl Into<FieldValue>) {
        self.touched.insert(field.to_string());
        let error = self.check(field, &value.into());
        trace!(target: TARGET, { field = field, failed = error.is_some() }, "blur");
        self.store(field, error);
    }

    /// Re-validate on edit, but only once the field is touched.
    pub fn on_change(&mut self, field: &str, value: impl Into<FieldValue>) {
        if !self.touched.contains(field) {
            return;
        }
        let error = self.check(field, &value.into());
        trace!(target: TARGET, { field = field, failed = error.is_some() }, "change");
        self.store(field, error);
    }

    /// The error to display for a field: the stored error if the field is
    /// touched, otherwise `None` whatever is stored.
    pub fn field_error(&self, field: &str) -> Option<&str> {
        if !self.touched.contains(field) {
            return None;
        }
        self.errors.get(field).map(|error| error.message.as_str())
    }

    pub fn is_touched(&self, field: &str) -> bool {
        self.touched.contains(field)
    }

    pub fn has_visible_errors(&self) -> bool {
        self.errors.keys().any(|field| self.touched.contains(field))
    }

    /// Currently visible errors in rule-set order.
    pub fn errors(&self) -> ValidationErrors {
        self.rules
            .fields()
            .filter(|field| self.touched.contains(*field))
            .filter_map(|field| self.errors.get(field).cloned())
            .collect::<Vec<_>>()
            .into()
    }

    /// Forget all interaction: nothing touched, no errors.
    pub fn clear_errors(&mut self) {
        self.touched.clear();
        self.errors.clear();
        trace!(target: TARGET, "interaction state cleared");
    }

    fn check(&self, field: &str, value: &FieldValue) -> Option<ValidationError> {
        let (constraint, message) = self.rules.get(field)?.first_failure(value)?;
        Some(ValidationError::new(field, message).with_constraint(constraint))
    }

    fn store(&mut self, field: &str, error: Option<ValidationError>) {
        match error {
            Some(error) => {
                self.errors.insert(field.to_string(), error);
            }
            None => {
                self.errors.remove(field);
            }
        }
    }
}
