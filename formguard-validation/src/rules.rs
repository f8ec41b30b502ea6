// Rule sets

use crate::{FieldValue, Validator};

/// Ordered validators for one field. The first failing validator wins.
#[derive(Clone, Debug)]
pub struct FieldRules {
    field: String,
    validators: Vec<Validator>,
}

impl FieldRules {
    /// Create an empty rule list for a field
    pub fn for_field(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            validators: Vec::new(),
        }
    }

    /// Append a validator to the end of the list
    #[allow(clippy::should_implement_trait)]
    pub fn add(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    /// Run the validators in order and return the first error.
    pub fn validate(&self, value: &FieldValue) -> Option<String> {
        self.first_failure(value).map(|(_, message)| message)
    }

    /// Like [`validate`](Self::validate), also naming the failing validator.
    pub(crate) fn first_failure(&self, value: &FieldValue) -> Option<(&'static str, String)> {
        self.validators
            .iter()
            .find_map(|validator| validator.check(value).map(|message| (validator.name(), message)))
    }
}

/// Field name to ordered validator list, in declaration order.
///
/// A rule set is rebuilt, never patched: when a value a cross-field rule
/// captured changes, build a new set and hand it to the engine.
///
/// ```
/// use formguard_validation::{RuleSet, validators};
///
/// let rules = RuleSet::new()
///     .field("email", [validators::required("Email"), validators::email()])
///     .field("age", [validators::min_value(18.0, "Age")]);
///
/// assert_eq!(rules.len(), 2);
/// assert!(rules.get("phone").is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    fields: Vec<FieldRules>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Declare the validators for a field, replacing any earlier declaration.
    pub fn field(
        self,
        field: impl Into<String>,
        validators: impl IntoIterator<Item = Validator>,
    ) -> Self {
        let rules = validators
            .into_iter()
            .fold(FieldRules::for_field(field), FieldRules::add);
        self.with(rules)
    }

    /// Add a prepared [`FieldRules`], replacing any earlier declaration of
    /// the same field in place.
    pub fn with(mut self, rules: FieldRules) -> Self {
        match self.fields.iter_mut().find(|r| r.field == rules.field) {
            Some(existing) => *existing = rules,
            None => self.fields.push(rules),
        }
        self
    }

    pub fn get(&self, field: &str) -> Option<&FieldRules> {
        self.fields.iter().find(|r| r.field == field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Field names in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|r| r.field.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldRules> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<FieldRules> for RuleSet {
    fn from_iter<I: IntoIterator<Item = FieldRules>>(iter: I) -> Self {
        iter.into_iter().fold(RuleSet::new(), RuleSet::with)
    }
}
