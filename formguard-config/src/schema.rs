// Declarative form schemas

use crate::{ConfigError, Result, SchemaLoader};
use formguard_log::debug;
use formguard_validation::{FormValidator, Record, RuleSet, Validator, validators};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;

/// One rule in a schema file, tagged by `rule`.
///
/// Cross-field rules name the field they compare against; its value is read
/// from the record each time the schema is compiled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RuleSpec {
    Required,
    Email,
    MinLength { value: usize },
    MaxLength { value: usize },
    MinValue { value: f64 },
    MaxValue { value: f64 },
    PositiveNumber,
    DateNotInPast,
    DateBefore { field: String },
    DateAfter { field: String },
    PasswordStrength,
    PasswordMatch { field: String },
    Phone,
    Pattern { regex: String, message: String },
}

impl RuleSpec {
    /// The sibling field this rule reads, if any.
    pub fn depends_on(&self) -> Option<&str> {
        match self {
            RuleSpec::DateBefore { field }
            | RuleSpec::DateAfter { field }
            | RuleSpec::PasswordMatch { field } => Some(field),
            _ => None,
        }
    }

    fn build<R: Record + ?Sized>(&self, field: &str, label: &str, record: &R) -> Result<Validator> {
        let validator = match self {
            RuleSpec::Required => validators::required(label),
            RuleSpec::Email => validators::email(),
            RuleSpec::MinLength { value } => validators::min_length(*value, label),
            RuleSpec::MaxLength { value } => validators::max_length(*value, label),
            RuleSpec::MinValue { value } => validators::min_value(*value, label),
            RuleSpec::MaxValue { value } => validators::max_value(*value, label),
            RuleSpec::PositiveNumber => validators::positive_number(label),
            RuleSpec::DateNotInPast => validators::date_not_in_past(label),
            RuleSpec::DateBefore { field: other } => {
                validators::date_before(record.value(other).as_text(), label)
            }
            RuleSpec::DateAfter { field: other } => {
                validators::date_after(record.value(other).as_text(), label)
            }
            RuleSpec::PasswordStrength => validators::password_strength(),
            RuleSpec::PasswordMatch { field: other } => {
                validators::password_match(record.value(other).as_text())
            }
            RuleSpec::Phone => validators::phone(),
            RuleSpec::Pattern { regex, message } => {
                validators::pattern(compile_pattern(field, regex)?, message.as_str())
            }
        };
        Ok(validator)
    }
}

fn compile_pattern(field: &str, regex: &str) -> Result<Regex> {
    Regex::new(regex).map_err(|e| ConfigError::InvalidRule {
        field: field.to_string(),
        reason: format!("bad pattern: {}", e),
    })
}

/// A field and its ordered rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    /// Human-readable name used in messages; defaults to `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

impl FieldSpec {
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// A whole form's rules, as written in a schema file.
///
/// ```
/// use formguard_config::FormSchema;
/// use serde_json::json;
///
/// let schema = FormSchema::from_toml_str(r#"
///     [[fields]]
///     name = "start_date"
///     label = "Start date"
///     rules = [{ rule = "required" }]
///
///     [[fields]]
///     name = "end_date"
///     label = "End date"
///     rules = [{ rule = "required" }, { rule = "date_after", field = "start_date" }]
/// "#).unwrap();
///
/// let mut form = schema.validator(&json!({ "start_date": "2025-01-10" })).unwrap();
/// assert!(!form.validate_all(&json!({ "start_date": "2025-01-10", "end_date": "2025-01-05" })));
/// assert_eq!(form.field_error("end_date"), Some("End date must be after 2025-01-10"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl FormSchema {
    /// Parse and check a TOML schema.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        SchemaLoader::new(crate::FileFormat::Toml).parse(content)
    }

    /// Parse and check a JSON schema.
    pub fn from_json_str(content: &str) -> Result<Self> {
        SchemaLoader::new(crate::FileFormat::Json).parse(content)
    }

    /// Load a schema file, picking the format from its extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        SchemaLoader::auto(path)?.load_file(path)
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields that some cross-field rule reads. A change to any of these
    /// calls for recompiling the rule set.
    pub fn dependencies(&self) -> BTreeSet<&str> {
        self.fields
            .iter()
            .flat_map(|f| f.rules.iter().filter_map(RuleSpec::depends_on))
            .collect()
    }

    /// Whether a change to `field` calls for recompiling the rule set.
    pub fn depends_on(&self, field: &str) -> bool {
        self.fields
            .iter()
            .flat_map(|f| &f.rules)
            .any(|rule| rule.depends_on() == Some(field))
    }

    /// Check the schema for mistakes that would otherwise surface as
    /// silently-passing rules.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(ConfigError::DuplicateField(field.name.clone()));
            }
        }

        for field in &self.fields {
            for rule in &field.rules {
                if let Some(target) = rule.depends_on() {
                    if target == field.name {
                        return Err(ConfigError::InvalidRule {
                            field: field.name.clone(),
                            reason: "rule compares the field with itself".to_string(),
                        });
                    }
                    if !seen.contains(target) {
                        return Err(ConfigError::UnknownField {
                            field: field.name.clone(),
                            target: target.to_string(),
                        });
                    }
                }
                if let RuleSpec::Pattern { regex, .. } = rule {
                    compile_pattern(&field.name, regex)?;
                }
            }
            check_bounds(field)?;
        }

        Ok(())
    }

    /// Compile the schema into a rule set, reading cross-field values from
    /// the record as it is now.
    ///
    /// Call again after a dependency changes and hand the result to
    /// [`FormValidator::set_rules`].
    pub fn rules<R: Record + ?Sized>(&self, record: &R) -> Result<RuleSet> {
        let mut rules = RuleSet::new();
        for field in &self.fields {
            let validators = field
                .rules
                .iter()
                .map(|rule| rule.build(&field.name, field.label(), record))
                .collect::<Result<Vec<_>>>()?;
            rules = rules.field(field.name.clone(), validators);
        }

        debug!(target: "formguard::config", { fields = rules.len() }, "schema compiled");
        Ok(rules)
    }

    /// A fresh engine for this schema.
    pub fn validator<R: Record + ?Sized>(&self, record: &R) -> Result<FormValidator> {
        Ok(FormValidator::new(self.rules(record)?))
    }
}

fn check_bounds(field: &FieldSpec) -> Result<()> {
    let mut min_length = None;
    let mut max_length = None;
    let mut min_value = None;
    let mut max_value = None;

    for rule in &field.rules {
        match rule {
            RuleSpec::MinLength { value } => min_length = Some(*value as f64),
            RuleSpec::MaxLength { value } => max_length = Some(*value as f64),
            RuleSpec::MinValue { value } => min_value = Some(*value),
            RuleSpec::MaxValue { value } => max_value = Some(*value),
            _ => {}
        }
    }

    for (kind, min, max) in [("length", min_length, max_length), ("value", min_value, max_value)] {
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(ConfigError::InvalidRule {
                    field: field.name.clone(),
                    reason: format!("min {} {} exceeds max {} {}", kind, min, kind, max),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn signup_schema() -> FormSchema {
        FormSchema::from_json_str(
            r#"{
                "fields": [
                    { "name": "email", "label": "Email",
                      "rules": [{ "rule": "required" }, { "rule": "email" }] },
                    { "name": "password",
                      "rules": [{ "rule": "required" }, { "rule": "password_strength" }] },
                    { "name": "confirm",
                      "rules": [{ "rule": "password_match", "field": "password" }] }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_rule_spec_tags() {
        let rule: RuleSpec = serde_json::from_str(r#"{"rule": "min_value", "value": 18}"#).unwrap();
        assert_eq!(rule, RuleSpec::MinValue { value: 18.0 });

        let rule: RuleSpec =
            serde_json::from_str(r#"{"rule": "date_after", "field": "start"}"#).unwrap();
        assert_eq!(rule.depends_on(), Some("start"));
        assert_eq!(RuleSpec::Email.depends_on(), None);
    }

    #[test]
    fn test_label_defaults_to_name() {
        let schema = signup_schema();
        assert_eq!(schema.field("email").unwrap().label(), "Email");
        assert_eq!(schema.field("password").unwrap().label(), "password");
    }

    #[test]
    fn test_compiled_rules_keep_order_and_labels() {
        let schema = signup_schema();
        let rules = schema.rules(&json!({})).unwrap();

        assert_eq!(
            rules.fields().collect::<Vec<_>>(),
            vec!["email", "password", "confirm"]
        );
        assert_eq!(
            rules.get("email").unwrap().validate(&"".into()),
            Some("Email is required".to_string())
        );
    }

    #[test]
    fn test_cross_field_values_read_at_compile_time() {
        let schema = signup_schema();
        let mut form = schema.validator(&json!({ "password": "Secret12" })).unwrap();

        form.on_blur("confirm", "Secret12");
        assert_eq!(form.field_error("confirm"), None);

        form.set_rules(schema.rules(&json!({ "password": "Secret34" })).unwrap());
        form.on_change("confirm", "Secret12");
        assert_eq!(form.field_error("confirm"), Some("Passwords do not match"));
    }

    #[test]
    fn test_dependencies() {
        let schema = signup_schema();
        assert!(schema.depends_on("password"));
        assert!(!schema.depends_on("email"));
        assert_eq!(schema.dependencies().into_iter().collect::<Vec<_>>(), vec!["password"]);
    }

    #[test]
    fn test_unknown_reference_rejected() {
        let schema = FormSchema {
            fields: vec![FieldSpec {
                name: "end".to_string(),
                label: None,
                rules: vec![RuleSpec::DateAfter {
                    field: "start".to_string(),
                }],
            }],
        };
        assert!(matches!(
            schema.validate(),
            Err(ConfigError::UnknownField { ref target, .. }) if target == "start"
        ));
    }

    #[test]
    fn test_self_reference_rejected() {
        let schema = FormSchema {
            fields: vec![FieldSpec {
                name: "password".to_string(),
                label: None,
                rules: vec![RuleSpec::PasswordMatch {
                    field: "password".to_string(),
                }],
            }],
        };
        assert!(matches!(schema.validate(), Err(ConfigError::InvalidRule { .. })));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let field = FieldSpec {
            name: "email".to_string(),
            label: None,
            rules: vec![],
        };
        let schema = FormSchema {
            fields: vec![field.clone(), field],
        };
        assert!(matches!(schema.validate(), Err(ConfigError::DuplicateField(_))));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let schema = FormSchema {
            fields: vec![FieldSpec {
                name: "qty".to_string(),
                label: None,
                rules: vec![
                    RuleSpec::MinValue { value: 10.0 },
                    RuleSpec::MaxValue { value: 1.0 },
                ],
            }],
        };
        let err = schema.validate().unwrap_err();
        assert!(err.to_string().contains("min value 10 exceeds max value 1"));
    }

    #[test]
    fn test_bad_pattern_rejected() {
        let schema = FormSchema {
            fields: vec![FieldSpec {
                name: "code".to_string(),
                label: None,
                rules: vec![RuleSpec::Pattern {
                    regex: "([a-z".to_string(),
                    message: "bad".to_string(),
                }],
            }],
        };
        assert!(matches!(schema.validate(), Err(ConfigError::InvalidRule { .. })));
        assert!(schema.rules(&json!({})).is_err());
    }
}
