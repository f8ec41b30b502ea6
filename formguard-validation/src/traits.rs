// Record access

use crate::FieldValue;
use std::collections::{BTreeMap, HashMap};

/// Read-only view of the caller's current field values.
///
/// The engine only ever reads through this trait and keeps no copy, so
/// whatever the form layer holds is what gets validated. Missing fields read
/// as [`FieldValue::Null`].
pub trait Record {
    fn value(&self, field: &str) -> FieldValue;
}

impl Record for HashMap<String, FieldValue> {
    fn value(&self, field: &str) -> FieldValue {
        self.get(field).cloned().unwrap_or_default()
    }
}

impl Record for BTreeMap<String, FieldValue> {
    fn value(&self, field: &str) -> FieldValue {
        self.get(field).cloned().unwrap_or_default()
    }
}

impl Record for HashMap<String, String> {
    fn value(&self, field: &str) -> FieldValue {
        self.get(field).map(FieldValue::from).unwrap_or_default()
    }
}

impl Record for serde_json::Map<String, serde_json::Value> {
    fn value(&self, field: &str) -> FieldValue {
        self.get(field).map(FieldValue::from).unwrap_or_default()
    }
}

/// Objects are read by key; any other JSON value reads as an empty record.
impl Record for serde_json::Value {
    fn value(&self, field: &str) -> FieldValue {
        match self {
            serde_json::Value::Object(map) => map.value(field),
            _ => FieldValue::Null,
        }
    }
}
