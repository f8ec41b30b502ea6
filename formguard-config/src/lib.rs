//! Declarative form schemas for formguard
//!
//! A schema lists each field with a label and its rules, in TOML or JSON.
//! Compiling it against the current record yields a
//! [`RuleSet`](formguard_validation::RuleSet) for the engine; cross-field
//! rules pick up their sibling values at that moment.

pub mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, Result};
pub use loader::{FileFormat, SchemaLoader};
pub use schema::{FieldSpec, FormSchema, RuleSpec};
