// Formguard - declarative field validation for interactive forms
//
// Validators are plain closures composed into per-field rule lists; the
// engine tracks touched fields and reveals errors lazily, then eagerly.

// Re-export the validation core
pub use formguard_validation::*;

// Re-export optional crates
#[cfg(feature = "config")]
pub use formguard_config;

#[cfg(feature = "log")]
pub use formguard_log;

/// Prelude module for convenient imports
pub mod prelude {
    pub use formguard_validation::validators;
    pub use formguard_validation::{
        FieldRules, FieldValue, FormValidator, Record, RuleSet, ValidationError,
        ValidationErrors, Validator,
    };

    #[cfg(feature = "config")]
    pub use formguard_config::{FormSchema, RuleSpec};
}
