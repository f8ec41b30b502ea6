// Error types for form schemas

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read schema file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse schema: {0}")]
    ParseError(String),

    #[error("Unsupported schema format: {0}")]
    UnsupportedFormat(String),

    #[error("Field '{field}' references undeclared field '{target}'")]
    UnknownField { field: String, target: String },

    #[error("Invalid rule on field '{field}': {reason}")]
    InvalidRule { field: String, reason: String },

    #[error("Field '{0}' is declared more than once")]
    DuplicateField(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
