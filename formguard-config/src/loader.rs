// Schema file loading

use crate::{ConfigError, FormSchema, Result};
use formguard_log::debug;
use std::fs;
use std::path::Path;

/// Supported schema file formats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(FileFormat::Json),
            "toml" => Some(FileFormat::Toml),
            _ => None,
        }
    }
}

/// Reads a [`FormSchema`] from text or a file and checks it.
pub struct SchemaLoader {
    format: FileFormat,
}

impl SchemaLoader {
    pub fn new(format: FileFormat) -> Self {
        Self { format }
    }

    /// Auto-detect format from file extension
    pub fn auto(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;

        let format = FileFormat::from_extension(ext)
            .ok_or_else(|| ConfigError::UnsupportedFormat(ext.to_string()))?;

        Ok(Self::new(format))
    }

    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<FormSchema> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let schema = self.parse(&content)?;

        debug!(
            target: "formguard::config",
            { path = path.display(), fields = schema.fields.len() },
            "schema loaded"
        );
        Ok(schema)
    }

    /// Parse a schema and run [`FormSchema::validate`] on it.
    pub fn parse(&self, content: &str) -> Result<FormSchema> {
        let schema: FormSchema = match self.format {
            FileFormat::Json => serde_json::from_str(content)
                .map_err(|e| ConfigError::ParseError(format!("JSON parse error: {}", e)))?,
            FileFormat::Toml => toml::from_str(content)
                .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?,
        };

        schema.validate()?;
        Ok(schema)
    }
}
