//! Format registry for prompts
//!
//! Each output format implements [`Formatter`] and is looked up by name in a
//! [`FormatRegistry`]. Views such as `treeviz` and `stats` only write; `tag` and `json` also
//! read a prompt back, so a prompt can be converted between them through the registry.

use crate::dpml::ast::PromptElement;
use crate::dpml::parsing::ParseError;
use std::collections::HashMap;
use thiserror::Error;

/// Error that can occur during formatting
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Format '{0}' cannot be read back into a prompt")]
    NotReadable(String),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Serializes a parsed prompt to one output format.
pub trait Formatter: Send + Sync {
    /// The name of this format (e.g., "treeviz", "tag")
    fn name(&self) -> &str;

    fn serialize(&self, prompt: &PromptElement) -> Result<String, FormatError>;

    fn description(&self) -> &str {
        ""
    }

    /// Whether [`Formatter::parse`] can rebuild a prompt from this format's output.
    fn readable(&self) -> bool {
        false
    }

    fn parse(&self, _source: &str) -> Result<PromptElement, FormatError> {
        Err(FormatError::NotReadable(self.name().to_string()))
    }
}

/// Formatters by name
pub struct FormatRegistry {
    formatters: HashMap<String, Box<dyn Formatter>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        FormatRegistry {
            formatters: HashMap::new(),
        }
    }

    /// Register a formatter, replacing any formatter of the same name.
    pub fn register<F: Formatter + 'static>(&mut self, formatter: F) {
        self.formatters
            .insert(formatter.name().to_string(), Box::new(formatter));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Formatter> {
        self.formatters.get(name).map(|f| f.as_ref())
    }

    pub fn has(&self, name: &str) -> bool {
        self.formatters.contains_key(name)
    }

    pub fn serialize(&self, prompt: &PromptElement, format: &str) -> Result<String, FormatError> {
        let formatter = self
            .get(format)
            .ok_or_else(|| FormatError::FormatNotFound(format.to_string()))?;
        tracing::debug!(format, "serializing prompt");
        formatter.serialize(prompt)
    }

    /// Read a prompt written in `format`.
    pub fn parse(&self, source: &str, format: &str) -> Result<PromptElement, FormatError> {
        let formatter = self
            .get(format)
            .ok_or_else(|| FormatError::FormatNotFound(format.to_string()))?;
        formatter.parse(source)
    }

    /// Re-express a prompt written in `from` as `to`, e.g. `json` back to `tag` markup.
    pub fn convert(&self, source: &str, from: &str, to: &str) -> Result<String, FormatError> {
        let prompt = self.parse(source, from)?;
        self.serialize(&prompt, to)
    }

    /// Format names, sorted.
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formatters.keys().cloned().collect();
        names.sort();
        names
    }

    /// Names of the formats a prompt can be read back from, sorted.
    pub fn readable_formats(&self) -> Vec<String> {
        self.list_formats()
            .into_iter()
            .filter(|name| self.get(name).is_some_and(|f| f.readable()))
            .collect()
    }

    /// `(name, description)` pairs, sorted by name. Readable formats say so in the description.
    pub fn describe_formats(&self) -> Vec<(String, String)> {
        self.list_formats()
            .into_iter()
            .filter_map(|name| {
                let formatter = self.get(&name)?;
                let description = if formatter.readable() {
                    format!("{} (readable)", formatter.description())
                } else {
                    formatter.description().to_string()
                };
                Some((name, description))
            })
            .collect()
    }

    /// Registry with the built-in formatters
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(super::TagFormatter);
        registry.register(super::TreevizFormatter::default());
        registry.register(super::JsonFormatter);
        registry.register(super::StatsFormatter);
        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
