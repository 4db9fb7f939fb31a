//! Configuration loader for the DPML toolchain.
//!
//! `defaults/dpml.default.toml` is embedded into every binary so the documented defaults and
//! runtime behavior stay in sync. Applications layer user files and overrides on top of those
//! defaults via [`Loader`] before deserializing into [`DpmlConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use dpml_parser::formats::TreevizOptions;
use dpml_parser::{ParseOptions, WhitespacePolicy};
use serde::Deserialize;
use std::path::Path;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/dpml.default.toml");

/// Top-level configuration consumed by DPML applications.
#[derive(Debug, Clone, Deserialize)]
pub struct DpmlConfig {
    pub tokenizer: TokenizerConfig,
    pub output: OutputConfig,
    pub inspect: InspectConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenizerConfig {
    pub whitespace: WhitespacePolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Default output format name.
    pub format: String,
}

/// Controls treeviz output.
#[derive(Debug, Clone, Deserialize)]
pub struct InspectConfig {
    pub label_width: usize,
    pub show_text: bool,
}

impl DpmlConfig {
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::default().with_whitespace(self.tokenizer.whitespace)
    }

    pub fn treeviz_options(&self) -> TreevizOptions {
        TreevizOptions {
            label_width: self.inspect.label_width,
            show_text: self.inspect.show_text,
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file, ignored if absent.
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override, e.g. from a command line flag.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<DpmlConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<DpmlConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.tokenizer.whitespace, WhitespacePolicy::Preserve);
        assert_eq!(config.output.format, "treeviz");
        assert_eq!(config.inspect.label_width, 30);
        assert!(config.inspect.show_text);
        assert_eq!(config.parse_options(), ParseOptions::default());
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("tokenizer.whitespace", "drop-blank")
            .expect("override to apply")
            .set_override("inspect.label_width", 12i64)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(
            config.parse_options().whitespace,
            WhitespacePolicy::DropBlank
        );
        assert_eq!(config.treeviz_options().label_width, 12);
    }

    #[test]
    fn layers_user_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "[output]\nformat = \"json\"").expect("write config");

        let config = Loader::new()
            .with_file(file.path())
            .build()
            .expect("config to build");
        assert_eq!(config.output.format, "json");
        assert_eq!(config.inspect.label_width, 30);
    }

    #[test]
    fn missing_required_file_fails() {
        let result = Loader::new()
            .with_file("/nonexistent/dpml.toml")
            .build();
        assert!(result.is_err());

        let optional = Loader::new()
            .with_optional_file("/nonexistent/dpml.toml")
            .build();
        assert!(optional.is_ok());
    }

    #[test]
    fn rejects_unknown_whitespace_policy() {
        let result = Loader::new()
            .set_override("tokenizer.whitespace", "squash")
            .expect("override to apply")
            .build();
        assert!(result.is_err());
    }
}
