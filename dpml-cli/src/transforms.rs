//! CLI output transforms
//!
//! A transform is one output format name. Tree formats come from the
//! [FormatRegistry]; the token views are handled here since they never build a tree.

use dpml_config::DpmlConfig;
use dpml_parser::formats::{FormatError, FormatRegistry, TreevizFormatter};
use dpml_parser::lexing::tokenize_with_policy;
use dpml_parser::{parse_prompt_with, LexError, ParseError};
use thiserror::Error;

/// Token views available besides the registry formats.
pub const TOKEN_FORMATS: &[(&str, &str)] = &[
    ("token-json", "Token stream as JSON, with byte spans"),
    ("token-simple", "Token stream in compact one-token-per-line form"),
];

#[derive(Debug, Error)]
pub enum TransformError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl TransformError {
    /// Byte offset of the failing markup, for source context.
    pub fn span(&self) -> Option<std::ops::Range<usize>> {
        match self {
            TransformError::Lex(err) => err.offset().map(|offset| offset..offset),
            TransformError::Parse(err) => Some(err.span()),
            _ => None,
        }
    }
}

/// Registry with the built-in formats, treeviz configured from `config`.
pub fn registry_for(config: &DpmlConfig) -> FormatRegistry {
    let mut registry = FormatRegistry::with_defaults();
    registry.register(TreevizFormatter::new(config.treeviz_options()));
    registry
}

/// Every format name with its description, sorted by name.
pub fn available_formats(config: &DpmlConfig) -> Vec<(String, String)> {
    let mut formats = registry_for(config).describe_formats();
    formats.extend(
        TOKEN_FORMATS
            .iter()
            .map(|(name, description)| (name.to_string(), description.to_string())),
    );
    formats.sort();
    formats
}

/// Run the named transform over DPML source.
pub fn execute_transform(
    source: &str,
    format: &str,
    config: &DpmlConfig,
) -> Result<String, TransformError> {
    let whitespace = config.tokenizer.whitespace;
    match format {
        "token-json" => {
            let tokens = tokenize_with_policy(source, whitespace)?;
            Ok(serde_json::to_string_pretty(&tokens)?)
        }
        "token-simple" => {
            let tokens = tokenize_with_policy(source, whitespace)?;
            Ok(tokens
                .iter()
                .map(|(token, _)| format!("{}\n", token))
                .collect())
        }
        name => {
            let registry = registry_for(config);
            if !registry.has(name) {
                return Err(FormatError::FormatNotFound(name.to_string()).into());
            }
            let prompt = parse_prompt_with(source, config.parse_options())?;
            Ok(registry.serialize(&prompt, name)?)
        }
    }
}
