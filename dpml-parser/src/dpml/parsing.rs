//! Parsing module for DPML
//!
//!     Parsing runs in two stages:
//!         1. Lexing: source text to a flat token sequence. See [lexing](crate::dpml::lexing).
//!         2. Parsing: tokens to a [PromptElement] tree. See [parser].
//!
//!     [parse_prompt] runs both with default options. Callers that need spans in errors, a
//!     different whitespace policy or their own token source use [parse_prompt_with] or build a
//!     [Parser] directly.

pub mod error;
pub mod parser;

pub use error::{format_source_context, ParseError};
pub use parser::{parse_reference, Parser};

use crate::dpml::ast::PromptElement;
use crate::dpml::lexing::{tokenize_with_policy, WhitespacePolicy};
use serde::{Deserialize, Serialize};

/// Options applied while turning source text into a tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    pub whitespace: WhitespacePolicy,
}

impl ParseOptions {
    pub fn with_whitespace(mut self, whitespace: WhitespacePolicy) -> Self {
        self.whitespace = whitespace;
        self
    }
}

/// Parse DPML source with default options.
pub fn parse_prompt(source: &str) -> Result<PromptElement, ParseError> {
    parse_prompt_with(source, ParseOptions::default())
}

/// Parse DPML source. Errors carry byte spans into `source`.
pub fn parse_prompt_with(source: &str, options: ParseOptions) -> Result<PromptElement, ParseError> {
    let tokens = tokenize_with_policy(source, options.whitespace)?;
    let result = Parser::with_spans(tokens).parse();
    if let Err(err) = &result {
        tracing::debug!(error = %err, span = ?err.span(), "parse failed");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dpml::ast::{Child, Element};

    #[test]
    fn test_parse_prompt_keeps_text_runs() {
        let prompt = parse_prompt("Hello <rule>r</rule> world").unwrap();
        assert_eq!(prompt.children.len(), 3);
        assert_eq!(prompt.children[0], Child::text("Hello "));
        assert_eq!(prompt.children[2], Child::text(" world"));
    }

    #[test]
    fn test_drop_blank_option() {
        let source = "<rule>a</rule>\n\n<rule>b</rule>";
        let kept = parse_prompt(source).unwrap();
        let options = ParseOptions::default().with_whitespace(WhitespacePolicy::DropBlank);
        let dropped = parse_prompt_with(source, options).unwrap();
        assert_eq!(kept.children.len(), 3);
        assert_eq!(dropped.children.len(), 2);
        assert!(dropped
            .children
            .iter()
            .all(|child| matches!(child, Child::Element(Element::Rule(_)))));
    }

    #[test]
    fn test_lex_errors_surface_as_parse_errors() {
        let err = parse_prompt("<rule>x</rule").unwrap_err();
        assert!(matches!(err, ParseError::Lex(_)));
        assert_eq!(err.span(), 7..7);
    }
}
