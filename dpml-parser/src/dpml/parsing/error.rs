//! Parse errors
//!
//! Parsing stops at the first grammar violation; there is no recovery and no partial tree.
//! Spans are byte ranges into the source when the parser was given spanned tokens, and `0..0`
//! otherwise.

use crate::dpml::lexing::LexError;
use std::ops::Range;
use thiserror::Error;

/// Errors that can occur while turning DPML source into a [`PromptElement`](crate::dpml::ast::PromptElement)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("Unknown element type: <{name}>")]
    UnknownElement { name: String, span: Range<usize> },

    #[error("Expected closing tag for <{expected}>, found {found}")]
    MismatchedClose {
        expected: String,
        found: String,
        span: Range<usize>,
    },

    #[error("Expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Range<usize>,
    },

    #[error("<{tag}> inside <{parent}>: non-self-closing tags are not allowed")]
    IllegalNestedMarkup {
        parent: String,
        tag: String,
        span: Range<usize>,
    },

    #[error("Unexpected text inside <{parent}>: {text:?}")]
    UnexpectedText {
        parent: String,
        text: String,
        span: Range<usize>,
    },
}

impl ParseError {
    /// Byte range of the offending markup.
    pub fn span(&self) -> Range<usize> {
        match self {
            ParseError::Lex(err) => err.offset().map_or(0..0, |offset| offset..offset),
            ParseError::UnknownElement { span, .. }
            | ParseError::MismatchedClose { span, .. }
            | ParseError::UnexpectedToken { span, .. }
            | ParseError::IllegalNestedMarkup { span, .. }
            | ParseError::UnexpectedText { span, .. } => span.clone(),
        }
    }
}

/// Format source lines around an error
///
/// Shows 2 lines before the line containing `span.start`, that line with a `>>` marker, and 2
/// lines after. Lines are numbered from 1.
pub fn format_source_context(source: &str, span: &Range<usize>) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let offset = span.start.min(source.len());
    let error_line = source.as_bytes()[..offset]
        .iter()
        .filter(|&&byte| byte == b'\n')
        .count();

    let start_line = error_line.saturating_sub(2);
    let end_line = (error_line + 3).min(lines.len());

    let mut context = String::new();
    for (line_num, line) in lines.iter().enumerate().take(end_line).skip(start_line) {
        let marker = if line_num == error_line { ">>" } else { "  " };
        context.push_str(&format!("{} {:3} | {}\n", marker, line_num + 1, line));
    }
    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dpml::lexing::TagKind;

    #[test]
    fn test_messages() {
        let unknown = ParseError::UnknownElement {
            name: "unknown".to_string(),
            span: 0..9,
        };
        assert_eq!(unknown.to_string(), "Unknown element type: <unknown>");

        let mismatched = ParseError::MismatchedClose {
            expected: "role".to_string(),
            found: "</personality>".to_string(),
            span: 6..20,
        };
        assert!(mismatched
            .to_string()
            .starts_with("Expected closing tag for <role>"));
        assert_eq!(mismatched.span(), 6..20);
    }

    #[test]
    fn test_lex_errors_are_transparent() {
        let lex = LexError::UnterminatedTag {
            kind: TagKind::Open,
            offset: 4,
        };
        let err: ParseError = lex.clone().into();
        assert_eq!(err.to_string(), lex.to_string());
        assert_eq!(err.span(), 4..4);
    }

    #[test]
    fn test_format_source_context() {
        let source = "line 1\nline 2\nline 3\nerror line\nline 5\nline 6\nline 7";
        let context = format_source_context(source, &(21..31));

        assert!(context.contains("line 2"));
        assert!(context.contains(">>   4 | error line"));
        assert!(context.contains("line 6"));
        assert!(!context.contains("line 7"));
        assert!(!context.contains("line 1"));
    }
}
