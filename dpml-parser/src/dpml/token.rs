//! Token types shared by the tokenizer, the parser and tooling.
//!
//!     DPML is lexed into a flat sequence of tokens. Tags are split into several tokens: the
//!     opening token carries the tag name, each attribute gets its own token, and a terminator
//!     token records whether the tag was self-closing. This keeps the parser a plain
//!     single-lookahead consumer that never has to look inside a tag's text.
//!
//!     Token order always matches source order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single DPML token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Token {
    /// `<name` of an opening or self-closing tag.
    OpenTag(String),
    /// `</name>`, value is the trimmed tag name.
    CloseTag(String),
    /// `>` terminating an opening tag.
    TagEnd,
    /// `/>` terminating a self-closing tag.
    SelfCloseTagEnd,
    /// `name="value"` or a bare boolean attribute (value `"true"`).
    Attribute { name: String, value: String },
    /// A run of free text between markup.
    Text(String),
    /// A full inline resource reference, e.g. `@?file://notes.md`.
    ResourceRef(String),
}

/// The kind of a [`Token`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    OpenTag,
    CloseTag,
    TagEnd,
    SelfCloseTagEnd,
    Attribute,
    Text,
    ResourceRef,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::OpenTag(_) => TokenKind::OpenTag,
            Token::CloseTag(_) => TokenKind::CloseTag,
            Token::TagEnd => TokenKind::TagEnd,
            Token::SelfCloseTagEnd => TokenKind::SelfCloseTagEnd,
            Token::Attribute { .. } => TokenKind::Attribute,
            Token::Text(_) => TokenKind::Text,
            Token::ResourceRef(_) => TokenKind::ResourceRef,
        }
    }

    /// The token's value: tag name, attribute value, text, or the literal terminator.
    pub fn value(&self) -> &str {
        match self {
            Token::OpenTag(name) | Token::CloseTag(name) => name,
            Token::TagEnd => ">",
            Token::SelfCloseTagEnd => "/>",
            Token::Attribute { value, .. } => value,
            Token::Text(text) => text,
            Token::ResourceRef(reference) => reference,
        }
    }

    /// Attribute name, only present on [`Token::Attribute`].
    pub fn name(&self) -> Option<&str> {
        match self {
            Token::Attribute { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Short human readable description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::OpenTag(name) => format!("opening tag <{}>", name),
            Token::CloseTag(name) => format!("closing tag </{}>", name),
            Token::TagEnd => "'>'".to_string(),
            Token::SelfCloseTagEnd => "'/>'".to_string(),
            Token::Attribute { name, .. } => format!("attribute '{}'", name),
            Token::Text(text) => format!("text {:?}", truncate(text, 20)),
            Token::ResourceRef(reference) => format!("resource reference {}", reference),
        }
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push('…');
        truncated
    } else {
        s.to_string()
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::OpenTag => "OpenTag",
            TokenKind::CloseTag => "CloseTag",
            TokenKind::TagEnd => "TagEnd",
            TokenKind::SelfCloseTagEnd => "SelfCloseTagEnd",
            TokenKind::Attribute => "Attribute",
            TokenKind::Text => "Text",
            TokenKind::ResourceRef => "ResourceRef",
        };
        f.write_str(name)
    }
}

/// Compact one-token form used by the `token-simple` output.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::OpenTag(name) => write!(f, "<open:{}>", name),
            Token::CloseTag(name) => write!(f, "<close:{}>", name),
            Token::TagEnd => write!(f, "<tag-end>"),
            Token::SelfCloseTagEnd => write!(f, "<self-close>"),
            Token::Attribute { name, value } => write!(f, "<attr:{}={}>", name, value),
            Token::Text(text) => write!(f, "<text:{}>", text),
            Token::ResourceRef(reference) => write!(f, "<ref:{}>", reference),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_and_kinds() {
        let attr = Token::Attribute {
            name: "type".to_string(),
            value: "expert".to_string(),
        };
        assert_eq!(attr.kind(), TokenKind::Attribute);
        assert_eq!(attr.value(), "expert");
        assert_eq!(attr.name(), Some("type"));

        assert_eq!(Token::TagEnd.value(), ">");
        assert_eq!(Token::SelfCloseTagEnd.value(), "/>");
        assert_eq!(Token::OpenTag("role".to_string()).name(), None);
    }

    #[test]
    fn test_display() {
        let tokens = [
            Token::OpenTag("role".to_string()),
            Token::TagEnd,
            Token::Text("hi".to_string()),
            Token::CloseTag("role".to_string()),
        ];
        let simple: String = tokens.iter().map(|t| t.to_string()).collect();
        assert_eq!(simple, "<open:role><tag-end><text:hi><close:role>");
    }

    #[test]
    fn test_describe_truncates_long_text() {
        let token = Token::Text("a".repeat(40));
        let described = token.describe();
        assert!(described.starts_with("text \""));
        assert!(described.contains('…'));
    }
}
