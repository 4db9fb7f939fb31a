//! Splitting tag text into tokens
//!
//!     An opening tag such as `<role type="expert" strict>` becomes
//!
//!         OpenTag("role"), Attribute(type=expert), Attribute(strict=true), TagEnd
//!
//!     Fragments are separated by whitespace, except inside a double-quoted value. A fragment
//!     without `=` is a boolean attribute with the value `"true"`. Otherwise the fragment is
//!     split on its first `=` and one layer of surrounding double quotes is stripped from the
//!     value.

use crate::dpml::token::Token;
use once_cell::sync::Lazy;
use regex::Regex;

static FRAGMENT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?:[^\s"]|"[^"]*"?)+"#).unwrap());

/// Tokens for a closing tag slice `</name >`.
pub(crate) fn close_tag_tokens(slice: &str) -> Token {
    let name = slice
        .trim_start_matches("</")
        .trim_end_matches('>')
        .trim();
    Token::CloseTag(name.to_string())
}

/// Tokens for an opening or self-closing tag slice `<name attr="v">` / `<name/>`.
pub(crate) fn open_tag_tokens(slice: &str) -> Vec<Token> {
    let interior = &slice[1..slice.len() - 1];
    let (interior, self_closing) = match interior.strip_suffix('/') {
        Some(rest) => (rest, true),
        None => (interior, false),
    };

    let mut fragments = FRAGMENT_REGEX.find_iter(interior).map(|m| m.as_str());
    let name = fragments.next().unwrap_or_default();

    let mut tokens = vec![Token::OpenTag(name.to_string())];
    tokens.extend(fragments.map(attribute_token));
    tokens.push(if self_closing {
        Token::SelfCloseTagEnd
    } else {
        Token::TagEnd
    });
    tokens
}

fn attribute_token(fragment: &str) -> Token {
    match fragment.split_once('=') {
        Some((name, value)) => Token::Attribute {
            name: name.to_string(),
            value: strip_quotes(value).to_string(),
        },
        None => Token::Attribute {
            name: fragment.to_string(),
            value: "true".to_string(),
        },
    }
}

fn strip_quotes(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}
