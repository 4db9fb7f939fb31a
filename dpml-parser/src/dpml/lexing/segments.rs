//! Character-level segmentation of DPML source
//!
//! The logos lexer only decides where each piece of markup starts and ends. It knows four
//! shapes: tags (`<...>` and `</...>`), resource references, a stray `@`, and free text. Tag
//! callbacks scan forward to the next `>` themselves so that anything, including `<` and `@`,
//! may appear inside a tag until it is closed.

use super::error::{LexError, TagKind};
use logos::{Lexer, Logos};
use once_cell::sync::Lazy;
use regex::Regex;

/// What may follow the `@` of a resource reference: `[!?]protocol:location`.
static REFERENCE_TAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[!?]?[A-Za-z][A-Za-z0-9_\-]*:[^\s<>@]+").unwrap());

/// Raw markup segments, before tags are split into name/attribute tokens.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = LexError)]
pub(crate) enum Segment {
    /// `</ ... >`
    #[token("</", close_tag)]
    CloseTag,

    /// `< ... >` or `< ... />`
    #[token("<", open_tag)]
    OpenTag,

    /// `@[!?]protocol:location`, produced by the `@` callback.
    ResourceRef,

    /// An `@` that does not start a resource reference.
    #[token("@", at_sign)]
    At,

    /// Everything up to the next `<` or `@`.
    #[regex(r"[^<@]+")]
    Text,
}

fn close_tag(lex: &mut Lexer<Segment>) -> Result<(), LexError> {
    bump_past_tag_end(lex, TagKind::Close)
}

fn open_tag(lex: &mut Lexer<Segment>) -> Result<(), LexError> {
    bump_past_tag_end(lex, TagKind::Open)
}

/// Every `@` lands here. A reference is consumed whole, anything else leaves the `@` alone.
fn at_sign(lex: &mut Lexer<Segment>) -> Segment {
    match REFERENCE_TAIL.find(lex.remainder()) {
        Some(tail) => {
            lex.bump(tail.end());
            Segment::ResourceRef
        }
        None => Segment::At,
    }
}

fn bump_past_tag_end(lex: &mut Lexer<Segment>, kind: TagKind) -> Result<(), LexError> {
    let offset = lex.span().start;
    match lex.remainder().find('>') {
        Some(end) => {
            lex.bump(end + 1);
            Ok(())
        }
        None => Err(LexError::UnterminatedTag { kind, offset }),
    }
}
