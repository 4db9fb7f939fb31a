//! Tokenizer
//!
//! This module turns DPML source into the flat token sequence consumed by the parser.
//!
//! Structure:
//!     Segmentation is done by a logos lexer (see [segments]) which only finds where tags,
//!     resource references and text runs begin and end. A second pass, the [Tokenizer], expands
//!     each tag into its name, attribute and terminator tokens (see [tags]), joins a stray `@`
//!     with the text that follows it, and applies the whitespace policy.
//!
//! Dispatch on the current character:
//!     - `<`  an opening tag, or a closing tag when followed by `/`. Both must be terminated by
//!       a `>` before the end of input.
//!     - `@`  a resource reference `@[!?]protocol:location`. When the pattern does not match,
//!       the `@` is ordinary text.
//!     - anything else: text up to (not including) the next `<` or `@`.
//!
//! Resource references:
//!     The protocol is `[A-Za-z][A-Za-z0-9_-]*` and the location is one or more characters
//!     other than whitespace, `<`, `>` and `@`. The parser decomposes references with the same
//!     grammar, so `@file://a.md` and `@thought:plan` are both references.

pub mod error;
mod segments;
mod tags;

pub use error::{LexError, TagKind};

use crate::dpml::token::Token;
use logos::{Logos, SpannedIter};
use segments::Segment;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::iter::Peekable;
use std::ops::Range;

/// How text runs made only of whitespace are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WhitespacePolicy {
    /// Every character between delimiters is kept verbatim.
    #[default]
    Preserve,
    /// Whitespace-only runs are dropped; whitespace inside other runs is kept.
    DropBlank,
}

/// Streaming tokenizer over a single source string.
///
/// Yields tokens paired with the byte range of the markup they came from. Tokens expanded
/// from one tag share that tag's range. After the first error the iterator is exhausted.
pub struct Tokenizer<'s> {
    segments: Peekable<SpannedIter<'s, Segment>>,
    source: &'s str,
    pending: VecDeque<(Token, Range<usize>)>,
    whitespace: WhitespacePolicy,
    failed: bool,
}

impl<'s> Tokenizer<'s> {
    pub fn new(source: &'s str) -> Self {
        Self::with_policy(source, WhitespacePolicy::default())
    }

    pub fn with_policy(source: &'s str, whitespace: WhitespacePolicy) -> Self {
        Tokenizer {
            segments: Segment::lexer(source).spanned().peekable(),
            source,
            pending: VecDeque::new(),
            whitespace,
            failed: false,
        }
    }

    /// Expand the next segment into zero or more pending tokens.
    fn fill(&mut self) -> Option<Result<(), LexError>> {
        let (segment, span) = self.segments.next()?;
        let segment = match segment {
            Ok(segment) => segment,
            Err(err) => return Some(Err(err)),
        };
        let source = self.source;
        let slice = &source[span.clone()];

        match segment {
            Segment::OpenTag => {
                for token in tags::open_tag_tokens(slice) {
                    self.pending.push_back((token, span.clone()));
                }
            }
            Segment::CloseTag => {
                self.pending
                    .push_back((tags::close_tag_tokens(slice), span));
            }
            Segment::ResourceRef => {
                self.pending
                    .push_back((Token::ResourceRef(slice.to_string()), span));
            }
            Segment::At => {
                // A stray `@` starts a text run that ends at the next `<` or `@`.
                let mut text = slice.to_string();
                let mut end = span.end;
                if let Some((Ok(Segment::Text), next)) = self.segments.peek() {
                    text.push_str(&source[next.clone()]);
                    end = next.end;
                    self.segments.next();
                }
                self.push_text(text, span.start..end);
            }
            Segment::Text => self.push_text(slice.to_string(), span),
        }
        Some(Ok(()))
    }

    fn push_text(&mut self, text: String, span: Range<usize>) {
        if text.is_empty() {
            return;
        }
        if self.whitespace == WhitespacePolicy::DropBlank && text.trim().is_empty() {
            return;
        }
        self.pending.push_back((Token::Text(text), span));
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<(Token, Range<usize>), LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(Ok(token));
            }
            if self.failed {
                return None;
            }
            match self.fill()? {
                Ok(()) => continue,
                Err(err) => {
                    self.failed = true;
                    return Some(Err(err));
                }
            }
        }
    }
}

/// Tokenize DPML source, keeping whitespace verbatim.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Ok(tokenize_with_spans(source)?
        .into_iter()
        .map(|(token, _)| token)
        .collect())
}

/// Tokenize DPML source, pairing each token with its source byte range.
pub fn tokenize_with_spans(source: &str) -> Result<Vec<(Token, Range<usize>)>, LexError> {
    tokenize_with_policy(source, WhitespacePolicy::default())
}

/// Tokenize with an explicit whitespace policy.
pub fn tokenize_with_policy(
    source: &str,
    whitespace: WhitespacePolicy,
) -> Result<Vec<(Token, Range<usize>)>, LexError> {
    let result: Result<Vec<_>, LexError> = Tokenizer::with_policy(source, whitespace).collect();
    match &result {
        Ok(tokens) => {
            tracing::debug!(tokens = tokens.len(), bytes = source.len(), "tokenized source")
        }
        Err(err) => tracing::debug!(error = %err, "tokenization failed"),
    }
    result
}
