//! Lexical errors

use std::fmt;
use thiserror::Error;

/// Which kind of tag was left open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Open,
    Close,
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagKind::Open => f.write_str("open"),
            TagKind::Close => f.write_str("close"),
        }
    }
}

/// Errors raised while tokenizing DPML source.
#[derive(Debug, Clone, PartialEq, Eq, Default, Error)]
pub enum LexError {
    /// A `<` or `</` with no `>` before the end of input.
    #[error("unclosed {kind} tag starting at byte {offset}")]
    UnterminatedTag { kind: TagKind, offset: usize },

    /// Input no segment pattern accepts.
    #[default]
    #[error("unrecognized input")]
    UnrecognizedInput,
}

impl LexError {
    /// Byte offset of the failure, when known.
    pub fn offset(&self) -> Option<usize> {
        match self {
            LexError::UnterminatedTag { offset, .. } => Some(*offset),
            LexError::UnrecognizedInput => None,
        }
    }
}
