//! # dpml-parser
//!
//! A parser for DPML, the tag-based markup used to author structured LLM prompts.
//!
//! Source text goes through two stages:
//!
//!     source ──tokenize──▶ tokens ──Parser──▶ PromptElement
//!
//! The tree is consumed through the [Visitor](dpml::ast::Visitor) protocol: one callback per
//! node type, with a caller-chosen context threaded through. The output formats in
//! [formats](dpml::formats) are visitors themselves.
//!
//! ```ignore
//! use dpml_parser::{parse_prompt, formats::to_treeviz_str};
//!
//! let prompt = parse_prompt("<role><personality>Calm</personality></role>")?;
//! print!("{}", to_treeviz_str(&prompt));
//! ```

#![allow(rustdoc::invalid_html_tags)]

pub mod dpml;

pub use dpml::{ast, formats, lexing, parsing, token};
pub use dpml::lexing::{tokenize, tokenize_with_spans, LexError, Tokenizer, WhitespacePolicy};
pub use dpml::parsing::{parse_prompt, parse_prompt_with, ParseError, ParseOptions, Parser};
pub use dpml::token::{Token, TokenKind};
