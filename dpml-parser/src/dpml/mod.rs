//! DPML: tokenizer, parser, node model and output formats

pub mod ast;
pub mod formats;
pub mod lexing;
pub mod parsing;
pub mod token;
