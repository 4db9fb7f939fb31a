//! AST definitions for DPML
//!
//!     A parsed document is a [PromptElement] whose children are elements and raw text runs in
//!     document order. Nodes own their children outright: there are no parent links and no
//!     shared node state, so a tree can be moved, cloned or serialized freely.
//!
//!     Every concrete node type implements [Ast]. Consumers traverse a tree by implementing
//!     [Visitor] and calling `visit` on the root. See [traits] for the protocol.
//!
//!     [snapshot] holds a normalized, serializable view of a tree used by the output formats.

pub mod attributes;
pub mod elements;
pub mod snapshot;
pub mod traits;

pub use attributes::{Attribute, Attributes};
pub use elements::*;
pub use snapshot::{snapshot_from_prompt, AstSnapshot};
pub use traits::{Ast, TextElement, Visitor};
