//! Output formats for parsed prompts
//!
//! Every format is a downstream consumer of the tree:
//! - tag: DPML markup again, re-parseable
//! - treeviz: one line per node, built from the [AstSnapshot](crate::dpml::ast::AstSnapshot)
//! - json: serde JSON of the tree
//! - stats: counts collected by a visitor

pub mod json;
pub mod registry;
pub mod stats;
pub mod tag;
pub mod treeviz;

pub use json::{from_json_str, to_json_str, JsonFormatter};
pub use registry::{FormatError, FormatRegistry, Formatter};
pub use stats::{collect_stats, PromptStats, StatsCollector, StatsFormatter};
pub use tag::{to_tag_str, TagFormatter, TagRenderer};
pub use treeviz::{to_treeviz_str, to_treeviz_str_with_options, TreevizFormatter, TreevizOptions};
