//! Node statistics
//!
//! [StatsCollector] is a visitor that threads the nesting depth through the tree as its
//! context and counts nodes by type.

use super::registry::{FormatError, Formatter};
use crate::dpml::ast::*;
use serde::Serialize;
use std::collections::BTreeMap;

/// Counts collected over one prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PromptStats {
    /// Element count per node type name.
    pub elements: BTreeMap<&'static str, usize>,
    pub text_runs: usize,
    /// Characters in text runs and simple element content.
    pub text_chars: usize,
    /// Deepest element nesting; top-level elements are at depth 1.
    pub max_depth: usize,
}

impl PromptStats {
    pub fn total_elements(&self) -> usize {
        self.elements.values().sum()
    }

    pub fn count(&self, node_type: &str) -> usize {
        self.elements.get(node_type).copied().unwrap_or(0)
    }
}

pub fn collect_stats(prompt: &PromptElement) -> PromptStats {
    let mut collector = StatsCollector::default();
    prompt.visit(&mut collector, 0);
    collector.stats
}

/// Visitor accumulating [PromptStats]. The context is the depth of the visited node.
#[derive(Debug, Default)]
pub struct StatsCollector {
    pub stats: PromptStats,
}

impl StatsCollector {
    fn record(&mut self, node_type: &'static str, depth: usize) {
        *self.stats.elements.entry(node_type).or_insert(0) += 1;
        self.stats.max_depth = self.stats.max_depth.max(depth);
    }

    fn children(&mut self, children: &[Child], depth: usize) {
        for child in children {
            match child {
                Child::Element(element) => element.visit(self, depth + 1),
                Child::Text(text) => {
                    self.stats.text_runs += 1;
                    self.stats.text_chars += text.chars().count();
                }
            }
        }
    }

    fn container<N: Ast>(&mut self, node: &N, children: &[Child], depth: usize) {
        self.record(node.node_type(), depth);
        self.children(children, depth);
    }
}

impl Visitor<usize> for StatsCollector {
    type Output = ();

    fn visit_prompt_element(&mut self, node: &PromptElement, depth: usize) {
        self.children(&node.children, depth);
    }

    fn visit_role_element(&mut self, node: &RoleElement, depth: usize) {
        self.container(node, &node.children, depth);
    }

    fn visit_execution_element(&mut self, node: &ExecutionElement, depth: usize) {
        self.container(node, &node.children, depth);
    }

    fn visit_thought_element(&mut self, node: &ThoughtElement, depth: usize) {
        self.container(node, &node.children, depth);
    }

    fn visit_terminologies_element(&mut self, node: &TerminologiesElement, depth: usize) {
        self.container(node, &node.children, depth);
    }

    fn visit_terminology_element(&mut self, node: &TerminologyElement, depth: usize) {
        self.container(node, &node.children, depth);
    }

    fn visit_examples_element(&mut self, node: &ExamplesElement, depth: usize) {
        self.container(node, &node.children, depth);
    }

    fn visit_resource_element(&mut self, node: &ResourceElement, depth: usize) {
        self.container(node, &node.contents, depth);
    }

    fn visit_text_element(&mut self, node: &dyn TextElement, depth: usize) {
        self.record(node.type_name(), depth);
        self.stats.text_chars += node.content().chars().count();
    }
}

fn render(stats: &PromptStats) -> String {
    let mut output = String::new();
    for (node_type, count) in &stats.elements {
        output.push_str(&format!("{:<24}{}\n", node_type, count));
    }
    output.push_str(&format!("{:<24}{}\n", "elements", stats.total_elements()));
    output.push_str(&format!("{:<24}{}\n", "text runs", stats.text_runs));
    output.push_str(&format!("{:<24}{}\n", "text chars", stats.text_chars));
    output.push_str(&format!("{:<24}{}\n", "max depth", stats.max_depth));
    output
}

pub struct StatsFormatter;

impl Formatter for StatsFormatter {
    fn name(&self) -> &str {
        "stats"
    }

    fn serialize(&self, prompt: &PromptElement) -> Result<String, FormatError> {
        Ok(render(&collect_stats(prompt)))
    }

    fn description(&self) -> &str {
        "Element counts by type, text totals and nesting depth"
    }
}
