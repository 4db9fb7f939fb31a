//! AST Snapshot - a normalized view of a parsed prompt
//!
//! The snapshot flattens the heterogeneous node types into one shape (type, label, attributes,
//! children) so that tree-shaped output formats do not each need their own traversal.
//!
//! Snapshots are built by [SnapshotBuilder], a [Visitor] over the whole tree. Raw text runs
//! become `Text` snapshots so callers can decide whether to show them.

use super::elements::*;
use super::traits::{Ast, TextElement, Visitor};
use super::Attributes;
use serde::{Deserialize, Serialize};

/// Node type name given to raw text runs.
pub const TEXT_NODE: &str = "Text";

/// A snapshot of an AST node in a normalized, serializable form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AstSnapshot {
    /// The type of node (e.g., "RoleElement", "Text")
    pub node_type: String,

    /// Tag name, text content or reference of the node
    pub label: String,

    /// Attributes in source order, duplicates included
    pub attributes: Vec<(String, String)>,

    pub children: Vec<AstSnapshot>,
}

impl AstSnapshot {
    pub fn new(node_type: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            label: label.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn with_attributes(mut self, attributes: &Attributes) -> Self {
        self.attributes.extend(
            attributes
                .iter()
                .map(|attr| (attr.name.clone(), attr.value.clone())),
        );
        self
    }

    pub fn with_children(mut self, children: Vec<AstSnapshot>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn is_text(&self) -> bool {
        self.node_type == TEXT_NODE
    }

    /// Number of nodes in this subtree, itself included.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(AstSnapshot::count).sum::<usize>()
    }
}

/// Build the snapshot of a whole prompt.
pub fn snapshot_from_prompt(prompt: &PromptElement) -> AstSnapshot {
    prompt.visit(&mut SnapshotBuilder, ())
}

/// Visitor producing an [AstSnapshot] for the visited node and everything below it.
pub struct SnapshotBuilder;

impl SnapshotBuilder {
    fn children(&mut self, children: &[Child]) -> Vec<AstSnapshot> {
        children
            .iter()
            .map(|child| match child {
                Child::Element(element) => element.visit(self, ()),
                Child::Text(text) => AstSnapshot::new(TEXT_NODE, text.clone()),
            })
            .collect()
    }

    fn container<N: Ast>(
        &mut self,
        node: &N,
        tag: &str,
        attributes: &Attributes,
        children: &[Child],
    ) -> AstSnapshot {
        let children = self.children(children);
        AstSnapshot::new(node.node_type(), tag)
            .with_attributes(attributes)
            .with_children(children)
    }
}

impl Visitor<()> for SnapshotBuilder {
    type Output = AstSnapshot;

    fn visit_prompt_element(&mut self, node: &PromptElement, _: ()) -> AstSnapshot {
        let children = self.children(&node.children);
        AstSnapshot::new(node.node_type(), "prompt").with_children(children)
    }

    fn visit_role_element(&mut self, node: &RoleElement, _: ()) -> AstSnapshot {
        self.container(node, RoleElement::TAG, &node.attributes, &node.children)
    }

    fn visit_execution_element(&mut self, node: &ExecutionElement, _: ()) -> AstSnapshot {
        self.container(node, ExecutionElement::TAG, &node.attributes, &node.children)
    }

    fn visit_thought_element(&mut self, node: &ThoughtElement, _: ()) -> AstSnapshot {
        self.container(node, ThoughtElement::TAG, &node.attributes, &node.children)
    }

    fn visit_terminologies_element(&mut self, node: &TerminologiesElement, _: ()) -> AstSnapshot {
        self.container(
            node,
            TerminologiesElement::TAG,
            &node.attributes,
            &node.children,
        )
    }

    fn visit_terminology_element(&mut self, node: &TerminologyElement, _: ()) -> AstSnapshot {
        self.container(
            node,
            TerminologyElement::TAG,
            &node.attributes,
            &node.children,
        )
    }

    fn visit_examples_element(&mut self, node: &ExamplesElement, _: ()) -> AstSnapshot {
        self.container(node, ExamplesElement::TAG, &node.attributes, &node.children)
    }

    fn visit_resource_element(&mut self, node: &ResourceElement, _: ()) -> AstSnapshot {
        if node.inline {
            return AstSnapshot::new(node.node_type(), node.to_reference())
                .with_attribute("model", node.model.as_str());
        }
        let children = self.children(&node.contents);
        AstSnapshot::new(node.node_type(), ResourceElement::TAG)
            .with_attributes(&node.attributes)
            .with_children(children)
    }

    fn visit_text_element(&mut self, node: &dyn TextElement, _: ()) -> AstSnapshot {
        AstSnapshot::new(node.type_name(), node.content()).with_attributes(node.attributes())
    }
}
