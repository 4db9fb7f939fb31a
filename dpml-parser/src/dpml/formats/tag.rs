//! Tag formatter: renders a prompt back to DPML markup
//!
//!     The renderer is a [Visitor] that returns the markup of the visited node. Text runs and
//!     simple element content are written verbatim, attributes are written as `name="value"` in
//!     source order, and inline resources use their `@[prefix]protocol:location` form.
//!
//!     Parsing the output again gives a tree equal to the one rendered. The exception is a
//!     terminology holding unknown tags: those were kept as text and bare attributes in them
//!     come back with an explicit `"true"`.

use super::registry::{FormatError, Formatter};
use crate::dpml::ast::*;
use crate::dpml::parsing::parse_prompt;

/// Render a prompt to DPML markup.
pub fn to_tag_str(prompt: &PromptElement) -> String {
    prompt.visit(&mut TagRenderer, ())
}

/// Visitor producing DPML markup.
pub struct TagRenderer;

impl TagRenderer {
    fn children(&mut self, children: &[Child]) -> String {
        children
            .iter()
            .map(|child| match child {
                Child::Element(element) => element.visit(self, ()),
                Child::Text(text) => text.clone(),
            })
            .collect()
    }

    fn wrap(&mut self, tag: &str, attributes: &Attributes, children: &[Child]) -> String {
        format!("<{tag}{attributes}>{}</{tag}>", self.children(children))
    }
}

impl Visitor<()> for TagRenderer {
    type Output = String;

    fn visit_prompt_element(&mut self, node: &PromptElement, _: ()) -> String {
        self.children(&node.children)
    }

    fn visit_role_element(&mut self, node: &RoleElement, _: ()) -> String {
        self.wrap(RoleElement::TAG, &node.attributes, &node.children)
    }

    fn visit_execution_element(&mut self, node: &ExecutionElement, _: ()) -> String {
        self.wrap(ExecutionElement::TAG, &node.attributes, &node.children)
    }

    fn visit_thought_element(&mut self, node: &ThoughtElement, _: ()) -> String {
        self.wrap(ThoughtElement::TAG, &node.attributes, &node.children)
    }

    fn visit_terminologies_element(&mut self, node: &TerminologiesElement, _: ()) -> String {
        self.wrap(TerminologiesElement::TAG, &node.attributes, &node.children)
    }

    fn visit_terminology_element(&mut self, node: &TerminologyElement, _: ()) -> String {
        self.wrap(TerminologyElement::TAG, &node.attributes, &node.children)
    }

    fn visit_examples_element(&mut self, node: &ExamplesElement, _: ()) -> String {
        self.wrap(ExamplesElement::TAG, &node.attributes, &node.children)
    }

    fn visit_resource_element(&mut self, node: &ResourceElement, _: ()) -> String {
        if node.inline {
            node.to_reference()
        } else {
            self.wrap(ResourceElement::TAG, &node.attributes, &node.contents)
        }
    }

    fn visit_text_element(&mut self, node: &dyn TextElement, _: ()) -> String {
        let tag = node.tag_name();
        format!("<{tag}{}>{}</{tag}>", node.attributes(), node.content())
    }
}

/// Formatter implementation for DPML markup output
pub struct TagFormatter;

impl Formatter for TagFormatter {
    fn name(&self) -> &str {
        "tag"
    }

    fn serialize(&self, prompt: &PromptElement) -> Result<String, FormatError> {
        Ok(to_tag_str(prompt))
    }

    fn description(&self) -> &str {
        "DPML markup"
    }

    fn readable(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<PromptElement, FormatError> {
        Ok(parse_prompt(source)?)
    }
}
