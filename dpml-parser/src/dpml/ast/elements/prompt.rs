//! Root node

use super::super::traits::{Ast, Visitor};
use super::containers::RoleElement;
use super::element::{Child, Element};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A whole DPML document: top-level elements and text runs in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptElement {
    pub children: Vec<Child>,
}

impl PromptElement {
    pub fn new(children: Vec<Child>) -> Self {
        PromptElement { children }
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Child::as_element)
    }

    /// The first top-level `<role>`.
    pub fn find_role(&self) -> Option<&RoleElement> {
        self.elements().find_map(|element| match element {
            Element::Role(role) => Some(role),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Ast for PromptElement {
    fn node_type(&self) -> &'static str {
        "PromptElement"
    }

    fn visit<C, V>(&self, visitor: &mut V, context: C) -> V::Output
    where
        V: Visitor<C> + ?Sized,
    {
        visitor.visit_prompt_element(self, context)
    }
}

impl fmt::Display for PromptElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PromptElement({} children)", self.children.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dpml::ast::{PersonalityElement, RuleElement};

    #[test]
    fn test_find_role_skips_other_children() {
        let role = RoleElement::new(vec![Child::Element(Element::Personality(
            PersonalityElement::new("warm"),
        ))]);
        let prompt = PromptElement::new(vec![
            Child::text("intro "),
            Child::Element(Element::Rule(RuleElement::new("r"))),
            Child::Element(Element::Role(role.clone())),
        ]);
        assert_eq!(prompt.find_role(), Some(&role));
        assert_eq!(prompt.elements().count(), 2);
        assert_eq!(prompt.children().len(), 3);
    }

    #[test]
    fn test_empty_prompt() {
        let prompt = PromptElement::default();
        assert!(prompt.is_empty());
        assert!(prompt.find_role().is_none());
    }
}
