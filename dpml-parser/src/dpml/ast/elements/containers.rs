//! Container elements
//!
//!     Containers carry an attribute list and an ordered list of [`Child`]ren. Each container
//!     only admits its own set of nested tags, plus inline resource references and text.
//!
//! | Element         | Nested tags                                          | Text between children |
//! |-----------------|------------------------------------------------------|-----------------------|
//! | `role`          | personality, principle, knowledge                    | whitespace only       |
//! | `execution`     | process, guideline, rule, constraint, criteria       | kept                  |
//! | `thought`       | exploration, reasoning, plan, challenge              | kept                  |
//! | `terminologies` | terminology                                          | whitespace, skipped   |
//! | `terminology`   | zh, en, definition, examples (others kept as text)   | kept                  |
//! | `examples`      | example                                              | skipped               |
//!
//! Examples:
//!     <role>
//!         <personality>Patient and precise</personality>
//!         <principle>Explain before acting</principle>
//!     </role>

use super::super::attributes::Attributes;
use super::super::traits::{Ast, Visitor};
use super::element::{Child, Element};
use super::simple::*;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! container_elements {
    ($($(#[$doc:meta])* $name:ident => $tag:literal, $visit:ident, [$($allowed:literal),*];)*) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
            pub struct $name {
                pub attributes: Attributes,
                pub children: Vec<Child>,
            }

            impl $name {
                pub const TAG: &'static str = $tag;
                /// Tag names parsed as typed children.
                pub const ALLOWED: &'static [&'static str] = &[$($allowed),*];

                pub fn new(children: Vec<Child>) -> Self {
                    Self {
                        attributes: Attributes::new(),
                        children,
                    }
                }

                pub fn with_attributes(mut self, attributes: Attributes) -> Self {
                    self.attributes = attributes;
                    self
                }

                /// Nested elements, skipping text runs.
                pub fn elements(&self) -> impl Iterator<Item = &Element> {
                    self.children.iter().filter_map(Child::as_element)
                }

                /// Text runs, skipping nested elements.
                pub fn texts(&self) -> impl Iterator<Item = &str> {
                    self.children.iter().filter_map(Child::as_text)
                }
            }

            impl Ast for $name {
                fn node_type(&self) -> &'static str {
                    stringify!($name)
                }
                fn visit<C, V>(&self, visitor: &mut V, context: C) -> V::Output
                where
                    V: Visitor<C> + ?Sized,
                {
                    visitor.$visit(self, context)
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}({} children)", stringify!($name), self.children.len())
                }
            }
        )*
    };
}

container_elements! {
    /// The persona of a prompt.
    RoleElement => "role", visit_role_element, ["personality", "principle", "knowledge"];
    /// How a task is carried out.
    ExecutionElement => "execution", visit_execution_element,
        ["process", "guideline", "rule", "constraint", "criteria"];
    /// A chain-of-thought section.
    ThoughtElement => "thought", visit_thought_element,
        ["exploration", "reasoning", "plan", "challenge"];
    /// A glossary, made of `<terminology>` entries.
    TerminologiesElement => "terminologies", visit_terminologies_element, ["terminology"];
    /// One glossary entry.
    TerminologyElement => "terminology", visit_terminology_element,
        ["zh", "en", "definition", "examples"];
    /// Usage examples of a glossary entry.
    ExamplesElement => "examples", visit_examples_element, ["example"];
}

/// Finds the first nested element matching a variant pattern.
macro_rules! first_of {
    ($self:expr, $variant:ident) => {
        $self.elements().find_map(|element| match element {
            Element::$variant(inner) => Some(inner),
            _ => None,
        })
    };
}

/// Collects every nested element matching a variant pattern.
macro_rules! all_of {
    ($self:expr, $variant:ident) => {
        $self.elements().filter_map(|element| match element {
            Element::$variant(inner) => Some(inner),
            _ => None,
        })
    };
}

impl RoleElement {
    pub fn personality(&self) -> Option<&PersonalityElement> {
        first_of!(self, Personality)
    }

    pub fn principles(&self) -> impl Iterator<Item = &PrincipleElement> {
        all_of!(self, Principle)
    }

    pub fn knowledge(&self) -> impl Iterator<Item = &KnowledgeElement> {
        all_of!(self, Knowledge)
    }
}

impl ExecutionElement {
    pub fn processes(&self) -> impl Iterator<Item = &ProcessElement> {
        all_of!(self, Process)
    }

    pub fn rules(&self) -> impl Iterator<Item = &RuleElement> {
        all_of!(self, Rule)
    }
}

impl TerminologiesElement {
    pub fn terminologies(&self) -> impl Iterator<Item = &TerminologyElement> {
        all_of!(self, Terminology)
    }
}

impl TerminologyElement {
    pub fn zh(&self) -> Option<&ZhElement> {
        first_of!(self, Zh)
    }

    pub fn en(&self) -> Option<&EnElement> {
        first_of!(self, En)
    }

    pub fn definition(&self) -> Option<&DefinitionElement> {
        first_of!(self, Definition)
    }

    pub fn examples(&self) -> Option<&ExamplesElement> {
        first_of!(self, Examples)
    }
}

impl ExamplesElement {
    pub fn examples(&self) -> impl Iterator<Item = &ExampleElement> {
        all_of!(self, Example)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessors() {
        let examples = ExamplesElement::new(vec![
            Child::Element(Element::Example(ExampleElement::new("one"))),
            Child::Element(Element::Example(ExampleElement::new("two"))),
        ]);
        let term = TerminologyElement::new(vec![
            Child::Element(Element::Zh(ZhElement::new("提示"))),
            Child::Text(" ".to_string()),
            Child::Element(Element::En(EnElement::new("prompt"))),
            Child::Element(Element::Examples(examples)),
        ]);

        assert_eq!(term.zh().map(|zh| zh.content.as_str()), Some("提示"));
        assert_eq!(term.en().map(|en| en.content.as_str()), Some("prompt"));
        assert!(term.definition().is_none());
        assert_eq!(term.examples().map(|e| e.examples().count()), Some(2));
        assert_eq!(term.texts().collect::<Vec<_>>(), vec![" "]);
        assert_eq!(term.elements().count(), 3);
    }

    #[test]
    fn test_allow_lists() {
        assert!(ExecutionElement::ALLOWED.contains(&"criteria"));
        assert!(!RoleElement::ALLOWED.contains(&"process"));
        assert_eq!(ExamplesElement::ALLOWED, &["example"]);
    }
}
