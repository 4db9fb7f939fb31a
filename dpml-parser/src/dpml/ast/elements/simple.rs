//! Text-only elements
//!
//!     Simple elements carry an attribute list and one opaque text run. Their body is never
//!     parsed for structure: text and resource references are kept verbatim, and self-closing
//!     tags such as `<br/>` are kept as literal markup inside `content`.
//!
//! Syntax:
//!     <process>Step 1<br/>Step 2</process>
//!
//!     content == "Step 1<br/>Step 2"

use super::super::attributes::Attributes;
use super::super::traits::{Ast, TextElement, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! text_elements {
    ($($(#[$doc:meta])* $name:ident => $tag:literal, $visit:ident;)*) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
            pub struct $name {
                pub attributes: Attributes,
                pub content: String,
            }

            impl $name {
                pub const TAG: &'static str = $tag;

                pub fn new(content: impl Into<String>) -> Self {
                    Self {
                        attributes: Attributes::new(),
                        content: content.into(),
                    }
                }

                pub fn with_attributes(mut self, attributes: Attributes) -> Self {
                    self.attributes = attributes;
                    self
                }
            }

            impl TextElement for $name {
                fn tag_name(&self) -> &'static str {
                    $tag
                }
                fn type_name(&self) -> &'static str {
                    stringify!($name)
                }
                fn attributes(&self) -> &Attributes {
                    &self.attributes
                }
                fn content(&self) -> &str {
                    &self.content
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
                    write!(f, "{}({} chars)", stringify!($name), self.content.chars().count())
                }
            }
        )*
    };
}

text_elements! {
    /// A step-by-step procedure inside `<execution>`.
    ProcessElement => "process", visit_process_element;
    /// Advice inside `<execution>`.
    GuidelineElement => "guideline", visit_guideline_element;
    /// A mandatory rule inside `<execution>`.
    RuleElement => "rule", visit_rule_element;
    /// A hard limit inside `<execution>`.
    ConstraintElement => "constraint", visit_constraint_element;
    /// Acceptance criteria inside `<execution>`.
    CriteriaElement => "criteria", visit_criteria_element;
    /// Location part of a block `<resource>`.
    LocationElement => "location", visit_location_element;
    /// Parameter part of a block `<resource>`.
    ParamsElement => "params", visit_params_element;
    /// Registry part of a block `<resource>`.
    RegistryElement => "registry", visit_registry_element;
    ExplorationElement => "exploration", visit_exploration_element;
    ReasoningElement => "reasoning", visit_reasoning_element;
    PlanElement => "plan", visit_plan_element;
    ChallengeElement => "challenge", visit_challenge_element;
    PersonalityElement => "personality", visit_personality_element;
    PrincipleElement => "principle", visit_principle_element;
    KnowledgeElement => "knowledge", visit_knowledge_element;
    /// Chinese term of a `<terminology>`.
    ZhElement => "zh", visit_zh_element;
    /// English term of a `<terminology>`.
    EnElement => "en", visit_en_element;
    DefinitionElement => "definition", visit_definition_element;
    ExampleElement => "example", visit_example_element;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dpml::ast::Attribute;

    #[test]
    fn test_text_element_view() {
        let rule = RuleElement::new("Never guess")
            .with_attributes([Attribute::new("level", "hard")].into_iter().collect());
        let view: &dyn TextElement = &rule;
        assert_eq!(view.tag_name(), "rule");
        assert_eq!(view.type_name(), "RuleElement");
        assert_eq!(view.content(), "Never guess");
        assert_eq!(view.attributes().get("level"), Some("hard"));
        assert_eq!(RuleElement::TAG, "rule");
    }

    #[test]
    fn test_display() {
        assert_eq!(ZhElement::new("术语").to_string(), "ZhElement(2 chars)");
    }
}
