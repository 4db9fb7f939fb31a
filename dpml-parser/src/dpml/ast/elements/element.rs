//! Element and child sum types
//!
//! [`Element`] wraps every concrete node type except the root. Its [`visit`](Element::visit)
//! is the single dispatch point of the visitor protocol: one exhaustive match, one callback.
//!
//! [`Child`] is what containers hold: either a nested element or a raw text run, in source
//! order.

use super::super::attributes::Attributes;
use super::super::traits::{Ast, TextElement, Visitor};
use super::containers::*;
use super::resource::ResourceElement;
use super::simple::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Any DPML element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Role(RoleElement),
    Execution(ExecutionElement),
    Thought(ThoughtElement),
    Terminologies(TerminologiesElement),
    Terminology(TerminologyElement),
    Examples(ExamplesElement),
    Resource(ResourceElement),
    Process(ProcessElement),
    Guideline(GuidelineElement),
    Rule(RuleElement),
    Constraint(ConstraintElement),
    Criteria(CriteriaElement),
    Location(LocationElement),
    Params(ParamsElement),
    Registry(RegistryElement),
    Exploration(ExplorationElement),
    Reasoning(ReasoningElement),
    Plan(PlanElement),
    Challenge(ChallengeElement),
    Personality(PersonalityElement),
    Principle(PrincipleElement),
    Knowledge(KnowledgeElement),
    Zh(ZhElement),
    En(EnElement),
    Definition(DefinitionElement),
    Example(ExampleElement),
}

impl Element {
    /// Dispatch to the visitor callback for this element's concrete type.
    pub fn visit<C, V>(&self, visitor: &mut V, context: C) -> V::Output
    where
        V: Visitor<C> + ?Sized,
    {
        match self {
            Element::Role(node) => visitor.visit_role_element(node, context),
            Element::Execution(node) => visitor.visit_execution_element(node, context),
            Element::Thought(node) => visitor.visit_thought_element(node, context),
            Element::Terminologies(node) => visitor.visit_terminologies_element(node, context),
            Element::Terminology(node) => visitor.visit_terminology_element(node, context),
            Element::Examples(node) => visitor.visit_examples_element(node, context),
            Element::Resource(node) => visitor.visit_resource_element(node, context),
            Element::Process(node) => visitor.visit_process_element(node, context),
            Element::Guideline(node) => visitor.visit_guideline_element(node, context),
            Element::Rule(node) => visitor.visit_rule_element(node, context),
            Element::Constraint(node) => visitor.visit_constraint_element(node, context),
            Element::Criteria(node) => visitor.visit_criteria_element(node, context),
            Element::Location(node) => visitor.visit_location_element(node, context),
            Element::Params(node) => visitor.visit_params_element(node, context),
            Element::Registry(node) => visitor.visit_registry_element(node, context),
            Element::Exploration(node) => visitor.visit_exploration_element(node, context),
            Element::Reasoning(node) => visitor.visit_reasoning_element(node, context),
            Element::Plan(node) => visitor.visit_plan_element(node, context),
            Element::Challenge(node) => visitor.visit_challenge_element(node, context),
            Element::Personality(node) => visitor.visit_personality_element(node, context),
            Element::Principle(node) => visitor.visit_principle_element(node, context),
            Element::Knowledge(node) => visitor.visit_knowledge_element(node, context),
            Element::Zh(node) => visitor.visit_zh_element(node, context),
            Element::En(node) => visitor.visit_en_element(node, context),
            Element::Definition(node) => visitor.visit_definition_element(node, context),
            Element::Example(node) => visitor.visit_example_element(node, context),
        }
    }

    /// The text-only view, for simple elements.
    pub fn as_text_element(&self) -> Option<&dyn TextElement> {
        match self {
            Element::Process(node) => Some(node),
            Element::Guideline(node) => Some(node),
            Element::Rule(node) => Some(node),
            Element::Constraint(node) => Some(node),
            Element::Criteria(node) => Some(node),
            Element::Location(node) => Some(node),
            Element::Params(node) => Some(node),
            Element::Registry(node) => Some(node),
            Element::Exploration(node) => Some(node),
            Element::Reasoning(node) => Some(node),
            Element::Plan(node) => Some(node),
            Element::Challenge(node) => Some(node),
            Element::Personality(node) => Some(node),
            Element::Principle(node) => Some(node),
            Element::Knowledge(node) => Some(node),
            Element::Zh(node) => Some(node),
            Element::En(node) => Some(node),
            Element::Definition(node) => Some(node),
            Element::Example(node) => Some(node),
            Element::Role(_)
            | Element::Execution(_)
            | Element::Thought(_)
            | Element::Terminologies(_)
            | Element::Terminology(_)
            | Element::Examples(_)
            | Element::Resource(_) => None,
        }
    }

    /// Ordered children of container elements and block resources.
    pub fn children(&self) -> Option<&[Child]> {
        match self {
            Element::Role(node) => Some(&node.children),
            Element::Execution(node) => Some(&node.children),
            Element::Thought(node) => Some(&node.children),
            Element::Terminologies(node) => Some(&node.children),
            Element::Terminology(node) => Some(&node.children),
            Element::Examples(node) => Some(&node.children),
            Element::Resource(node) => Some(&node.contents),
            _ => None,
        }
    }

    pub fn attributes(&self) -> &Attributes {
        match self {
            Element::Role(node) => &node.attributes,
            Element::Execution(node) => &node.attributes,
            Element::Thought(node) => &node.attributes,
            Element::Terminologies(node) => &node.attributes,
            Element::Terminology(node) => &node.attributes,
            Element::Examples(node) => &node.attributes,
            Element::Resource(node) => &node.attributes,
            other => other
                .as_text_element()
                .map(|node| node.attributes())
                .unwrap_or(&EMPTY_ATTRIBUTES),
        }
    }

    /// The DPML tag name this element is written with.
    pub fn tag_name(&self) -> &'static str {
        match self {
            Element::Role(_) => RoleElement::TAG,
            Element::Execution(_) => ExecutionElement::TAG,
            Element::Thought(_) => ThoughtElement::TAG,
            Element::Terminologies(_) => TerminologiesElement::TAG,
            Element::Terminology(_) => TerminologyElement::TAG,
            Element::Examples(_) => ExamplesElement::TAG,
            Element::Resource(_) => ResourceElement::TAG,
            other => other
                .as_text_element()
                .map(|node| node.tag_name())
                .unwrap_or_default(),
        }
    }

    pub fn node_type(&self) -> &'static str {
        match self {
            Element::Role(node) => node.node_type(),
            Element::Execution(node) => node.node_type(),
            Element::Thought(node) => node.node_type(),
            Element::Terminologies(node) => node.node_type(),
            Element::Terminology(node) => node.node_type(),
            Element::Examples(node) => node.node_type(),
            Element::Resource(node) => node.node_type(),
            other => other
                .as_text_element()
                .map(|node| node.type_name())
                .unwrap_or_default(),
        }
    }
}

static EMPTY_ATTRIBUTES: Attributes = Attributes::EMPTY;

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.tag_name())
    }
}

/// A container child: a nested element or a raw text run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Child {
    Element(Element),
    Text(String),
}

impl Child {
    pub fn text(text: impl Into<String>) -> Self {
        Child::Text(text.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Child::Element(element) => Some(element),
            Child::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Child::Text(text) => Some(text),
            Child::Element(_) => None,
        }
    }

    pub fn is_blank_text(&self) -> bool {
        matches!(self, Child::Text(text) if text.trim().is_empty())
    }
}

impl From<Element> for Child {
    fn from(element: Element) -> Self {
        Child::Element(element)
    }
}
