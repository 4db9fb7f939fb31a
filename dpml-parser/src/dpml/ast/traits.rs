//! AST traits - the visitor protocol and shared node capabilities
//!
//! Every concrete node type implements [`Ast`]. Visiting a node calls the one [`Visitor`]
//! method for that node's type, handing it the node and the caller's context unchanged, and
//! returns whatever that method returns.
//!
//! The AST never recurses on its own. A visitor that needs the whole tree walks into
//! `children` itself, which lets it choose the order and thread a different context into
//! each level (a depth, an output buffer, a path).
//!
//! # Example
//!
//! ```ignore
//! struct Depth;
//!
//! impl Visitor<usize> for Depth {
//!     type Output = usize;
//!     fn visit_role_element(&mut self, role: &RoleElement, depth: usize) -> usize {
//!         role.elements().map(|e| e.visit(self, depth + 1)).max().unwrap_or(depth)
//!     }
//!     // ...
//! }
//! ```

use super::attributes::Attributes;
use super::elements::*;

/// Capability shared by every AST node.
pub trait Ast {
    /// Rust-side node type name, e.g. `"RoleElement"`.
    fn node_type(&self) -> &'static str;

    /// Dispatch to the visitor method matching this node's type.
    fn visit<C, V>(&self, visitor: &mut V, context: C) -> V::Output
    where
        V: Visitor<C> + ?Sized;
}

/// Shared view of the elements whose body is a single text run.
pub trait TextElement {
    /// The DPML tag name, e.g. `"process"`.
    fn tag_name(&self) -> &'static str;
    /// Node type name, same as [`Ast::node_type`].
    fn type_name(&self) -> &'static str;
    fn attributes(&self) -> &Attributes;
    /// The raw body, including any literal markup such as `<br/>`.
    fn content(&self) -> &str;
}

/// One callback per concrete node type.
///
/// `C` is the caller's context type and is opaque to the AST. Container, resource and root
/// callbacks are required. The text-only element callbacks default to
/// [`visit_text_element`](Visitor::visit_text_element), so visitors that treat all of them
/// alike implement that single method.
pub trait Visitor<C> {
    type Output;

    fn visit_prompt_element(&mut self, node: &PromptElement, context: C) -> Self::Output;
    fn visit_role_element(&mut self, node: &RoleElement, context: C) -> Self::Output;
    fn visit_execution_element(&mut self, node: &ExecutionElement, context: C) -> Self::Output;
    fn visit_thought_element(&mut self, node: &ThoughtElement, context: C) -> Self::Output;
    fn visit_terminologies_element(
        &mut self,
        node: &TerminologiesElement,
        context: C,
    ) -> Self::Output;
    fn visit_terminology_element(&mut self, node: &TerminologyElement, context: C)
        -> Self::Output;
    fn visit_examples_element(&mut self, node: &ExamplesElement, context: C) -> Self::Output;
    fn visit_resource_element(&mut self, node: &ResourceElement, context: C) -> Self::Output;

    /// Fallback for every text-only element.
    fn visit_text_element(&mut self, node: &dyn TextElement, context: C) -> Self::Output;

    fn visit_process_element(&mut self, node: &ProcessElement, context: C) -> Self::Output {
        self.visit_text_element(node, context)
    }
    fn visit_guideline_element(&mut self, node: &GuidelineElement, context: C) -> Self::Output {
        self.visit_text_element(node, context)
    }
    fn visit_rule_element(&mut self, node: &RuleElement, context: C) -> Self::Output {
        self.visit_text_element(node, context)
    }
    fn visit_constraint_element(&mut self, node: &ConstraintElement, context: C) -> Self::Output {
        self.visit_text_element(node, context)
    }
    fn visit_criteria_element(&mut self, node: &CriteriaElement, context: C) -> Self::Output {
        self.visit_text_element(node, context)
    }
    fn visit_location_element(&mut self, node: &LocationElement, context: C) -> Self::Output {
        self.visit_text_element(node, context)
    }
    fn visit_params_element(&mut self, node: &ParamsElement, context: C) -> Self::Output {
        self.visit_text_element(node, context)
    }
    fn visit_registry_element(&mut self, node: &RegistryElement, context: C) -> Self::Output {
        self.visit_text_element(node, context)
    }
    fn visit_exploration_element(
        &mut self,
        node: &ExplorationElement,
        context: C,
    ) -> Self::Output {
        self.visit_text_element(node, context)
    }
    fn visit_reasoning_element(&mut self, node: &ReasoningElement, context: C) -> Self::Output {
        self.visit_text_element(node, context)
    }
    fn visit_plan_element(&mut self, node: &PlanElement, context: C) -> Self::Output {
        self.visit_text_element(node, context)
    }
    fn visit_challenge_element(&mut self, node: &ChallengeElement, context: C) -> Self::Output {
        self.visit_text_element(node, context)
    }
    fn visit_personality_element(
        &mut self,
        node: &PersonalityElement,
        context: C,
    ) -> Self::Output {
        self.visit_text_element(node, context)
    }
    fn visit_principle_element(&mut self, node: &PrincipleElement, context: C) -> Self::Output {
        self.visit_text_element(node, context)
    }
    fn visit_knowledge_element(&mut self, node: &KnowledgeElement, context: C) -> Self::Output {
        self.visit_text_element(node, context)
    }
    fn visit_zh_element(&mut self, node: &ZhElement, context: C) -> Self::Output {
        self.visit_text_element(node, context)
    }
    fn visit_en_element(&mut self, node: &EnElement, context: C) -> Self::Output {
        self.visit_text_element(node, context)
    }
    fn visit_definition_element(&mut self, node: &DefinitionElement, context: C) -> Self::Output {
        self.visit_text_element(node, context)
    }
    fn visit_example_element(&mut self, node: &ExampleElement, context: C) -> Self::Output {
        self.visit_text_element(node, context)
    }
}
