//! Concrete DPML node types
//!
//!     Elements fall in four groups:
//!
//!         - Simple elements hold one opaque text run. See [simple].
//!         - Containers hold an ordered list of children restricted to an allow-list. See
//!           [containers].
//!         - Resources are inline `@protocol:location` references or block `<resource>`
//!           elements. See [resource].
//!         - The prompt is the root of every parsed document. See [prompt].
//!
//!     [Element] is the sum of every non-root node type and [Child] is the entry type of
//!     container children. See [element].

pub mod containers;
pub mod element;
pub mod prompt;
pub mod resource;
pub mod simple;

pub use containers::{
    ExamplesElement, ExecutionElement, RoleElement, TerminologiesElement, TerminologyElement,
    ThoughtElement,
};
pub use element::{Child, Element};
pub use prompt::PromptElement;
pub use resource::{ResourceElement, ResourceModel};
pub use simple::{
    ChallengeElement, ConstraintElement, CriteriaElement, DefinitionElement, EnElement,
    ExampleElement, ExplorationElement, GuidelineElement, KnowledgeElement, LocationElement,
    ParamsElement, PersonalityElement, PlanElement, PrincipleElement, ProcessElement,
    ReasoningElement, RegistryElement, RuleElement, ZhElement,
};
