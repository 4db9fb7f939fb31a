//! Treeviz formatter for prompts
//!
//! Treeviz shows the tree one node per line, with box-drawing connectors for nesting and an
//! icon per node type. Labels are truncated (30 characters by default) and line breaks inside
//! labels are shown as `↵`.
//!
//! Example:
//!
//!     ⧉ prompt
//!     ├─ ◦ Intro↵
//!     └─ 👤 role
//!       ├─ ☺ Patient and precise
//!       └─ ⚖ Explain before acting
//!
//! Icons
//!     Prompt: ⧉
//!     Role: 👤, Personality: ☺, Principle: ⚖, Knowledge: 📚
//!     Execution: ⚙, Process: ➔, Guideline: ☞, Rule: §, Constraint: ⛔, Criteria: ✓
//!     Thought: 💭, Exploration: ?, Reasoning: ∴, Plan: ☰, Challenge: ⚡
//!     Terminologies: 📖, Terminology: ≔, Zh/En: ⊤, Definition: ≡, Examples: ⋯, Example: •
//!     Resource: @, Location/Params/Registry: ⌖
//!     Text: ◦

use super::registry::{FormatError, Formatter};
use crate::dpml::ast::{snapshot_from_prompt, AstSnapshot, PromptElement};

fn truncate(s: &str, max_chars: usize) -> String {
    let flat = s.replace('\n', "↵");
    if flat.chars().count() > max_chars {
        let mut truncated = flat.chars().take(max_chars).collect::<String>();
        truncated.push('…');
        truncated
    } else {
        flat
    }
}

fn get_icon(node_type: &str) -> &'static str {
    match node_type {
        "PromptElement" => "⧉",
        "RoleElement" => "👤",
        "PersonalityElement" => "☺",
        "PrincipleElement" => "⚖",
        "KnowledgeElement" => "📚",
        "ExecutionElement" => "⚙",
        "ProcessElement" => "➔",
        "GuidelineElement" => "☞",
        "RuleElement" => "§",
        "ConstraintElement" => "⛔",
        "CriteriaElement" => "✓",
        "ThoughtElement" => "💭",
        "ExplorationElement" => "?",
        "ReasoningElement" => "∴",
        "PlanElement" => "☰",
        "ChallengeElement" => "⚡",
        "TerminologiesElement" => "📖",
        "TerminologyElement" => "≔",
        "ZhElement" | "EnElement" => "⊤",
        "DefinitionElement" => "≡",
        "ExamplesElement" => "⋯",
        "ExampleElement" => "•",
        "ResourceElement" => "@",
        "LocationElement" | "ParamsElement" | "RegistryElement" => "⌖",
        "Text" => "◦",
        _ => "○",
    }
}

/// Treeviz rendering options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreevizOptions {
    /// Labels longer than this many characters are cut.
    pub label_width: usize,
    /// Include raw text runs as `◦` lines.
    pub show_text: bool,
}

impl Default for TreevizOptions {
    fn default() -> Self {
        TreevizOptions {
            label_width: 30,
            show_text: true,
        }
    }
}

fn format_snapshot(
    snapshot: &AstSnapshot,
    prefix: &str,
    is_last: bool,
    options: &TreevizOptions,
    output: &mut String,
) {
    let connector = if is_last { "└─" } else { "├─" };
    output.push_str(&format!(
        "{}{} {} {}\n",
        prefix,
        connector,
        get_icon(&snapshot.node_type),
        truncate(&snapshot.label, options.label_width)
    ));

    let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    format_children(&snapshot.children, &child_prefix, options, output);
}

fn format_children(
    children: &[AstSnapshot],
    prefix: &str,
    options: &TreevizOptions,
    output: &mut String,
) {
    let visible: Vec<&AstSnapshot> = children
        .iter()
        .filter(|child| options.show_text || !child.is_text())
        .collect();
    for (i, child) in visible.iter().enumerate() {
        format_snapshot(child, prefix, i == visible.len() - 1, options, output);
    }
}

pub fn to_treeviz_str(prompt: &PromptElement) -> String {
    to_treeviz_str_with_options(prompt, &TreevizOptions::default())
}

pub fn to_treeviz_str_with_options(prompt: &PromptElement, options: &TreevizOptions) -> String {
    let snapshot = snapshot_from_prompt(prompt);
    let mut output = format!(
        "{} {}\n",
        get_icon(&snapshot.node_type),
        truncate(&snapshot.label, options.label_width)
    );
    format_children(&snapshot.children, "", options, &mut output);
    output
}

/// Formatter implementation for treeviz format
#[derive(Debug, Clone, Default)]
pub struct TreevizFormatter {
    pub options: TreevizOptions,
}

impl TreevizFormatter {
    pub fn new(options: TreevizOptions) -> Self {
        TreevizFormatter { options }
    }
}

impl Formatter for TreevizFormatter {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn serialize(&self, prompt: &PromptElement) -> Result<String, FormatError> {
        Ok(to_treeviz_str_with_options(prompt, &self.options))
    }

    fn description(&self) -> &str {
        "Visual tree representation with box-drawing connectors and Unicode icons"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dpml::parsing::parse_prompt;

    const SOURCE: &str = "Intro\n<role><personality>Patient and precise</personality><principle>Explain before acting, always and without exception</principle></role>";

    #[test]
    fn test_treeviz_layout() {
        let prompt = parse_prompt(SOURCE).unwrap();
        let output = to_treeviz_str(&prompt);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines,
            vec![
                "⧉ prompt",
                "├─ ◦ Intro↵",
                "└─ 👤 role",
                "  ├─ ☺ Patient and precise",
                "  └─ ⚖ Explain before acting, always …",
            ]
        );
    }

    #[test]
    fn test_treeviz_hides_text() {
        let prompt = parse_prompt(SOURCE).unwrap();
        let options = TreevizOptions {
            label_width: 8,
            show_text: false,
        };
        let output = TreevizFormatter::new(options).serialize(&prompt).unwrap();
        assert!(!output.contains("Intro"));
        assert!(output.contains("└─ 👤 role"));
        assert!(output.contains("☺ Patient …"));
    }
}
