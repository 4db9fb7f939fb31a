//! JSON formatter
//!
//! Serializes the prompt tree with serde. Elements are tagged with a `"type"` field holding
//! the lowercase variant name, and children are `{"element": ...}` or `{"text": ...}`.

use super::registry::{FormatError, Formatter};
use crate::dpml::ast::PromptElement;

pub fn to_json_str(prompt: &PromptElement) -> Result<String, FormatError> {
    serde_json::to_string_pretty(prompt).map_err(|e| FormatError::SerializationError(e.to_string()))
}

/// Read back a prompt written by [to_json_str].
pub fn from_json_str(json: &str) -> Result<PromptElement, FormatError> {
    serde_json::from_str(json).map_err(|e| FormatError::SerializationError(e.to_string()))
}

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, prompt: &PromptElement) -> Result<String, FormatError> {
        to_json_str(prompt)
    }

    fn description(&self) -> &str {
        "The prompt tree as pretty-printed JSON"
    }

    fn readable(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<PromptElement, FormatError> {
        from_json_str(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dpml::parsing::parse_prompt;
    use serde_json::Value;

    #[test]
    fn test_json_shape() {
        let prompt = parse_prompt(r#"<rule level="hard">r</rule>@?file:a.md"#).unwrap();
        let value: Value = serde_json::from_str(&to_json_str(&prompt).unwrap()).unwrap();

        let rule = &value["children"][0]["element"];
        assert_eq!(rule["type"], "rule");
        assert_eq!(rule["content"], "r");
        assert_eq!(rule["attributes"][0]["name"], "level");

        let resource = &value["children"][1]["element"];
        assert_eq!(resource["type"], "resource");
        assert_eq!(resource["model"], "lazy");
        assert_eq!(resource["inline"], true);
    }

    #[test]
    fn test_json_reads_back() {
        let prompt = parse_prompt("<thought><plan>p</plan> text</thought>").unwrap();
        let json = to_json_str(&prompt).unwrap();
        assert_eq!(from_json_str(&json).unwrap(), prompt);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            from_json_str("{"),
            Err(FormatError::SerializationError(_))
        ));
    }
}
