//! Element attributes
//!
//! Attributes keep insertion order and duplicates. `<rule a="1" a="2">` has two attributes
//! named `a`; lookups by name return the first one.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single `name="value"` pair. Bare attributes have the value `"true"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=\"{}\"", self.name, self.value)
    }
}

/// Ordered attribute list of an element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(Vec<Attribute>);

impl Attributes {
    pub const EMPTY: Attributes = Attributes(Vec::new());

    pub fn new() -> Self {
        Attributes(Vec::new())
    }

    pub fn push(&mut self, attribute: Attribute) {
        self.0.push(attribute);
    }

    /// Value of the first attribute with this name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Values of every attribute with this name, in source order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|attr| attr.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Attribute> for Attributes {
    fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self {
        Attributes(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Renders as it appears inside a tag, with a leading space per attribute.
impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for attr in &self.0 {
            write!(f, " {}", attr)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_are_preserved() {
        let attrs: Attributes = [Attribute::new("a", "1"), Attribute::new("a", "2")]
            .into_iter()
            .collect();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get("a"), Some("1"));
        assert_eq!(attrs.get_all("a").collect::<Vec<_>>(), vec!["1", "2"]);
        assert!(attrs.get("b").is_none());
    }

    #[test]
    fn test_display() {
        let mut attrs = Attributes::new();
        attrs.push(Attribute::new("protocol", "file"));
        attrs.push(Attribute::new("lazy", "true"));
        assert_eq!(attrs.to_string(), r#" protocol="file" lazy="true""#);
    }
}
