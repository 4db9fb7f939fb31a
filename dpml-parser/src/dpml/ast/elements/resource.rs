//! Resource references
//!
//!     A resource is written either inline, as `@protocol:location`, or as a block element
//!     whose children describe it:
//!
//!         @?file://notes.md
//!
//!         <resource protocol="file">
//!             <location>notes.md</location>
//!         </resource>
//!
//!     The optional prefix of an inline reference picks the loading model: `?` is lazy, `!` is
//!     load, no prefix is auto. Block resources always use the auto model and take their
//!     protocol from the `protocol` attribute.

use super::super::attributes::Attributes;
use super::super::traits::{Ast, Visitor};
use super::element::{Child, Element};
use super::simple::{LocationElement, ParamsElement, RegistryElement};
use serde::{Deserialize, Serialize};
use std::fmt;

/// When a referenced resource is loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceModel {
    #[default]
    Auto,
    Lazy,
    Load,
}

impl ResourceModel {
    pub fn from_prefix(prefix: Option<char>) -> Self {
        match prefix {
            Some('?') => ResourceModel::Lazy,
            Some('!') => ResourceModel::Load,
            _ => ResourceModel::Auto,
        }
    }

    /// The marker written between `@` and the protocol.
    pub fn prefix(self) -> &'static str {
        match self {
            ResourceModel::Auto => "",
            ResourceModel::Lazy => "?",
            ResourceModel::Load => "!",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceModel::Auto => "auto",
            ResourceModel::Lazy => "lazy",
            ResourceModel::Load => "load",
        }
    }
}

impl fmt::Display for ResourceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An inline reference or a block `<resource>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceElement {
    pub protocol: String,
    pub location: String,
    pub model: ResourceModel,
    pub inline: bool,
    pub attributes: Attributes,
    /// Block form only: location, params and registry parts, and text.
    pub contents: Vec<Child>,
}

impl ResourceElement {
    pub const TAG: &'static str = "resource";
    pub const ALLOWED: &'static [&'static str] = &["location", "params", "registry"];

    pub fn inline(
        protocol: impl Into<String>,
        location: impl Into<String>,
        model: ResourceModel,
    ) -> Self {
        ResourceElement {
            protocol: protocol.into(),
            location: location.into(),
            model,
            inline: true,
            ..Default::default()
        }
    }

    pub fn block(attributes: Attributes, contents: Vec<Child>) -> Self {
        ResourceElement {
            protocol: attributes.get("protocol").unwrap_or_default().to_string(),
            attributes,
            contents,
            ..Default::default()
        }
    }

    /// The inline `@[prefix]protocol:location` form of this resource.
    pub fn to_reference(&self) -> String {
        format!("@{}{}:{}", self.model.prefix(), self.protocol, self.location)
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.contents.iter().filter_map(Child::as_element)
    }

    pub fn location_part(&self) -> Option<&LocationElement> {
        self.elements().find_map(|element| match element {
            Element::Location(location) => Some(location),
            _ => None,
        })
    }

    pub fn params_part(&self) -> Option<&ParamsElement> {
        self.elements().find_map(|element| match element {
            Element::Params(params) => Some(params),
            _ => None,
        })
    }

    pub fn registry_part(&self) -> Option<&RegistryElement> {
        self.elements().find_map(|element| match element {
            Element::Registry(registry) => Some(registry),
            _ => None,
        })
    }
}

impl Ast for ResourceElement {
    fn node_type(&self) -> &'static str {
        "ResourceElement"
    }

    fn visit<C, V>(&self, visitor: &mut V, context: C) -> V::Output
    where
        V: Visitor<C> + ?Sized,
    {
        visitor.visit_resource_element(self, context)
    }
}

impl fmt::Display for ResourceElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inline {
            f.write_str(&self.to_reference())
        } else {
            write!(
                f,
                "ResourceElement(protocol={}, {} parts)",
                self.protocol,
                self.contents.len()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dpml::ast::Attribute;

    #[test]
    fn test_model_prefixes() {
        assert_eq!(ResourceModel::from_prefix(Some('?')), ResourceModel::Lazy);
        assert_eq!(ResourceModel::from_prefix(Some('!')), ResourceModel::Load);
        assert_eq!(ResourceModel::from_prefix(None), ResourceModel::Auto);
        assert_eq!(ResourceModel::Lazy.to_string(), "lazy");
    }

    #[test]
    fn test_inline_reference_text() {
        let lazy = ResourceElement::inline("file", "//notes.md", ResourceModel::Lazy);
        assert!(lazy.inline);
        assert_eq!(lazy.to_reference(), "@?file://notes.md");
        assert_eq!(lazy.to_string(), "@?file://notes.md");
    }

    #[test]
    fn test_block_takes_protocol_attribute() {
        let attrs: Attributes = [Attribute::new("protocol", "http")].into_iter().collect();
        let block = ResourceElement::block(
            attrs,
            vec![Child::Element(Element::Location(LocationElement::new(
                "example.org",
            )))],
        );
        assert!(!block.inline);
        assert_eq!(block.protocol, "http");
        assert_eq!(block.model, ResourceModel::Auto);
        assert_eq!(
            block.location_part().map(|l| l.content.as_str()),
            Some("example.org")
        );
        assert!(block.params_part().is_none());
    }
}
