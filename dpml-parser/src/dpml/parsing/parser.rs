//! Recursive-descent parser
//!
//!     The parser walks the token sequence with a single token of lookahead and never
//!     backtracks. Each tag name selects one of three strategies:
//!
//!         - Structural elements (role, execution, thought, terminologies, terminology,
//!           resource) read their children against their own allow-list and consume their own
//!           close tag.
//!         - Simple elements read everything up to their close tag as one text run. Nested
//!           self-closing tags are written back as literal markup, nested open tags are an
//!           error.
//!         - Anything else is an unknown element.
//!
//!     Inside a terminology, tags outside its allow-list are not an error: they are kept as
//!     literal text children, which lets glossary entries carry ad hoc markup.
//!
//!     The first violation aborts the parse. See [ParseError](super::ParseError).

use super::error::ParseError;
use crate::dpml::ast::*;
use crate::dpml::token::Token;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

/// `@[!?]protocol:location`, the same grammar the tokenizer matches.
static RESOURCE_REF_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@([!?]?)([A-Za-z][A-Za-z0-9_\-]*):([^\s<>@]+)$").unwrap());

/// Tags a terminology parses as typed children.
const GLOSSARY_PARTS: &[&str] = &["zh", "en", "definition", "examples"];

/// A parsed tag header: `<name attr...>` or `<name attr.../>`.
struct OpenTag {
    name: String,
    attributes: Attributes,
    self_closing: bool,
    span: Range<usize>,
}

impl OpenTag {
    /// The tag as literal markup, for text contexts.
    fn to_markup(&self) -> String {
        let end = if self.self_closing { "/>" } else { ">" };
        format!("<{}{}{}", self.name, self.attributes, end)
    }
}

/// Single-use parser over one token sequence.
pub struct Parser {
    tokens: Vec<(Token, Range<usize>)>,
    pos: usize,
}

impl Parser {
    /// Parser over bare tokens. Errors carry empty spans.
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens: tokens.into_iter().map(|token| (token, 0..0)).collect(),
            pos: 0,
        }
    }

    /// Parser over tokens paired with source byte ranges, as produced by
    /// [`tokenize_with_spans`](crate::dpml::lexing::tokenize_with_spans).
    pub fn with_spans(tokens: Vec<(Token, Range<usize>)>) -> Self {
        Parser { tokens, pos: 0 }
    }

    /// Parse the whole sequence into a prompt.
    pub fn parse(mut self) -> Result<PromptElement, ParseError> {
        let mut children = Vec::new();
        while let Some(token) = self.current() {
            match token {
                Token::OpenTag(_) => children.push(Child::Element(self.parse_element()?)),
                Token::Text(text) => {
                    children.push(Child::Text(text.clone()));
                    self.advance();
                }
                Token::ResourceRef(_) => {
                    children.push(Child::Element(Element::Resource(self.parse_resource_ref()?)))
                }
                _ => return Err(self.unexpected("an element, text or a resource reference")),
            }
        }
        tracing::debug!(children = children.len(), "parsed prompt");
        Ok(PromptElement::new(children))
    }

    // ------------------------------------------------------------------
    // Cursor
    // ------------------------------------------------------------------

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(token, _)| token)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    /// Span of the lookahead, or an empty span at the end of the input.
    fn span(&self) -> Range<usize> {
        match self.tokens.get(self.pos) {
            Some((_, span)) => span.clone(),
            None => {
                let end = self.tokens.last().map_or(0, |(_, span)| span.end);
                end..end
            }
        }
    }

    fn found(&self) -> String {
        self.current()
            .map_or_else(|| "end of input".to_string(), Token::describe)
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found: self.found(),
            span: self.span(),
        }
    }

    fn mismatched(&self, expected: &str) -> ParseError {
        ParseError::MismatchedClose {
            expected: expected.to_string(),
            found: self.found(),
            span: self.span(),
        }
    }

    /// Consume `</name>`.
    fn expect_close(&mut self, name: &str) -> Result<(), ParseError> {
        match self.current() {
            Some(Token::CloseTag(close)) if close == name => {
                self.advance();
                Ok(())
            }
            _ => Err(self.mismatched(name)),
        }
    }

    // ------------------------------------------------------------------
    // Tags
    // ------------------------------------------------------------------

    /// Consume an opening tag, its attributes and its terminator.
    fn parse_open_tag(&mut self) -> Result<OpenTag, ParseError> {
        let span = self.span();
        let name = match self.current() {
            Some(Token::OpenTag(name)) => name.clone(),
            _ => return Err(self.unexpected("an opening tag")),
        };
        self.advance();

        let mut attributes = Attributes::new();
        while let Some(Token::Attribute { name, value }) = self.current() {
            attributes.push(Attribute::new(name.clone(), value.clone()));
            self.advance();
        }

        let self_closing = match self.current() {
            Some(Token::TagEnd) => false,
            Some(Token::SelfCloseTagEnd) => true,
            _ => return Err(self.unexpected(&format!("'>' or '/>' ending <{}>", name))),
        };
        self.advance();

        Ok(OpenTag {
            name,
            attributes,
            self_closing,
            span,
        })
    }

    /// An opening tag that starts an element body, so it may not self-close.
    fn parse_start_tag(&mut self) -> Result<OpenTag, ParseError> {
        let tag = self.parse_open_tag()?;
        if tag.self_closing {
            return Err(ParseError::UnexpectedToken {
                expected: format!("'>' ending <{}>", tag.name),
                found: "'/>'".to_string(),
                span: tag.span,
            });
        }
        Ok(tag)
    }

    /// Parse one element starting at its opening tag.
    fn parse_element(&mut self) -> Result<Element, ParseError> {
        let tag = self.parse_start_tag()?;
        tracing::trace!(tag = %tag.name, attributes = tag.attributes.len(), "parsing element");

        let OpenTag {
            name,
            attributes,
            span,
            ..
        } = tag;

        let element = match name.as_str() {
            // Structural elements
            "role" => Element::Role(self.parse_role(attributes)?),
            "execution" => {
                let children = self.parse_mixed_content(ExecutionElement::ALLOWED)?;
                self.expect_close(&name)?;
                Element::Execution(ExecutionElement::new(children).with_attributes(attributes))
            }
            "thought" => {
                let children = self.parse_mixed_content(ThoughtElement::ALLOWED)?;
                self.expect_close(&name)?;
                Element::Thought(ThoughtElement::new(children).with_attributes(attributes))
            }
            "terminologies" => Element::Terminologies(self.parse_terminologies(attributes)?),
            "terminology" => Element::Terminology(self.parse_terminology(attributes)?),
            "resource" => {
                let contents = self.parse_mixed_content(ResourceElement::ALLOWED)?;
                self.expect_close(&name)?;
                Element::Resource(ResourceElement::block(attributes, contents))
            }

            // Simple elements
            "process" => Element::Process(ProcessElement {
                attributes,
                content: self.parse_text_content(&name)?,
            }),
            "guideline" => Element::Guideline(GuidelineElement {
                attributes,
                content: self.parse_text_content(&name)?,
            }),
            "rule" => Element::Rule(RuleElement {
                attributes,
                content: self.parse_text_content(&name)?,
            }),
            "constraint" => Element::Constraint(ConstraintElement {
                attributes,
                content: self.parse_text_content(&name)?,
            }),
            "criteria" => Element::Criteria(CriteriaElement {
                attributes,
                content: self.parse_text_content(&name)?,
            }),
            "location" => Element::Location(LocationElement {
                attributes,
                content: self.parse_text_content(&name)?,
            }),
            "params" => Element::Params(ParamsElement {
                attributes,
                content: self.parse_text_content(&name)?,
            }),
            "registry" => Element::Registry(RegistryElement {
                attributes,
                content: self.parse_text_content(&name)?,
            }),
            "exploration" => Element::Exploration(ExplorationElement {
                attributes,
                content: self.parse_text_content(&name)?,
            }),
            "reasoning" => Element::Reasoning(ReasoningElement {
                attributes,
                content: self.parse_text_content(&name)?,
            }),
            "plan" => Element::Plan(PlanElement {
                attributes,
                content: self.parse_text_content(&name)?,
            }),
            "challenge" => Element::Challenge(ChallengeElement {
                attributes,
                content: self.parse_text_content(&name)?,
            }),
            "personality" => Element::Personality(PersonalityElement {
                attributes,
                content: self.parse_text_content(&name)?,
            }),
            "principle" => Element::Principle(PrincipleElement {
                attributes,
                content: self.parse_text_content(&name)?,
            }),
            "knowledge" => Element::Knowledge(KnowledgeElement {
                attributes,
                content: self.parse_text_content(&name)?,
            }),

            _ => {
                tracing::debug!(tag = %name, "unknown element");
                return Err(ParseError::UnknownElement { name, span });
            }
        };
        Ok(element)
    }

    // ------------------------------------------------------------------
    // Content strategies
    // ------------------------------------------------------------------

    /// Read a simple element's body up to and including `</name>`.
    fn parse_text_content(&mut self, name: &str) -> Result<String, ParseError> {
        let mut content = String::new();
        loop {
            match self.current() {
                Some(Token::Text(text)) | Some(Token::ResourceRef(text)) => {
                    content.push_str(text);
                    self.advance();
                }
                Some(Token::OpenTag(_)) => {
                    let tag = self.parse_open_tag()?;
                    if !tag.self_closing {
                        return Err(ParseError::IllegalNestedMarkup {
                            parent: name.to_string(),
                            tag: tag.name,
                            span: tag.span,
                        });
                    }
                    content.push_str(&tag.to_markup());
                }
                Some(Token::CloseTag(close)) if close == name => {
                    self.advance();
                    return Ok(content);
                }
                _ => return Err(self.mismatched(name)),
            }
        }
    }

    /// Children of execution, thought and block resources: allowed elements, inline
    /// references and text. Stops at the first token that is none of those.
    fn parse_mixed_content(&mut self, allowed: &[&str]) -> Result<Vec<Child>, ParseError> {
        let mut children = Vec::new();
        loop {
            match self.current() {
                Some(Token::OpenTag(name)) if allowed.contains(&name.as_str()) => {
                    children.push(Child::Element(self.parse_element()?));
                }
                Some(Token::ResourceRef(_)) => {
                    children.push(Child::Element(Element::Resource(self.parse_resource_ref()?)));
                }
                Some(Token::Text(text)) => {
                    children.push(Child::Text(text.clone()));
                    self.advance();
                }
                _ => return Ok(children),
            }
        }
    }

    fn parse_role(&mut self, attributes: Attributes) -> Result<RoleElement, ParseError> {
        let mut children = Vec::new();
        loop {
            match self.current() {
                Some(Token::OpenTag(name)) if RoleElement::ALLOWED.contains(&name.as_str()) => {
                    children.push(Child::Element(self.parse_element()?));
                }
                Some(Token::ResourceRef(_)) => {
                    children.push(Child::Element(Element::Resource(self.parse_resource_ref()?)));
                }
                Some(Token::Text(text)) if text.trim().is_empty() => self.advance(),
                Some(Token::Text(text)) => {
                    return Err(ParseError::UnexpectedText {
                        parent: RoleElement::TAG.to_string(),
                        text: text.clone(),
                        span: self.span(),
                    });
                }
                Some(Token::OpenTag(_)) => {
                    return Err(self.unexpected("one of <personality>, <principle>, <knowledge>"))
                }
                _ => break,
            }
        }
        self.expect_close(RoleElement::TAG)?;
        Ok(RoleElement::new(children).with_attributes(attributes))
    }

    fn parse_terminologies(
        &mut self,
        attributes: Attributes,
    ) -> Result<TerminologiesElement, ParseError> {
        let mut children = Vec::new();
        loop {
            match self.current() {
                Some(Token::OpenTag(name)) if name == TerminologyElement::TAG => {
                    children.push(Child::Element(self.parse_element()?));
                }
                Some(Token::Text(text)) if text.trim().is_empty() => self.advance(),
                _ => break,
            }
        }
        self.expect_close(TerminologiesElement::TAG)?;
        Ok(TerminologiesElement::new(children).with_attributes(attributes))
    }

    fn parse_terminology(
        &mut self,
        attributes: Attributes,
    ) -> Result<TerminologyElement, ParseError> {
        let mut children = Vec::new();
        loop {
            match self.current() {
                Some(Token::CloseTag(name)) if name == TerminologyElement::TAG => {
                    self.advance();
                    break;
                }
                Some(Token::OpenTag(name)) if GLOSSARY_PARTS.contains(&name.as_str()) => {
                    children.push(Child::Element(self.parse_glossary_part()?));
                }
                Some(Token::OpenTag(_)) => {
                    let tag = self.parse_open_tag()?;
                    tracing::trace!(tag = %tag.name, "keeping tag inside terminology as text");
                    children.push(Child::Text(tag.to_markup()));
                }
                Some(Token::CloseTag(name)) => {
                    children.push(Child::Text(format!("</{}>", name)));
                    self.advance();
                }
                Some(Token::Text(text)) | Some(Token::ResourceRef(text)) => {
                    children.push(Child::Text(text.clone()));
                    self.advance();
                }
                _ => return Err(self.mismatched(TerminologyElement::TAG)),
            }
        }
        Ok(TerminologyElement::new(children).with_attributes(attributes))
    }

    /// `zh`, `en`, `definition` or `examples` inside a terminology.
    fn parse_glossary_part(&mut self) -> Result<Element, ParseError> {
        let OpenTag {
            name, attributes, ..
        } = self.parse_start_tag()?;
        let element = match name.as_str() {
            "zh" => Element::Zh(ZhElement {
                attributes,
                content: self.parse_text_content(&name)?,
            }),
            "en" => Element::En(EnElement {
                attributes,
                content: self.parse_text_content(&name)?,
            }),
            "definition" => Element::Definition(DefinitionElement {
                attributes,
                content: self.parse_text_content(&name)?,
            }),
            _ => Element::Examples(self.parse_examples(attributes)?),
        };
        Ok(element)
    }

    fn parse_examples(&mut self, attributes: Attributes) -> Result<ExamplesElement, ParseError> {
        let mut children = Vec::new();
        loop {
            match self.current() {
                Some(Token::CloseTag(name)) if name == ExamplesElement::TAG => {
                    self.advance();
                    break;
                }
                Some(Token::OpenTag(name)) if name == ExampleElement::TAG => {
                    let tag = self.parse_start_tag()?;
                    let content = self.parse_text_content(ExampleElement::TAG)?;
                    children.push(Child::Element(Element::Example(ExampleElement {
                        attributes: tag.attributes,
                        content,
                    })));
                }
                Some(Token::Text(_)) => self.advance(),
                _ => return Err(self.unexpected("<example> or </examples>")),
            }
        }
        Ok(ExamplesElement::new(children).with_attributes(attributes))
    }

    /// Decompose the `@[!?]protocol:location` reference under the cursor.
    fn parse_resource_ref(&mut self) -> Result<ResourceElement, ParseError> {
        let resource = match self.current() {
            Some(Token::ResourceRef(reference)) => parse_reference(reference),
            _ => None,
        };
        match resource {
            Some(resource) => {
                self.advance();
                Ok(resource)
            }
            None => Err(self.unexpected("a resource reference @[!?]protocol:location")),
        }
    }
}

/// Split `@[!?]protocol:location` into an inline resource.
pub fn parse_reference(reference: &str) -> Option<ResourceElement> {
    let captures = RESOURCE_REF_REGEX.captures(reference)?;
    let model = ResourceModel::from_prefix(captures[1].chars().next());
    Some(ResourceElement::inline(&captures[2], &captures[3], model))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dpml::lexing::tokenize;

    fn parse(source: &str) -> Result<PromptElement, ParseError> {
        Parser::new(tokenize(source)?).parse()
    }

    fn only_element(prompt: &PromptElement) -> &Element {
        assert_eq!(prompt.children.len(), 1, "{:?}", prompt.children);
        prompt.children[0].as_element().unwrap()
    }

    #[test]
    fn test_simple_element() {
        let prompt = parse("<rule>Be brief</rule>").unwrap();
        match only_element(&prompt) {
            Element::Rule(rule) => assert_eq!(rule.content, "Be brief"),
            other => panic!("expected rule, got {:?}", other),
        }
    }

    #[test]
    fn test_self_closing_markup_is_kept_verbatim() {
        let prompt = parse(r#"<process>a<br/>b<img src="x.png"/></process>"#).unwrap();
        match only_element(&prompt) {
            Element::Process(process) => {
                assert_eq!(process.content, r#"a<br/>b<img src="x.png"/>"#)
            }
            other => panic!("expected process, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_open_tag_in_simple_element() {
        let err = parse("<rule>a <b>bold</b></rule>").unwrap_err();
        assert!(matches!(
            err,
            ParseError::IllegalNestedMarkup { ref parent, ref tag, .. } if parent == "rule" && tag == "b"
        ));
        assert!(err.to_string().contains("non-self-closing tags are not allowed"));
    }

    #[test]
    fn test_references_inside_simple_content_stay_text() {
        let prompt = parse("<knowledge>see @file://a.md</knowledge>").unwrap();
        match only_element(&prompt) {
            Element::Knowledge(knowledge) => assert_eq!(knowledge.content, "see @file://a.md"),
            other => panic!("expected knowledge, got {:?}", other),
        }
    }

    #[test]
    fn test_execution_mixed_content() {
        let prompt =
            parse("<execution>intro<rule>r</rule>@!thought:plan<process>p</process></execution>")
                .unwrap();
        let execution = match only_element(&prompt) {
            Element::Execution(execution) => execution,
            other => panic!("expected execution, got {:?}", other),
        };
        assert_eq!(execution.children.len(), 4);
        assert_eq!(execution.children[0], Child::text("intro"));
        assert!(matches!(
            execution.children[2],
            Child::Element(Element::Resource(ref r)) if r.model == ResourceModel::Load
        ));
        assert_eq!(execution.rules().count(), 1);
    }

    #[test]
    fn test_disallowed_child_is_reported_as_missing_close() {
        let err = parse("<thought><rule>r</rule></thought>").unwrap_err();
        assert!(matches!(
            err,
            ParseError::MismatchedClose { ref expected, .. } if expected == "thought"
        ));
    }

    #[test]
    fn test_role_rejects_prose() {
        let err = parse("<role>hello<personality>p</personality></role>").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedText { ref text, .. } if text == "hello"));
    }

    #[test]
    fn test_role_skips_blank_text() {
        let prompt = parse("<role>\n  <personality>p</personality>\n</role>").unwrap();
        let role = prompt.find_role().unwrap();
        assert_eq!(role.children.len(), 1);
        assert_eq!(role.personality().map(|p| p.content.as_str()), Some("p"));
    }

    #[test]
    fn test_terminology_fallback_keeps_unknown_tags_as_text() {
        let prompt = parse(
            "<terminology><zh>词</zh><note kind=\"x\">n</note><br/></terminology>",
        )
        .unwrap();
        let term = match only_element(&prompt) {
            Element::Terminology(term) => term,
            other => panic!("expected terminology, got {:?}", other),
        };
        assert_eq!(
            term.children,
            vec![
                Child::Element(Element::Zh(ZhElement::new("词"))),
                Child::text("<note kind=\"x\">"),
                Child::text("n"),
                Child::text("</note>"),
                Child::text("<br/>"),
            ]
        );
    }

    #[test]
    fn test_examples_reject_other_tags() {
        let err = parse(
            "<terminology><examples><example>a</example><rule>r</rule></examples></terminology>",
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn test_glossary_parts_outside_terminology_are_unknown() {
        let err = parse("<zh>词</zh>").unwrap_err();
        assert!(matches!(err, ParseError::UnknownElement { ref name, .. } if name == "zh"));
    }

    #[test]
    fn test_block_resource() {
        let prompt = parse(
            r#"<resource protocol="http"><location>example.org</location><params>q=1</params></resource>"#,
        )
        .unwrap();
        let resource = match only_element(&prompt) {
            Element::Resource(resource) => resource,
            other => panic!("expected resource, got {:?}", other),
        };
        assert!(!resource.inline);
        assert_eq!(resource.protocol, "http");
        assert_eq!(resource.contents.len(), 2);
        assert_eq!(
            resource.params_part().map(|p| p.content.as_str()),
            Some("q=1")
        );
    }

    #[test]
    fn test_self_closing_element_is_rejected() {
        let err = parse("<role/>").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { ref found, .. } if found == "'/>'"));
    }

    #[test]
    fn test_stray_close_tag_at_top_level() {
        let err = parse("text</role>").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn test_missing_close_at_end_of_input() {
        let err = parse("<rule>never closed").unwrap_err();
        assert!(matches!(
            err,
            ParseError::MismatchedClose { ref found, .. } if found == "end of input"
        ));
    }

    #[test]
    fn test_malformed_reference_token() {
        let err = Parser::new(vec![Token::ResourceRef("@nocolon".to_string())])
            .parse()
            .unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn test_spanned_errors_point_into_source() {
        use crate::dpml::lexing::tokenize_with_spans;

        let source = "<role>\n</personality>";
        let err = Parser::with_spans(tokenize_with_spans(source).unwrap())
            .parse()
            .unwrap_err();
        assert_eq!(err.span(), 7..21);
    }
}
