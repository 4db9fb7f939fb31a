//! Parser behaviour on whole documents, element by element

use dpml_parser::ast::*;
use dpml_parser::{parse_prompt, parse_prompt_with, tokenize, ParseError, ParseOptions, Parser};
use dpml_parser::{Token, WhitespacePolicy};
use rstest::rstest;

fn single(prompt: &PromptElement) -> &Element {
    assert_eq!(prompt.children.len(), 1, "children: {:?}", prompt.children);
    prompt.children[0].as_element().expect("element child")
}

#[test]
fn test_tag_round_trip() {
    let tokens = tokenize("<rule>text</rule>").unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::OpenTag("rule".to_string()),
            Token::TagEnd,
            Token::Text("text".to_string()),
            Token::CloseTag("rule".to_string()),
        ]
    );
    let prompt = Parser::new(tokens).parse().unwrap();
    assert_eq!(single(&prompt), &Element::Rule(RuleElement::new("text")));
}

#[rstest]
#[case("process", "ProcessElement")]
#[case("guideline", "GuidelineElement")]
#[case("rule", "RuleElement")]
#[case("constraint", "ConstraintElement")]
#[case("criteria", "CriteriaElement")]
#[case("location", "LocationElement")]
#[case("params", "ParamsElement")]
#[case("registry", "RegistryElement")]
#[case("exploration", "ExplorationElement")]
#[case("reasoning", "ReasoningElement")]
#[case("plan", "PlanElement")]
#[case("challenge", "ChallengeElement")]
#[case("personality", "PersonalityElement")]
#[case("principle", "PrincipleElement")]
#[case("knowledge", "KnowledgeElement")]
fn test_simple_elements(#[case] tag: &str, #[case] node_type: &str) {
    let source = format!("<{tag} id=\"1\">text</{tag}>");
    let prompt = parse_prompt(&source).unwrap();
    let element = single(&prompt);

    assert_eq!(element.tag_name(), tag);
    assert_eq!(element.node_type(), node_type);
    let text = element.as_text_element().expect("simple element");
    assert_eq!(text.content(), "text");
    assert_eq!(text.attributes().get("id"), Some("1"));
}

#[test]
fn test_self_closing_tags_stay_in_content() {
    let prompt = parse_prompt("<process>Step 1<br/>Step 2</process>").unwrap();
    match single(&prompt) {
        Element::Process(process) => assert_eq!(process.content, "Step 1<br/>Step 2"),
        other => panic!("expected process, got {:?}", other),
    }
}

#[rstest]
#[case("ping @alice")]
#[case("write to ops@example.com")]
#[case("@@ twice")]
#[case("ends with @")]
fn test_bare_at_stays_in_content(#[case] content: &str) {
    let prompt = parse_prompt(&format!("<rule>{content}</rule>")).unwrap();
    assert_eq!(single(&prompt), &Element::Rule(RuleElement::new(content)));
}

#[test]
fn test_bare_at_in_prose_is_text() {
    let prompt = parse_prompt("cc @alice").unwrap();
    assert!(prompt.children.iter().all(|child| child.as_text().is_some()));
    let text: String = prompt.children.iter().filter_map(Child::as_text).collect();
    assert_eq!(text, "cc @alice");
}

#[rstest]
#[case("@proto:loc", ResourceModel::Auto)]
#[case("@?proto:loc", ResourceModel::Lazy)]
#[case("@!proto:loc", ResourceModel::Load)]
fn test_resource_reference_models(#[case] source: &str, #[case] model: ResourceModel) {
    let prompt = parse_prompt(source).unwrap();
    match single(&prompt) {
        Element::Resource(resource) => {
            assert_eq!(resource.protocol, "proto");
            assert_eq!(resource.location, "loc");
            assert_eq!(resource.model, model);
            assert!(resource.inline);
        }
        other => panic!("expected resource, got {:?}", other),
    }
}

#[test]
fn test_slash_prefixed_locations_keep_slashes() {
    let prompt = parse_prompt("see @!file://docs/a.md now").unwrap();
    assert_eq!(prompt.children.len(), 3);
    match &prompt.children[1] {
        Child::Element(Element::Resource(resource)) => {
            assert_eq!(resource.protocol, "file");
            assert_eq!(resource.location, "//docs/a.md");
        }
        other => panic!("expected resource, got {:?}", other),
    }
}

#[test]
fn test_unknown_element() {
    let err = parse_prompt("<unknown>x</unknown>").unwrap_err();
    let message = err.to_string();
    assert!(message.to_lowercase().contains("unknown"));
    assert!(message.contains("unknown"));
    assert!(matches!(err, ParseError::UnknownElement { .. }));
}

#[rstest]
#[case("<role></personality>")]
#[case("<execution><rule>r</rule></thought>")]
#[case("<rule>r</plan>")]
#[case("<terminologies><terminology></terminology>")]
fn test_mismatched_tags(#[case] source: &str) {
    assert!(matches!(
        parse_prompt(source),
        Err(ParseError::MismatchedClose { .. })
    ));
}

#[test]
fn test_role_children_in_order() {
    let prompt =
        parse_prompt("<role><personality>p</personality><principle>q</principle></role>").unwrap();
    let role = prompt.find_role().unwrap();
    assert_eq!(role.children.len(), 2);
    assert_eq!(
        role.children[0],
        Child::Element(Element::Personality(PersonalityElement::new("p")))
    );
    assert_eq!(
        role.children[1],
        Child::Element(Element::Principle(PrincipleElement::new("q")))
    );
}

const GLOSSARY: &str = "<terminologies><terminology><zh>提示词</zh><en>prompt</en><definition>Input given to a model</definition><examples><example>one</example><example>two</example></examples></terminology></terminologies>";

const GLOSSARY_INDENTED: &str = r#"<terminologies>
  <terminology>
    <zh>提示词</zh>
    <en>prompt</en>
    <definition>Input given to a model</definition>
    <examples>
      <example>one</example>
      <example>two</example>
    </examples>
  </terminology>
</terminologies>"#;

fn check_glossary(prompt: &PromptElement) {
    let terminologies = match single(prompt) {
        Element::Terminologies(terminologies) => terminologies,
        other => panic!("expected terminologies, got {:?}", other),
    };
    let terms: Vec<_> = terminologies.terminologies().collect();
    assert_eq!(terms.len(), 1);

    let term = terms[0];
    assert_eq!(term.children.len(), 4);
    assert_eq!(term.zh().map(|zh| zh.content.as_str()), Some("提示词"));
    assert_eq!(term.en().map(|en| en.content.as_str()), Some("prompt"));
    assert!(term.definition().is_some());

    let examples = term.examples().expect("examples");
    assert_eq!(examples.children.len(), 2);
    let texts: Vec<_> = examples.examples().map(|e| e.content.as_str()).collect();
    assert_eq!(texts, vec!["one", "two"]);
}

#[test]
fn test_glossary_compact() {
    check_glossary(&parse_prompt(GLOSSARY).unwrap());
}

#[test]
fn test_glossary_indented_with_blank_runs_dropped() {
    let options = ParseOptions::default().with_whitespace(WhitespacePolicy::DropBlank);
    check_glossary(&parse_prompt_with(GLOSSARY_INDENTED, options).unwrap());
}

#[test]
fn test_glossary_indented_keeps_text_in_terminology() {
    let prompt = parse_prompt(GLOSSARY_INDENTED).unwrap();
    let term = match single(&prompt) {
        Element::Terminologies(terminologies) => terminologies.terminologies().next().unwrap(),
        other => panic!("expected terminologies, got {:?}", other),
    };
    assert_eq!(term.elements().count(), 4);
    assert!(term.texts().all(|text| text.trim().is_empty()));
}

#[test]
fn test_whitespace_preserved_verbatim() {
    let source = "  lead\n\t<rule>  a  b  </rule>\n";
    let prompt = parse_prompt(source).unwrap();
    assert_eq!(prompt.children[0], Child::text("  lead\n\t"));
    assert_eq!(
        prompt.children[1],
        Child::Element(Element::Rule(RuleElement::new("  a  b  ")))
    );
    assert_eq!(prompt.children[2], Child::text("\n"));
}

#[test]
fn test_thought_with_references() {
    let prompt = parse_prompt(
        "<thought><exploration>look</exploration> then @?memory:recent <plan>go</plan></thought>",
    )
    .unwrap();
    let thought = match single(&prompt) {
        Element::Thought(thought) => thought,
        other => panic!("expected thought, got {:?}", other),
    };
    let kinds: Vec<_> = thought
        .children
        .iter()
        .map(|child| match child {
            Child::Element(element) => element.node_type(),
            Child::Text(_) => "Text",
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            "ExplorationElement",
            "Text",
            "ResourceElement",
            "Text",
            "PlanElement"
        ]
    );
}

#[test]
fn test_duplicate_attributes_kept() {
    let prompt = parse_prompt(r#"<rule tag="a" tag="b" strict>x</rule>"#).unwrap();
    let attributes = single(&prompt).attributes();
    assert_eq!(attributes.len(), 3);
    assert_eq!(attributes.get_all("tag").collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(attributes.get("strict"), Some("true"));
}

#[test]
fn test_tag_ends_at_first_angle_bracket() {
    let prompt = parse_prompt(r#"<rule note="a>b">x</rule>"#).unwrap();
    let rule = single(&prompt).as_text_element().expect("simple element");
    assert_eq!(rule.attributes().len(), 1);
    assert_eq!(rule.attributes().get("note"), Some(r#""a"#));
    assert_eq!(rule.content(), r#"b">x"#);
}

#[test]
fn test_fresh_parses_are_equal() {
    let first = parse_prompt(GLOSSARY).unwrap();
    let second = parse_prompt(GLOSSARY).unwrap();
    assert_eq!(first, second);
    assert_eq!(tokenize(GLOSSARY).unwrap(), tokenize(GLOSSARY).unwrap());
}
