//! End-to-end tests driving full stylesheets through tokenizing, rule
//! parsing, and style-rule promotion.

use sable_css3::node::{
    ComponentValue, CssRule, DeclarationListItem, PseudoClass, Selector, StyleRule,
};
use sable_css3::parser_config::{Context, ParserConfig};
use sable_css3::walker::Walker;
use sable_css3::{parse, Css3, ParseResult};

fn style_rules(input: &str) -> Vec<StyleRule> {
    let (stylesheet, _) = parse(input);
    stylesheet
        .rules
        .into_iter()
        .filter_map(|rule| match rule {
            CssRule::Style(rule) => Some(rule),
            CssRule::At(_) => None,
        })
        .collect()
}

#[test]
fn parse_a_small_stylesheet() {
    let input = "
        /* Navbar */
        #header .nav {
            font-size: 1.1rem;
        }

        @media screen and (max-width: 200px) {
            .nav { display: none }
        }

        a::after { content: \"\\2192\" }
    ";

    let (stylesheet, errors) = parse(input);

    assert_eq!(stylesheet.rules.len(), 3);
    assert!(errors.is_empty());

    assert!(matches!(stylesheet.rules[0], CssRule::Style(_)));
    assert!(matches!(stylesheet.rules[1], CssRule::At(_)));
    assert!(matches!(stylesheet.rules[2], CssRule::Style(_)));
}

#[test]
fn selectors_render_canonically() {
    let rules = style_rules("#header .nav>a.active   span { color: red }");

    assert_eq!(rules.len(), 1);
    assert_eq!(
        rules[0].selectors[0].to_string(),
        "#header .nav > a.active span"
    );
}

#[test]
fn selector_list_is_comma_separated() {
    let rules = style_rules("h1, h2 , h3.small { margin: 0 }");

    assert_eq!(rules[0].selectors.len(), 3);
    assert_eq!(rules[0].selectors[2].to_string(), "h3.small");
}

#[test]
fn declarations_carry_importance_and_values() {
    let rules = style_rules("a { margin: 0 auto !important; color: #333 }");

    let declarations: Vec<_> = rules[0]
        .declarations
        .iter()
        .map(|item| match item {
            DeclarationListItem::Declaration(declaration) => declaration,
            DeclarationListItem::AtRule(_) => panic!("expected declarations only"),
        })
        .collect();

    assert_eq!(declarations.len(), 2);

    assert_eq!(declarations[0].name, "margin");
    assert!(declarations[0].important);
    // `0 auto` with the inner whitespace preserved, `!important` stripped
    assert_eq!(declarations[0].value.len(), 3);

    assert_eq!(declarations[1].name, "color");
    assert!(!declarations[1].important);
}

#[test]
fn functional_pseudo_classes_nest_selectors() {
    let rules = style_rules("li:not(.done, [hidden]) { opacity: 1 }");

    let compound = rules[0].selectors[0].as_compound();
    let Selector::PseudoClass(pseudo) = &compound.subclasses[0] else {
        panic!("expected a pseudo class");
    };
    let PseudoClass::Function(function) = &pseudo.value else {
        panic!("expected a functional pseudo class");
    };

    assert_eq!(function.name, "not");
    assert_eq!(function.arguments.len(), 2);
    assert!(matches!(function.arguments[1], Selector::Attribute(_)));
}

#[test]
fn unicode_ranges_inside_declarations() {
    let mut parser = Css3::new("@font-face { unicode-range: U+0025-00FF, U+4??; }");
    let stylesheet = parser.parse_stylesheet();

    // the at-rule keeps its block; the ranges live in the block's values
    assert_eq!(stylesheet.rules.len(), 1);

    let config = ParserConfig {
        context: Context::DeclarationList,
        ..Default::default()
    };
    let result = Css3::parse("unicode-range: U+0025-00FF, U+4??", config).unwrap();
    let ParseResult::DeclarationList(items) = result else {
        panic!("expected a declaration list");
    };

    let DeclarationListItem::Declaration(declaration) = &items[0] else {
        panic!("expected a declaration");
    };

    let ranges: Vec<_> = declaration
        .value
        .iter()
        .filter_map(|value| match value {
            ComponentValue::UnicodeRange(range) => Some((range.start, range.end)),
            _ => None,
        })
        .collect();
    assert_eq!(ranges, vec![(0x25, 0xFF), (0x400, 0x4FF)]);
}

#[test]
fn node_slices_reproduce_their_source_text() {
    let input = "a { x: 1 } @media print { b { y: 2 } }";
    let chars: Vec<char> = input.chars().collect();

    let mut parser = Css3::new(input);
    let stylesheet = parser.parse_stylesheet();

    let first = stylesheet.rules[0].location();
    let slice: String = chars[first.start..first.end].iter().collect();
    assert_eq!(slice, "a { x: 1 }");

    let second = stylesheet.rules[1].location();
    let slice: String = chars[second.start..second.end].iter().collect();
    assert_eq!(slice, "@media print { b { y: 2 } }");
}

#[test]
fn recoverable_errors_do_not_lose_later_rules() {
    let input = "a { color red } b { color: blue } 'oops";
    let (stylesheet, errors) = parse(input);

    // rule `a` survives with no declarations, rule `b` parses normally
    assert_eq!(stylesheet.rules.len(), 2);

    let CssRule::Style(broken) = &stylesheet.rules[0] else {
        panic!("expected a style rule");
    };
    assert!(broken.declarations.is_empty());

    let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
    assert!(messages.contains(&"unterminated string"));
    assert!(messages.contains(&"expected colon in declaration"));
}

#[test]
fn walker_snapshot_of_a_promoted_stylesheet() {
    let mut parser = Css3::new(".nav > li { display: none }");
    let stylesheet = parser.parse_css_stylesheet();

    let walker = Walker::new_css(&stylesheet);
    assert_eq!(
        walker.walk_to_string(),
        "[CssStylesheet (1)]\n  [StyleRule]\n    [SelectorList (1)]\n      [Selector] .nav > li\n    [Declaration] property: display important: false\n      [Ident] none\n"
    );
}

#[test]
fn crlf_input_parses_like_lf_input() {
    let unix = "a {\n  color: red;\n}\n";
    let windows = "a {\r\n  color: red;\r\n}\r\n";

    let (unix_sheet, _) = parse(unix);
    let (windows_sheet, _) = parse(windows);

    assert_eq!(unix_sheet, windows_sheet);
}
