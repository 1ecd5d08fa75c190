use crate::tokenizer::Token;
use core::fmt::{Display, Formatter};
use sable_shared::location::Location;

/// The delimiter pair of a simple block. The opening and closing characters
/// are a bijective mapping: `()`, `[]`, `{}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Paren,
    Bracket,
    Curly,
}

impl BlockKind {
    pub fn open(&self) -> char {
        match self {
            BlockKind::Paren => '(',
            BlockKind::Bracket => '[',
            BlockKind::Curly => '{',
        }
    }

    pub fn close(&self) -> char {
        match self {
            BlockKind::Paren => ')',
            BlockKind::Bracket => ']',
            BlockKind::Curly => '}',
        }
    }
}

/// A balanced pair of delimiters enclosing component values. The location
/// covers both delimiters.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleBlock {
    pub kind: BlockKind,
    pub value: Vec<ComponentValue>,
    pub location: Location,
}

/// A function call: an ident directly followed by `(`, its arguments and the
/// closing `)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub value: Vec<ComponentValue>,
    pub location: Location,
}

/// The `u+…` microsyntax denoting an inclusive range of Unicode code points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnicodeRange {
    pub start: u32,
    pub end: u32,
    pub location: Location,
}

/// The smallest syntactic unit below a declaration: a preserved token, a
/// simple block, a function call, or a unicode range.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentValue {
    Token(Token),
    Block(SimpleBlock),
    Function(Function),
    UnicodeRange(UnicodeRange),
}

impl ComponentValue {
    pub fn location(&self) -> Location {
        match self {
            ComponentValue::Token(token) => token.location,
            ComponentValue::Block(block) => block.location,
            ComponentValue::Function(function) => function.location,
            ComponentValue::UnicodeRange(range) => range.location,
        }
    }

    /// Returns the preserved token, if this component value is one
    pub fn as_token(&self) -> Option<&Token> {
        match self {
            ComponentValue::Token(token) => Some(token),
            _ => None,
        }
    }

    pub fn is_whitespace(&self) -> bool {
        self.as_token().is_some_and(Token::is_whitespace)
    }

    pub fn is_comment(&self) -> bool {
        self.as_token().is_some_and(Token::is_comment)
    }

    pub fn is_delim(&self, delim: char) -> bool {
        self.as_token().is_some_and(|t| t.is_delim(delim))
    }

    pub fn is_semicolon(&self) -> bool {
        self.as_token().is_some_and(Token::is_semicolon)
    }

    #[must_use]
    pub fn is_block(&self) -> bool {
        matches!(self, ComponentValue::Block(_))
    }

    #[must_use]
    pub fn as_block(&self) -> &SimpleBlock {
        match self {
            ComponentValue::Block(block) => block,
            _ => panic!("Component value is not a block"),
        }
    }
}

/// A property declaration: `name: value`, optionally flagged `!important`.
/// The `!important` trailer is not part of the value.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub value: Vec<ComponentValue>,
    pub important: bool,
    pub location: Location,
}

/// A rule introduced by an `@`-prefixed identifier; terminated by a `;` or by
/// a block.
#[derive(Debug, Clone, PartialEq)]
pub struct AtRule {
    pub name: String,
    pub prelude: Vec<ComponentValue>,
    pub block: Option<SimpleBlock>,
    pub location: Location,
}

/// A prelude followed by a `{}` block. Promoted to a [`StyleRule`] when its
/// prelude parses as a selector list.
#[derive(Debug, Clone, PartialEq)]
pub struct QualifiedRule {
    pub prelude: Vec<ComponentValue>,
    pub block: SimpleBlock,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    At(AtRule),
    Qualified(QualifiedRule),
}

impl Rule {
    pub fn location(&self) -> Location {
        match self {
            Rule::At(at_rule) => at_rule.location,
            Rule::Qualified(rule) => rule.location,
        }
    }
}

/// The untouched rule list of a source file
#[derive(Debug, Clone, PartialEq)]
pub struct Stylesheet {
    pub rules: Vec<Rule>,
    pub location: Location,
}

/// An entry of a declaration list: declarations interleaved with at-rules
#[derive(Debug, Clone, PartialEq)]
pub enum DeclarationListItem {
    Declaration(Declaration),
    AtRule(AtRule),
}

impl DeclarationListItem {
    pub fn location(&self) -> Location {
        match self {
            DeclarationListItem::Declaration(declaration) => declaration.location,
            DeclarationListItem::AtRule(at_rule) => at_rule.location,
        }
    }
}

/// A qualified rule with its prelude parsed as a selector list and its block
/// parsed as style block contents. Nested `&`-prefixed rules follow the
/// declarations, they are not interleaved by position.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    pub selectors: Vec<Selector>,
    pub declarations: Vec<DeclarationListItem>,
    pub rules: Vec<QualifiedRule>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CssRule {
    Style(StyleRule),
    At(AtRule),
}

impl CssRule {
    pub fn location(&self) -> Location {
        match self {
            CssRule::Style(rule) => rule.location,
            CssRule::At(at_rule) => at_rule.location,
        }
    }
}

/// The rule list with qualified rules promoted to style rules
#[derive(Debug, Clone, PartialEq)]
pub struct CssStylesheet {
    pub rules: Vec<CssRule>,
    pub location: Location,
}

/// A namespace prefix: `ident|`, `*|` or a bare `|`. The value holds the
/// ident, `"*"` for the universal namespace, or nothing for the bare form.
#[derive(Debug, Clone, PartialEq)]
pub struct NsPrefix {
    pub value: Option<String>,
    pub location: Location,
}

/// A qualified name: an optional namespace prefix and a name
#[derive(Debug, Clone, PartialEq)]
pub struct WqName {
    pub prefix: Option<NsPrefix>,
    pub name: String,
    pub location: Location,
}

/// A type (element) selector; the universal selector is a type selector whose
/// name is `*`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSelector {
    pub name: WqName,
    pub location: Location,
}

/// `#id`, from an id-flagged hash token
#[derive(Debug, Clone, PartialEq)]
pub struct IdSelector {
    pub name: String,
    pub location: Location,
}

/// `.class`
#[derive(Debug, Clone, PartialEq)]
pub struct ClassSelector {
    pub name: String,
    pub location: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrMatcherOp {
    /// `=`
    Equal,
    /// `~=`
    Includes,
    /// `|=`
    DashMatch,
    /// `^=`
    Prefix,
    /// `$=`
    Suffix,
    /// `*=`
    Substring,
}

impl AttrMatcherOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttrMatcherOp::Equal => "=",
            AttrMatcherOp::Includes => "~=",
            AttrMatcherOp::DashMatch => "|=",
            AttrMatcherOp::Prefix => "^=",
            AttrMatcherOp::Suffix => "$=",
            AttrMatcherOp::Substring => "*=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrModifier {
    /// `i`
    CaseInsensitive,
    /// `s`
    CaseSensitive,
}

impl AttrModifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttrModifier::CaseInsensitive => "i",
            AttrModifier::CaseSensitive => "s",
        }
    }
}

/// The `op value modifier?` part of an attribute selector
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeMatcher {
    pub op: AttrMatcherOp,
    pub value: String,
    /// True when the value was written as a string rather than an ident
    pub quoted: bool,
    pub modifier: Option<AttrModifier>,
}

/// `[name]` or `[name op value modifier?]`
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSelector {
    pub name: WqName,
    pub matcher: Option<AttributeMatcher>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PseudoClass {
    Ident(String),
    Function(PseudoClassFunction),
}

/// `:name` or `:name(...)`
#[derive(Debug, Clone, PartialEq)]
pub struct PseudoClassSelector {
    pub value: PseudoClass,
    pub location: Location,
}

/// A functional pseudo-class; its arguments are re-parsed as selectors
#[derive(Debug, Clone, PartialEq)]
pub struct PseudoClassFunction {
    pub name: String,
    pub arguments: Vec<Selector>,
    pub location: Location,
}

/// `::name` and friends: a pseudo-class selector behind a second colon
#[derive(Debug, Clone, PartialEq)]
pub struct PseudoElementSelector {
    pub value: PseudoClassSelector,
    pub location: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombinatorKind {
    /// Whitespace between two compound selectors
    Descendant,
    /// `>`
    Child,
    /// `+`
    NextSibling,
    /// `~`
    SubsequentSibling,
    /// `||`
    Column,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Combinator {
    pub kind: CombinatorKind,
    pub location: Location,
}

/// A pseudo-element and the pseudo-classes that bind to it
pub type PseudoElementGroup = (PseudoElementSelector, Vec<PseudoClassSelector>);

/// One type selector plus subclass selectors plus pseudo-element groups, with
/// no whitespace in between. A compound selector always holds at least two
/// concrete pieces; a single piece is represented as that piece itself.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundSelector {
    pub type_selector: Option<TypeSelector>,
    pub subclasses: Vec<Selector>,
    pub pseudo_elements: Vec<PseudoElementGroup>,
    pub location: Location,
}

/// Compound selectors joined by combinators. Children alternate between
/// selectors (even indices) and combinators (odd indices); a complex selector
/// always holds at least one combinator.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexSelector {
    pub children: Vec<Selector>,
    pub location: Location,
}

/// A complex selector with an optional leading combinator, as used in
/// functional pseudo-class arguments such as `:has(> a)`.
#[derive(Debug, Clone, PartialEq)]
pub struct RelativeSelector {
    pub combinator: Option<Combinator>,
    pub selector: Box<Selector>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    Type(TypeSelector),
    Id(IdSelector),
    Class(ClassSelector),
    Attribute(AttributeSelector),
    PseudoClass(PseudoClassSelector),
    PseudoElement(PseudoElementSelector),
    Compound(CompoundSelector),
    Complex(ComplexSelector),
    Relative(RelativeSelector),
    /// Only occurs between the children of a complex selector
    Combinator(Combinator),
}

impl Selector {
    pub fn location(&self) -> Location {
        match self {
            Selector::Type(s) => s.location,
            Selector::Id(s) => s.location,
            Selector::Class(s) => s.location,
            Selector::Attribute(s) => s.location,
            Selector::PseudoClass(s) => s.location,
            Selector::PseudoElement(s) => s.location,
            Selector::Compound(s) => s.location,
            Selector::Complex(s) => s.location,
            Selector::Relative(s) => s.location,
            Selector::Combinator(s) => s.location,
        }
    }

    #[must_use]
    pub fn is_combinator(&self) -> bool {
        matches!(self, Selector::Combinator(_))
    }

    #[must_use]
    pub fn is_type_selector(&self) -> bool {
        matches!(self, Selector::Type(_))
    }

    #[must_use]
    pub fn as_type_selector(&self) -> &TypeSelector {
        match self {
            Selector::Type(s) => s,
            _ => panic!("Selector is not a type selector"),
        }
    }

    #[must_use]
    pub fn as_combinator(&self) -> &Combinator {
        match self {
            Selector::Combinator(c) => c,
            _ => panic!("Selector is not a combinator"),
        }
    }

    #[must_use]
    pub fn as_compound(&self) -> &CompoundSelector {
        match self {
            Selector::Compound(s) => s,
            _ => panic!("Selector is not a compound selector"),
        }
    }

    #[must_use]
    pub fn as_complex(&self) -> &ComplexSelector {
        match self {
            Selector::Complex(s) => s,
            _ => panic!("Selector is not a complex selector"),
        }
    }
}

impl Display for SimpleBlock {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind.open())?;
        for value in &self.value {
            write!(f, "{value}")?;
        }
        write!(f, "{}", self.kind.close())
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.name)?;
        for value in &self.value {
            write!(f, "{value}")?;
        }
        write!(f, ")")
    }
}

impl Display for UnicodeRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.start == self.end {
            write!(f, "U+{:X}", self.start)
        } else {
            write!(f, "U+{:X}-{:X}", self.start, self.end)
        }
    }
}

impl Display for ComponentValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ComponentValue::Token(token) => write!(f, "{token}"),
            ComponentValue::Block(block) => write!(f, "{block}"),
            ComponentValue::Function(function) => write!(f, "{function}"),
            ComponentValue::UnicodeRange(range) => write!(f, "{range}"),
        }
    }
}

impl Display for NsPrefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{value}|"),
            None => write!(f, "|"),
        }
    }
}

impl Display for WqName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{prefix}{}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

impl Display for Combinator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self.kind {
            CombinatorKind::Descendant => " ",
            CombinatorKind::Child => ">",
            CombinatorKind::NextSibling => "+",
            CombinatorKind::SubsequentSibling => "~",
            CombinatorKind::Column => "||",
        };
        write!(f, "{s}")
    }
}

impl Display for PseudoClassSelector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            PseudoClass::Ident(name) => write!(f, ":{name}"),
            PseudoClass::Function(function) => {
                write!(f, ":{}(", function.name)?;
                let mut first = true;
                for argument in &function.arguments {
                    if !first {
                        write!(f, ", ")?;
                    }
                    write!(f, "{argument}")?;
                    first = false;
                }
                write!(f, ")")
            }
        }
    }
}

impl Display for Selector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::Type(s) => write!(f, "{}", s.name),
            Selector::Id(s) => write!(f, "#{}", s.name),
            Selector::Class(s) => write!(f, ".{}", s.name),
            Selector::Attribute(s) => {
                write!(f, "[{}", s.name)?;
                if let Some(matcher) = &s.matcher {
                    write!(f, "{}", matcher.op.as_str())?;
                    if matcher.quoted {
                        write!(f, "\"{}\"", matcher.value)?;
                    } else {
                        write!(f, "{}", matcher.value)?;
                    }
                    if let Some(modifier) = &matcher.modifier {
                        write!(f, " {}", modifier.as_str())?;
                    }
                }
                write!(f, "]")
            }
            Selector::PseudoClass(s) => write!(f, "{s}"),
            Selector::PseudoElement(s) => write!(f, ":{}", s.value),
            Selector::Compound(s) => {
                if let Some(type_selector) = &s.type_selector {
                    write!(f, "{}", type_selector.name)?;
                }
                for subclass in &s.subclasses {
                    write!(f, "{subclass}")?;
                }
                for (element, classes) in &s.pseudo_elements {
                    write!(f, ":{}", element.value)?;
                    for class in classes {
                        write!(f, "{class}")?;
                    }
                }
                Ok(())
            }
            Selector::Complex(s) => {
                for child in &s.children {
                    match child {
                        Selector::Combinator(combinator) => {
                            if combinator.kind == CombinatorKind::Descendant {
                                write!(f, " ")?;
                            } else {
                                write!(f, " {combinator} ")?;
                            }
                        }
                        _ => write!(f, "{child}")?,
                    }
                }
                Ok(())
            }
            Selector::Relative(s) => {
                if let Some(combinator) = &s.combinator {
                    write!(f, "{combinator} ")?;
                }
                write!(f, "{}", s.selector)
            }
            Selector::Combinator(combinator) => write!(f, "{combinator}"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tokenizer::TokenType;

    fn loc() -> Location {
        Location::default()
    }

    fn type_selector(name: &str) -> Selector {
        Selector::Type(TypeSelector {
            name: WqName {
                prefix: None,
                name: name.to_string(),
                location: loc(),
            },
            location: loc(),
        })
    }

    #[test]
    fn display_simple_selectors() {
        assert_eq!(type_selector("table").to_string(), "table");
        assert_eq!(type_selector("*").to_string(), "*");

        let class = Selector::Class(ClassSelector {
            name: "foo".to_string(),
            location: loc(),
        });
        assert_eq!(class.to_string(), ".foo");

        let id = Selector::Id(IdSelector {
            name: "bar".to_string(),
            location: loc(),
        });
        assert_eq!(id.to_string(), "#bar");
    }

    #[test]
    fn display_attribute_selector() {
        let selector = Selector::Attribute(AttributeSelector {
            name: WqName {
                prefix: None,
                name: "href".to_string(),
                location: loc(),
            },
            matcher: Some(AttributeMatcher {
                op: AttrMatcherOp::Prefix,
                value: "https".to_string(),
                quoted: true,
                modifier: Some(AttrModifier::CaseInsensitive),
            }),
            location: loc(),
        });

        assert_eq!(selector.to_string(), "[href^=\"https\" i]");
    }

    #[test]
    fn display_complex_selector_canonicalizes_whitespace() {
        let combinator = |kind| {
            Selector::Combinator(Combinator {
                kind,
                location: loc(),
            })
        };

        let complex = Selector::Complex(ComplexSelector {
            children: vec![
                type_selector("a"),
                combinator(CombinatorKind::Child),
                type_selector("b"),
                combinator(CombinatorKind::Descendant),
                type_selector("c"),
                combinator(CombinatorKind::Column),
                type_selector("d"),
            ],
            location: loc(),
        });

        assert_eq!(complex.to_string(), "a > b c || d");
    }

    #[test]
    fn display_unicode_range() {
        let single = UnicodeRange {
            start: 0x26,
            end: 0x26,
            location: loc(),
        };
        assert_eq!(single.to_string(), "U+26");

        let range = UnicodeRange {
            start: 0x1F00,
            end: 0x2FFF,
            location: loc(),
        };
        assert_eq!(range.to_string(), "U+1F00-2FFF");
    }

    #[test]
    fn display_block_and_function() {
        let number = ComponentValue::Token(Token::new(
            TokenType::Number {
                value: 10.0,
                kind: crate::tokenizer::NumberKind::Integer,
            },
            loc(),
        ));

        let function = ComponentValue::Function(Function {
            name: "calc".to_string(),
            value: vec![number.clone()],
            location: loc(),
        });
        assert_eq!(function.to_string(), "calc(10)");

        let block = ComponentValue::Block(SimpleBlock {
            kind: BlockKind::Bracket,
            value: vec![number],
            location: loc(),
        });
        assert_eq!(block.to_string(), "[10]");
    }
}
