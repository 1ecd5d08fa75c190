use crate::node::{
    AttrMatcherOp, AttrModifier, AttributeMatcher, AttributeSelector, BlockKind, ClassSelector,
    ComponentValue, IdSelector, NsPrefix, Selector, SimpleBlock, TypeSelector, WqName,
};
use crate::tokenizer::{HashKind, Token, TokenType};
use sable_shared::errors::{CssError, CssResult};
use sable_shared::location::Location;

/// Recursive-descent parser over a bounded component-value list, producing a
/// selector tree per CSS Selectors Level 4.
///
/// The cursor is transactional: `maybe` bookmarks the position, runs a
/// production, and restores the position when the production signals a
/// missing token. Only the integer cursor moves; component values are never
/// copied for backtracking.
pub(crate) struct SelectorParser<'values> {
    values: &'values [ComponentValue],
    position: usize,
}

impl<'values> SelectorParser<'values> {
    pub(crate) fn new(values: &'values [ComponentValue]) -> Self {
        Self {
            values,
            position: 0,
        }
    }

    pub(crate) fn lookahead(&self, offset: usize) -> Option<&'values ComponentValue> {
        self.values.get(self.position + offset)
    }

    pub(crate) fn advance(&mut self, n: usize) {
        self.position = (self.position + n).min(self.values.len());
    }

    pub(crate) fn eof(&self) -> bool {
        self.position >= self.values.len()
    }

    pub(crate) fn current_location(&self) -> Location {
        match self.lookahead(0) {
            Some(value) => value.location(),
            None => Location::at(self.values.last().map_or(0, |v| v.location().end)),
        }
    }

    pub(crate) fn location_at(&self, offset: usize) -> Location {
        self.lookahead(offset)
            .map_or_else(|| self.current_location(), ComponentValue::location)
    }

    pub(crate) fn skip_whitespace(&mut self) {
        while self
            .lookahead(0)
            .is_some_and(|v| v.is_whitespace() || v.is_comment())
        {
            self.advance(1);
        }
    }

    /// Bookmarked backtracking: run a production, restore the cursor when it
    /// signals a missing token.
    pub(crate) fn maybe<T>(&mut self, f: impl FnOnce(&mut Self) -> CssResult<T>) -> Option<T> {
        let bookmark = self.position;
        match f(self) {
            Ok(value) => Some(value),
            Err(_) => {
                self.position = bookmark;
                None
            }
        }
    }

    /// The missing-token signal that drives backtracking inside `maybe`
    pub(crate) fn missing(&self, expected: &str) -> CssError {
        CssError::with_location(&format!("expected {expected}"), self.current_location())
    }

    pub(crate) fn peek_token(&self, offset: usize) -> Option<&'values Token> {
        self.lookahead(offset).and_then(ComponentValue::as_token)
    }

    pub(crate) fn peek_delim(&self, offset: usize, delim: char) -> bool {
        self.peek_token(offset).is_some_and(|t| t.is_delim(delim))
    }

    pub(crate) fn peek_colon(&self, offset: usize) -> bool {
        self.peek_token(offset).is_some_and(Token::is_colon)
    }

    /// The ident or `*` at the given offset, for wq-name parsing
    fn name_or_star_at(&self, offset: usize, allow_star: bool) -> Option<(String, Location)> {
        let token = self.peek_token(offset)?;
        match &token.token_type {
            TokenType::Ident(value) => Some((value.clone(), token.location)),
            TokenType::Delim('*') if allow_star => Some(("*".to_string(), token.location)),
            _ => None,
        }
    }

    /// `<wq-name>`: an optional namespace prefix (`ns|`, `*|` or a bare `|`)
    /// directly followed by an ident, or `*` where the caller allows it.
    pub(crate) fn parse_wq_name(&mut self, allow_star: bool) -> CssResult<WqName> {
        log::trace!("parse_wq_name");

        // bare '|name'
        if self.peek_delim(0, '|') {
            let pipe = self.location_at(0);
            let Some((name, name_location)) = self.name_or_star_at(1, allow_star) else {
                return Err(self.missing("identifier after namespace separator"));
            };

            self.advance(2);
            return Ok(WqName {
                prefix: Some(NsPrefix {
                    value: None,
                    location: pipe,
                }),
                name,
                location: pipe.union(&name_location),
            });
        }

        if let Some((first, first_location)) = self.name_or_star_at(0, true) {
            // 'ns|name' or '*|name', with nothing in between
            if self.peek_delim(1, '|') {
                if let Some((name, name_location)) = self.name_or_star_at(2, allow_star) {
                    let pipe = self.location_at(1);
                    self.advance(3);
                    return Ok(WqName {
                        prefix: Some(NsPrefix {
                            value: Some(first),
                            location: first_location.union(&pipe),
                        }),
                        name,
                        location: first_location.union(&name_location),
                    });
                }
            }

            if first == "*" && !allow_star {
                return Err(self.missing("identifier"));
            }

            self.advance(1);
            return Ok(WqName {
                prefix: None,
                name: first,
                location: first_location,
            });
        }

        Err(self.missing("identifier"))
    }

    /// `<type-selector>`: a wq-name, where `*` is the universal selector
    pub(crate) fn parse_type_selector(&mut self) -> CssResult<TypeSelector> {
        log::trace!("parse_type_selector");

        let name = self.parse_wq_name(true)?;
        Ok(TypeSelector {
            location: name.location,
            name,
        })
    }

    /// `<subclass-selector>` = `<id>` | `<class>` | `<attribute>` | `<pseudo-class>`
    pub(crate) fn parse_subclass_selector(&mut self) -> CssResult<Selector> {
        let Some(value) = self.lookahead(0) else {
            return Err(self.missing("subclass selector"));
        };

        match value {
            ComponentValue::Token(token) => match &token.token_type {
                TokenType::Hash {
                    value: name,
                    kind: HashKind::Id,
                } => {
                    let selector = Selector::Id(IdSelector {
                        name: name.clone(),
                        location: token.location,
                    });
                    self.advance(1);
                    Ok(selector)
                }
                TokenType::Delim('.') => self.parse_class_selector(),
                TokenType::Colon => Ok(Selector::PseudoClass(self.parse_pseudo_class_selector()?)),
                _ => Err(self.missing("subclass selector")),
            },
            ComponentValue::Block(block) if block.kind == BlockKind::Bracket => {
                let selector = parse_attribute_block(block)?;
                self.advance(1);
                Ok(Selector::Attribute(selector))
            }
            _ => Err(self.missing("subclass selector")),
        }
    }

    /// `.class`: a dot directly followed by an ident
    pub(crate) fn parse_class_selector(&mut self) -> CssResult<Selector> {
        log::trace!("parse_class_selector");

        if !self.peek_delim(0, '.') {
            return Err(self.missing("class selector"));
        }
        let dot = self.location_at(0);

        let Some(token) = self.peek_token(1) else {
            return Err(self.missing("identifier after '.'"));
        };
        let TokenType::Ident(name) = &token.token_type else {
            return Err(self.missing("identifier after '.'"));
        };

        let selector = Selector::Class(ClassSelector {
            name: name.clone(),
            location: dot.union(&token.location),
        });
        self.advance(2);
        Ok(selector)
    }

    /// `<compound-selector>`: a type selector, subclass selectors and
    /// pseudo-element groups with no whitespace in between. A single piece
    /// collapses to the piece itself.
    pub(crate) fn parse_compound_selector(&mut self) -> CssResult<Selector> {
        log::trace!("parse_compound_selector");

        let type_selector = self.maybe(|p| p.parse_type_selector());

        let mut subclasses = Vec::new();
        while let Some(subclass) = self.maybe(|p| p.parse_subclass_selector()) {
            subclasses.push(subclass);
        }

        let mut pseudo_elements = Vec::new();
        while let Some(element) = self.maybe(|p| p.parse_pseudo_element_selector()) {
            let mut classes = Vec::new();
            while let Some(class) = self.maybe(|p| p.parse_pseudo_class_selector()) {
                classes.push(class);
            }
            pseudo_elements.push((element, classes));
        }

        let piece_count = usize::from(type_selector.is_some())
            + subclasses.len()
            + pseudo_elements
                .iter()
                .map(|(_, classes)| 1 + classes.len())
                .sum::<usize>();

        if piece_count == 0 {
            return Err(self.missing("selector"));
        }

        fn cover(location: &mut Option<Location>, piece: Location) {
            *location = Some(location.map_or(piece, |existing| existing.union(&piece)));
        }

        let mut location: Option<Location> = None;
        if let Some(type_selector) = &type_selector {
            cover(&mut location, type_selector.location);
        }
        for subclass in &subclasses {
            cover(&mut location, subclass.location());
        }
        for (element, classes) in &pseudo_elements {
            cover(&mut location, element.location);
            for class in classes {
                cover(&mut location, class.location);
            }
        }
        let location = location.unwrap_or_else(|| self.current_location());

        if piece_count == 1 {
            if let Some(type_selector) = type_selector {
                return Ok(Selector::Type(type_selector));
            }
            if let Some(subclass) = subclasses.into_iter().next() {
                return Ok(subclass);
            }
            return match pseudo_elements.into_iter().next() {
                Some((element, _)) => Ok(Selector::PseudoElement(element)),
                None => Err(self.missing("selector")),
            };
        }

        Ok(Selector::Compound(crate::node::CompoundSelector {
            type_selector,
            subclasses,
            pseudo_elements,
            location,
        }))
    }
}

/// `<attribute-selector>`: the contents of a `[...]` block:
/// `<wq-name> (<attr-matcher> (<string>|<ident>) <attr-modifier>?)?`
fn parse_attribute_block(block: &SimpleBlock) -> CssResult<AttributeSelector> {
    log::trace!("parse_attribute_block");

    let mut inner = SelectorParser::new(&block.value);

    inner.skip_whitespace();
    let name = inner.parse_wq_name(false)?;
    inner.skip_whitespace();

    if inner.eof() {
        return Ok(AttributeSelector {
            name,
            matcher: None,
            location: block.location,
        });
    }

    let op = parse_attr_matcher_op(&mut inner)?;
    inner.skip_whitespace();

    let (value, quoted) = match inner.peek_token(0).map(|t| &t.token_type) {
        Some(TokenType::QuotedString(value)) => (value.clone(), true),
        Some(TokenType::Ident(value)) => (value.clone(), false),
        _ => return Err(inner.missing("attribute value")),
    };
    inner.advance(1);
    inner.skip_whitespace();

    let mut modifier = None;
    if let Some(TokenType::Ident(flag)) = inner.peek_token(0).map(|t| &t.token_type) {
        modifier = match flag.to_ascii_lowercase().as_str() {
            "i" => Some(AttrModifier::CaseInsensitive),
            "s" => Some(AttrModifier::CaseSensitive),
            _ => return Err(inner.missing("attribute modifier")),
        };
        inner.advance(1);
        inner.skip_whitespace();
    }

    if !inner.eof() {
        return Err(inner.missing("end of attribute selector"));
    }

    Ok(AttributeSelector {
        name,
        matcher: Some(AttributeMatcher {
            op,
            value,
            quoted,
            modifier,
        }),
        location: block.location,
    })
}

/// `<attr-matcher>` = `[~|^$*]? '='`
fn parse_attr_matcher_op(inner: &mut SelectorParser) -> CssResult<AttrMatcherOp> {
    let Some(token) = inner.peek_token(0) else {
        return Err(inner.missing("attribute matcher"));
    };

    let op = match &token.token_type {
        TokenType::Delim('=') => {
            inner.advance(1);
            return Ok(AttrMatcherOp::Equal);
        }
        TokenType::Delim('~') => AttrMatcherOp::Includes,
        TokenType::Delim('|') => AttrMatcherOp::DashMatch,
        TokenType::Delim('^') => AttrMatcherOp::Prefix,
        TokenType::Delim('$') => AttrMatcherOp::Suffix,
        TokenType::Delim('*') => AttrMatcherOp::Substring,
        _ => return Err(inner.missing("attribute matcher")),
    };

    if !inner.peek_delim(1, '=') {
        return Err(inner.missing("'=' in attribute matcher"));
    }

    inner.advance(2);
    Ok(op)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Css3;

    fn parse_compound(input: &str) -> Selector {
        let mut parser = Css3::new(input);
        let values = parser.parse_component_values();
        let mut selector_parser = SelectorParser::new(&values);
        let selector = selector_parser
            .parse_compound_selector()
            .expect("compound selector");
        assert!(selector_parser.eof(), "unparsed input in {input}");
        selector
    }

    #[test]
    fn single_piece_collapses() {
        assert!(matches!(parse_compound("div"), Selector::Type(_)));
        assert!(matches!(parse_compound("*"), Selector::Type(_)));
        assert!(matches!(parse_compound(".foo"), Selector::Class(_)));
        assert!(matches!(parse_compound("#bar"), Selector::Id(_)));
        assert!(matches!(parse_compound("[href]"), Selector::Attribute(_)));
        assert!(matches!(parse_compound(":hover"), Selector::PseudoClass(_)));
        assert!(matches!(
            parse_compound("::before"),
            Selector::PseudoElement(_)
        ));
    }

    #[test]
    fn multiple_pieces_form_a_compound() {
        let selector = parse_compound("section.foo#bar:hover");
        let compound = selector.as_compound();

        assert!(compound.type_selector.is_some());
        assert_eq!(compound.subclasses.len(), 3);
        assert_eq!(selector.to_string(), "section.foo#bar:hover");
    }

    #[test]
    fn pseudo_element_group_keeps_its_classes() {
        let selector = parse_compound("a::selection:hover");
        let compound = selector.as_compound();

        assert_eq!(compound.pseudo_elements.len(), 1);
        let (element, classes) = &compound.pseudo_elements[0];
        assert!(matches!(
            &element.value.value,
            crate::node::PseudoClass::Ident(name) if name == "selection"
        ));
        assert_eq!(classes.len(), 1);
        assert_eq!(selector.to_string(), "a::selection:hover");
    }

    #[test]
    fn unrestricted_hash_is_not_an_id_selector() {
        let mut parser = Css3::new("#0abc");
        let values = parser.parse_component_values();
        let mut selector_parser = SelectorParser::new(&values);

        assert!(selector_parser.parse_compound_selector().is_err());
    }

    #[test]
    fn namespace_prefixes() {
        let selector = parse_compound("svg|circle");
        match &selector {
            Selector::Type(type_selector) => {
                let prefix = type_selector.name.prefix.as_ref().expect("prefix");
                assert_eq!(prefix.value.as_deref(), Some("svg"));
                assert_eq!(type_selector.name.name, "circle");
            }
            other => panic!("expected a type selector, got {other:?}"),
        }
        assert_eq!(selector.to_string(), "svg|circle");

        assert_eq!(parse_compound("*|a").to_string(), "*|a");
        assert_eq!(parse_compound("|b").to_string(), "|b");
    }

    #[test]
    fn attribute_selector_forms() {
        assert_eq!(parse_compound("[href]").to_string(), "[href]");
        assert_eq!(parse_compound("[href=x]").to_string(), "[href=x]");
        assert_eq!(
            parse_compound("[href ^= \"https\" ]").to_string(),
            "[href^=\"https\"]"
        );
        assert_eq!(
            parse_compound("[lang|=en i]").to_string(),
            "[lang|=en i]"
        );
        assert_eq!(parse_compound("[a $= b s]").to_string(), "[a$=b s]");
        assert_eq!(parse_compound("[a *= b]").to_string(), "[a*=b]");
        assert_eq!(parse_compound("[a ~= b]").to_string(), "[a~=b]");
    }

    #[test]
    fn malformed_attribute_selector_is_rejected() {
        for input in ["[]", "[a=]", "[a=b c]", "[=b]"] {
            let mut parser = Css3::new(input);
            let values = parser.parse_component_values();
            let mut selector_parser = SelectorParser::new(&values);
            assert!(
                selector_parser.parse_compound_selector().is_err(),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn backtracking_restores_the_cursor() {
        let mut parser = Css3::new(".foo");
        let values = parser.parse_component_values();
        let mut selector_parser = SelectorParser::new(&values);

        // a type selector does not match, and must not eat input
        assert!(selector_parser.maybe(|p| p.parse_type_selector()).is_none());
        assert_eq!(selector_parser.position, 0);

        assert!(selector_parser
            .maybe(|p| p.parse_subclass_selector())
            .is_some());
    }
}
