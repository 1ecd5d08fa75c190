use crate::node::{ComplexSelector, ComponentValue, RelativeSelector, Selector};
use crate::parser::selector::SelectorParser;
use crate::tokenizer::TokenType;
use sable_shared::errors::{CssError, CssResult};

/// Parses a bounded component-value list as a comma-separated selector list.
/// This is the selectors entry point used for qualified-rule preludes.
pub(crate) fn selectors(values: &[ComponentValue]) -> CssResult<Vec<Selector>> {
    let mut parser = SelectorParser::new(values);
    parser.parse_selector_list()
}

impl SelectorParser<'_> {
    /// `<selector-list>` = `<complex-selector>` (`,` `<complex-selector>`)*
    pub(crate) fn parse_selector_list(&mut self) -> CssResult<Vec<Selector>> {
        log::trace!("parse_selector_list");

        let mut selectors = Vec::new();

        loop {
            self.skip_whitespace();
            selectors.push(self.parse_complex_selector()?);
            self.skip_whitespace();

            match self.lookahead(0) {
                None => break,
                Some(value)
                    if matches!(
                        value.as_token().map(|t| &t.token_type),
                        Some(TokenType::Comma)
                    ) =>
                {
                    self.advance(1);
                }
                Some(value) => {
                    return Err(CssError::with_location(
                        "unexpected token in selector list",
                        value.location(),
                    ));
                }
            }
        }

        Ok(selectors)
    }

    /// The selector list form used in functional pseudo-class arguments,
    /// where a selector may lead with an explicit combinator (`:has(> a)`).
    pub(crate) fn parse_relative_selector_list(&mut self) -> CssResult<Vec<Selector>> {
        log::trace!("parse_relative_selector_list");

        let mut selectors = Vec::new();

        loop {
            self.skip_whitespace();
            selectors.push(self.parse_relative_selector()?);
            self.skip_whitespace();

            match self.lookahead(0) {
                None => break,
                Some(value)
                    if matches!(
                        value.as_token().map(|t| &t.token_type),
                        Some(TokenType::Comma)
                    ) =>
                {
                    self.advance(1);
                }
                Some(value) => {
                    return Err(CssError::with_location(
                        "unexpected token in selector list",
                        value.location(),
                    ));
                }
            }
        }

        Ok(selectors)
    }

    /// `<relative-selector>` = `<combinator>?` `<complex-selector>`
    ///
    /// Without a leading combinator this is just the complex selector.
    pub(crate) fn parse_relative_selector(&mut self) -> CssResult<Selector> {
        log::trace!("parse_relative_selector");

        let combinator = self.maybe(|p| p.parse_explicit_combinator());
        self.skip_whitespace();

        let selector = self.parse_complex_selector()?;

        match combinator {
            Some(combinator) => {
                let location = combinator.location.union(&selector.location());
                Ok(Selector::Relative(RelativeSelector {
                    combinator: Some(combinator),
                    selector: Box::new(selector),
                    location,
                }))
            }
            None => Ok(selector),
        }
    }

    /// `<complex-selector>` = `<compound-selector>` (`<combinator>?`
    /// `<compound-selector>`)*
    ///
    /// Children alternate compound selectors and combinators; a single
    /// compound collapses to itself.
    pub(crate) fn parse_complex_selector(&mut self) -> CssResult<Selector> {
        log::trace!("parse_complex_selector");

        let first = self.parse_compound_selector()?;
        let mut children = vec![first];

        loop {
            let pair = self.maybe(|p| {
                let combinator = p.parse_combinator()?;
                let compound = p.parse_compound_selector()?;
                Ok::<_, CssError>((combinator, compound))
            });

            let Some((combinator, compound)) = pair else {
                break;
            };

            children.push(Selector::Combinator(combinator));
            children.push(compound);
        }

        if children.len() == 1 {
            if let Some(only) = children.pop() {
                return Ok(only);
            }
        }

        let location = children
            .iter()
            .skip(1)
            .fold(children[0].location(), |acc, child| {
                acc.union(&child.location())
            });

        Ok(Selector::Complex(ComplexSelector { children, location }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::CombinatorKind;
    use crate::Css3;

    fn parse_selectors(input: &str) -> CssResult<Vec<Selector>> {
        let mut parser = Css3::new(input);
        let values = parser.parse_component_values();
        selectors(&values)
    }

    #[test]
    fn comma_separated_list() {
        let list = parse_selectors("a, .b , #c").unwrap();

        assert_eq!(list.len(), 3);
        assert!(matches!(list[0], Selector::Type(_)));
        assert!(matches!(list[1], Selector::Class(_)));
        assert!(matches!(list[2], Selector::Id(_)));
    }

    #[test]
    fn all_five_combinators() {
        let list = parse_selectors("a > b + c ~ d || e f").unwrap();
        assert_eq!(list.len(), 1);

        let complex = list[0].as_complex();
        assert_eq!(complex.children.len(), 11);

        let kinds: Vec<CombinatorKind> = complex
            .children
            .iter()
            .skip(1)
            .step_by(2)
            .map(|c| c.as_combinator().kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                CombinatorKind::Child,
                CombinatorKind::NextSibling,
                CombinatorKind::SubsequentSibling,
                CombinatorKind::Column,
                CombinatorKind::Descendant,
            ]
        );

        for child in complex.children.iter().step_by(2) {
            assert!(child.is_type_selector());
        }
    }

    #[test]
    fn selector_round_trip_canonicalizes_whitespace() {
        let list = parse_selectors(".outer section.foo>table.bar   tr").unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(
            list[0].to_string(),
            ".outer section.foo > table.bar tr"
        );
    }

    #[test]
    fn complex_selector_location_covers_children() {
        let input = "a > b";
        let list = parse_selectors(input).unwrap();

        let complex = list[0].as_complex();
        assert_eq!(complex.location.start, 0);
        assert_eq!(complex.location.end, input.len());
        for child in &complex.children {
            assert!(complex.location.covers(&child.location()));
        }
    }

    #[test]
    fn trailing_garbage_is_an_error() {
        assert!(parse_selectors("a 5%").is_err());
        assert!(parse_selectors("a }").is_err());
    }

    #[test]
    fn empty_selector_list_is_an_error() {
        assert!(parse_selectors("").is_err());
        assert!(parse_selectors("   ").is_err());
        assert!(parse_selectors("a, ").is_err());
    }

    #[test]
    fn backtracked_branch_leaves_no_error_behind() {
        // `a b` first tries `a` `b` as one compound chain with combinators;
        // the speculative explicit-combinator branch fails and backtracks,
        // and the descendant form succeeds without reporting anything.
        let list = parse_selectors("a b").unwrap();
        assert_eq!(list.len(), 1);
        assert!(matches!(list[0], Selector::Complex(_)));
    }
}
