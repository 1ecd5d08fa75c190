use crate::node::{
    ComponentValue, PseudoClass, PseudoClassFunction, PseudoClassSelector, PseudoElementSelector,
};
use crate::parser::selector::SelectorParser;
use crate::tokenizer::TokenType;
use sable_shared::errors::CssResult;

impl SelectorParser<'_> {
    /// `<pseudo-class-selector>` = ':' (`<ident>` | `<function>`)
    ///
    /// A second colon belongs to a pseudo-element selector and is rejected
    /// here. A functional pseudo-class re-enters the selector parser on its
    /// argument list.
    pub(crate) fn parse_pseudo_class_selector(&mut self) -> CssResult<PseudoClassSelector> {
        log::trace!("parse_pseudo_class_selector");

        if !self.peek_colon(0) {
            return Err(self.missing("pseudo class selector"));
        }
        if self.peek_colon(1) {
            return Err(self.missing("pseudo class selector"));
        }

        let colon = self.location_at(0);
        self.advance(1);

        match self.lookahead(0) {
            Some(ComponentValue::Token(token)) => {
                if let TokenType::Ident(name) = &token.token_type {
                    let selector = PseudoClassSelector {
                        value: PseudoClass::Ident(name.clone()),
                        location: colon.union(&token.location),
                    };
                    self.advance(1);
                    return Ok(selector);
                }

                Err(self.missing("pseudo class name"))
            }
            Some(ComponentValue::Function(function)) => {
                let mut inner = SelectorParser::new(&function.value);
                let arguments = inner.parse_relative_selector_list()?;

                let selector = PseudoClassSelector {
                    value: PseudoClass::Function(PseudoClassFunction {
                        name: function.name.clone(),
                        arguments,
                        location: function.location,
                    }),
                    location: colon.union(&function.location),
                };
                self.advance(1);
                Ok(selector)
            }
            _ => Err(self.missing("pseudo class name")),
        }
    }

    /// `<pseudo-element-selector>` = ':' `<pseudo-class-selector>`
    pub(crate) fn parse_pseudo_element_selector(&mut self) -> CssResult<PseudoElementSelector> {
        log::trace!("parse_pseudo_element_selector");

        if !(self.peek_colon(0) && self.peek_colon(1)) {
            return Err(self.missing("pseudo element selector"));
        }

        let first = self.location_at(0);
        self.advance(1);

        let value = self.parse_pseudo_class_selector()?;
        Ok(PseudoElementSelector {
            location: first.union(&value.location),
            value,
        })
    }
}
