use crate::tokenizer::Token;
use crate::Css3;
use sable_shared::errors::CssError;
use sable_shared::location::Location;

mod at_rule;
mod block;
mod combinator;
mod declaration;
mod pseudo;
mod rule;
mod selector;
mod selector_list;
mod stylesheet;
mod unicode_range;

pub(crate) use selector::SelectorParser;
pub(crate) use selector_list::selectors;

impl Css3 {
    /// Consumes any token
    pub(crate) fn consume_any(&mut self) -> Token {
        self.tokens.consume()
    }

    /// Eats whitespace and comment tokens until something else comes up
    pub(crate) fn consume_whitespace_comments(&mut self) {
        loop {
            let t = self.tokens.lookahead(0);
            if t.is_whitespace() || t.is_comment() {
                self.tokens.consume();
                continue;
            }
            break;
        }
    }

    /// Records a recoverable parse error and continues
    pub(crate) fn error(&mut self, message: &str, location: Location) {
        self.errors.push(CssError::with_location(message, location));
    }
}
