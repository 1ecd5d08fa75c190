use crate::node::{Combinator, CombinatorKind};
use crate::parser::selector::SelectorParser;
use crate::tokenizer::TokenType;
use sable_shared::errors::CssResult;
use sable_shared::location::Location;

impl SelectorParser<'_> {
    /// `<combinator>` = `>` | `+` | `~` | `||` | whitespace
    ///
    /// Explicit combinators may be surrounded by whitespace. A run of
    /// whitespace and comments with no explicit combinator is the implicit
    /// descendant combinator, provided another compound selector follows.
    pub(crate) fn parse_combinator(&mut self) -> CssResult<Combinator> {
        log::trace!("parse_combinator");

        let mut whitespace: Option<Location> = None;
        while let Some(value) = self.lookahead(0) {
            if value.is_whitespace() || value.is_comment() {
                let location = value.location();
                whitespace = Some(whitespace.map_or(location, |w| w.union(&location)));
                self.advance(1);
                continue;
            }
            break;
        }

        if let Some(combinator) = self.maybe(|p| p.parse_explicit_combinator()) {
            self.skip_whitespace();
            return Ok(combinator);
        }

        match whitespace {
            Some(location) if !self.eof() => Ok(Combinator {
                kind: CombinatorKind::Descendant,
                location,
            }),
            _ => Err(self.missing("combinator")),
        }
    }

    /// The non-whitespace combinators. A single `|` is a namespace separator
    /// and is left alone; only the adjacent pair `||` is the column
    /// combinator.
    pub(crate) fn parse_explicit_combinator(&mut self) -> CssResult<Combinator> {
        let Some(token) = self.peek_token(0) else {
            return Err(self.missing("combinator"));
        };
        let location = token.location;

        let kind = match token.token_type {
            TokenType::Delim('>') => CombinatorKind::Child,
            TokenType::Delim('+') => CombinatorKind::NextSibling,
            TokenType::Delim('~') => CombinatorKind::SubsequentSibling,
            TokenType::Delim('|') if self.peek_delim(1, '|') => {
                let second = self.location_at(1);
                self.advance(2);
                return Ok(Combinator {
                    kind: CombinatorKind::Column,
                    location: location.union(&second),
                });
            }
            _ => return Err(self.missing("combinator")),
        };

        self.advance(1);
        Ok(Combinator { kind, location })
    }
}
