use crate::node::{Rule, Stylesheet};
use crate::tokenizer::TokenType;
use crate::Css3;
use sable_shared::location::Location;

impl Css3 {
    /// 5.3.3. Parse a stylesheet: the top-level rule list, where CDO and CDC
    /// tokens are discarded.
    pub fn parse_stylesheet(&mut self) -> Stylesheet {
        log::trace!("parse_stylesheet");

        let start = self.tokens.current_location().start;
        let rules = self.consume_rule_list(true);
        let end = self.tokens.current_location().end;

        Stylesheet {
            rules,
            location: Location::new(start, end),
        }
    }

    /// 5.3.4. Parse a list of rules, as nested content: CDO and CDC are not
    /// special here and start qualified rules instead.
    pub fn parse_rule_list(&mut self) -> Vec<Rule> {
        log::trace!("parse_rule_list");

        self.consume_rule_list(false)
    }

    /// 5.4.1. [Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules)
    pub(crate) fn consume_rule_list(&mut self, top_level: bool) -> Vec<Rule> {
        log::trace!("consume_rule_list");

        let mut rules = Vec::new();

        loop {
            let t = self.tokens.lookahead(0);
            match t.token_type {
                TokenType::Whitespace(_) | TokenType::Comment(_) => {
                    self.tokens.consume();
                }
                TokenType::Eof => break,
                TokenType::Cdo | TokenType::Cdc => {
                    if top_level {
                        self.tokens.consume();
                        continue;
                    }

                    // nested content: the CDO/CDC token starts a qualified rule
                    if let Some(rule) = self.consume_qualified_rule() {
                        rules.push(Rule::Qualified(rule));
                    }
                }
                TokenType::AtKeyword(_) => {
                    rules.push(Rule::At(self.consume_at_rule()));
                }
                _ => {
                    if let Some(rule) = self.consume_qualified_rule() {
                        rules.push(Rule::Qualified(rule));
                    }
                }
            }
        }

        rules
    }
}
