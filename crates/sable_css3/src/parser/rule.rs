use crate::errors::ParseError;
use crate::node::{BlockKind, QualifiedRule, Rule};
use crate::tokenizer::TokenType;
use crate::Css3;

impl Css3 {
    /// 5.3.5. Parse a rule: exactly one rule, hard-failing on empty input,
    /// invalid content, or trailing input.
    pub fn parse_rule(&mut self) -> Result<Rule, ParseError> {
        log::trace!("parse_rule");

        self.consume_whitespace_comments();

        let t = self.tokens.lookahead(0);
        let rule = match t.token_type {
            TokenType::Eof => return Err(ParseError::EmptyInput),
            TokenType::AtKeyword(_) => Rule::At(self.consume_at_rule()),
            _ => match self.consume_qualified_rule() {
                Some(rule) => Rule::Qualified(rule),
                None => return Err(ParseError::syntax("invalid rule", t.location)),
            },
        };

        self.consume_whitespace_comments();
        if !self.tokens.eof() {
            return Err(ParseError::TrailingInput(self.tokens.current_location()));
        }

        Ok(rule)
    }

    /// 5.4.3. [Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-a-qualified-rule)
    ///
    /// Returns None when EOF is reached before the block; the accumulated
    /// prelude is dropped in that case.
    pub(crate) fn consume_qualified_rule(&mut self) -> Option<QualifiedRule> {
        log::trace!("consume_qualified_rule");

        let start = self.tokens.current_location();
        let mut prelude = Vec::new();

        loop {
            let t = self.tokens.lookahead(0);
            match t.token_type {
                TokenType::Eof => {
                    self.error("unexpected end of file in qualified rule", t.location);
                    return None;
                }
                TokenType::LCurly => {
                    let block = self.consume_simple_block(BlockKind::Curly);
                    let end = block.location.end;
                    return Some(QualifiedRule {
                        prelude,
                        block,
                        location: start.to(end),
                    });
                }
                _ => prelude.push(self.consume_component_value()),
            }
        }
    }
}
