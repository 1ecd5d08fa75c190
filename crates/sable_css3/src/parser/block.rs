use crate::errors::ParseError;
use crate::node::{BlockKind, ComponentValue, Function, SimpleBlock};
use crate::tokenizer::TokenType;
use crate::Css3;

fn closing_token(kind: BlockKind) -> TokenType {
    match kind {
        BlockKind::Paren => TokenType::RParen,
        BlockKind::Bracket => TokenType::RBracket,
        BlockKind::Curly => TokenType::RCurly,
    }
}

impl Css3 {
    /// 5.3.9. Parse a component value: exactly one, hard-failing on empty or
    /// trailing input.
    pub fn parse_component_value(&mut self) -> Result<ComponentValue, ParseError> {
        log::trace!("parse_component_value");

        self.consume_whitespace_comments();
        if self.tokens.eof() {
            return Err(ParseError::EmptyInput);
        }

        let value = self.consume_component_value();

        self.consume_whitespace_comments();
        if !self.tokens.eof() {
            return Err(ParseError::TrailingInput(self.tokens.current_location()));
        }

        Ok(value)
    }

    /// 5.3.10. Parse a list of component values, until EOF. Whitespace and
    /// comments are preserved as component values.
    pub fn parse_component_values(&mut self) -> Vec<ComponentValue> {
        log::trace!("parse_component_values");

        let mut values = Vec::new();
        while !self.tokens.eof() {
            values.push(self.consume_component_value());
        }

        values
    }

    /// 5.4.7. [Consume a component value](https://www.w3.org/TR/css-syntax-3/#consume-a-component-value)
    pub(crate) fn consume_component_value(&mut self) -> ComponentValue {
        let t = self.tokens.lookahead(0);
        match t.token_type {
            TokenType::LCurly => ComponentValue::Block(self.consume_simple_block(BlockKind::Curly)),
            TokenType::LBracket => {
                ComponentValue::Block(self.consume_simple_block(BlockKind::Bracket))
            }
            TokenType::LParen => ComponentValue::Block(self.consume_simple_block(BlockKind::Paren)),
            TokenType::Function(_) => ComponentValue::Function(self.consume_function()),
            TokenType::Ident(ref value) if value.eq_ignore_ascii_case("u") => {
                match self.consume_unicode_range() {
                    Some(range) => ComponentValue::UnicodeRange(range),
                    None => ComponentValue::Token(self.consume_any()),
                }
            }
            _ => ComponentValue::Token(self.consume_any()),
        }
    }

    /// 5.4.8. [Consume a simple block](https://www.w3.org/TR/css-syntax-3/#consume-a-simple-block)
    ///
    /// The next token is the opening delimiter; the block runs to the
    /// matching closer, or to EOF with a recoverable error.
    pub(crate) fn consume_simple_block(&mut self, kind: BlockKind) -> SimpleBlock {
        log::trace!("consume_simple_block");

        let open = self.consume_any();
        let start = open.location;
        let closer = closing_token(kind);

        let mut value = Vec::new();

        loop {
            let t = self.tokens.lookahead(0);

            if t.token_type == closer {
                let close = self.consume_any();
                return SimpleBlock {
                    kind,
                    value,
                    location: start.to(close.location.end),
                };
            }

            if t.is_eof() {
                self.error("unexpected end of file in simple block", t.location);
                return SimpleBlock {
                    kind,
                    value,
                    location: start.to(t.location.end),
                };
            }

            value.push(self.consume_component_value());
        }
    }

    /// 5.4.9. [Consume a function](https://www.w3.org/TR/css-syntax-3/#consume-function)
    ///
    /// The next token is a function token; the value runs to the matching `)`
    /// or to EOF with a recoverable error.
    pub(crate) fn consume_function(&mut self) -> Function {
        log::trace!("consume_function");

        let t = self.consume_any();
        let start = t.location;
        let name = match t.token_type {
            TokenType::Function(name) => name,
            _ => String::new(),
        };

        let mut value = Vec::new();

        loop {
            let t = self.tokens.lookahead(0);
            match t.token_type {
                TokenType::RParen => {
                    let close = self.consume_any();
                    return Function {
                        name,
                        value,
                        location: start.to(close.location.end),
                    };
                }
                TokenType::Eof => {
                    self.error("unexpected end of file in function", t.location);
                    return Function {
                        name,
                        value,
                        location: start.to(t.location.end),
                    };
                }
                _ => value.push(self.consume_component_value()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_component_value_block() {
        let mut parser = Css3::new("( a [ b ] )");
        let value = parser.parse_component_value().unwrap();

        match value {
            ComponentValue::Block(block) => {
                assert_eq!(block.kind, BlockKind::Paren);
                // a, surrounding whitespace, and the inner bracket block
                assert!(block.value.iter().any(ComponentValue::is_block));
            }
            other => panic!("expected a block, got {other:?}"),
        }
    }

    #[test]
    fn parse_component_value_function() {
        let mut parser = Css3::new("rgb(1, 2, 3)");
        let value = parser.parse_component_value().unwrap();

        match value {
            ComponentValue::Function(function) => {
                assert_eq!(function.name, "rgb");
                assert_eq!(function.to_string(), "rgb(1, 2, 3)");
            }
            other => panic!("expected a function, got {other:?}"),
        }
    }

    #[test]
    fn parse_component_value_empty_and_trailing() {
        let mut parser = Css3::new("  ");
        assert_eq!(parser.parse_component_value(), Err(ParseError::EmptyInput));

        let mut parser = Css3::new("a b");
        assert!(matches!(
            parser.parse_component_value(),
            Err(ParseError::TrailingInput(_))
        ));
    }

    #[test]
    fn unterminated_block_recovers_at_eof() {
        let mut parser = Css3::new("[ a ");
        let value = parser.parse_component_value().unwrap();

        assert!(value.is_block());
        let errors = parser.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "unexpected end of file in simple block");
    }

    #[test]
    fn unterminated_function_recovers_at_eof() {
        let mut parser = Css3::new("calc(1 + 2");
        let value = parser.parse_component_value().unwrap();

        assert!(matches!(value, ComponentValue::Function(_)));
        let errors = parser.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "unexpected end of file in function");
    }

    #[test]
    fn parse_component_values_keeps_whitespace() {
        let mut parser = Css3::new("a b");
        let values = parser.parse_component_values();

        assert_eq!(values.len(), 3);
        assert!(values[1].is_whitespace());
    }

    #[test]
    fn block_closer_mapping_is_bijective() {
        for (input, kind) in [("(x)", BlockKind::Paren), ("[x]", BlockKind::Bracket), ("{x}", BlockKind::Curly)] {
            let mut parser = Css3::new(input);
            let value = parser.parse_component_value().unwrap();
            assert_eq!(value.as_block().kind, kind);
            assert_eq!(value.to_string(), input);
        }
    }
}
