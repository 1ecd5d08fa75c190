use crate::node::{AtRule, BlockKind};
use crate::tokenizer::TokenType;
use crate::Css3;

impl Css3 {
    /// 5.4.2. [Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-an-at-rule)
    ///
    /// Callers only enter this on an at-keyword token. The prelude runs until
    /// a `;` (no block), a `{` (block) or EOF (recovered with an error).
    pub(crate) fn consume_at_rule(&mut self) -> AtRule {
        log::trace!("consume_at_rule");

        let t = self.consume_any();
        let start = t.location;
        let name = match t.token_type {
            TokenType::AtKeyword(name) => name,
            _ => String::new(),
        };

        let mut prelude = Vec::new();

        loop {
            let t = self.tokens.lookahead(0);
            match t.token_type {
                TokenType::Semicolon => {
                    let t = self.consume_any();
                    return AtRule {
                        name,
                        prelude,
                        block: None,
                        location: start.to(t.location.end),
                    };
                }
                TokenType::Eof => {
                    self.error("unexpected end of file in at-rule", t.location);
                    return AtRule {
                        name,
                        prelude,
                        block: None,
                        location: start.to(t.location.end),
                    };
                }
                TokenType::LCurly => {
                    let block = self.consume_simple_block(BlockKind::Curly);
                    let end = block.location.end;
                    return AtRule {
                        name,
                        prelude,
                        block: Some(block),
                        location: start.to(end),
                    };
                }
                _ => prelude.push(self.consume_component_value()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::node::Rule;
    use crate::Css3;

    fn parse_single_at_rule(input: &str) -> (crate::node::AtRule, Vec<sable_shared::errors::CssError>) {
        let mut parser = Css3::new(input);
        let stylesheet = parser.parse_stylesheet();
        let errors = parser.errors().to_vec();

        match stylesheet.rules.into_iter().next() {
            Some(Rule::At(at_rule)) => (at_rule, errors),
            other => panic!("expected an at-rule, got {other:?}"),
        }
    }

    #[test]
    fn at_rule_terminated_by_semicolon() {
        let (at_rule, errors) = parse_single_at_rule("@charset \"utf-8\";");

        assert_eq!(at_rule.name, "charset");
        assert!(at_rule.block.is_none());
        assert!(!at_rule.prelude.is_empty());
        assert!(errors.is_empty());
    }

    #[test]
    fn at_rule_with_block() {
        let (at_rule, errors) = parse_single_at_rule("@media screen { a { b: c } }");

        assert_eq!(at_rule.name, "media");
        assert!(at_rule.block.is_some());
        assert!(errors.is_empty());
    }

    #[test]
    fn at_rule_recovers_at_eof() {
        let (at_rule, errors) = parse_single_at_rule("@import url(foo.css)");

        assert_eq!(at_rule.name, "import");
        assert!(at_rule.block.is_none());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "unexpected end of file in at-rule");
    }

    #[test]
    fn at_rule_location_covers_the_construct() {
        let input = "@media (x) {}";
        let (at_rule, _) = parse_single_at_rule(input);

        assert_eq!(at_rule.location.start, 0);
        assert_eq!(at_rule.location.end, input.len());
    }
}
