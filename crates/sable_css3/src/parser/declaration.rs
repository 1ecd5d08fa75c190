use crate::errors::ParseError;
use crate::node::{
    AtRule, BlockKind, ComponentValue, Declaration, DeclarationListItem, QualifiedRule,
};
use crate::tokenizer::TokenType;
use crate::Css3;
use sable_shared::location::Location;

impl Css3 {
    /// 5.3.6. Parse a declaration: exactly one, hard-failing on empty input
    /// or input that does not start with an ident.
    pub fn parse_declaration(&mut self) -> Result<Declaration, ParseError> {
        log::trace!("parse_declaration");

        self.consume_whitespace_comments();
        if self.tokens.eof() {
            return Err(ParseError::EmptyInput);
        }

        let t = self.tokens.lookahead(0);
        if !t.is_ident() {
            return Err(ParseError::syntax(
                "expected identifier in declaration",
                t.location,
            ));
        }

        let parts = self.parse_component_values();
        match self.consume_declaration(parts) {
            Some(declaration) => Ok(declaration),
            None => Err(ParseError::syntax("invalid declaration", t.location)),
        }
    }

    /// 5.3.8. Parse a list of declarations: declarations and at-rules,
    /// recovering from unexpected content by fast-forwarding to the next `;`.
    pub fn parse_declaration_list(&mut self) -> Vec<DeclarationListItem> {
        log::trace!("parse_declaration_list");

        let parts = self.parse_component_values();
        self.consume_declaration_list(&parts)
    }

    /// 5.4.4. [Consume a list of declarations](https://www.w3.org/TR/css-syntax-3/#consume-a-list-of-declarations)
    ///
    /// The input is the bounded component-value list; the end of the list is
    /// the synthetic EOF. A declaration's bounded list runs up to the next
    /// `;`, or to the end of the input for the final declaration.
    pub(crate) fn consume_declaration_list(
        &mut self,
        parts: &[ComponentValue],
    ) -> Vec<DeclarationListItem> {
        log::trace!("consume_declaration_list");

        let mut items = Vec::new();
        let mut index = 0;

        while let Some(part) = parts.get(index) {
            if part.is_whitespace() || part.is_comment() || part.is_semicolon() {
                index += 1;
                continue;
            }

            match part.as_token().map(|t| &t.token_type) {
                Some(TokenType::AtKeyword(_)) => {
                    let at_rule = self.consume_at_rule_from_parts(parts, &mut index);
                    items.push(DeclarationListItem::AtRule(at_rule));
                }
                Some(TokenType::Ident(_)) => {
                    let bounded = collect_until_semicolon(parts, &mut index);
                    if let Some(declaration) = self.consume_declaration(bounded) {
                        items.push(DeclarationListItem::Declaration(declaration));
                    }
                }
                _ => {
                    self.error("unexpected token in declaration list", part.location());
                    fast_forward_to_semicolon(parts, &mut index);
                }
            }
        }

        items
    }

    /// 5.4.5. [Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-a-declaration)
    ///
    /// The input is a bounded component-value list: name, colon, value.
    /// A trailing `! important` (any casing) is removed from the value and
    /// sets the important flag.
    pub(crate) fn consume_declaration(&mut self, parts: Vec<ComponentValue>) -> Option<Declaration> {
        log::trace!("consume_declaration");

        let mut index = 0;

        while parts
            .get(index)
            .is_some_and(|p| p.is_whitespace() || p.is_comment())
        {
            index += 1;
        }

        let name_part = parts.get(index)?;
        let start = name_part.location();
        let name = match name_part.as_token().map(|t| &t.token_type) {
            Some(TokenType::Ident(name)) => name.clone(),
            _ => {
                self.error("expected identifier in declaration", name_part.location());
                return None;
            }
        };
        index += 1;

        while parts
            .get(index)
            .is_some_and(|p| p.is_whitespace() || p.is_comment())
        {
            index += 1;
        }

        match parts.get(index) {
            Some(part) if part.as_token().is_some_and(|t| t.is_colon()) => index += 1,
            Some(part) => {
                self.error("expected colon in declaration", part.location());
                return None;
            }
            None => {
                self.error("expected colon in declaration", start);
                return None;
            }
        }

        while parts
            .get(index)
            .is_some_and(|p| p.is_whitespace() || p.is_comment())
        {
            index += 1;
        }

        let mut value: Vec<ComponentValue> = parts[index..].to_vec();

        strip_trailing_whitespace(&mut value);

        // the declaration covers everything up to and including the last
        // non-whitespace component value
        let end = value.last().map_or(start.end, |v| v.location().end);

        let mut important = false;
        if value.len() >= 2 {
            let last_is_important = matches!(
                value.last().and_then(ComponentValue::as_token).map(|t| &t.token_type),
                Some(TokenType::Ident(v)) if v.eq_ignore_ascii_case("important")
            );

            if last_is_important {
                let mut bang = value.len() - 1;
                while bang > 0 {
                    bang -= 1;
                    if value[bang].is_whitespace() || value[bang].is_comment() {
                        continue;
                    }
                    break;
                }

                if value[bang].is_delim('!') {
                    value.truncate(bang);
                    strip_trailing_whitespace(&mut value);
                    important = true;
                }
            }
        }

        Some(Declaration {
            name,
            value,
            important,
            location: Location::new(start.start, end),
        })
    }

    /// 5.4.4 (style block contents): like a declaration list, but `&`-prefixed
    /// nested qualified rules are accepted as well. Returns declarations and
    /// rules as separate lists, not interleaved by position.
    pub(crate) fn consume_style_block_contents(
        &mut self,
        parts: &[ComponentValue],
    ) -> (Vec<DeclarationListItem>, Vec<QualifiedRule>) {
        log::trace!("consume_style_block_contents");

        let mut declarations = Vec::new();
        let mut rules = Vec::new();
        let mut index = 0;

        while let Some(part) = parts.get(index) {
            if part.is_whitespace() || part.is_comment() || part.is_semicolon() {
                index += 1;
                continue;
            }

            match part.as_token().map(|t| &t.token_type) {
                Some(TokenType::AtKeyword(_)) => {
                    let at_rule = self.consume_at_rule_from_parts(parts, &mut index);
                    declarations.push(DeclarationListItem::AtRule(at_rule));
                }
                Some(TokenType::Ident(_)) => {
                    let bounded = collect_until_semicolon(parts, &mut index);
                    if let Some(declaration) = self.consume_declaration(bounded) {
                        declarations.push(DeclarationListItem::Declaration(declaration));
                    }
                }
                Some(TokenType::Delim('&')) => {
                    if let Some(rule) = self.consume_nested_rule_from_parts(parts, &mut index) {
                        rules.push(rule);
                    }
                }
                _ => {
                    self.error("unexpected token in style block", part.location());
                    fast_forward_to_semicolon(parts, &mut index);
                }
            }
        }

        (declarations, rules)
    }

    /// Rebuilds an at-rule from an already-consumed component-value list:
    /// the at-keyword, a prelude up to `;` or a `{}` block, or the end of the
    /// bounded list (recovered with an error).
    fn consume_at_rule_from_parts(
        &mut self,
        parts: &[ComponentValue],
        index: &mut usize,
    ) -> AtRule {
        log::trace!("consume_at_rule_from_parts");

        let keyword = &parts[*index];
        let start = keyword.location();
        let name = match keyword.as_token().map(|t| &t.token_type) {
            Some(TokenType::AtKeyword(name)) => name.clone(),
            _ => String::new(),
        };
        *index += 1;

        let mut prelude = Vec::new();
        let mut end = start.end;

        while let Some(part) = parts.get(*index) {
            if part.is_semicolon() {
                end = part.location().end;
                *index += 1;
                return AtRule {
                    name,
                    prelude,
                    block: None,
                    location: Location::new(start.start, end),
                };
            }

            if let ComponentValue::Block(block) = part {
                if block.kind == BlockKind::Curly {
                    end = block.location.end;
                    *index += 1;
                    return AtRule {
                        name,
                        prelude,
                        block: Some(block.clone()),
                        location: Location::new(start.start, end),
                    };
                }
            }

            end = part.location().end;
            prelude.push(part.clone());
            *index += 1;
        }

        self.error("unexpected end of file in at-rule", Location::at(end));
        AtRule {
            name,
            prelude,
            block: None,
            location: Location::new(start.start, end),
        }
    }

    /// Rebuilds a nested qualified rule from a component-value list: the
    /// `&`-led prelude up to its `{}` block. Without a block the rule is
    /// dropped with an error.
    fn consume_nested_rule_from_parts(
        &mut self,
        parts: &[ComponentValue],
        index: &mut usize,
    ) -> Option<QualifiedRule> {
        log::trace!("consume_nested_rule_from_parts");

        let start = parts[*index].location();
        let mut prelude = Vec::new();

        while let Some(part) = parts.get(*index) {
            if let ComponentValue::Block(block) = part {
                if block.kind == BlockKind::Curly {
                    *index += 1;
                    return Some(QualifiedRule {
                        prelude,
                        block: block.clone(),
                        location: Location::new(start.start, block.location.end),
                    });
                }
            }

            prelude.push(part.clone());
            *index += 1;
        }

        self.error(
            "unexpected end of file in qualified rule",
            Location::at(prelude.last().map_or(start.end, |p| p.location().end)),
        );
        None
    }
}

fn strip_trailing_whitespace(value: &mut Vec<ComponentValue>) {
    while value
        .last()
        .is_some_and(|v| v.is_whitespace() || v.is_comment())
    {
        value.pop();
    }
}

fn collect_until_semicolon(parts: &[ComponentValue], index: &mut usize) -> Vec<ComponentValue> {
    let mut bounded = Vec::new();

    while let Some(part) = parts.get(*index) {
        if part.is_semicolon() {
            *index += 1;
            break;
        }
        bounded.push(part.clone());
        *index += 1;
    }

    bounded
}

fn fast_forward_to_semicolon(parts: &[ComponentValue], index: &mut usize) {
    while let Some(part) = parts.get(*index) {
        *index += 1;
        if part.is_semicolon() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::ComponentValue;
    use crate::tokenizer::{NumberKind, TokenType};

    fn declarations(input: &str) -> (Vec<DeclarationListItem>, Vec<sable_shared::errors::CssError>) {
        let mut parser = Css3::new(input);
        let items = parser.parse_declaration_list();
        let errors = parser.errors().to_vec();
        (items, errors)
    }

    fn as_declaration(item: &DeclarationListItem) -> &Declaration {
        match item {
            DeclarationListItem::Declaration(declaration) => declaration,
            other => panic!("expected a declaration, got {other:?}"),
        }
    }

    #[test]
    fn parse_two_declarations() {
        let (items, errors) = declarations("color: red; background-color: blue");

        assert_eq!(items.len(), 2);
        assert!(errors.is_empty());

        let first = as_declaration(&items[0]);
        assert_eq!(first.name, "color");
        assert!(!first.important);
        assert_eq!(first.value.len(), 1);

        let second = as_declaration(&items[1]);
        assert_eq!(second.name, "background-color");
        // the final declaration consumes up to the end of the input
        assert_eq!(second.value.len(), 1);
    }

    #[test]
    fn parse_important_declaration() {
        let (items, _) = declarations("x: 1 !important");

        let declaration = as_declaration(&items[0]);
        assert!(declaration.important);
        // the `!` and `important` tokens are removed from the value
        assert_eq!(declaration.value.len(), 1);
        assert!(matches!(
            declaration.value[0].as_token().map(|t| &t.token_type),
            Some(TokenType::Number {
                value: _,
                kind: NumberKind::Integer
            })
        ));
    }

    #[test]
    fn parse_important_with_inner_whitespace_and_casing() {
        let (items, _) = declarations("x: 1 !  IMPORTANT");

        let declaration = as_declaration(&items[0]);
        assert!(declaration.important);
        assert_eq!(declaration.value.len(), 1);
    }

    #[test]
    fn important_must_be_trailing() {
        let (items, _) = declarations("x: !important 1");

        let declaration = as_declaration(&items[0]);
        assert!(!declaration.important);
        assert_eq!(declaration.value.len(), 4);
    }

    #[test]
    fn missing_colon_drops_declaration() {
        let (items, errors) = declarations("color red; x: 1");

        assert_eq!(items.len(), 1);
        assert_eq!(as_declaration(&items[0]).name, "x");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "expected colon in declaration");
    }

    #[test]
    fn unexpected_token_fast_forwards_to_semicolon() {
        let (items, errors) = declarations("4px; color: red");

        assert_eq!(items.len(), 1);
        assert_eq!(as_declaration(&items[0]).name, "color");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "unexpected token in declaration list");
    }

    #[test]
    fn at_rule_in_declaration_list() {
        let (items, errors) = declarations("color: red; @layer base; x: 1");

        assert_eq!(items.len(), 3);
        assert!(matches!(items[1], DeclarationListItem::AtRule(_)));
        assert!(errors.is_empty());
    }

    #[test]
    fn declaration_value_may_contain_blocks() {
        let (items, _) = declarations("grid-template: { a; b }");

        let declaration = as_declaration(&items[0]);
        assert_eq!(declaration.value.len(), 1);
        assert!(declaration.value[0].is_block());
    }

    #[test]
    fn parse_declaration_entry_requires_ident() {
        let mut parser = Css3::new("4px: x");
        assert!(matches!(
            parser.parse_declaration(),
            Err(ParseError::Syntax { .. })
        ));

        let mut parser = Css3::new("  ");
        assert_eq!(parser.parse_declaration(), Err(ParseError::EmptyInput));

        let mut parser = Css3::new("color: red");
        let declaration = parser.parse_declaration().unwrap();
        assert_eq!(declaration.name, "color");
        assert_eq!(declaration.value.len(), 1);
    }

    #[test]
    fn declaration_location_covers_name_to_value() {
        let input = "color: red";
        let mut parser = Css3::new(input);
        let declaration = parser.parse_declaration().unwrap();

        assert_eq!(declaration.location.start, 0);
        assert_eq!(declaration.location.end, input.len());
    }

    #[test]
    fn style_block_contents_returns_declarations_then_rules() {
        let mut parser = Css3::new("color: red; &:hover { color: blue } background: green");
        let parts = parser.parse_component_values();
        let (declarations, rules) = parser.consume_style_block_contents(&parts);

        assert_eq!(declarations.len(), 2);
        assert_eq!(rules.len(), 1);
        assert!(!rules[0].prelude.is_empty());
    }
}
