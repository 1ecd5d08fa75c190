use crate::node::{
    AtRule, ComponentValue, CssRule, CssStylesheet, Declaration, DeclarationListItem,
    QualifiedRule, Rule, StyleRule, Stylesheet,
};
use crate::tokenizer::TokenType;
use std::io::Write;

/// The walker is used to walk the tree and print it to stdout, mostly for
/// tests and debugging. Whitespace and comment tokens are not printed.
pub struct Walker<'a> {
    root: WalkerRoot<'a>,
}

enum WalkerRoot<'a> {
    Stylesheet(&'a Stylesheet),
    CssStylesheet(&'a CssStylesheet),
}

impl<'a> Walker<'a> {
    pub fn new(root: &'a Stylesheet) -> Self {
        Self {
            root: WalkerRoot::Stylesheet(root),
        }
    }

    pub fn new_css(root: &'a CssStylesheet) -> Self {
        Self {
            root: WalkerRoot::CssStylesheet(root),
        }
    }

    pub fn walk_stdout(&self) {
        let _ = self.walk(&mut std::io::stdout());
    }

    pub fn walk_to_string(&self) -> String {
        let mut output: Vec<u8> = Vec::new();

        let _ = self.walk(&mut output);

        String::from_utf8_lossy(&output).into_owned()
    }

    fn walk(&self, f: &mut dyn Write) -> Result<(), std::io::Error> {
        match self.root {
            WalkerRoot::Stylesheet(stylesheet) => {
                writeln!(f, "[Stylesheet ({})]", stylesheet.rules.len())?;
                for rule in &stylesheet.rules {
                    walk_rule(rule, 1, f)?;
                }
            }
            WalkerRoot::CssStylesheet(stylesheet) => {
                writeln!(f, "[CssStylesheet ({})]", stylesheet.rules.len())?;
                for rule in &stylesheet.rules {
                    match rule {
                        CssRule::Style(style_rule) => walk_style_rule(style_rule, 1, f)?,
                        CssRule::At(at_rule) => walk_at_rule(at_rule, 1, f)?,
                    }
                }
            }
        }

        Ok(())
    }
}

fn walk_rule(rule: &Rule, depth: usize, f: &mut dyn Write) -> Result<(), std::io::Error> {
    match rule {
        Rule::At(at_rule) => walk_at_rule(at_rule, depth, f),
        Rule::Qualified(qualified_rule) => walk_qualified_rule(qualified_rule, depth, f),
    }
}

fn walk_at_rule(at_rule: &AtRule, depth: usize, f: &mut dyn Write) -> Result<(), std::io::Error> {
    let prefix = " ".repeat(depth * 2);

    writeln!(f, "{}[AtRule] name: {}", prefix, at_rule.name)?;
    for value in &at_rule.prelude {
        walk_component_value(value, depth + 1, f)?;
    }
    if let Some(block) = &at_rule.block {
        walk_component_value(
            &ComponentValue::Block(block.clone()),
            depth + 1,
            f,
        )?;
    }

    Ok(())
}

fn walk_qualified_rule(
    rule: &QualifiedRule,
    depth: usize,
    f: &mut dyn Write,
) -> Result<(), std::io::Error> {
    let prefix = " ".repeat(depth * 2);

    writeln!(f, "{}[QualifiedRule]", prefix)?;
    for value in &rule.prelude {
        walk_component_value(value, depth + 1, f)?;
    }
    walk_component_value(&ComponentValue::Block(rule.block.clone()), depth + 1, f)?;

    Ok(())
}

fn walk_style_rule(
    rule: &StyleRule,
    depth: usize,
    f: &mut dyn Write,
) -> Result<(), std::io::Error> {
    let prefix = " ".repeat(depth * 2);

    writeln!(f, "{}[StyleRule]", prefix)?;
    writeln!(f, "{}  [SelectorList ({})]", prefix, rule.selectors.len())?;
    for selector in &rule.selectors {
        writeln!(f, "{}    [Selector] {}", prefix, selector)?;
    }
    for item in &rule.declarations {
        walk_declaration_item(item, depth + 1, f)?;
    }
    for nested in &rule.rules {
        walk_qualified_rule(nested, depth + 1, f)?;
    }

    Ok(())
}

fn walk_declaration_item(
    item: &DeclarationListItem,
    depth: usize,
    f: &mut dyn Write,
) -> Result<(), std::io::Error> {
    match item {
        DeclarationListItem::Declaration(declaration) => walk_declaration(declaration, depth, f),
        DeclarationListItem::AtRule(at_rule) => walk_at_rule(at_rule, depth, f),
    }
}

fn walk_declaration(
    declaration: &Declaration,
    depth: usize,
    f: &mut dyn Write,
) -> Result<(), std::io::Error> {
    let prefix = " ".repeat(depth * 2);

    writeln!(
        f,
        "{}[Declaration] property: {} important: {}",
        prefix, declaration.name, declaration.important
    )?;
    for value in &declaration.value {
        walk_component_value(value, depth + 1, f)?;
    }

    Ok(())
}

fn walk_component_value(
    value: &ComponentValue,
    depth: usize,
    f: &mut dyn Write,
) -> Result<(), std::io::Error> {
    let prefix = " ".repeat(depth * 2);

    match value {
        ComponentValue::Token(token) => {
            match &token.token_type {
                // not part of the walked tree
                TokenType::Whitespace(_) | TokenType::Comment(_) | TokenType::Eof => {}
                TokenType::Ident(v) => writeln!(f, "{}[Ident] {}", prefix, v)?,
                TokenType::AtKeyword(v) => writeln!(f, "{}[AtKeyword] @{}", prefix, v)?,
                TokenType::Hash { value: v, .. } => writeln!(f, "{}[Hash] #{}", prefix, v)?,
                TokenType::QuotedString(v) => writeln!(f, "{}[String] {}", prefix, v)?,
                TokenType::BadString(v) => writeln!(f, "{}[BadString] {}", prefix, v)?,
                TokenType::Url(v) => writeln!(f, "{}[Url] {}", prefix, v)?,
                TokenType::BadUrl(v) => writeln!(f, "{}[BadUrl] {}", prefix, v)?,
                TokenType::Number { value: v, .. } => writeln!(f, "{}[Number] {}", prefix, v)?,
                TokenType::Percentage { value: v, .. } => {
                    writeln!(f, "{}[Percentage] {}%", prefix, v)?;
                }
                TokenType::Dimension { value: v, unit, .. } => {
                    writeln!(f, "{}[Dimension] {}{}", prefix, v, unit)?;
                }
                TokenType::Colon => writeln!(f, "{}[Colon]", prefix)?,
                TokenType::Semicolon => writeln!(f, "{}[Semicolon]", prefix)?,
                TokenType::Comma => writeln!(f, "{}[Comma]", prefix)?,
                TokenType::Delim(c) => writeln!(f, "{}[Delim] {}", prefix, c)?,
                _ => writeln!(f, "{}[Token] {}", prefix, token)?,
            }
        }
        ComponentValue::Block(block) => {
            writeln!(
                f,
                "{}[Block] {}{}",
                prefix,
                block.kind.open(),
                block.kind.close()
            )?;
            for child in &block.value {
                walk_component_value(child, depth + 1, f)?;
            }
        }
        ComponentValue::Function(function) => {
            writeln!(f, "{}[Function] {}", prefix, function.name)?;
            for child in &function.value {
                walk_component_value(child, depth + 1, f)?;
            }
        }
        ComponentValue::UnicodeRange(range) => {
            writeln!(f, "{}[UnicodeRange] {}", prefix, range)?;
        }
    }

    Ok(())
}
