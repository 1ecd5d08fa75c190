use crate::errors::ParseError;
use crate::node::{
    ComponentValue, CssStylesheet, Declaration, DeclarationListItem, Rule, Selector, Stylesheet,
};
use crate::parser_config::{Context, ParserConfig};
use crate::tokenizer::{TokenStream, Tokenizer};
use sable_shared::char_stream::CharStream;
use sable_shared::errors::CssError;

pub mod errors;
pub mod node;
pub mod parser;
pub mod parser_config;
pub mod stylesheet;
pub mod tokenizer;
mod unicode;
pub mod walker;

/// This CSS3 parser is a two-layer parser in the style of the CSS Syntax
/// Module Level 3 algorithms: a tokenizer feeding a grammar parser, with a
/// Selectors Level 4 parser re-entering on qualified-rule preludes.
pub struct Css3 {
    /// The preprocessed character stream, kept for source slices
    pub(crate) stream: CharStream,
    /// The materialized token stream the grammar parser consumes
    pub(crate) tokens: TokenStream,
    /// Recoverable errors in discovery order: tokenizer first, then grammar
    pub(crate) errors: Vec<CssError>,
    /// The parser configuration as given
    config: ParserConfig,
}

/// The result of a [`Css3::parse`] call, shaped by the configured context
#[derive(Debug, Clone, PartialEq)]
pub enum ParseResult {
    Stylesheet(Stylesheet),
    CssStylesheet(CssStylesheet),
    RuleList(Vec<Rule>),
    Rule(Rule),
    Declaration(Declaration),
    DeclarationList(Vec<DeclarationListItem>),
    ComponentValue(ComponentValue),
    ComponentValueList(Vec<ComponentValue>),
}

impl Css3 {
    /// Create a new parser over the given source with the default
    /// configuration. The source is preprocessed and tokenized up front;
    /// tokenization never fails.
    pub fn new(data: &str) -> Self {
        Self::with_config(data, ParserConfig::default())
    }

    /// Create a new parser over the given source
    pub fn with_config(data: &str, config: ParserConfig) -> Self {
        let mut stream = CharStream::from_str(data);
        let (tokens, errors) = Tokenizer::new(&mut stream).materialize();

        Self {
            stream,
            tokens: TokenStream::new(tokens),
            errors,
            config,
        }
    }

    /// Parse a CSS string, which depends on the context.
    pub fn parse(data: &str, config: ParserConfig) -> Result<ParseResult, ParseError> {
        if let Some(source) = &config.source {
            log::trace!("css3.parse {}", source);
        }

        let mut parser = Css3::with_config(data, config);

        let result = match parser.config.context {
            Context::Stylesheet => ParseResult::Stylesheet(parser.parse_stylesheet()),
            Context::CssStylesheet => ParseResult::CssStylesheet(parser.parse_css_stylesheet()),
            Context::RuleList => ParseResult::RuleList(parser.parse_rule_list()),
            Context::Rule => ParseResult::Rule(parser.parse_rule()?),
            Context::Declaration => ParseResult::Declaration(parser.parse_declaration()?),
            Context::DeclarationList => {
                ParseResult::DeclarationList(parser.parse_declaration_list())
            }
            Context::ComponentValue => ParseResult::ComponentValue(parser.parse_component_value()?),
            Context::ComponentValueList => {
                ParseResult::ComponentValueList(parser.parse_component_values())
            }
        };

        if !parser.config.ignore_errors {
            if let Some(error) = parser.errors.first() {
                return Err(ParseError::Syntax {
                    message: error.message.clone(),
                    location: error.location.unwrap_or_default(),
                });
            }
        }

        Ok(result)
    }

    /// Recoverable errors accumulated so far, in discovery order
    pub fn errors(&self) -> &[CssError] {
        &self.errors
    }
}

/// Parses a stylesheet with style-rule promotion. Always returns a tree; the
/// recoverable errors ride along instead of aborting the parse.
pub fn parse(source: &str) -> (CssStylesheet, Vec<CssError>) {
    let mut parser = Css3::new(source);
    let stylesheet = parser.parse_css_stylesheet();

    (stylesheet, parser.errors)
}

/// Parses a bounded component-value list as a comma-separated selector list
pub fn selectors(values: &[ComponentValue]) -> Result<Vec<Selector>, ParseError> {
    parser::selectors(values).map_err(|error| ParseError::Syntax {
        location: error.location.unwrap_or_default(),
        message: error.message,
    })
}
