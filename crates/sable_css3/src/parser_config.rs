/// Context defines how the data needs to be parsed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Context {
    /// Parse a complete stylesheet: a list of rules with recoverable errors
    #[default]
    Stylesheet,
    /// Parse a complete stylesheet and promote qualified rules to style rules
    CssStylesheet,
    /// Parse a rule list as nested content (CDO/CDC are not special)
    RuleList,
    /// Parse exactly one rule
    Rule,
    /// Parse exactly one declaration
    Declaration,
    /// Parse a list of declarations and at-rules
    DeclarationList,
    /// Parse exactly one component value
    ComponentValue,
    /// Parse a list of component values
    ComponentValueList,
}

/// ParserConfig holds the configuration for the parser
pub struct ParserConfig {
    /// Context defines how the data needs to be parsed
    pub context: Context,
    /// Optional source filename or url
    pub source: Option<String>,
    /// Ignore errors and continue parsing
    pub ignore_errors: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            context: Context::Stylesheet,
            source: None,
            ignore_errors: true,
        }
    }
}
