//! Error results that can be returned from the css3 parser

use sable_shared::location::Location;
use thiserror::Error;

/// Failure verdicts from the hard-fail entry points (`parse_rule`,
/// `parse_declaration`, `parse_component_value`). Stylesheet-level parsing
/// never returns these; it accumulates recoverable [`CssError`]s instead.
///
/// [`CssError`]: sable_shared::errors::CssError
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ParseError {
    #[error("empty input")]
    EmptyInput,

    #[error("unexpected trailing input at {0}")]
    TrailingInput(Location),

    #[error("{message} at {location}")]
    Syntax { message: String, location: Location },
}

impl ParseError {
    pub(crate) fn syntax(message: &str, location: Location) -> ParseError {
        ParseError::Syntax {
            message: message.to_string(),
            location,
        }
    }
}
