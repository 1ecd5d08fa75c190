use crate::node::UnicodeRange;
use crate::tokenizer::TokenType;
use crate::unicode::UnicodeChar;
use crate::Css3;

/// Result of re-parsing a urange candidate at the text level
enum UrangeText {
    Range(u32, u32),
    /// Matched the shape, but the range itself is out of bounds
    Invalid,
    /// Did not match the `u+ HEX(1..6) '?'* ( - HEX(1..6) )?` shape
    NoMatch,
}

/// Re-parses the concatenated source text of a urange candidate.
///
/// `?` placeholders expand to `0` for the range start and to `F` for the
/// range end; an explicit `-HEX` end wins over the `?` expansion.
fn parse_urange_text(text: &str) -> UrangeText {
    let mut chars = text.chars().peekable();

    if !matches!(chars.next(), Some('u' | 'U')) {
        return UrangeText::NoMatch;
    }
    if chars.next() != Some('+') {
        return UrangeText::NoMatch;
    }

    let mut hex = String::new();
    while let Some(c) = chars.peek() {
        if !c.is_ascii_hexdigit() {
            break;
        }
        hex.push(*c);
        chars.next();
    }

    let mut questions = 0usize;
    while chars.peek() == Some(&'?') {
        questions += 1;
        chars.next();
    }

    if hex.len() + questions == 0 || hex.len() + questions > 6 {
        return UrangeText::NoMatch;
    }

    let mut end_hex = String::new();
    if chars.peek() == Some(&'-') {
        chars.next();
        while let Some(c) = chars.peek() {
            if !c.is_ascii_hexdigit() {
                break;
            }
            end_hex.push(*c);
            chars.next();
        }

        if end_hex.is_empty() || end_hex.len() > 6 {
            return UrangeText::NoMatch;
        }
    }

    // the candidate must be consumed completely
    if chars.next().is_some() {
        return UrangeText::NoMatch;
    }

    let mut start_hex = hex.clone();
    for _ in 0..questions {
        start_hex.push('0');
    }

    if end_hex.is_empty() {
        end_hex = hex;
        for _ in 0..questions {
            end_hex.push('F');
        }
    }

    let (Ok(start), Ok(end)) = (
        u32::from_str_radix(&start_hex, 16),
        u32::from_str_radix(&end_hex, 16),
    ) else {
        return UrangeText::NoMatch;
    };

    if end > UnicodeChar::MAX_ALLOWED || start > end {
        return UrangeText::Invalid;
    }

    UrangeText::Range(start, end)
}

impl Css3 {
    /// The unicode-range microsyntax. The next token is an ident equal to
    /// `u`/`U`; a small state machine walks the directly following tokens to
    /// bound a candidate span, and the candidate's source text decides.
    ///
    /// On success the matched tokens are consumed; on failure nothing is
    /// consumed and the ident falls through as a plain token.
    pub(crate) fn consume_unicode_range(&mut self) -> Option<UnicodeRange> {
        log::trace!("consume_unicode_range");

        let start = self.tokens.current_location();

        // token pattern: '+' | dimension | number first, then idents, numbers,
        // dimensions and '?' delims as long as they are contiguous in the
        // source. Whitespace and comment tokens break the run naturally.
        let first = self.tokens.lookahead(1);
        let accepted_first = match first.token_type {
            TokenType::Delim('+') => true,
            TokenType::Dimension { .. } | TokenType::Number { .. } => true,
            _ => false,
        };
        if !accepted_first {
            return None;
        }

        let mut count = 2;
        loop {
            let t = self.tokens.lookahead(count);
            let accepted = matches!(
                t.token_type,
                TokenType::Ident(_)
                    | TokenType::Number { .. }
                    | TokenType::Dimension { .. }
                    | TokenType::Delim('?')
            );
            if !accepted {
                break;
            }
            count += 1;
        }

        let last = self.tokens.lookahead(count - 1);
        let span = start.to(last.location.end);
        let text = self.stream.slice(span.start, span.end);

        match parse_urange_text(&text) {
            UrangeText::Range(range_start, range_end) => {
                for _ in 0..count {
                    self.tokens.consume();
                }
                Some(UnicodeRange {
                    start: range_start,
                    end: range_end,
                    location: span,
                })
            }
            UrangeText::Invalid => {
                self.error("invalid unicode range", span);
                None
            }
            UrangeText::NoMatch => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::node::ComponentValue;
    use crate::Css3;

    fn parse_urange(input: &str) -> ComponentValue {
        let mut parser = Css3::new(input);
        parser.parse_component_value().unwrap()
    }

    macro_rules! assert_urange {
        ($input:expr, $start:expr, $end:expr) => {
            match parse_urange($input) {
                ComponentValue::UnicodeRange(range) => {
                    assert_eq!(range.start, $start, "start of {}", $input);
                    assert_eq!(range.end, $end, "end of {}", $input);
                }
                other => panic!("expected a unicode range for {}, got {other:?}", $input),
            }
        };
    }

    #[test]
    fn parse_unicode_ranges() {
        assert_urange!("U+26", 0x26, 0x26);
        assert_urange!("u+26", 0x26, 0x26);
        assert_urange!("U+AF", 0xAF, 0xAF);
        assert_urange!("U+0-7F", 0x0, 0x7F);
        assert_urange!("U+0025-00FF", 0x25, 0xFF);
        assert_urange!("U+4??", 0x400, 0x4FF);
        assert_urange!("U+10FFFF", 0x10FFFF, 0x10FFFF);
        assert_urange!("U+1F??-2FFF", 0x1F00, 0x2FFF);
    }

    #[test]
    fn unicode_range_covers_full_span() {
        let input = "U+1F??-2FFF";
        match parse_urange(input) {
            ComponentValue::UnicodeRange(range) => {
                assert_eq!(range.location.start, 0);
                assert_eq!(range.location.end, input.len());
            }
            other => panic!("expected a unicode range, got {other:?}"),
        }
    }

    #[test]
    fn rejects_whitespace_in_candidate() {
        // `u +26` is an ident followed by a number, not a range
        let mut parser = Css3::new("u +26");
        let values = parser.parse_component_values();

        assert!(values
            .iter()
            .all(|v| !matches!(v, ComponentValue::UnicodeRange(_))));
    }

    #[test]
    fn rejects_non_hex_candidate() {
        // `u+i` matches the token pattern but fails the text shape
        let mut parser = Css3::new("u+i");
        let values = parser.parse_component_values();

        assert!(matches!(values[0], ComponentValue::Token(_)));
        assert!(parser.errors().is_empty());
    }

    #[test]
    fn out_of_bounds_range_is_rejected_with_error() {
        let mut parser = Css3::new("U+FFFFFF");
        let values = parser.parse_component_values();

        assert!(values
            .iter()
            .all(|v| !matches!(v, ComponentValue::UnicodeRange(_))));
        let errors = parser.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "invalid unicode range");
    }

    #[test]
    fn backwards_range_is_rejected_with_error() {
        let mut parser = Css3::new("U+40-20");
        let values = parser.parse_component_values();

        assert!(values
            .iter()
            .all(|v| !matches!(v, ComponentValue::UnicodeRange(_))));
        assert_eq!(parser.errors()[0].message, "invalid unicode range");
    }
}
