use crate::unicode::UnicodeChar;
use sable_shared::char_stream::Character::Ch;
use sable_shared::char_stream::{CharStream, Character};
use sable_shared::errors::CssError;
use sable_shared::location::Location;
use std::fmt;

pub type Number = f64;

/// Type flag of a `<number-token>`, `<percentage-token>` or
/// `<dimension-token>`. The flag is "number" iff the representation contained
/// a fractional part or an exponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    Integer,
    Number,
}

/// Type flag of a `<hash-token>`. The flag is "id" iff the code points after
/// the `#` would start an ident sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashKind {
    Id,
    Unrestricted,
}

#[derive(Debug, PartialEq, Clone)]
pub enum TokenType {
    /// A [`<at-keyword-token>`](https://drafts.csswg.org/css-syntax/#at-keyword-token-diagram)
    ///
    /// The value does not include the `@` marker.
    AtKeyword(String),
    Ident(String),
    Function(String),
    Url(String),
    BadUrl(String),
    Dimension {
        value: Number,
        kind: NumberKind,
        unit: String,
    },
    Percentage {
        value: Number,
        kind: NumberKind,
    },
    Number {
        value: Number,
        kind: NumberKind,
    },
    /// A [`<string-token>`](https://drafts.csswg.org/css-syntax/#string-token-diagram)
    ///
    /// The value does not include the quotes.
    QuotedString(String),
    /// A `<bad-string-token>`
    ///
    /// This token always indicates a parse error.
    BadString(String),
    /// A [`<whitespace-token>`](https://drafts.csswg.org/css-syntax/#whitespace-token-diagram)
    ///
    /// The value holds the coalesced whitespace run so the token slices
    /// concatenate back to the preprocessed input.
    Whitespace(String),
    /// A [`<hash-token>`](https://drafts.csswg.org/css-syntax/#hash-token-diagram)
    ///
    /// The value does not include the `#` marker.
    Hash {
        value: String,
        kind: HashKind,
    },
    /// A `<delim-token>`
    Delim(char),
    /// A `<{-token>`
    LCurly,
    /// A `<}-token>`
    RCurly,
    /// A `<(-token>`
    LParen,
    /// A `<)-token>`
    RParen,
    /// A `<[-token>`
    LBracket,
    /// A `<]-token>`
    RBracket,
    /// A `<comma-token>`
    Comma,
    /// A `:` `<colon-token>`
    Colon,
    /// A `;` `<semicolon-token>`
    Semicolon,
    // A `<!--` `<CDO-token>`
    Cdo,
    // A `-->` `<CDC-token>`
    Cdc,
    // A `<EOF-token>`, zero width
    Eof,
    // A comment, including the `/*` and `*/` markers
    Comment(String),
}

#[derive(Clone, PartialEq, Debug)]
pub struct Token {
    /// Type of the token
    pub token_type: TokenType,
    /// Location of the token in the stream
    pub location: Location,
}

impl Token {
    /// Returns a new token for the given type on the given location
    pub(crate) fn new(token_type: TokenType, location: Location) -> Token {
        Token {
            token_type,
            location,
        }
    }

    pub(crate) fn new_eof(offset: usize) -> Token {
        Token::new(TokenType::Eof, Location::at(offset))
    }
}

impl Token {
    pub(crate) fn is_eof(&self) -> bool {
        matches!(self.token_type, TokenType::Eof)
    }

    pub(crate) fn is_whitespace(&self) -> bool {
        matches!(self.token_type, TokenType::Whitespace(_))
    }

    pub(crate) fn is_comment(&self) -> bool {
        matches!(self.token_type, TokenType::Comment(_))
    }

    pub(crate) fn is_ident(&self) -> bool {
        matches!(self.token_type, TokenType::Ident(_))
    }

    pub(crate) fn is_colon(&self) -> bool {
        matches!(self.token_type, TokenType::Colon)
    }

    pub(crate) fn is_semicolon(&self) -> bool {
        matches!(self.token_type, TokenType::Semicolon)
    }

    pub(crate) fn is_delim(&self, delim: char) -> bool {
        matches!(self.token_type, TokenType::Delim(c) if c == delim)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let string = match self.token_type.clone() {
            TokenType::AtKeyword(val) => format!("@{val}"),
            TokenType::Url(val) => format!("url({val})"),
            TokenType::BadUrl(val) => format!("url({val}"),
            TokenType::Hash { value, .. } => format!("#{value}"),
            TokenType::QuotedString(val) => format!("\"{val}\""),
            TokenType::BadString(val) => format!("\"{val}"),
            TokenType::Function(val) => format!("{val}("),
            TokenType::Comment(val) | TokenType::Ident(val) => val,
            TokenType::Delim(val) => val.to_string(),
            TokenType::Number { value, .. } => value.to_string(),
            TokenType::Percentage { value, .. } => format!("{value}%"),
            TokenType::Dimension { value, unit, .. } => format!("{value}{unit}"),
            TokenType::Cdc => "-->".into(),
            TokenType::Cdo => "<!--".into(),
            TokenType::Colon => ":".into(),
            TokenType::Semicolon => ";".into(),
            TokenType::Comma => ",".into(),
            TokenType::LBracket => "[".into(),
            TokenType::RBracket => "]".into(),
            TokenType::LCurly => "{".into(),
            TokenType::RCurly => "}".into(),
            TokenType::LParen => "(".into(),
            TokenType::RParen => ")".into(),
            TokenType::Whitespace(_) => " ".into(),
            TokenType::Eof => "".into(),
        };

        write!(f, "{string}")
    }
}

/// CSS Tokenizer according to the [w3 specification](https://www.w3.org/TR/css-syntax-3/#tokenization)
///
/// Tokens are produced lazily, one per `consume_token` call, and carry
/// half-open `[start, end)` locations into the preprocessed character
/// sequence. Tokenization errors are recoverable: a best-effort token is
/// emitted and the error is appended to the error list.
pub struct Tokenizer<'stream> {
    stream: &'stream mut CharStream,
    /// Position of the NEXT token to consume. If it's outside the vec list, it will return EOF
    position: usize,
    /// Full list of all tokens produced so far
    tokens: Vec<Token>,
    /// Recoverable tokenization errors in discovery order
    errors: Vec<CssError>,
}

impl<'stream> Tokenizer<'stream> {
    /// Creates a new tokenizer over the given (preprocessed) stream
    pub fn new(stream: &'stream mut CharStream) -> Self {
        Self {
            stream,
            position: 0,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Returns true when the next token to consume is EOF
    pub fn eof(&mut self) -> bool {
        self.lookahead(0).is_eof()
    }

    /// Recoverable errors found so far
    pub fn errors(&self) -> &[CssError] {
        &self.errors
    }

    /// Looks ahead at the next token with offset. So lookahead(0) will look at
    /// the token that will be returned by the next consume()
    pub fn lookahead(&mut self, offset: usize) -> Token {
        while self.tokens.len() <= self.position + offset && !self.fully_tokenized() {
            let token = self.consume_token();
            self.tokens.push(token);
        }

        match self.tokens.get(self.position + offset) {
            Some(token) => token.clone(),
            // past the end of a fully tokenized stream everything is EOF
            None => Token::new_eof(self.stream.length()),
        }
    }

    /// Looks ahead at the next NON-WHITESPACE AND NON-COMMENT token.
    pub fn lookahead_sc(&mut self, offset: usize) -> Token {
        let mut i = offset;

        loop {
            let t = self.lookahead(i);
            if t.is_whitespace() || t.is_comment() {
                i += 1;
                continue;
            }
            return t;
        }
    }

    /// Consumes the next token and returns it
    pub fn consume(&mut self) -> Token {
        let token = self.lookahead(0);
        if !token.is_eof() {
            self.position += 1;
        }

        log::trace!("{:?}", token);

        token
    }

    /// Reconsume will push the current position back so the next read will be the same token
    pub fn reconsume(&mut self) {
        if self.position > 0 {
            self.position -= 1;
        }
    }

    /// Drives the tokenizer to the end of the stream and returns the complete
    /// token list (terminated by an EOF token) together with the errors.
    pub fn materialize(mut self) -> (Vec<Token>, Vec<CssError>) {
        while !self.fully_tokenized() {
            let token = self.consume_token();
            self.tokens.push(token);
        }

        (self.tokens, self.errors)
    }

    fn fully_tokenized(&self) -> bool {
        self.tokens.last().is_some_and(Token::is_eof)
    }

    fn token(&self, token_type: TokenType, start: usize) -> Token {
        Token::new(token_type, Location::new(start, self.stream.tell()))
    }

    fn error(&mut self, message: &str, start: usize) {
        self.errors.push(CssError::with_location(
            message,
            Location::new(start, self.stream.tell()),
        ));
    }

    /// 4.3.1. [Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    fn consume_token(&mut self) -> Token {
        let start = self.stream.tell();

        match self.stream.read() {
            Character::StreamEnd => Token::new_eof(start),
            Ch('/') if self.stream.look_ahead(1) == Ch('*') => self.consume_comment(start),
            c if c.is_whitespace() => self.consume_whitespace(start),
            Ch('"' | '\'') => self.consume_string_token(start),
            Ch('#') => {
                // consume '#'
                self.stream.next();

                if self.is_ident_char_at(0) || self.is_valid_escape(0) {
                    let kind = if self.would_start_ident(0) {
                        HashKind::Id
                    } else {
                        HashKind::Unrestricted
                    };
                    let value = self.consume_ident_sequence();
                    return self.token(TokenType::Hash { value, kind }, start);
                }

                self.token(TokenType::Delim('#'), start)
            }
            Ch('(') => self.consume_single(TokenType::LParen, start),
            Ch(')') => self.consume_single(TokenType::RParen, start),
            Ch('[') => self.consume_single(TokenType::LBracket, start),
            Ch(']') => self.consume_single(TokenType::RBracket, start),
            Ch('{') => self.consume_single(TokenType::LCurly, start),
            Ch('}') => self.consume_single(TokenType::RCurly, start),
            Ch(',') => self.consume_single(TokenType::Comma, start),
            Ch(':') => self.consume_single(TokenType::Colon, start),
            Ch(';') => self.consume_single(TokenType::Semicolon, start),
            Ch('+') => {
                if self.would_start_number(0) {
                    return self.consume_numeric_token(start);
                }

                self.consume_single(TokenType::Delim('+'), start)
            }
            Ch('.') => {
                if self.would_start_number(0) {
                    return self.consume_numeric_token(start);
                }

                self.consume_single(TokenType::Delim('.'), start)
            }
            Ch('-') => {
                if self.would_start_number(0) {
                    return self.consume_numeric_token(start);
                }

                if self.stream.look_ahead(1) == Ch('-') && self.stream.look_ahead(2) == Ch('>') {
                    self.stream.next_n(3);
                    return self.token(TokenType::Cdc, start);
                }

                if self.would_start_ident(0) {
                    return self.consume_ident_like(start);
                }

                self.consume_single(TokenType::Delim('-'), start)
            }
            Ch('<') => {
                if self.stream.look_ahead(1) == Ch('!')
                    && self.stream.look_ahead(2) == Ch('-')
                    && self.stream.look_ahead(3) == Ch('-')
                {
                    self.stream.next_n(4);
                    return self.token(TokenType::Cdo, start);
                }

                self.consume_single(TokenType::Delim('<'), start)
            }
            Ch('@') => {
                if self.would_start_ident(1) {
                    // consume '@'
                    self.stream.next();
                    let keyword = self.consume_ident_sequence();
                    return self.token(TokenType::AtKeyword(keyword), start);
                }

                self.consume_single(TokenType::Delim('@'), start)
            }
            Ch('\\') => {
                if self.is_valid_escape(0) {
                    return self.consume_ident_like(start);
                }

                self.error("invalid escape", start);
                self.consume_single(TokenType::Delim('\\'), start)
            }
            c if c.is_numeric() => self.consume_numeric_token(start),
            Ch(c) if self.is_ident_start(c) => self.consume_ident_like(start),
            Ch(c) => self.consume_single(TokenType::Delim(c), start),
        }
    }

    fn consume_single(&mut self, token_type: TokenType, start: usize) -> Token {
        self.stream.next();
        self.token(token_type, start)
    }

    /// 4.3.2. [Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comment)
    ///
    /// The comment text keeps its `/*` and `*/` markers so that token slices
    /// concatenate back to the input.
    fn consume_comment(&mut self, start: usize) -> Token {
        let mut comment = String::new();

        // consume '/*'
        comment.push(self.stream.read_and_next().into());
        comment.push(self.stream.read_and_next().into());

        loop {
            if self.stream.eof() {
                self.error("unterminated comment", start);
                break;
            }

            if self.stream.read() == Ch('*') && self.stream.look_ahead(1) == Ch('/') {
                // consume '*/'
                comment.push(self.stream.read_and_next().into());
                comment.push(self.stream.read_and_next().into());
                break;
            }

            comment.push(self.stream.read_and_next().into());
        }

        self.token(TokenType::Comment(comment), start)
    }

    /// 4.3.1 whitespace: consume as much whitespace as possible into one token
    fn consume_whitespace(&mut self, start: usize) -> Token {
        let mut value = String::new();

        while self.stream.read().is_whitespace() {
            value.push(self.stream.read_and_next().into());
        }

        self.token(TokenType::Whitespace(value), start)
    }

    /// 4.3.5. [Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    ///
    /// Returns either a `<string-token>` or `<bad-string-token>`.
    fn consume_string_token(&mut self, start: usize) -> Token {
        // consume string starting: (') or (") ...
        let ending = self.stream.read_and_next();
        let mut value = String::new();

        loop {
            let c = self.stream.read();

            if c == Character::StreamEnd {
                self.error("unterminated string", start);
                return self.token(TokenType::QuotedString(value), start);
            }

            if c == ending {
                // consume string ending
                self.stream.next();
                return self.token(TokenType::QuotedString(value), start);
            }

            // note: the newline is not consumed
            if c == Ch('\n') {
                self.error("newline in string", start);
                return self.token(TokenType::BadString(value), start);
            }

            if c == Ch('\\') {
                match self.stream.look_ahead(1) {
                    // a backslash at the very end of the input is dropped
                    Character::StreamEnd => self.stream.next(),
                    // an escaped newline continues the string on the next line
                    Ch('\n') => self.stream.next_n(2),
                    _ => value.push(self.consume_escaped_token()),
                }
                continue;
            }

            value.push(self.stream.read_and_next().into());
        }
    }

    /// 4.3.7. [Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-an-escaped-code-point)
    ///
    /// The backslash itself is consumed here as well. NUL, surrogates and
    /// anything above U+10FFFF decode to the replacement character.
    fn consume_escaped_token(&mut self) -> char {
        let start = self.stream.tell();

        // consume '\'
        self.stream.next();

        if self.stream.eof() {
            self.error("invalid escape", start);
            return UnicodeChar::REPLACEMENT_CHARACTER;
        }

        if !self.stream.read().is_hex_digit() {
            return self.stream.read_and_next().into();
        }

        let mut value = String::new();
        while self.stream.read().is_hex_digit() && value.len() < 6 {
            value.push(self.stream.read_and_next().into());
        }

        // a single whitespace after the hex digits is part of the escape
        if self.stream.read().is_whitespace() {
            self.stream.next();
        }

        let code_point = u32::from_str_radix(&value, 16).unwrap_or(0);
        if code_point == 0 || code_point > UnicodeChar::MAX_ALLOWED {
            return UnicodeChar::REPLACEMENT_CHARACTER;
        }

        // from_u32 returns None for surrogate code points
        char::from_u32(code_point).unwrap_or(UnicodeChar::REPLACEMENT_CHARACTER)
    }

    /// 4.3.11. [Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    ///
    /// Note: that algorithm does not do the verification that is necessary to
    /// ensure the returned code points would constitute an `<ident-token>`.
    /// Caller should ensure that the stream starts with an ident sequence
    /// before calling this algorithm.
    fn consume_ident_sequence(&mut self) -> String {
        let mut value = String::new();

        loop {
            if self.is_valid_escape(0) {
                value.push(self.consume_escaped_token());
                continue;
            }

            match self.stream.read() {
                Ch(c) if self.is_ident_char(c) => {
                    value.push(c);
                    self.stream.next();
                }
                _ => break,
            }
        }

        value
    }

    /// 4.3.12. [Consume a number](https://www.w3.org/TR/css-syntax-3/#consume-number)
    ///
    /// The value is computed from the parsed representation parts; the kind is
    /// "number" iff the representation contained a fraction or an exponent.
    fn consume_number(&mut self) -> (Number, NumberKind) {
        let mut kind = NumberKind::Integer;

        let mut sign = 1.0;
        if matches!(self.stream.read(), Ch('+' | '-')) {
            if self.stream.read() == Ch('-') {
                sign = -1.0;
            }
            self.stream.next();
        }

        let mut integer = 0.0;
        while let Ch(c) = self.stream.read() {
            let Some(digit) = c.to_digit(10) else { break };
            integer = integer * 10.0 + f64::from(digit);
            self.stream.next();
        }

        let mut fraction = 0.0;
        let mut fraction_digits = 0i32;
        if self.stream.read() == Ch('.') && self.stream.look_ahead(1).is_numeric() {
            kind = NumberKind::Number;

            // consume '.'
            self.stream.next();
            while let Ch(c) = self.stream.read() {
                let Some(digit) = c.to_digit(10) else { break };
                fraction = fraction * 10.0 + f64::from(digit);
                fraction_digits += 1;
                self.stream.next();
            }
        }

        let mut exp_sign = 1.0;
        let mut exponent = 0.0;
        if matches!(self.stream.read(), Ch('e' | 'E')) {
            let next = self.stream.look_ahead(1);
            let has_exponent = next.is_numeric()
                || (matches!(next, Ch('+' | '-')) && self.stream.look_ahead(2).is_numeric());

            if has_exponent {
                kind = NumberKind::Number;

                // consume 'e'
                self.stream.next();
                if matches!(self.stream.read(), Ch('+' | '-')) {
                    if self.stream.read() == Ch('-') {
                        exp_sign = -1.0;
                    }
                    self.stream.next();
                }
                while let Ch(c) = self.stream.read() {
                    let Some(digit) = c.to_digit(10) else { break };
                    exponent = exponent * 10.0 + f64::from(digit);
                    self.stream.next();
                }
            }
        }

        let value =
            sign * (integer + fraction * 10f64.powi(-fraction_digits)) * 10f64.powf(exp_sign * exponent);

        (value, kind)
    }

    /// 4.3.3. [Consume a numeric token](https://www.w3.org/TR/css-syntax-3/#consume-numeric-token)
    ///
    /// Returns either a `<number-token>`, `<percentage-token>`, or `<dimension-token>`.
    fn consume_numeric_token(&mut self, start: usize) -> Token {
        let (value, kind) = self.consume_number();

        if self.would_start_ident(0) {
            let unit = self.consume_ident_sequence();
            return self.token(TokenType::Dimension { value, kind, unit }, start);
        }

        if self.stream.read() == Ch('%') {
            // consume '%'
            self.stream.next();
            return self.token(TokenType::Percentage { value, kind }, start);
        }

        self.token(TokenType::Number { value, kind }, start)
    }

    /// 4.3.4. [Consume an ident-like token](https://www.w3.org/TR/css-syntax-3/#consume-ident-like-token)
    ///
    /// Returns: `<ident-token>`, `<function-token>`, `<url-token>`, or `<bad-url-token>`.
    fn consume_ident_like(&mut self, start: usize) -> Token {
        let value = self.consume_ident_sequence();

        if self.stream.read() == Ch('(') {
            if value.eq_ignore_ascii_case("url") {
                // peek past the whitespace after '(': a quote makes this a
                // plain function token, everything else a url token
                let mut offset = 1;
                while self.stream.look_ahead(offset).is_whitespace() {
                    offset += 1;
                }

                if matches!(self.stream.look_ahead(offset), Ch('"' | '\'')) {
                    // consume '('
                    self.stream.next();
                    return self.token(TokenType::Function(value), start);
                }

                // consume '('
                self.stream.next();
                return self.consume_url(start);
            }

            // consume '('
            self.stream.next();
            return self.token(TokenType::Function(value), start);
        }

        self.token(TokenType::Ident(value), start)
    }

    /// 4.3.6. [Consume a url token](https://www.w3.org/TR/css-syntax-3/#consume-a-url-token)
    ///
    /// Returns either a `<url-token>` or a `<bad-url-token>`
    fn consume_url(&mut self, start: usize) -> Token {
        let mut url = String::new();

        while self.stream.read().is_whitespace() {
            self.stream.next();
        }

        loop {
            match self.stream.read() {
                Character::StreamEnd => {
                    self.error("unterminated url", start);
                    return self.token(TokenType::Url(url), start);
                }
                Ch(')') => {
                    // consume ')'
                    self.stream.next();
                    return self.token(TokenType::Url(url), start);
                }
                c if c.is_whitespace() => {
                    while self.stream.read().is_whitespace() {
                        self.stream.next();
                    }

                    match self.stream.read() {
                        Ch(')') => {
                            self.stream.next();
                            return self.token(TokenType::Url(url), start);
                        }
                        Character::StreamEnd => {
                            self.error("unterminated url", start);
                            return self.token(TokenType::Url(url), start);
                        }
                        _ => {
                            self.error("invalid character in url", start);
                            self.consume_bad_url_remnants();
                            return self.token(TokenType::BadUrl(url), start);
                        }
                    }
                }
                Ch('"' | '\'' | '(') => {
                    self.error("invalid character in url", start);
                    self.consume_bad_url_remnants();
                    return self.token(TokenType::BadUrl(url), start);
                }
                Ch(c) if self.is_non_printable(c) => {
                    self.error("invalid character in url", start);
                    self.consume_bad_url_remnants();
                    return self.token(TokenType::BadUrl(url), start);
                }
                Ch('\\') => {
                    if self.is_valid_escape(0) {
                        url.push(self.consume_escaped_token());
                        continue;
                    }

                    self.error("invalid escape in url", start);
                    self.consume_bad_url_remnants();
                    return self.token(TokenType::BadUrl(url), start);
                }
                Ch(c) => {
                    url.push(c);
                    self.stream.next();
                }
            }
        }
    }

    /// 4.3.14. [Consume the remnants of a bad url](https://www.w3.org/TR/css-syntax-3/#consume-remnants-of-bad-url)
    ///
    /// Used to consume enough of the input stream to reach a recovery point
    /// where normal tokenizing can resume.
    fn consume_bad_url_remnants(&mut self) {
        loop {
            match self.stream.read() {
                Character::StreamEnd => break,
                Ch(')') => {
                    // recovery point
                    self.stream.next();
                    break;
                }
                _ => {
                    if self.is_valid_escape(0) {
                        self.consume_escaped_token();
                    } else {
                        self.stream.next();
                    }
                }
            }
        }
    }

    /// [ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
    fn is_ident_start(&self, c: char) -> bool {
        c.is_alphabetic() || !c.is_ascii() || c == '_'
    }

    /// [ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
    fn is_ident_char(&self, c: char) -> bool {
        self.is_ident_start(c) || c.is_ascii_digit() || c == '-'
    }

    fn is_ident_char_at(&self, offset: usize) -> bool {
        matches!(self.stream.look_ahead(offset), Ch(c) if self.is_ident_char(c))
    }

    /// def: [non-printable code point](https://www.w3.org/TR/css-syntax-3/#non-printable-code-point)
    fn is_non_printable(&self, c: char) -> bool {
        (UnicodeChar::NULL..=UnicodeChar::BACKSPACE).contains(&c)
            || c == UnicodeChar::LINE_TABULATION
            || (UnicodeChar::SHIFT_OUT..=UnicodeChar::INFORMATION_SEPARATOR_ONE).contains(&c)
            || c == UnicodeChar::DELETE
    }

    /// 4.3.8. [Check if two code points are a valid escape](https://www.w3.org/TR/css-syntax-3/#starts-with-a-valid-escape)
    fn is_valid_escape(&self, offset: usize) -> bool {
        self.stream.look_ahead(offset) == Ch('\\')
            && self.stream.look_ahead(offset + 1) != Ch('\n')
    }

    /// 4.3.9. [Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#check-if-three-code-points-would-start-an-ident-sequence)
    fn would_start_ident(&self, offset: usize) -> bool {
        match self.stream.look_ahead(offset) {
            Ch('-') => {
                matches!(self.stream.look_ahead(offset + 1), Ch(c) if self.is_ident_start(c) || c == '-')
                    || self.is_valid_escape(offset + 1)
            }
            Ch('\\') => self.is_valid_escape(offset),
            Ch(c) => self.is_ident_start(c),
            _ => false,
        }
    }

    /// 4.3.10. [Check if three code points would start a number](https://www.w3.org/TR/css-syntax-3/#starts-with-a-number)
    fn would_start_number(&self, offset: usize) -> bool {
        match self.stream.look_ahead(offset) {
            Ch('+' | '-') => {
                self.stream.look_ahead(offset + 1).is_numeric()
                    || (self.stream.look_ahead(offset + 1) == Ch('.')
                        && self.stream.look_ahead(offset + 2).is_numeric())
            }
            Ch('.') => self.stream.look_ahead(offset + 1).is_numeric(),
            c => c.is_numeric(),
        }
    }
}

/// TokenStream is the materialized form of the token sequence: every token is
/// in memory and the stream is addressed by an integer cursor. This is what
/// the grammar parser consumes, and what makes transactional backtracking
/// (`position` / `rewind`) cheap: only the cursor moves, never the tokens.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    /// Position of the next token to consume
    position: usize,
}

impl TokenStream {
    /// Creates a stream over the given tokens. A synthetic EOF token is
    /// appended when the list does not already end in one.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(Token::is_eof) {
            let offset = tokens.last().map_or(0, |t| t.location.end);
            tokens.push(Token::new_eof(offset));
        }

        Self {
            tokens,
            position: 0,
        }
    }

    /// Consumes the next token and returns it. At the end of the stream the
    /// EOF token is returned over and over.
    pub fn consume(&mut self) -> Token {
        let token = self.lookahead(0);
        if !token.is_eof() {
            self.position += 1;
        }

        log::trace!("{:?}", token);

        token
    }

    /// Reconsume will push the current position back so the next read will be the same token
    pub fn reconsume(&mut self) {
        if self.position > 0 {
            self.position -= 1;
        }
    }

    /// Looks ahead at the next token with offset. So lookahead(0) will look at
    /// the token that will be returned by the next consume()
    pub fn lookahead(&self, offset: usize) -> Token {
        match self.tokens.get(self.position + offset) {
            Some(token) => token.clone(),
            None => self
                .tokens
                .last()
                .cloned()
                .unwrap_or_else(|| Token::new_eof(0)),
        }
    }

    /// Looks ahead at the next NON-WHITESPACE AND NON-COMMENT token.
    pub fn lookahead_sc(&self, offset: usize) -> Token {
        let mut i = offset;

        loop {
            let t = self.lookahead(i);
            if t.is_whitespace() || t.is_comment() {
                i += 1;
                continue;
            }
            return t;
        }
    }

    /// Returns true when the next token to consume is EOF
    pub fn eof(&self) -> bool {
        self.lookahead(0).is_eof()
    }

    /// Location of the next token to consume
    pub fn current_location(&self) -> Location {
        self.lookahead(0).location
    }

    /// Current cursor value, for transactional backtracking
    pub fn position(&self) -> usize {
        self.position
    }

    /// Restores a cursor value previously obtained from `position()`
    pub fn rewind(&mut self, position: usize) {
        self.position = position.min(self.tokens.len());
    }

    /// All tokens in the stream, including the trailing EOF
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}
