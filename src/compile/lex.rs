pub mod state;
pub mod token;

use crate::{
    compile::{is_reserved, keyword, Operator},
    log::{expected_operator, Error, ErrorKind, INVALID_SYNTAX, UNEXPECTED_TOKEN},
    region::Region,
};

use self::{state::CursorState, token::Token};

pub type LexResult = Result<Option<(Token, Region)>, Error>;
pub type LexResultMust = Result<(Token, Region), Error>;

/// Marker that opens an expression.
const BEGIN_EXPRESSION: &str = "${";

/// Provides methods to read a source string as [`Token`] instances.
pub struct Lexer<'source> {
    /// Reference to the source text.
    pub source: &'source str,
    /// Position within source.
    pub cursor: usize,
    /// Tracks the [`Lexer`] state and determines the action taken
    /// when `.next` is called.
    state: CursorState,
    /// Temporary storage for the a [`Token`] that will be read
    /// on the following call to `.next`
    buffer: Option<(Token, Region)>,
}

impl<'source> Lexer<'source> {
    /// Create a new [`Lexer`] over the given source.
    #[inline]
    pub fn new(source: &'source str) -> Self {
        Self {
            state: CursorState::Default,
            source,
            cursor: 0,
            buffer: None,
        }
    }

    /// Return the next [`Token`] and [`Region`].
    ///
    /// Any instance of [`Token::Whitespace`] is ignored.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when an unexpected character is found.
    pub fn next(&mut self) -> LexResult {
        loop {
            // Always prefer taking from the buffer when possible.
            if let Some(next) = self.buffer.take() {
                return Ok(Some(next));
            }
            if self.source[self.cursor..].is_empty() {
                return Ok(None);
            }

            let c = self.cursor;
            let result = match self.state {
                CursorState::Default => self.lex_default(c),
                CursorState::Inside => self.lex_tag(c),
            }?;

            return match result {
                Some((Token::Whitespace, _)) => continue,
                other => Ok(other),
            };
        }
    }

    /// Return the next [`Token`] and [`Region`] in
    /// [`Default`][`CursorState::Default`] configuration.
    ///
    /// Assumes the cursor is outside of an expression. A `${` preceded by an
    /// odd number of backslashes is emitted as [`Token::Raw`] and the last
    /// backslash is dropped. Every other backslash is kept as raw text.
    fn lex_default(&mut self, from: usize) -> LexResult {
        let source = self.source;

        match find_marker(source, from) {
            Some((marker_begin, escaped)) => {
                let marker_end = marker_begin + BEGIN_EXPRESSION.len();
                let token = if escaped {
                    Token::Raw
                } else {
                    self.state = CursorState::Inside;
                    Token::BeginExpression
                };
                let text_end = if escaped {
                    marker_begin - 1
                } else {
                    marker_begin
                };
                self.cursor = marker_end;

                if from == text_end {
                    Ok(Some((token, (marker_begin..marker_end).into())))
                } else {
                    self.buffer = Some((token, (marker_begin..marker_end).into()));

                    Ok(Some((Token::Raw, (from..text_end).into())))
                }
            }
            None => {
                self.cursor = source.len();

                Ok(Some((Token::Raw, (from..source.len()).into())))
            }
        }
    }

    /// Return the next [`Token`] and [`Region`] in
    /// [`Inside`][`CursorState::Inside`] configuration.
    ///
    /// Assumes the cursor is inside of an expression.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when an unexpected character is found.
    fn lex_tag(&mut self, from: usize) -> LexResult {
        let source = self.source;
        let Some(char) = source[from..].chars().next() else {
            return Ok(None);
        };
        let following = source[from + char.len_utf8()..].chars().next();

        let mut advance = |length: usize, token: Token| {
            self.cursor = from + length;

            Ok(Some((token, (from..from + length).into())))
        };

        match char {
            '}' => {
                self.state = CursorState::Default;
                advance(1, Token::EndExpression)
            }
            '.' if following.is_some_and(|c| c.is_ascii_digit()) => Ok(Some(self.lex_number(from))),
            '.' => advance(1, Token::Period),
            '?' => match following {
                Some('?') => advance(2, Token::Operator(Operator::Nullish)),
                // `a?.5:1` is a conditional, not an optional chain.
                Some('.') if !source[from + 2..].starts_with(|c: char| c.is_ascii_digit()) => {
                    advance(2, Token::OptionalChain)
                }
                _ => advance(1, Token::Question),
            },
            ':' => advance(1, Token::Colon),
            ',' => advance(1, Token::Comma),
            '(' => advance(1, Token::OpenParen),
            ')' => advance(1, Token::CloseParen),
            '[' => advance(1, Token::OpenBracket),
            ']' => advance(1, Token::CloseBracket),
            '+' => advance(1, Token::Operator(Operator::Add)),
            '-' => advance(1, Token::Operator(Operator::Subtract)),
            '*' => advance(1, Token::Operator(Operator::Multiply)),
            '/' => advance(1, Token::Operator(Operator::Divide)),
            '%' => advance(1, Token::Operator(Operator::Remainder)),
            '\'' | '"' => self.lex_string(from, char),
            '=' | '!' | '>' | '<' | '&' | '|' => self.lex_operator(from, char),
            '`' => Err(Error::build(ErrorKind::Syntax, UNEXPECTED_TOKEN)
                .with_pointer(source, from..from + 1)
                .with_help(
                    "template literals cannot be nested inside of an expression, \
                    use a string literal marked with `'` or `\"`",
                )),
            c if c.is_whitespace() => Ok(Some(self.lex_whitespace(from))),
            c if c.is_ascii_digit() => Ok(Some(self.lex_number(from))),
            c if is_ident_start(c) => Ok(Some(self.lex_ident_or_keyword(from))),
            _ => Err(Error::build(ErrorKind::Syntax, UNEXPECTED_TOKEN)
                .with_pointer(source, from..from + char.len_utf8())
                .with_help(
                    "expected an identifier, a number, an operator, `}` or the \
                    beginning of a string literal marked with `'` or `\"`",
                )),
        }
    }

    /// Return a [`Token`] and [`Region`] for an operator beginning with
    /// the given character.
    ///
    /// All of these are recognized:
    ///
    /// `===`, `!==`, `==`, `!=`, `>=`, `<=`, `&&`, `||`, `=`, `!`, `>`, `<`
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when a lone `&` or `|` is found.
    fn lex_operator(&mut self, from: usize, first: char) -> LexResult {
        let rest = &self.source[from..];
        let (length, token) = if rest.starts_with("===") {
            (3, Token::Operator(Operator::StrictEqual))
        } else if rest.starts_with("!==") {
            (3, Token::Operator(Operator::StrictNotEqual))
        } else if rest.starts_with("==") {
            (2, Token::Operator(Operator::Equal))
        } else if rest.starts_with("!=") {
            (2, Token::Operator(Operator::NotEqual))
        } else if rest.starts_with(">=") {
            (2, Token::Operator(Operator::GreaterOrEqual))
        } else if rest.starts_with("<=") {
            (2, Token::Operator(Operator::LesserOrEqual))
        } else if rest.starts_with("&&") {
            (2, Token::Operator(Operator::And))
        } else if rest.starts_with("||") {
            (2, Token::Operator(Operator::Or))
        } else {
            match first {
                '=' => (1, Token::Assign),
                '!' => (1, Token::Exclamation),
                '>' => (1, Token::Operator(Operator::Greater)),
                '<' => (1, Token::Operator(Operator::Lesser)),
                _ => {
                    return Err(Error::build(ErrorKind::Syntax, UNEXPECTED_TOKEN)
                        .with_pointer(self.source, from..from + 1)
                        .with_help(expected_operator(first)));
                }
            }
        };
        self.cursor = from + length;

        Ok(Some((token, (from..from + length).into())))
    }

    /// Return a [`Token`] and [`Region`] containing [`Token::Number`].
    ///
    /// Recognizes decimal numbers with an optional fraction and exponent,
    /// and hexadecimal numbers beginning with `0x`.
    fn lex_number(&mut self, from: usize) -> (Token, Region) {
        let bytes = self.source.as_bytes();
        let digits_from = |mut at: usize, accept: fn(&u8) -> bool| {
            while bytes.get(at).is_some_and(accept) {
                at += 1;
            }
            at
        };

        let is_hex = bytes.get(from) == Some(&b'0')
            && matches!(bytes.get(from + 1), Some(b'x' | b'X'))
            && bytes.get(from + 2).is_some_and(u8::is_ascii_hexdigit);

        let end = if is_hex {
            digits_from(from + 2, u8::is_ascii_hexdigit)
        } else {
            let mut end = digits_from(from, u8::is_ascii_digit);
            if bytes.get(end) == Some(&b'.') {
                end = digits_from(end + 1, u8::is_ascii_digit);
            }
            if matches!(bytes.get(end), Some(b'e' | b'E')) {
                let mut probe = end + 1;
                if matches!(bytes.get(probe), Some(b'+' | b'-')) {
                    probe += 1;
                }
                if bytes.get(probe).is_some_and(u8::is_ascii_digit) {
                    end = digits_from(probe, u8::is_ascii_digit);
                }
            }
            end
        };
        self.cursor = end;

        (Token::Number, (from..end).into())
    }

    /// Return a [`Token`] and [`Region`] containing [`Token::Whitespace`].
    fn lex_whitespace(&mut self, from: usize) -> (Token, Region) {
        let rest = &self.source[from..];
        let end = rest
            .find(|c: char| !c.is_whitespace())
            .map(|offset| from + offset)
            .unwrap_or(self.source.len());
        self.cursor = end;

        (Token::Whitespace, (from..end).into())
    }

    /// Return a [`Token`] and [`Region`] containing [`Token::String`].
    ///
    /// The string ends at the next unescaped `quote`.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the string is not closed on the same line.
    fn lex_string(&mut self, from: usize, quote: char) -> LexResult {
        let mut iter = self.source[from + 1..]
            .char_indices()
            .map(|(d, c)| (from + 1 + d, c))
            .peekable();

        loop {
            match iter.next() {
                Some((index, c)) if c == quote => {
                    // Add one to the index of the character to comply with string slice
                    // semantics.
                    let to = index + 1;
                    self.cursor = to;

                    return Ok(Some((Token::String, (from..to).into())));
                }
                Some((_, '\\')) => {
                    // The escaped character can never end the string.
                    if let Some((_, '\r')) = iter.next() {
                        iter.next_if(|(_, c)| *c == '\n');
                    }
                }
                Some((_, '\n' | '\r')) | None => {
                    let line_end = self.source[from..]
                        .find(['\n', '\r'])
                        .map(|offset| from + offset)
                        .unwrap_or(self.source.len());

                    return Err(Error::build(ErrorKind::Syntax, INVALID_SYNTAX)
                        .with_pointer(self.source, from..line_end)
                        .with_help(format!(
                            "this might be an undelimited string, try closing it with `{quote}`"
                        )));
                }
                Some(_) => continue,
            }
        }
    }

    /// Return a [`Token`] and [`Region`] for an identifier.
    ///
    /// The `Token` will be [`Token::Identifier`], [`Token::Keyword`] or
    /// [`Token::Reserved`].
    fn lex_ident_or_keyword(&mut self, from: usize) -> (Token, Region) {
        let rest = &self.source[from..];
        let end = rest
            .char_indices()
            .skip(1)
            .find(|(_, c)| !is_ident_continue(*c))
            .map(|(offset, _)| from + offset)
            .unwrap_or(self.source.len());
        self.cursor = end;

        let text = &self.source[from..end];
        let token = match keyword(text) {
            Some(keyword) => Token::Keyword(keyword),
            None if is_reserved(text) => Token::Reserved,
            None => Token::Identifier,
        };

        (token, (from..end).into())
    }
}

/// Return the position of the next `${` at or after `from`, and true if
/// the marker is escaped.
///
/// A marker is escaped by an odd run of backslashes directly before it,
/// `\\${` opens an expression after two literal backslashes.
fn find_marker(source: &str, from: usize) -> Option<(usize, bool)> {
    source[from..].find(BEGIN_EXPRESSION).map(|offset| {
        let begin = from + offset;
        let run = source.as_bytes()[from..begin]
            .iter()
            .rev()
            .take_while(|b| **b == b'\\')
            .count();

        (begin, run % 2 == 1)
    })
}

/// Return true if the given character may begin an identifier,
/// meaning `$`, `_` or an `xid_start`.
pub(crate) fn is_ident_start(c: char) -> bool {
    c == '$' || c == '_' || unicode_ident::is_xid_start(c)
}

/// Return true if the given character may continue an identifier,
/// meaning `$`, an `xid_continue`, or a zero width (non-)joiner.
pub(crate) fn is_ident_continue(c: char) -> bool {
    c == '$' || c == '\u{200C}' || c == '\u{200D}' || unicode_ident::is_xid_continue(c)
}

#[cfg(test)]
mod tests {
    use super::{state::CursorState, token::Token, Lexer};
    use crate::{
        compile::{Keyword, Operator},
        log::{Error, ErrorKind},
        region::Region,
    };

    #[test]
    fn test_lex_default_no_match() {
        let expect = vec![(Token::Raw, 0..11)];

        helper_lex_next_auto("lorem ipsum", expect)
    }

    #[test]
    fn test_lex_default_match() {
        let expect = vec![
            (Token::Raw, 0..12),
            (Token::BeginExpression, 12..14),
            (Token::Identifier, 14..19),
        ];

        helper_lex_next_auto("lorem ipsum ${dolor", expect);
    }

    #[test]
    fn test_lex_dollar_without_brace_is_raw() {
        let expect = vec![(Token::Raw, 0..13)];

        helper_lex_next_auto("price: $5 {a}", expect);
    }

    #[test]
    fn test_lex_escaped_marker() {
        let expect = vec![
            (Token::Raw, 0..5),
            (Token::Raw, 6..8),
            (Token::Raw, 8..13),
        ];

        helper_lex_next_auto("cost \\${name}", expect);
    }

    #[test]
    fn test_lex_escaped_marker_at_start() {
        let expect = vec![(Token::Raw, 1..3), (Token::Raw, 3..4)];

        helper_lex_next_auto("\\${}", expect);
    }

    #[test]
    fn test_lex_escaped_marker_backslash_run() {
        let expect = vec![
            (Token::Raw, 0..4),
            (Token::BeginExpression, 4..6),
            (Token::Identifier, 6..7),
            (Token::EndExpression, 7..8),
        ];
        helper_lex_next_auto("C:\\\\${x}", expect);

        let expect = vec![
            (Token::Raw, 0..4),
            (Token::Raw, 5..7),
            (Token::Raw, 7..9),
        ];
        helper_lex_next_auto("C:\\\\\\${x}", expect);
    }

    #[test]
    fn test_lex_backtick_in_raw() {
        let expect = vec![(Token::Raw, 0..38)];

        helper_lex_next_auto("This is a markdown string with `code`.", expect);
    }

    #[test]
    fn test_lex_state_change() -> Result<(), Error> {
        let mut lexer = Lexer::new("lorem ${");
        lexer.next()?;
        lexer.next()?;

        assert_eq!(lexer.state, CursorState::Inside);

        Ok(())
    }

    #[test]
    fn test_lex_digit() {
        let expect = vec![
            (Token::BeginExpression, 0..2),
            (Token::Number, 3..5),
            (Token::Number, 6..10),
            (Token::Number, 11..16),
            (Token::Number, 17..21),
            (Token::Number, 22..24),
            (Token::EndExpression, 25..26),
        ];

        helper_lex_next_auto("${ 10 10.5 1e+21 0xFF .5 }", expect);
    }

    #[test]
    fn test_lex_ident() {
        let expect = vec![
            (Token::BeginExpression, 0..2),
            (Token::Identifier, 3..8),
            (Token::Identifier, 9..13),
            (Token::Identifier, 14..18),
            (Token::EndExpression, 19..20),
        ];

        helper_lex_next_auto("${ hello $_id née }", expect);
    }

    #[test]
    fn test_lex_keyword() {
        let expect = vec![
            (Token::BeginExpression, 0..2),
            (Token::Keyword(Keyword::Typeof), 3..9),
            (Token::Keyword(Keyword::Null), 10..14),
            (Token::Reserved, 15..18),
            (Token::EndExpression, 19..20),
        ];

        helper_lex_next_auto("${ typeof null new }", expect);
    }

    #[test]
    fn test_lex_operators() {
        let expect = vec![
            (Token::BeginExpression, 0..2),
            (Token::Identifier, 2..3),
            (Token::Operator(Operator::StrictEqual), 4..7),
            (Token::Identifier, 8..9),
            (Token::Question, 10..11),
            (Token::Identifier, 12..13),
            (Token::OptionalChain, 13..15),
            (Token::Identifier, 15..16),
            (Token::Colon, 17..18),
            (Token::Identifier, 19..20),
            (Token::Operator(Operator::Nullish), 21..23),
            (Token::Exclamation, 24..25),
            (Token::Identifier, 25..26),
            (Token::EndExpression, 26..27),
        ];

        helper_lex_next_auto("${a === b ? c?.d : e ?? !f}", expect);
    }

    #[test]
    fn test_lex_conditional_with_fraction() {
        let expect = vec![
            (Token::BeginExpression, 0..2),
            (Token::Identifier, 2..3),
            (Token::Question, 3..4),
            (Token::Number, 4..6),
            (Token::Colon, 6..7),
            (Token::Number, 7..8),
            (Token::EndExpression, 8..9),
        ];

        helper_lex_next_auto("${a?.5:1}", expect);
    }

    #[test]
    fn test_lex_string() {
        let expect = vec![
            (Token::BeginExpression, 0..2),
            (Token::String, 3..8),
            (Token::String, 9..15),
            (Token::EndExpression, 16..17),
        ];

        helper_lex_next_auto("${ 'bad' \"good\" }", expect);
    }

    #[test]
    fn test_lex_string_escape() {
        let expect = vec![
            (Token::BeginExpression, 0..2),
            (Token::String, 3..13),
            (Token::EndExpression, 14..15),
        ];

        helper_lex_next_auto(r#"${ "\"name\"" }"#, expect);
    }

    #[test]
    fn test_lex_string_brace() {
        let expect = vec![
            (Token::BeginExpression, 0..2),
            (Token::String, 2..5),
            (Token::EndExpression, 5..6),
            (Token::Raw, 6..7),
        ];

        helper_lex_next_auto("${'}'}!", expect);
    }

    #[test]
    fn test_lex_string_line_continuation() {
        let expect = vec![
            (Token::BeginExpression, 0..2),
            (Token::String, 2..8),
            (Token::String, 9..16),
            (Token::EndExpression, 16..17),
        ];

        helper_lex_next_auto("${'a\\\nb' 'a\\\r\nb'}", expect);
    }

    #[test]
    fn test_error_unterminated_string() {
        let mut lexer = Lexer::new("${ 'name }");
        assert!(lexer.next().is_ok());

        let error = lexer.next().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Syntax);
    }

    #[test]
    fn test_error_backtick_in_expression() {
        let mut lexer = Lexer::new("${ `nested` }");
        assert!(lexer.next().is_ok());
        assert!(lexer.next().is_err());
    }

    #[test]
    fn test_error_lone_ampersand() {
        let mut lexer = Lexer::new("${ a & b }");
        assert!(lexer.next().is_ok());
        assert!(lexer.next().is_ok());
        assert!(lexer.next().is_err());
    }

    /// Helper function which takes in a source string, creates a lexer on that
    /// string and iterates [expect.len()] amount of times and compares the result
    /// against [lexer.next()].
    fn helper_lex_next_auto<T>(source: &str, expect: Vec<(Token, T)>)
    where
        T: Into<Region>,
    {
        let mut lexer = Lexer::new(source);
        for (token, region) in expect {
            assert_eq!(lexer.next(), Ok(Some((token, region.into()))))
        }

        assert_eq!(lexer.next(), Ok(None));
        assert_eq!(lexer.next(), Ok(None));
        assert_eq!(lexer.next(), Ok(None));
    }
}
