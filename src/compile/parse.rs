//! Template parser.
//!
//! Utilizes a Lexer to receive instances of Region, which it uses to construct
//! a Scope containing the Abstract Syntax Tree.
//!
//! Expressions follow the usual JavaScript precedence, from loosest to tightest:
//!
//! ```text
//! ?:                  conditional, right associative
//! ??                  nullish coalescing, cannot be mixed with && or ||
//! ||
//! &&
//! == != === !==
//! < > <= >=
//! + -
//! * / %
//! ! - + typeof        prefix
//! . ?. []             member access
//! ```
pub mod scope;
pub mod tree;

use crate::{
    compile::{
        lex::{token::Token, LexResult, LexResultMust, Lexer},
        parse::tree::{
            Binary, Conditional, Constant, Expression, Group, Identifier, Literal, Member, Output,
            Property, Tree, Unary,
        },
        Keyword, Operator, Scope, UnaryOperator,
    },
    log::{
        error_eof, Error, ErrorKind, INVALID_SYNTAX, NESTED_TOO_DEEPLY, UNEXPECTED_TOKEN,
        UNSUPPORTED_SYNTAX,
    },
    region::Region,
};

/// Deepest nesting of groups, prefix operators and chained operations
/// allowed within one expression.
const MAX_DEPTH: usize = 64;

pub struct Parser<'source> {
    /// Lexer used to pull from source as tokens instead of raw text.
    lexer: Lexer<'source>,
    /// Store peeked tokens.
    ///
    /// Double option is used to remember when the next token is None.
    buffer: Option<Option<(Token, Region)>>,
    /// Nesting depth of the expression being parsed.
    depth: usize,
}

impl<'source> Parser<'source> {
    /// Create a new Parser from the given string.
    #[inline]
    pub fn new(source: &'source str) -> Self {
        Self {
            lexer: Lexer::new(source),
            buffer: None,
            depth: 0,
        }
    }

    /// Compile the template.
    ///
    /// Returns a new Scope, containing the raw text and expressions of the
    /// template in source order.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when any expression is not valid syntax, or an
    /// expression is not closed before the end of the source.
    pub fn compile(mut self) -> Result<Scope, Error> {
        let mut scope = Scope::new();

        while let Some(next) = self.next()? {
            let tree = match next {
                (Token::Raw, region) => Tree::Raw(region),
                (Token::BeginExpression, region) => {
                    let expression = self.parse_expression()?;
                    let (_, next_region) = self.next_must(Token::EndExpression)?;
                    let merge = region.combine(next_region);
                    Tree::Output(Output::from((expression, merge)))
                }
                (token, region) => {
                    return Err(Error::build(ErrorKind::Syntax, UNEXPECTED_TOKEN)
                        .with_pointer(self.lexer.source, region)
                        .with_help(format!("expected raw text or `${{`, found {token}")))
                }
            };

            scope.data.push(tree);
        }

        Ok(scope)
    }

    /// Parse an expression.
    ///
    /// An expression is everything between `${` and `}`, or the inside of
    /// a group, a computed property or a conditional branch.
    fn parse_expression(&mut self) -> Result<Expression, Error> {
        let region = match self.peek()? {
            Some((_, region)) => region,
            None => return Err(error_eof(self.lexer.source)),
        };

        let depth = self.depth;
        self.descend(region)?;
        let expression = self.parse_conditional();
        self.depth = depth;

        expression
    }

    /// Enter one more level of nesting.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] pointing at `region` once the nesting is deeper
    /// than [`MAX_DEPTH`].
    fn descend(&mut self, region: Region) -> Result<(), Error> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(Error::build(ErrorKind::Syntax, NESTED_TOO_DEEPLY)
                .with_pointer(self.lexer.source, region)
                .with_help(format!(
                    "expressions may be nested at most {MAX_DEPTH} levels deep, \
                    try splitting this expression into smaller ones"
                )));
        }

        Ok(())
    }

    /// Parse a conditional, or the binary expression that would be its test.
    fn parse_conditional(&mut self) -> Result<Expression, Error> {
        // ${ news === 'bad' ? reason : 'Congratulations!' }
        //    |                                          |
        //    from                                       to
        let test = self.parse_binary(1)?;
        if !self.next_is(Token::Question)? {
            return Ok(test);
        }
        self.next_must(Token::Question)?;

        let consequent = self.parse_expression()?;
        self.next_must(Token::Colon)?;
        let alternate = self.parse_expression()?;
        let region = test.get_region().combine(alternate.get_region());

        Ok(Expression::Conditional(Conditional {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
            region,
        }))
    }

    /// Parse a chain of binary operators that bind at least as tightly as
    /// `min`.
    ///
    /// All binary operators are left associative.
    fn parse_binary(&mut self, min: u8) -> Result<Expression, Error> {
        let depth = self.depth;
        let mut left = self.parse_unary()?;

        loop {
            let operator = match self.peek()? {
                Some((Token::Operator(operator), _)) if operator.precedence() >= min => operator,
                _ => break,
            };
            let (_, operator_region) = self.next_any_must()?;
            self.descend(operator_region)?;
            let right = self.parse_binary(operator.precedence() + 1)?;
            self.check_nullish_mix(operator, operator_region, &left, &right)?;

            let region = left.get_region().combine(right.get_region());
            left = Expression::Binary(Binary {
                left: Box::new(left),
                operator,
                right: Box::new(right),
                region,
            });
        }
        self.depth = depth;

        Ok(left)
    }

    /// Return an [`Error`] if `??` is used directly alongside `&&` or `||`.
    ///
    /// `a ?? (b || c)` is valid, `a ?? b || c` is not.
    fn check_nullish_mix(
        &self,
        operator: Operator,
        operator_region: Region,
        left: &Expression,
        right: &Expression,
    ) -> Result<(), Error> {
        let mixes = |side: &Expression| match side.binary_operator() {
            Some(inner) => {
                (operator == Operator::Nullish && inner.is_logical())
                    || (operator.is_logical() && inner == Operator::Nullish)
            }
            None => false,
        };

        if mixes(left) || mixes(right) {
            return Err(Error::build(ErrorKind::Syntax, INVALID_SYNTAX)
                .with_pointer(self.lexer.source, operator_region)
                .with_help(format!(
                    "`{}` cannot be combined with `{}` or `{}` without parentheses",
                    Operator::Nullish,
                    Operator::And,
                    Operator::Or
                )));
        }

        Ok(())
    }

    /// Parse a prefix operator and its operand, or fall through to a
    /// member expression.
    fn parse_unary(&mut self) -> Result<Expression, Error> {
        let (operator, region) = match self.peek()? {
            Some((Token::Exclamation, region)) => (UnaryOperator::Not, region),
            Some((Token::Operator(Operator::Subtract), region)) => (UnaryOperator::Negate, region),
            Some((Token::Operator(Operator::Add), region)) => (UnaryOperator::Plus, region),
            Some((Token::Keyword(Keyword::Typeof), region)) => (UnaryOperator::Typeof, region),
            _ => return self.parse_member(),
        };
        self.next_any_must()?;

        let depth = self.depth;
        self.descend(region)?;
        let operand = self.parse_unary()?;
        self.depth = depth;
        let region = region.combine(operand.get_region());

        Ok(Expression::Unary(Unary {
            operator,
            operand: Box::new(operand),
            region,
        }))
    }

    /// Parse a primary expression followed by any number of property
    /// accesses.
    ///
    /// ```text
    /// person.name
    /// people[0]?.name
    /// ```
    fn parse_member(&mut self) -> Result<Expression, Error> {
        let depth = self.depth;
        let mut expression = self.parse_primary()?;

        loop {
            if let Some((Token::Period | Token::OptionalChain | Token::OpenBracket, region)) =
                self.peek()?
            {
                self.descend(region)?;
            }
            let (property, optional, end) = match self.peek()? {
                Some((Token::Period, _)) => {
                    self.next_any_must()?;
                    let name = self.parse_property_name()?;
                    let end = name.region;
                    (Property::Named(name), false, end)
                }
                Some((Token::OptionalChain, _)) => {
                    self.next_any_must()?;
                    if self.next_is(Token::OpenBracket)? {
                        self.next_must(Token::OpenBracket)?;
                        let (index, end) = self.parse_computed()?;
                        (index, true, end)
                    } else {
                        self.reject_call()?;
                        let name = self.parse_property_name()?;
                        let end = name.region;
                        (Property::Named(name), true, end)
                    }
                }
                Some((Token::OpenBracket, _)) => {
                    self.next_any_must()?;
                    let (index, end) = self.parse_computed()?;
                    (index, false, end)
                }
                Some((Token::OpenParen, _)) => {
                    self.reject_call()?;
                    break;
                }
                _ => break,
            };

            let region = expression.get_region().combine(end);
            expression = Expression::Member(Member {
                object: Box::new(expression),
                property,
                optional,
                region,
            });
        }
        self.depth = depth;

        Ok(expression)
    }

    /// Parse the index of a computed property access, assuming the opening
    /// `[` has been consumed.
    ///
    /// Returns the [`Property`] and the [`Region`] of the closing `]`.
    fn parse_computed(&mut self) -> Result<(Property, Region), Error> {
        let index = self.parse_expression()?;
        let (_, close) = self.next_must(Token::CloseBracket)?;

        Ok((Property::Computed(Box::new(index)), close))
    }

    /// Return an [`Error`] if the next token opens a function call.
    fn reject_call(&mut self) -> Result<(), Error> {
        match self.peek()? {
            Some((Token::OpenParen, region)) => {
                Err(Error::build(ErrorKind::Syntax, UNSUPPORTED_SYNTAX)
                    .with_pointer(self.lexer.source, region)
                    .with_help("function calls are not supported inside of an expression"))
            }
            _ => Ok(()),
        }
    }

    /// Parse the name following a `.` or `?.`.
    ///
    /// Keywords and reserved words are valid property names.
    fn parse_property_name(&mut self) -> Result<Identifier, Error> {
        match self.next_any_must()? {
            (Token::Identifier | Token::Keyword(_) | Token::Reserved, region) => {
                Ok(Identifier { region })
            }
            (_, region) => Err(Error::build(ErrorKind::Syntax, UNEXPECTED_TOKEN)
                .with_pointer(self.lexer.source, region)
                .with_help("expected a property name such as `person.name`")),
        }
    }

    /// Parse a literal, an identifier or a parenthesized expression.
    fn parse_primary(&mut self) -> Result<Expression, Error> {
        let expression = match self.next_any_must()? {
            (Token::Number, region) => Expression::Literal(self.parse_number_literal(region)?),
            (Token::String, region) => Expression::Literal(Literal {
                value: Constant::String(self.parse_string(region)?),
                region,
            }),
            (Token::Keyword(Keyword::True), region) => Expression::Literal(Literal {
                value: Constant::Bool(true),
                region,
            }),
            (Token::Keyword(Keyword::False), region) => Expression::Literal(Literal {
                value: Constant::Bool(false),
                region,
            }),
            (Token::Keyword(Keyword::Null), region) => Expression::Literal(Literal {
                value: Constant::Null,
                region,
            }),
            (Token::Identifier, region) => Expression::Identifier(Identifier { region }),
            (Token::OpenParen, region) => {
                let inner = self.parse_expression()?;
                let (_, close) = self.next_must(Token::CloseParen)?;
                Expression::Group(Group {
                    expression: Box::new(inner),
                    region: region.combine(close),
                })
            }
            (Token::Reserved, region) => {
                return Err(Error::build(ErrorKind::Syntax, UNSUPPORTED_SYNTAX)
                    .with_pointer(self.lexer.source, region)
                    .with_help(format!(
                        "`{}` is a reserved word and has no meaning inside of an expression",
                        &self.lexer.source[region]
                    )))
            }
            (token, region) => {
                return Err(Error::build(ErrorKind::Syntax, UNEXPECTED_TOKEN)
                    .with_pointer(self.lexer.source, region)
                    .with_help(format!("expected an expression, found {token}")))
            }
        };

        Ok(expression)
    }

    /// Parse a Literal containing a [`Constant::Number`] from the given Region.
    ///
    /// # Errors
    ///
    /// Returns an error if the literal value of the Region cannot be converted
    /// to a number.
    fn parse_number_literal(&self, region: Region) -> Result<Literal, Error> {
        let window = &self.lexer.source[region];

        let number = match window.get(..2) {
            Some("0x" | "0X") => window[2..]
                .chars()
                .map(|c| c.to_digit(16))
                .try_fold(0f64, |total, digit| digit.map(|d| total * 16.0 + d as f64)),
            _ => window.parse::<f64>().ok(),
        };

        match number {
            Some(number) => Ok(Literal {
                value: Constant::Number(number),
                region,
            }),
            None => Err(Error::build(ErrorKind::Syntax, "unrecognizable number")
                .with_pointer(self.lexer.source, region)),
        }
    }

    /// Parse a String from the literal value of the given Region.
    ///
    /// Recognizes `\n`, `\r`, `\t`, `\b`, `\f`, `\v`, `\0`, `\xHH`, `\uHHHH`,
    /// `\u{H...}` and line continuations. Any other escaped character is
    /// taken literally.
    ///
    /// # Errors
    ///
    /// Returns an error if a hexadecimal escape is malformed or names an
    /// invalid character.
    fn parse_string(&self, region: Region) -> Result<String, Error> {
        let window = region.literal(self.lexer.source);
        let inner = &window[1..window.len() - 1];
        if !inner.contains('\\') {
            return Ok(inner.to_owned());
        }

        let invalid_escape = || {
            Error::build(ErrorKind::Syntax, "invalid escape sequence")
                .with_pointer(self.lexer.source, region)
                .with_help("use `\\xHH`, `\\uHHHH` or `\\u{H...}` with hexadecimal digits")
        };

        let mut chars = inner.chars();
        let mut string = String::with_capacity(inner.len());

        while let Some(c) = chars.next() {
            if c != '\\' {
                string.push(c);
                continue;
            }
            let Some(escape) = chars.next() else {
                break;
            };
            let c = match escape {
                'n' => '\n',
                'r' => '\r',
                't' => '\t',
                'b' => '\u{8}',
                'f' => '\u{c}',
                'v' => '\u{b}',
                '0' => '\0',
                '\r' => {
                    if chars.as_str().starts_with('\n') {
                        chars.next();
                    }
                    continue;
                }
                '\n' => continue,
                'x' => {
                    let digits: String = chars.by_ref().take(2).collect();
                    hex_char(&digits, 2).ok_or_else(invalid_escape)?
                }
                'u' => {
                    let digits: String = if chars.as_str().starts_with('{') {
                        chars.next();
                        let digits: String = chars.by_ref().take_while(|c| *c != '}').collect();
                        if digits.is_empty() {
                            return Err(invalid_escape());
                        }
                        digits
                    } else {
                        let digits: String = chars.by_ref().take(4).collect();
                        if digits.len() != 4 {
                            return Err(invalid_escape());
                        }
                        digits
                    };
                    hex_char(&digits, digits.len()).ok_or_else(invalid_escape)?
                }
                other => other,
            };
            string.push(c);
        }

        Ok(string)
    }

    /// Peek the next token.
    ///
    /// # Errors
    ///
    /// Propagates any error reported by the underlying Lexer.
    fn peek(&mut self) -> LexResult {
        if let o @ None = &mut self.buffer {
            *o = Some(self.lexer.next()?);
        }

        Ok(self.buffer.flatten())
    }

    /// Get the next token.
    ///
    /// Prefers to pull a token from the internal buffer first, but will pull from
    /// the lexer when the buffer is empty.
    fn next(&mut self) -> LexResult {
        match self.buffer.take() {
            Some(t) => Ok(t),
            None => self.lexer.next(),
        }
    }

    /// Returns true if the given token matches the upcoming token.
    ///
    /// # Errors
    ///
    /// Propagates any errors reported by the underlying lexer.
    fn next_is(&mut self, expect: Token) -> Result<bool, Error> {
        Ok(self
            .peek()?
            .map(|(token, _)| token == expect)
            .unwrap_or(false))
    }

    /// Get the next token, and compare it to the given token.
    ///
    /// # Errors
    ///
    /// An error is returned if the next token does not match the given token,
    /// or when [next()] returns None.
    fn next_must(&mut self, expect: Token) -> LexResultMust {
        match self.next()? {
            Some((token, region)) => {
                if token == expect {
                    Ok((token, region))
                } else {
                    Err(Error::build(ErrorKind::Syntax, UNEXPECTED_TOKEN)
                        .with_pointer(self.lexer.source, region)
                        .with_help(format!("expected {expect}, found {token}")))
                }
            }
            None => Err(error_eof(self.lexer.source)),
        }
    }

    /// Get the next token.
    ///
    /// Similar to "next()" but requires that a token is returned.
    ///
    /// # Errors
    ///
    /// An error is returned if no more tokens are left.
    fn next_any_must(&mut self) -> LexResultMust {
        match self.next()? {
            Some((token, region)) => Ok((token, region)),
            None => Err(error_eof(self.lexer.source)),
        }
    }
}

/// Convert hexadecimal digits to a character, requiring at least
/// `length` digits.
fn hex_char(digits: &str, length: usize) -> Option<char> {
    if digits.len() < length || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    u32::from_str_radix(digits, 16)
        .ok()
        .and_then(char::from_u32)
}

#[cfg(test)]
mod tests {
    use super::Parser;
    use crate::{
        compile::{
            lex::token::Token,
            tree::{Constant, Expression, Property, Tree},
            Operator, UnaryOperator,
        },
        log::ErrorKind,
    };

    #[test]
    fn test_parser_lexer_integration() {
        let mut parser = Parser::new("hello");
        assert_eq!(parser.next(), Ok(Some((Token::Raw, (0..5).into()))));
        assert_eq!(parser.next(), Ok(None));
    }

    #[test]
    fn test_peek_multiple() {
        let text = "${ one two";
        let mut parser = Parser::new(text);
        assert!(parser.next().is_ok());
        assert_eq!(parser.peek(), Ok(Some((Token::Identifier, (3..6).into()))));
        assert_eq!(parser.peek(), Ok(Some((Token::Identifier, (3..6).into()))));
        assert_eq!(parser.peek(), Ok(Some((Token::Identifier, (3..6).into()))));
    }

    #[test]
    fn test_parse_segments() {
        let scope = Parser::new("Dear ${name}, welcome.").compile().unwrap();

        assert_eq!(scope.data.len(), 3);
        assert!(matches!(scope.data[0], Tree::Raw(region) if region == (0..5).into()));
        assert!(matches!(&scope.data[1], Tree::Output(output) if output.region == (5..12).into()));
        assert!(matches!(scope.data[2], Tree::Raw(region) if region == (12..22).into()));
    }

    #[test]
    fn test_parse_precedence() {
        // a + b * c -> a + (b * c)
        let expression = parse_single("${a + b * c}");
        let Expression::Binary(outer) = expression else {
            panic!("expected binary expression");
        };
        assert_eq!(outer.operator, Operator::Add);
        assert_eq!(outer.right.binary_operator(), Some(Operator::Multiply));
    }

    #[test]
    fn test_parse_left_associative() {
        // a - b - c -> (a - b) - c
        let expression = parse_single("${a - b - c}");
        let Expression::Binary(outer) = expression else {
            panic!("expected binary expression");
        };
        assert_eq!(outer.left.binary_operator(), Some(Operator::Subtract));
        assert!(matches!(*outer.right, Expression::Identifier(_)));
    }

    #[test]
    fn test_parse_conditional_right_associative() {
        let expression = parse_single("${a ? b : c ? d : e}");
        let Expression::Conditional(outer) = expression else {
            panic!("expected conditional expression");
        };
        assert!(matches!(*outer.alternate, Expression::Conditional(_)));
    }

    #[test]
    fn test_parse_conditional_test_is_comparison() {
        let expression = parse_single("${news === 'bad' ? reason : 'Congratulations!'}");
        let Expression::Conditional(conditional) = expression else {
            panic!("expected conditional expression");
        };
        assert_eq!(
            conditional.test.binary_operator(),
            Some(Operator::StrictEqual)
        );
        assert!(matches!(
            &*conditional.alternate,
            Expression::Literal(literal) if literal.value == Constant::String("Congratulations!".into())
        ));
    }

    #[test]
    fn test_parse_unary_chain() {
        let expression = parse_single("${!-typeof a}");
        let Expression::Unary(not) = expression else {
            panic!("expected unary expression");
        };
        assert_eq!(not.operator, UnaryOperator::Not);
        assert!(matches!(
            &*not.operand,
            Expression::Unary(negate) if negate.operator == UnaryOperator::Negate
        ));
    }

    #[test]
    fn test_parse_member_chain() {
        let expression = parse_single("${people[0]?.name.first}");
        let Expression::Member(first) = expression else {
            panic!("expected member expression");
        };
        assert!(!first.optional);
        let Expression::Member(name) = *first.object else {
            panic!("expected member expression");
        };
        assert!(name.optional);
        let Expression::Member(index) = *name.object else {
            panic!("expected member expression");
        };
        assert!(matches!(index.property, Property::Computed(_)));
    }

    #[test]
    fn test_parse_keyword_property() {
        let expression = parse_single("${flags.default}");
        assert!(matches!(expression, Expression::Member(_)));
    }

    #[test]
    fn test_parse_group() {
        let expression = parse_single("${(a + b) * c}");
        let Expression::Binary(outer) = expression else {
            panic!("expected binary expression");
        };
        assert_eq!(outer.operator, Operator::Multiply);
        assert!(matches!(*outer.left, Expression::Group(_)));
    }

    #[test]
    fn test_parse_numbers() {
        for (text, expect) in [
            ("${10}", 10.0),
            ("${10.25}", 10.25),
            ("${.5}", 0.5),
            ("${1e3}", 1000.0),
            ("${0xff}", 255.0),
        ] {
            let expression = parse_single(text);
            assert!(
                matches!(&expression, Expression::Literal(literal) if literal.value == Constant::Number(expect)),
                "{text}"
            );
        }
    }

    #[test]
    fn test_parse_string_escapes() {
        let expression = parse_single(r#"${'it\'s \x41B\u{43} \q\n'}"#);
        assert!(matches!(
            &expression,
            Expression::Literal(literal) if literal.value == Constant::String("it's ABC q\n".into())
        ));
    }

    #[test]
    fn test_parse_string_line_continuation() {
        for text in ["${'a\\\nb'}", "${'a\\\rb'}", "${'a\\\r\nb'}"] {
            let expression = parse_single(text);
            assert!(
                matches!(&expression, Expression::Literal(literal) if literal.value == Constant::String("ab".into())),
                "{text:?}"
            );
        }
    }

    #[test]
    fn test_parse_lone_surrogate_escape() {
        for text in [r"${'\uD800'}", r"${'\u{DFFF}'}"] {
            let error = Parser::new(text).compile().unwrap_err();
            assert_eq!(error.kind(), ErrorKind::Syntax, "{text}");
            assert_eq!(error.reason(), "invalid escape sequence");
        }
    }

    #[test]
    fn test_parse_negative_number_is_unary() {
        let expression = parse_single("${ - 1000 }");
        assert!(matches!(expression, Expression::Unary(_)));
    }

    #[test]
    fn test_parse_errors() {
        for text in [
            "${}",
            "${ name",
            "${ a b }",
            "${ a + }",
            "${ a ? b }",
            "${ (a + b }",
            "${ a[0 }",
            "${ a. }",
            "${ name() }",
            "${ a?.() }",
            "${ a = 1 }",
            "${ new Date }",
            "${ a ?? b || c }",
            "${ a && b ?? c }",
            "${ 'unterminated }",
            "${ '\\x4' }",
            "${ '\\u{}' }",
            "${ `nested` }",
        ] {
            let error = Parser::new(text).compile().unwrap_err();
            assert_eq!(error.kind(), ErrorKind::Syntax, "{text}");
        }
    }

    #[test]
    fn test_parse_nullish_with_parentheses() {
        assert!(Parser::new("${ a ?? (b || c) }").compile().is_ok());
        assert!(Parser::new("${ (a && b) ?? c }").compile().is_ok());
    }

    #[test]
    fn test_parse_nesting_limit() {
        for depth in [32, 60] {
            let text = format!("${{{}1{}}}", "(".repeat(depth), ")".repeat(depth));
            assert!(Parser::new(&text).compile().is_ok(), "{depth}");
        }

        for text in [
            format!("${{{}1{}}}", "(".repeat(200), ")".repeat(200)),
            format!("${{{}1{}}}", "(".repeat(20_000), ")".repeat(20_000)),
            format!("${{{}a}}", "!".repeat(10_000)),
            format!("${{{}a}}", "- ".repeat(10_000)),
            format!("${{a{}}}", "[0]".repeat(10_000)),
            format!("${{{}1}}", "a ? 1 : ".repeat(10_000)),
            format!("${{1{}}}", " + 1".repeat(10_000)),
        ] {
            let error = Parser::new(&text).compile().unwrap_err();
            assert_eq!(error.kind(), ErrorKind::Syntax);
            assert_eq!(error.reason(), "expression is nested too deeply");
        }
    }

    #[test]
    fn test_parse_nesting_resets_between_expressions() {
        let expression = format!("${{{}1{}}}", "(".repeat(40), ")".repeat(40));
        let text = expression.repeat(10);
        let scope = Parser::new(&text).compile().unwrap();

        assert_eq!(scope.data.len(), 10);
    }

    /// Parse a template holding exactly one expression and return it.
    fn parse_single(text: &str) -> Expression {
        let scope = Parser::new(text).compile().unwrap();
        assert_eq!(scope.data.len(), 1, "{text}");

        match scope.data.into_iter().next() {
            Some(Tree::Output(output)) => output.expression,
            other => panic!("expected a single output, found {other:?}"),
        }
    }
}
