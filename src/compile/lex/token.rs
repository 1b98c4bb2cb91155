use crate::compile::{Keyword, Operator};
use std::fmt::Display;

/// Types emitted by the Lexer.
///
/// An abstraction over raw text to make construction of Tree types easier.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Token {
    /// Raw text.
    Raw,
    /// String literal within an expression, quoted with `'` or `"`.
    String,
    /// Number within an expression.
    Number,
    /// Identifier (unquoted string) within an expression.
    Identifier,
    /// Whitespace within an expression.
    Whitespace,
    /// Beginning of an expression - `${`.
    BeginExpression,
    /// End of an expression - `}`.
    EndExpression,
    /// .
    Period,
    /// ?.
    OptionalChain,
    /// ?
    Question,
    /// :
    Colon,
    /// ,
    Comma,
    /// (
    OpenParen,
    /// )
    CloseParen,
    /// [
    OpenBracket,
    /// ]
    CloseBracket,
    /// !
    Exclamation,
    /// =
    Assign,
    /// A word that is reserved, but has no meaning within an expression.
    Reserved,
    /// A recognized keyword.
    Keyword(Keyword),
    /// Describes an action taken on two values.
    Operator(Operator),
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Raw => write!(f, "raw"),
            Token::String => write!(f, "string"),
            Token::Number => write!(f, "number"),
            Token::Identifier => write!(f, "identifier"),
            Token::Whitespace => write!(f, "whitespace"),
            Token::BeginExpression => write!(f, "begin expression (${{)"),
            Token::EndExpression => write!(f, "end expression (}})"),
            Token::Period => write!(f, "period (.)"),
            Token::OptionalChain => write!(f, "optional chain (?.)"),
            Token::Question => write!(f, "question (?)"),
            Token::Colon => write!(f, "colon (:)"),
            Token::Comma => write!(f, "comma (,)"),
            Token::OpenParen => write!(f, "open paren (()"),
            Token::CloseParen => write!(f, "close paren ())"),
            Token::OpenBracket => write!(f, "open bracket ([)"),
            Token::CloseBracket => write!(f, "close bracket (])"),
            Token::Exclamation => write!(f, "exclamation (!)"),
            Token::Assign => write!(f, "assign (=)"),
            Token::Reserved => write!(f, "reserved word"),
            Token::Keyword(keyword) => write!(f, "keyword {keyword}"),
            Token::Operator(operator) => write!(f, "operator {operator}"),
        }
    }
}
