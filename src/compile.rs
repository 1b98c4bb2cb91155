mod lex;
mod parse;
mod preamble;
mod template;

pub use crate::compile::{
    parse::{scope::Scope, tree, Parser},
    preamble::Preamble,
    template::Template,
};

use crate::log::Error;
use std::fmt::Display;
use tracing::debug;

/// Compile a [`Template`] from the given text and [`Preamble`].
///
/// The preamble is validated before the text is parsed, so an invalid
/// parameter name is reported even when the text is also invalid.
pub(crate) fn compile_with(
    text: &str,
    preamble: Preamble,
    name: Option<&str>,
) -> Result<Template, Error> {
    let attach_name = |error: Error| match name {
        Some(name) => error.with_name(name),
        None => error,
    };

    preamble.validate().map_err(attach_name)?;
    let scope = Parser::new(text).compile().map_err(attach_name)?;

    debug!(
        name,
        bindings = %preamble,
        segments = scope.data.len(),
        "compiled template"
    );

    Ok(Template::new(
        text.to_owned(),
        name.map(str::to_owned),
        preamble,
        scope,
    ))
}

/// Keywords recognized by the Lexer and Parser.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Keyword {
    /// A boolean true.
    True,
    /// A boolean false.
    False,
    /// The null literal.
    Null,
    /// Unary operator which names the type of its operand.
    Typeof,
}

impl Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Keyword::True => write!(f, "true"),
            Keyword::False => write!(f, "false"),
            Keyword::Null => write!(f, "null"),
            Keyword::Typeof => write!(f, "typeof"),
        }
    }
}

/// Words which cannot be used as an identifier, but are not given any
/// meaning inside of an expression.
const RESERVED: &[&str] = &[
    "await",
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "enum",
    "export",
    "extends",
    "finally",
    "for",
    "function",
    "if",
    "implements",
    "import",
    "in",
    "instanceof",
    "interface",
    "let",
    "new",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "static",
    "super",
    "switch",
    "this",
    "throw",
    "try",
    "var",
    "void",
    "while",
    "with",
    "yield",
];

/// Return the [`Keyword`] spelled by the given text, if any.
pub(crate) fn keyword(text: &str) -> Option<Keyword> {
    match text {
        "true" => Some(Keyword::True),
        "false" => Some(Keyword::False),
        "null" => Some(Keyword::Null),
        "typeof" => Some(Keyword::Typeof),
        _ => None,
    }
}

/// Return true if the given text is a keyword or reserved word.
pub(crate) fn is_reserved(text: &str) -> bool {
    keyword(text).is_some() || RESERVED.contains(&text)
}

/// Binary operators recognized by the Lexer and Parser.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Operator {
    /// +
    Add,
    /// -
    Subtract,
    /// *
    Multiply,
    /// /
    Divide,
    /// %
    Remainder,
    /// >
    Greater,
    /// <
    Lesser,
    /// >=
    GreaterOrEqual,
    /// <=
    LesserOrEqual,
    /// ==
    Equal,
    /// !=
    NotEqual,
    /// ===
    StrictEqual,
    /// !==
    StrictNotEqual,
    /// &&
    And,
    /// ||
    Or,
    /// ??
    Nullish,
}

impl Operator {
    /// Return the binding power of the operator, higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            Operator::Nullish => 1,
            Operator::Or => 2,
            Operator::And => 3,
            Operator::Equal
            | Operator::NotEqual
            | Operator::StrictEqual
            | Operator::StrictNotEqual => 4,
            Operator::Greater
            | Operator::Lesser
            | Operator::GreaterOrEqual
            | Operator::LesserOrEqual => 5,
            Operator::Add | Operator::Subtract => 6,
            Operator::Multiply | Operator::Divide | Operator::Remainder => 7,
        }
    }

    /// Return true for `&&` and `||`.
    pub fn is_logical(self) -> bool {
        matches!(self, Operator::And | Operator::Or)
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::Add => write!(f, "+"),
            Operator::Subtract => write!(f, "-"),
            Operator::Multiply => write!(f, "*"),
            Operator::Divide => write!(f, "/"),
            Operator::Remainder => write!(f, "%"),
            Operator::Greater => write!(f, ">"),
            Operator::Lesser => write!(f, "<"),
            Operator::GreaterOrEqual => write!(f, ">="),
            Operator::LesserOrEqual => write!(f, "<="),
            Operator::Equal => write!(f, "=="),
            Operator::NotEqual => write!(f, "!="),
            Operator::StrictEqual => write!(f, "==="),
            Operator::StrictNotEqual => write!(f, "!=="),
            Operator::And => write!(f, "&&"),
            Operator::Or => write!(f, "||"),
            Operator::Nullish => write!(f, "??"),
        }
    }
}

/// Prefix operators recognized by the Parser.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum UnaryOperator {
    /// !
    Not,
    /// -
    Negate,
    /// +
    Plus,
    /// typeof
    Typeof,
}

impl Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOperator::Not => write!(f, "!"),
            UnaryOperator::Negate => write!(f, "-"),
            UnaryOperator::Plus => write!(f, "+"),
            UnaryOperator::Typeof => write!(f, "typeof"),
        }
    }
}
