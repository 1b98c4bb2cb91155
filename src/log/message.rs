use super::{Error, ErrorKind};
use std::fmt::Display;

pub const UNEXPECTED_TOKEN: &str = "unexpected token";
pub const UNEXPECTED_EOF: &str = "unexpected eof";
pub const INVALID_SYNTAX: &str = "invalid syntax";
pub const INVALID_PARAMETER: &str = "invalid parameter name";
pub const UNSUPPORTED_SYNTAX: &str = "unsupported syntax";
pub const NESTED_TOO_DEEPLY: &str = "expression is nested too deeply";

/// Return an [`Error`] explaining that the end of source was not expected.
pub fn error_eof(source: &str) -> Error {
    let source_len = source.len();
    Error::build(ErrorKind::Syntax, UNEXPECTED_EOF)
        .with_pointer(source, source_len..source_len)
        .with_help("expected additional tokens, did you close every `${` with `}`?")
}

/// Return an [`Error`] explaining that the write operation failed.
///
/// This is likely caused by a failure during a `write!` macro operation.
pub fn error_write() -> Error {
    Error::build(ErrorKind::Write, "write failure")
        .with_help("failed to write result of render, are you low on memory?")
}

/// Return an [`Error`] explaining that the given name has no binding.
pub fn error_not_defined(name: &str) -> Error {
    Error::build(ErrorKind::Reference, format!("{name} is not defined"))
}

/// Return an [`Error`] explaining that a property was read from a
/// value that has no properties.
pub fn error_read_property<T>(property: &str, receiver: T) -> Error
where
    T: Display,
{
    Error::build(
        ErrorKind::Reference,
        format!("cannot read properties of {receiver} (reading '{property}')"),
    )
}

/// Return a string describing an unexpected character inside an expression.
pub fn expected_operator<T>(received: T) -> String
where
    T: Display,
{
    format!(
        "expected operator like `+`, `-`, `*`, `/`, `%`, `===`, `!==`, `>=`, `<=`, \
        `&&`, `||`, `??` or `?`, found `{received}`"
    )
}
