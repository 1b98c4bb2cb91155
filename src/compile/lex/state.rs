/// Describes the internal state of a [`Lexer`][`super::Lexer`].
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum CursorState {
    /// Indicates the [`Lexer`][`super::Lexer`] is reading literal text.
    Default,
    /// Indicates the [`Lexer`][`super::Lexer`] is inside of an expression.
    Inside,
}
