use crate::{
    compile::{Operator, UnaryOperator},
    region::Region,
};

/// The Abstract Syntax Tree.
#[derive(Debug, Clone)]
pub enum Tree {
    /// Raw text.
    Raw(Region),
    /// Render the result of an expression.
    Output(Output),
}

/// Represents a call to render some kind of Expression.
#[derive(Debug, Clone)]
pub struct Output {
    pub expression: Expression,
    /// Spans the full `${ ... }` marker.
    pub region: Region,
}

impl From<(Expression, Region)> for Output {
    /// Create an Output from the given (Expression, Region).
    fn from(value: (Expression, Region)) -> Self {
        Self {
            expression: value.0,
            region: value.1,
        }
    }
}

/// Represents data within `${ }`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Literal data located directly in the template source.
    Literal(Literal),
    /// A name that is resolved against the bindings when rendered.
    Identifier(Identifier),
    /// Property access, such as `person.name` or `people[0]`.
    Member(Member),
    /// An operator applied to one Expression.
    Unary(Unary),
    /// An operator applied to two Expressions.
    Binary(Binary),
    /// `test ? consequent : alternate`
    Conditional(Conditional),
    /// An Expression wrapped in parentheses.
    Group(Group),
}

impl Expression {
    /// Get the Region from the underlying Expression kind.
    pub fn get_region(&self) -> Region {
        match self {
            Expression::Literal(literal) => literal.region,
            Expression::Identifier(identifier) => identifier.region,
            Expression::Member(member) => member.region,
            Expression::Unary(unary) => unary.region,
            Expression::Binary(binary) => binary.region,
            Expression::Conditional(conditional) => conditional.region,
            Expression::Group(group) => group.region,
        }
    }

    /// Return the operator if this is a [`Binary`] expression.
    pub fn binary_operator(&self) -> Option<Operator> {
        match self {
            Expression::Binary(binary) => Some(binary.operator),
            _ => None,
        }
    }
}

/// Area that contains an identifying value.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub region: Region,
}

/// Literal data that does not need to be evaluated any further.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: Constant,
    pub region: Region,
}

/// Values that may be written directly in an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

/// Access to a property of the `object` Expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub object: Box<Expression>,
    pub property: Property,
    /// True when accessed with `?.`, which yields `undefined` instead of
    /// failing when `object` is `null` or `undefined`.
    pub optional: bool,
    pub region: Region,
}

/// The property named by a [`Member`].
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    /// `object.name`
    Named(Identifier),
    /// `object[expression]`
    Computed(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Unary {
    pub operator: UnaryOperator,
    pub operand: Box<Expression>,
    pub region: Region,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    pub left: Box<Expression>,
    pub operator: Operator,
    pub right: Box<Expression>,
    pub region: Region,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    pub test: Box<Expression>,
    pub consequent: Box<Expression>,
    pub alternate: Box<Expression>,
    pub region: Region,
}

/// Parentheses end an optional chain, so `(a?.b).c` fails when `a` is
/// `undefined` while `a?.b.c` does not.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub expression: Box<Expression>,
    pub region: Region,
}
