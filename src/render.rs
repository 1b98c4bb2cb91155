mod compare;
pub(crate) mod value;

use crate::{
    compile::{
        tree::{Constant, Expression, Identifier, Literal, Member, Property, Tree},
        Operator, Preamble, Template, UnaryOperator,
    },
    log::{error_not_defined, error_write, Error},
    pipe::Pipe,
    Store,
};
use std::{borrow::Cow, fmt::Write};
use tracing::trace;

use self::{compare::compare_values, value::Value};

/// Result of evaluating one link of an optional chain.
enum Chain<'a> {
    Value(Value<'a>),
    /// A `?.` found `undefined` or `null`, the rest of the chain is skipped.
    Short,
}

/// Renders a [`Template`] against a [`Store`].
pub struct Renderer<'a> {
    /// The template being rendered.
    template: &'a Template,
    /// The Store that the Template is rendered with.
    store: &'a Store,
}

impl<'a> Renderer<'a> {
    /// Create a new Renderer.
    pub fn new(template: &'a Template, store: &'a Store) -> Self {
        Renderer { template, store }
    }

    /// Render the [`Template`] stored inside the [`Renderer`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if evaluating any expression within the `Template`
    /// fails, or writing the result to the buffer fails.
    pub fn render(&self) -> Result<String, Error> {
        let source = self.template.source();
        let mut buffer = String::with_capacity(source.len());
        let mut pipe = Pipe::new(&mut buffer);

        for tree in &self.template.scope().data {
            match tree {
                Tree::Raw(region) => pipe
                    .write_str(region.literal(source))
                    .map_err(|_| error_write())?,
                Tree::Output(output) => {
                    let value = self
                        .evaluate(&output.expression)
                        .map_err(|error| self.with_name(error))?;
                    pipe.write_value(&value).map_err(|_| error_write())?
                }
            }
        }

        trace!(
            name = self.template.name(),
            length = buffer.len(),
            "rendered template"
        );
        Ok(buffer)
    }

    /// Attach the name of the template, if any, to the [`Error`].
    fn with_name(&self, error: Error) -> Error {
        match self.template.name() {
            Some(name) => error.with_name(name),
            None => error,
        }
    }

    /// Evaluate an [`Expression`] to return a [`Value`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] pointing at the part of the expression that
    /// failed, when a name is not bound or a property is read from
    /// `undefined` or `null`.
    fn evaluate(&self, expression: &'a Expression) -> Result<Value<'a>, Error> {
        match expression {
            Expression::Literal(literal) => Ok(self.evaluate_literal(literal)),
            Expression::Identifier(identifier) => self.evaluate_identifier(identifier),
            Expression::Member(_) => match self.evaluate_chain(expression)? {
                Chain::Value(value) => Ok(value),
                Chain::Short => Ok(Value::Undefined),
            },
            Expression::Group(group) => self.evaluate(&group.expression),
            Expression::Unary(unary) => {
                let mut inner = &*unary.operand;
                while let Expression::Group(group) = inner {
                    inner = &*group.expression;
                }

                let operand = match (unary.operator, inner) {
                    // `typeof` does not fail for unbound names, even in parentheses.
                    (UnaryOperator::Typeof, Expression::Identifier(identifier)) => {
                        self.resolve(identifier).unwrap_or(Value::Undefined)
                    }
                    _ => self.evaluate(inner)?,
                };

                Ok(match unary.operator {
                    UnaryOperator::Not => Value::Bool(!operand.is_truthy()),
                    UnaryOperator::Negate => Value::Number(-operand.to_number()),
                    UnaryOperator::Plus => Value::Number(operand.to_number()),
                    UnaryOperator::Typeof => Value::String(Cow::Borrowed(operand.type_of())),
                })
            }
            Expression::Binary(binary) => {
                let left = self.evaluate(&binary.left)?;
                let skip_right = match binary.operator {
                    Operator::And => !left.is_truthy(),
                    Operator::Or => left.is_truthy(),
                    Operator::Nullish => !left.is_nullish(),
                    _ => false,
                };
                if skip_right {
                    return Ok(left);
                }

                let right = self.evaluate(&binary.right)?;
                Ok(compare_values(left, binary.operator, right))
            }
            Expression::Conditional(conditional) => {
                if self.evaluate(&conditional.test)?.is_truthy() {
                    self.evaluate(&conditional.consequent)
                } else {
                    self.evaluate(&conditional.alternate)
                }
            }
        }
    }

    /// Evaluate a [`Literal`] to return a [`Value`].
    fn evaluate_literal(&self, literal: &'a Literal) -> Value<'a> {
        match &literal.value {
            Constant::Null => Value::Null,
            Constant::Bool(bool) => Value::Bool(*bool),
            Constant::Number(number) => Value::Number(*number),
            Constant::String(string) => Value::String(Cow::Borrowed(string)),
        }
    }

    /// Evaluate an [`Identifier`] to return a [`Value`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the name is not bound.
    fn evaluate_identifier(&self, identifier: &Identifier) -> Result<Value<'a>, Error> {
        self.resolve(identifier).ok_or_else(|| {
            let source = self.template.source();
            let name = identifier.region.literal(source);

            error_not_defined(name)
                .with_pointer(source, identifier.region)
                .with_help(match self.template.preamble() {
                    Preamble::Destructure(names) if names.is_empty() => {
                        format!("no names are declared, declare `{name}` when compiling")
                    }
                    Preamble::Destructure(names) => format!(
                        "declared names are `{}`, did you forget to declare `{name}`?",
                        names.join("`, `")
                    ),
                    Preamble::Single(binding) => {
                        format!("values are bound to `{binding}`, try `{binding}.{name}`")
                    }
                })
        })
    }

    /// Resolve the name of an [`Identifier`].
    ///
    /// Declared names are checked first, then the global names `undefined`,
    /// `NaN` and `Infinity`. A declared name with no matching key in the
    /// [`Store`] is `undefined`.
    fn resolve(&self, identifier: &Identifier) -> Option<Value<'a>> {
        let name = identifier.region.literal(self.template.source());

        match self.template.preamble() {
            Preamble::Destructure(names) if names.iter().any(|n| n == name) => {
                return Some(self.store.get(name).map_or(Value::Undefined, Value::from))
            }
            Preamble::Single(binding) if binding == name => {
                return Some(Value::Object(self.store.as_map()))
            }
            _ => {}
        }

        match name {
            "undefined" => Some(Value::Undefined),
            "NaN" => Some(Value::Number(f64::NAN)),
            "Infinity" => Some(Value::Number(f64::INFINITY)),
            _ => None,
        }
    }

    /// Evaluate an [`Expression`] that may be part of an optional chain.
    ///
    /// When a `?.` link finds `undefined` or `null`, every link after it is
    /// skipped and the whole chain is `undefined`. A [`Group`][`crate::compile::tree::Group`]
    /// ends the chain.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if a property is read from `undefined` or `null`
    /// without `?.`, or evaluating a computed property fails.
    fn evaluate_chain(&self, expression: &'a Expression) -> Result<Chain<'a>, Error> {
        let Expression::Member(member) = expression else {
            return self.evaluate(expression).map(Chain::Value);
        };

        let object = match self.evaluate_chain(&member.object)? {
            Chain::Value(object) => object,
            Chain::Short => return Ok(Chain::Short),
        };
        if member.optional && object.is_nullish() {
            return Ok(Chain::Short);
        }

        let key = self.evaluate_property(member)?;
        object
            .get(&key)
            .map(Chain::Value)
            .map_err(|error| error.with_pointer(self.template.source(), member.region))
    }

    /// Evaluate the property of a [`Member`] to return the key it reads.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if evaluating a computed property fails.
    fn evaluate_property(&self, member: &'a Member) -> Result<Cow<'a, str>, Error> {
        match &member.property {
            Property::Named(identifier) => Ok(Cow::Borrowed(
                identifier.region.literal(self.template.source()),
            )),
            Property::Computed(expression) => Ok(self.evaluate(expression)?.to_text()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Renderer;
    use crate::{compile, log::ErrorKind, Engine, Store};
    use serde_json::json;

    #[test]
    fn test_render_raw() {
        let template = compile("hello there", &[]).unwrap();
        let result = Renderer::new(&template, &Store::new()).render();

        assert_eq!(result.unwrap(), "hello there");
    }

    #[test]
    fn test_render_output() {
        let template = compile("hello there, ${ name }!", &["name"]).unwrap();
        let store = Store::new().with_must("name", "taylor");
        let result = Renderer::new(&template, &store).render();

        assert_eq!(result.unwrap(), "hello there, taylor!");
    }

    #[test]
    fn test_render_escaped_marker() {
        let template = compile("cost: \\${price} ${price}", &["price"]).unwrap();
        let store = Store::new().with_must("price", 5);

        assert_eq!(template.render(&store).unwrap(), "cost: ${price} 5");
    }

    #[test]
    fn test_render_missing_key_is_undefined() {
        let template = compile("[${name}]", &["name"]).unwrap();

        assert_eq!(template.render(&Store::new()).unwrap(), "[undefined]");
    }

    #[test]
    fn test_render_undeclared_name() {
        let template = compile("Dear ${name},", &[]).unwrap();
        let store = Store::new().with_must("name", "Mr. Anderson");
        let error = template.render(&store).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Reference);
        assert_eq!(error.reason(), "name is not defined");
    }

    #[test]
    fn test_render_conditional() {
        let template = compile(
            "${news === 'bad' ? 'bad news' : 'good news'}",
            &["news"],
        )
        .unwrap();

        for (news, expect) in [("bad", "bad news"), ("good", "good news"), ("", "good news")] {
            let store = Store::new().with_must("news", news);
            assert_eq!(template.render(&store).unwrap(), expect);
        }
    }

    #[test]
    fn test_render_member() {
        let template = compile(
            "${person.name} ${person['age']} ${tags[1]} ${tags.length} ${person.missing}",
            &["person", "tags"],
        )
        .unwrap();
        let store = Store::new()
            .with_must("person", json!({ "name": "taylor", "age": 30 }))
            .with_must("tags", json!(["a", "b"]));

        assert_eq!(template.render(&store).unwrap(), "taylor 30 b 2 undefined");
    }

    #[test]
    fn test_render_member_of_undefined() {
        let template = compile("${person.address.city}", &["person"]).unwrap();
        let store = Store::new().with_must("person", json!({}));
        let error = template.render(&store).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Reference);
        assert_eq!(
            error.reason(),
            "cannot read properties of undefined (reading 'city')"
        );
    }

    #[test]
    fn test_render_optional_chain() {
        let chained = compile("${person?.address.city}", &["person"]).unwrap();
        let store = Store::new().with_must("person", json!({}));

        assert_eq!(chained.render(&Store::new()).unwrap(), "undefined");
        assert_eq!(chained.render(&store).unwrap_err().kind(), ErrorKind::Reference);

        let fallback = compile("${person.address?.city ?? 'nowhere'}", &["person"]).unwrap();
        assert_eq!(fallback.render(&store).unwrap(), "nowhere");
    }

    #[test]
    fn test_render_group_ends_chain() {
        let template = compile("${(person?.address).city}", &["person"]).unwrap();

        assert!(template.render(&Store::new()).is_err());
    }

    #[test]
    fn test_render_short_circuit() {
        let template = compile(
            "${ok || missing.value} ${!ok && missing.value} ${value ?? missing.value}",
            &["ok", "missing", "value"],
        )
        .unwrap();
        let store = Store::new().with_must("ok", true).with_must("value", 0);

        assert_eq!(template.render(&store).unwrap(), "true false 0");
    }

    #[test]
    fn test_render_unary() {
        let template = compile(
            "${!name} ${-count} ${+'4'} ${typeof name} ${typeof nothing} ${typeof null}",
            &["name", "count"],
        )
        .unwrap();
        let store = Store::new().with_must("name", "x").with_must("count", 3);

        assert_eq!(
            template.render(&store).unwrap(),
            "false -3 4 string undefined object"
        );
    }

    #[test]
    fn test_render_typeof_group() {
        let template = compile("${typeof (nothing)} ${typeof ((name))}", &["name"]).unwrap();
        let store = Store::new().with_must("name", "x");
        assert_eq!(template.render(&store).unwrap(), "undefined string");

        let template = compile("${!(nothing)}", &[]).unwrap();
        let error = template.render(&store).unwrap_err();
        assert_eq!(error.reason(), "nothing is not defined");
    }

    #[test]
    fn test_render_backslash_before_marker() {
        let store = Store::new().with_must("x", "file");

        for (text, expect) in [
            (r"C:\${x}", r"C:${x}"),
            (r"C:\\${x}", r"C:\\file"),
            (r"C:\\\${x}", r"C:\\${x}"),
            (r"C:\\\\${x}", r"C:\\\\file"),
            (r"C:\\${x}\\${x}", r"C:\\file\\file"),
        ] {
            assert_eq!(crate::render(text, &store).unwrap(), expect, "{text}");
        }
    }

    #[test]
    fn test_render_string_line_continuation() {
        let result = crate::render("${'one \\\r\ntwo'}", &Store::new());

        assert_eq!(result.unwrap(), "one two");
    }

    #[test]
    fn test_render_globals() {
        let result = crate::render("${undefined} ${NaN} ${-Infinity} ${1 / 0}", &Store::new());

        assert_eq!(result.unwrap(), "undefined NaN -Infinity Infinity");
    }

    #[test]
    fn test_render_single_binding() {
        let engine = Engine::builder().single("vars").build();
        let template = engine.compile_must("${vars.name} ${vars.missing}", &[]);
        let store = Store::new().with_must("name", "taylor");

        assert_eq!(template.render(&store).unwrap(), "taylor undefined");
    }

    #[test]
    fn test_render_error_has_pointer_and_name() {
        let engine = Engine::builder().name("letter.tpl").build();
        let template = engine.compile_must("Dear ${nam},", &["name"]);
        let error = template.render(&Store::new()).unwrap_err();

        assert_eq!(error.name(), Some("letter.tpl"));
        assert!(error.help().is_some_and(|help| help.contains("`name`")));
        assert!(format!("{error:#}").contains("letter.tpl:1:8"));
    }

    #[test]
    fn test_render_is_repeatable() {
        let template = compile("${a + b}", &["a", "b"]).unwrap();
        let store = Store::new().with_must("a", 1).with_must("b", 2);

        assert_eq!(template.render(&store).unwrap(), "3");
        assert_eq!(template.render(&store).unwrap(), "3");
    }
}
