use super::{tree::Tree, Preamble, Scope};
use crate::{log::Error, render::Renderer, Store};
use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FmtResult, Write};

/// A compiled template that can be rendered with a [`Store`].
///
/// A `Template` owns a copy of its source text, so it may outlive the string
/// it was compiled from. It is never mutated by rendering, and may be shared
/// between threads and rendered concurrently.
///
/// # Examples
///
/// ```
/// use tmplit::{compile, Store};
///
/// let template = compile("Dear ${name},", &["name"]).unwrap();
/// let store = Store::new().with_must("name", "Mr. Anderson");
///
/// assert_eq!(template.render(&store).unwrap(), "Dear Mr. Anderson,");
/// ```
#[derive(Debug, Clone)]
pub struct Template {
    /// The name of the [`Template`], used in error reports.
    name: Option<String>,
    /// The source text from which this [`Template`] was generated.
    source: String,
    /// The names bound before expressions are evaluated.
    preamble: Preamble,
    /// The Abstract Syntax Tree generated during compilation.
    scope: Scope,
}

impl Template {
    pub(crate) fn new(
        source: String,
        name: Option<String>,
        preamble: Preamble,
        scope: Scope,
    ) -> Self {
        Self {
            name,
            source,
            preamble,
            scope,
        }
    }

    /// Render the [`Template`] with the given [`Store`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] of kind [`ErrorKind::Reference`][`crate::ErrorKind::Reference`]
    /// when an expression uses a name that is not bound, or reads a property
    /// of `undefined` or `null`.
    pub fn render(&self, store: &Store) -> Result<String, Error> {
        Renderer::new(self, store).render()
    }

    /// Render the [`Template`] with any value that serializes to a map.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the value cannot be converted to a [`Store`],
    /// or for the same reasons as [`Template::render`].
    pub fn render_value<T>(&self, value: &T) -> Result<String, Error>
    where
        T: Serialize + ?Sized,
    {
        self.render(&Store::from_serialize(value)?)
    }

    /// Return the source text of the function this [`Template`] stands for.
    ///
    /// Equivalent to the `Display` implementation.
    ///
    /// # Examples
    ///
    /// ```
    /// use tmplit::compile;
    ///
    /// let template = compile("Hello ${name}!", &["name"]).unwrap();
    ///
    /// assert_eq!(
    ///     template.source_text(),
    ///     "function anonymous(values) {\n  const { name } = values;\n  return `Hello ${name}!`;\n}"
    /// );
    /// ```
    pub fn source_text(&self) -> String {
        self.to_string()
    }

    /// Return the destructured parameter names, in order.
    pub fn params(&self) -> &[String] {
        self.preamble.names()
    }

    /// Return the single binding name, when compiled in single-binding mode.
    pub fn binding(&self) -> Option<&str> {
        self.preamble.binding()
    }

    /// Return the name of the [`Template`], if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Return the source text the [`Template`] was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub(crate) fn preamble(&self) -> &Preamble {
        &self.preamble
    }

    pub(crate) fn scope(&self) -> &Scope {
        &self.scope
    }
}

impl Display for Template {
    /// Write the template as a function whose body destructures the
    /// parameters and returns a template literal.
    ///
    /// Raw text is escaped so that the literal always ends where the
    /// template ends.
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(f, "function anonymous({}) {{", self.preamble.parameter())?;
        if let Preamble::Destructure(names) = &self.preamble {
            if !names.is_empty() {
                writeln!(f, "  const {} = values;", self.preamble)?;
            }
        }

        write!(f, "  return `")?;
        for tree in &self.scope.data {
            match tree {
                Tree::Raw(region) => write_escaped(f, region.literal(&self.source))?,
                Tree::Output(output) => f.write_str(output.region.literal(&self.source))?,
            }
        }
        write!(f, "`;\n}}")
    }
}

/// Write raw text so that it reads back as the same text inside of a
/// template literal.
fn write_escaped(f: &mut Formatter<'_>, text: &str) -> FmtResult {
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '`' => f.write_str("\\`")?,
            '\\' => f.write_str("\\\\")?,
            '$' if chars.peek() == Some(&'{') => f.write_str("\\$")?,
            c => f.write_char(c)?,
        }
    }

    Ok(())
}
