mod builder;

pub use builder::{Binding, Builder};

use crate::{
    compile::{compile_with, Preamble, Template},
    log::{Error, ErrorKind, INVALID_PARAMETER},
    Store,
};
use serde::Serialize;

/// Facilitates compiling and rendering templates with one [`Binding`]
/// convention.
///
/// An `Engine` holds configuration only. It never stores the templates it
/// compiles, so callers that render a template more than once should keep
/// the returned [`Template`].
#[derive(Debug, Clone, Default)]
pub struct Engine {
    /// How templates reach their values.
    binding: Binding,
    /// Name reported in errors.
    name: Option<String>,
}

impl Engine {
    /// Create a new [`Engine`] using [`Binding::Destructure`].
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a [`Builder`] to configure a new [`Engine`].
    #[inline]
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Return the [`Binding`] used by this [`Engine`].
    #[inline]
    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    /// Compile a new [`Template`].
    ///
    /// With [`Binding::Destructure`], each of `names` may be referenced by
    /// bare name from the template's expressions. With [`Binding::Single`],
    /// `names` must be empty.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] of kind [`ErrorKind::Syntax`] when compilation
    /// fails, which means the source contains invalid syntax or one of the
    /// names is not a valid identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use tmplit::Engine;
    ///
    /// let engine = Engine::default();
    /// let template = engine.compile("hello, ${name}!", &["name"]);
    /// assert!(template.is_ok());
    /// ```
    pub fn compile(&self, text: &str, names: &[&str]) -> Result<Template, Error> {
        let preamble = match &self.binding {
            Binding::Destructure => {
                Preamble::Destructure(names.iter().map(|name| name.to_string()).collect())
            }
            Binding::Single(binding) => {
                if !names.is_empty() {
                    let error = Error::build(ErrorKind::Syntax, INVALID_PARAMETER).with_help(
                        format!(
                            "parameter names cannot be declared in single-binding mode, \
                            read them from `{binding}` instead"
                        ),
                    );
                    return Err(match &self.name {
                        Some(name) => error.with_name(name),
                        None => error,
                    });
                }
                Preamble::Single(binding.clone())
            }
        };

        compile_with(text, preamble, self.name.as_deref())
    }

    /// Compile a new [`Template`].
    ///
    /// # Panics
    ///
    /// Panics when compilation fails, which most likely means the source
    /// contains invalid syntax.
    ///
    /// # Examples
    ///
    /// ```
    /// use tmplit::Engine;
    ///
    /// let engine = Engine::default();
    /// let template = engine.compile_must("hello, ${name}!", &["name"]);
    /// ```
    #[inline]
    pub fn compile_must(&self, text: &str, names: &[&str]) -> Template {
        match self.compile(text, names) {
            Ok(template) => template,
            Err(error) => panic!("{error:#}"),
        }
    }

    /// Compile and render a template in one call.
    ///
    /// With [`Binding::Destructure`], the parameter names are the keys of the
    /// [`Store`], in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if compiling or rendering fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use tmplit::{Engine, Store};
    ///
    /// let engine = Engine::default();
    /// let result = engine.run("hello, ${name}!", &Store::new().with_must("name", "taylor"));
    ///
    /// assert_eq!(result.unwrap(), "hello, taylor!")
    /// ```
    pub fn run(&self, text: &str, store: &Store) -> Result<String, Error> {
        let names: Vec<&str> = match self.binding {
            Binding::Destructure => store.keys().collect(),
            Binding::Single(_) => vec![],
        };

        self.compile(text, &names)?.render(store)
    }

    /// Compile and render a template in one call, using any value that
    /// serializes to a map.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if the value cannot be converted to a [`Store`],
    /// or compiling or rendering fails.
    pub fn run_value<T>(&self, text: &str, value: &T) -> Result<String, Error>
    where
        T: Serialize + ?Sized,
    {
        self.run(text, &Store::from_serialize(value)?)
    }
}

#[cfg(test)]
mod tests {
    use crate::{log::ErrorKind, Engine, Store};
    use serde_json::json;

    #[test]
    fn test_run_destructure() {
        let store = Store::new()
            .with_must("name", "Mr. Anderson")
            .with_must("agent", "Agent Smith");
        let result = Engine::default().run("${agent} to ${name}", &store);

        assert_eq!(result.unwrap(), "Agent Smith to Mr. Anderson");
    }

    #[test]
    fn test_run_single() {
        let engine = Engine::builder().single("vars").build();
        let store = Store::new().with_must("reason", "your cat died.");

        assert_eq!(engine.run("${vars.reason}", &store).unwrap(), "your cat died.");
    }

    #[test]
    fn test_single_rejects_bare_names() {
        let engine = Engine::builder().single("vars").build();
        let store = Store::new().with_must("reason", "your cat died.");
        let error = engine.run("${reason}", &store).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Reference);
    }

    #[test]
    fn test_single_rejects_names() {
        let engine = Engine::builder().single("vars").name("letter.tpl").build();
        let error = engine.compile("${vars.name}", &["name"]).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Syntax);
        assert_eq!(error.name(), Some("letter.tpl"));
    }

    #[test]
    fn test_destructure_rejects_qualified_access() {
        let store = Store::new().with_must("reason", "your cat died.");
        let error = Engine::default().run("${vars.reason}", &store).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Reference);
    }

    #[test]
    fn test_run_value() {
        let result = Engine::default().run_value("${a + b}", &json!({ "a": 1, "b": 2 }));

        assert_eq!(result.unwrap(), "3");
    }

    #[test]
    fn test_named_engine_reports_name() {
        let engine = Engine::builder().name("letter.tpl").build();
        let error = engine.compile("${ name", &["name"]).unwrap_err();

        assert_eq!(error.name(), Some("letter.tpl"));
    }

    #[test]
    #[should_panic]
    fn test_compile_must_panics() {
        Engine::default().compile_must("${", &[]);
    }
}
