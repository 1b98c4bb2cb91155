use super::Engine;

/// Describes how a template reaches the values it is rendered with.
///
/// An [`Engine`] uses exactly one `Binding` for every template it compiles,
/// so templates written for one convention are never silently rendered
/// with the other.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Binding {
    /// Expressions read values by bare name, such as `${reason}`.
    ///
    /// Only the parameter names given at compile time are bound.
    #[default]
    Destructure,
    /// Expressions read values through one name bound to the entire
    /// store, such as `${vars.reason}`.
    Single(String),
}

/// A handy way to build a new instance of [`Engine`].
///
/// # Example
///
/// ```
/// use tmplit::{Binding, Engine, Store};
///
/// let engine = Engine::builder()
///     .single("vars")
///     .name("letter.tpl")
///     .build();
///
/// let store = Store::new().with_must("reason", "your cat died.");
/// let output = engine.run("${vars.reason}", &store);
///
/// assert_eq!(output.unwrap(), "your cat died.");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder {
    binding: Binding,
    name: Option<String>,
}

impl Builder {
    /// Create a new Builder.
    ///
    /// Without further configuration, the [`Engine`] uses
    /// [`Binding::Destructure`].
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read values by bare, destructured names.
    #[inline]
    pub fn destructure(&mut self) -> &mut Self {
        self.binding = Binding::Destructure;

        self
    }

    /// Read values through the given name, which is bound to the entire
    /// store.
    #[inline]
    pub fn single<T>(&mut self, binding: T) -> &mut Self
    where
        T: Into<String>,
    {
        self.binding = Binding::Single(binding.into());

        self
    }

    /// Set the name reported in errors for templates compiled by the
    /// [`Engine`].
    #[inline]
    pub fn name<T>(&mut self, name: T) -> &mut Self
    where
        T: Into<String>,
    {
        self.name = Some(name.into());

        self
    }

    /// Build an [`Engine`] from the configuration.
    pub fn build(&self) -> Engine {
        Engine {
            binding: self.binding.clone(),
            name: self.name.clone(),
        }
    }
}
