//! Tmplit - Template Literal Compiler
//!
//! Compiles text containing `${ expression }` markers into a [`Template`],
//! a reusable render function that substitutes values from a [`Store`].
//!
//! ```
//! use tmplit::{compile, Store};
//!
//! let template = compile(
//!     "Dear ${name}, ${news === 'bad' ? 'we regret' : 'we are pleased'} to inform you.",
//!     &["name", "news"],
//! )
//! .unwrap();
//!
//! let store = Store::new()
//!     .with_must("name", "Mr. Anderson")
//!     .with_must("news", "good");
//!
//! assert_eq!(
//!     template.render(&store).unwrap(),
//!     "Dear Mr. Anderson, we are pleased to inform you."
//! );
//! ```
mod compile;
mod engine;
mod log;
mod pipe;
mod region;
mod render;
mod store;

pub use compile::Template;
pub use engine::{Binding, Builder, Engine};
pub use log::{Error, ErrorKind, Pointer, Visual};
pub use region::Region;
pub use store::Store;

/// Compile a new [`Template`] whose expressions may reference each of
/// `names` directly.
///
/// Uses an [`Engine`] with default settings, create an `Engine` with
/// [`Engine::builder`] to bind values to a single name instead.
///
/// # Errors
///
/// Returns an [`Error`] of kind [`ErrorKind::Syntax`] when the text
/// contains invalid syntax, or one of the names is not a valid identifier.
///
/// # Examples
///
/// ```
/// use tmplit::compile;
///
/// let template = compile("hello, ${name}!", &["name"]);
/// assert!(template.is_ok());
/// ```
#[inline]
pub fn compile(text: &str, names: &[&str]) -> Result<Template, Error> {
    Engine::default().compile(text, names)
}

/// Compile and render the text in one call.
///
/// The keys of the [`Store`] are declared as the parameter names, in
/// insertion order.
///
/// # Errors
///
/// Returns an [`Error`] if compiling or rendering fails.
///
/// # Examples
///
/// ```
/// use tmplit::{render, Store};
///
/// let output = render("hello, ${name}!", &Store::new().with_must("name", "taylor"));
/// assert_eq!(output.unwrap(), "hello, taylor!");
/// ```
#[inline]
pub fn render(text: &str, store: &Store) -> Result<String, Error> {
    Engine::default().run(text, store)
}
