use crate::{
    compile::{
        is_reserved,
        lex::{is_ident_continue, is_ident_start},
    },
    log::{Error, ErrorKind, INVALID_PARAMETER},
};
use std::{collections::HashSet, fmt::Display};

/// Parameter that receives the values when names are destructured.
const DESTRUCTURE_PARAMETER: &str = "values";

/// Describes the names a [`Template`][`crate::Template`] binds before its
/// expressions are evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preamble {
    /// Each name binds to the value stored under the same key, or to
    /// `undefined` when the key is missing.
    Destructure(Vec<String>),
    /// The name binds to the entire store, and properties are read with
    /// qualified access such as `vars.name`.
    Single(String),
}

impl Preamble {
    /// Return the destructured parameter names, in order.
    ///
    /// Always empty for [`Preamble::Single`].
    pub fn names(&self) -> &[String] {
        match self {
            Preamble::Destructure(names) => names,
            Preamble::Single(_) => &[],
        }
    }

    /// Return the single binding name, if any.
    pub fn binding(&self) -> Option<&str> {
        match self {
            Preamble::Destructure(_) => None,
            Preamble::Single(name) => Some(name),
        }
    }

    /// Return the name of the function parameter that receives the values.
    pub(crate) fn parameter(&self) -> &str {
        self.binding().unwrap_or(DESTRUCTURE_PARAMETER)
    }

    /// Ensure every name is a valid identifier, and no name repeats.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] of kind [`ErrorKind::Syntax`] naming the first
    /// offending name.
    pub fn validate(&self) -> Result<(), Error> {
        let names: &[String] = match self {
            Preamble::Destructure(names) => names,
            Preamble::Single(name) => std::slice::from_ref(name),
        };

        let mut seen = HashSet::with_capacity(names.len());
        for name in names {
            if !is_identifier(name) {
                return Err(Error::build(ErrorKind::Syntax, INVALID_PARAMETER).with_help(
                    format!("`{name}` is not a valid identifier or is a reserved word"),
                ));
            }
            if matches!(self, Preamble::Destructure(_)) && name == DESTRUCTURE_PARAMETER {
                return Err(Error::build(ErrorKind::Syntax, INVALID_PARAMETER).with_help(
                    format!("`{name}` already names the parameter that holds the values"),
                ));
            }
            if !seen.insert(name.as_str()) {
                return Err(Error::build(ErrorKind::Syntax, INVALID_PARAMETER)
                    .with_help(format!("`{name}` is declared more than once")));
            }
        }

        Ok(())
    }
}

impl Display for Preamble {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Preamble::Destructure(names) => write!(f, "{{ {} }}", names.join(", ")),
            Preamble::Single(name) => write!(f, "{name}"),
        }
    }
}

/// Return true if the text could name a binding inside of an expression.
fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();

    chars.next().is_some_and(is_ident_start) && chars.all(is_ident_continue) && !is_reserved(text)
}

#[cfg(test)]
mod tests {
    use super::{is_identifier, Preamble};
    use crate::log::ErrorKind;

    #[test]
    fn test_is_identifier() {
        for valid in ["name", "_private", "$el", "née", "a1", "undefined"] {
            assert!(is_identifier(valid), "{valid}");
        }
        for invalid in ["", "1a", "first-name", "a b", "class", "typeof", "true"] {
            assert!(!is_identifier(invalid), "{invalid}");
        }
    }

    #[test]
    fn test_validate() {
        let preamble = Preamble::Destructure(vec!["name".into(), "reason".into()]);
        assert!(preamble.validate().is_ok());
        assert!(Preamble::Destructure(vec![]).validate().is_ok());
        assert!(Preamble::Single("vars".into()).validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_name() {
        let error = Preamble::Destructure(vec!["name".into(), "first name".into()])
            .validate()
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Syntax);
        assert!(error.help().is_some_and(|h| h.contains("`first name`")));
        assert!(Preamble::Single("var".into()).validate().is_err());
    }

    #[test]
    fn test_validate_duplicate_name() {
        let error = Preamble::Destructure(vec!["name".into(), "name".into()])
            .validate()
            .unwrap_err();

        assert!(error.help().is_some_and(|h| h.contains("more than once")));
    }

    #[test]
    fn test_validate_parameter_name() {
        assert!(Preamble::Destructure(vec!["values".into()]).validate().is_err());
        assert!(Preamble::Single("values".into()).validate().is_ok());
    }

    #[test]
    fn test_display() {
        let preamble = Preamble::Destructure(vec!["name".into(), "news".into()]);

        assert_eq!(preamble.to_string(), "{ name, news }");
        assert_eq!(Preamble::Single("vars".into()).to_string(), "vars");
    }
}
