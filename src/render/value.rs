use crate::{
    log::{error_read_property, Error},
    pipe::Pipe,
};
use serde_json::{Map, Value as Json};
use std::{
    borrow::Cow,
    fmt::{Display, Formatter, Result as FmtResult},
};

/// A value produced while evaluating an expression.
///
/// Values read from the [`Store`][`crate::Store`] and string literals in the
/// template are borrowed, values computed by an operator are owned.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(Cow<'a, str>),
    /// Strict equality compares arrays by identity, so two arrays are only
    /// equal when they are the same array in the store.
    Array(&'a Vec<Json>),
    /// Compared by identity, like [`Value::Array`].
    Object(&'a Map<String, Json>),
}

impl<'a> Value<'a> {
    /// Return true if the value is `undefined` or `null`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Return true if the value is truthy.
    ///
    /// Every array and object is truthy, even when empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(bool) => *bool,
            Value::Number(number) => !(number.is_nan() || *number == 0.0),
            Value::String(string) => !string.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }

    /// Return the name reported by the `typeof` operator.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Null | Value::Array(_) | Value::Object(_) => "object",
        }
    }

    /// Convert the value to a number.
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(bool) => f64::from(u8::from(*bool)),
            Value::Number(number) => *number,
            Value::String(string) => string_to_number(string),
            Value::Array(_) | Value::Object(_) => string_to_number(&self.to_text()),
        }
    }

    /// Convert the value to the text that would be written to the output.
    pub fn to_text(&self) -> Cow<'a, str> {
        match self {
            Value::String(string) => string.clone(),
            other => Cow::Owned(other.to_string()),
        }
    }

    /// Convert arrays and objects to strings, other values are returned as is.
    pub fn to_primitive(self) -> Value<'a> {
        match self {
            Value::Array(_) | Value::Object(_) => Value::String(self.to_text()),
            primitive => primitive,
        }
    }

    /// Read the property with the given key.
    ///
    /// Missing properties are `undefined`.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] of kind [`ErrorKind::Reference`][`crate::ErrorKind::Reference`]
    /// when the value is `undefined` or `null`.
    pub fn get(&self, key: &str) -> Result<Value<'a>, Error> {
        match self {
            Value::Undefined | Value::Null => Err(error_read_property(key, self)),
            Value::Object(map) => {
                let map: &'a Map<String, Json> = *map;
                Ok(map.get(key).map_or(Value::Undefined, Value::from))
            }
            Value::Array(array) => {
                let array: &'a Vec<Json> = *array;
                if key == "length" {
                    return Ok(Value::Number(array.len() as f64));
                }
                Ok(array_index(key)
                    .and_then(|index| array.get(index))
                    .map_or(Value::Undefined, Value::from))
            }
            Value::String(string) => {
                if key == "length" {
                    return Ok(Value::Number(string.encode_utf16().count() as f64));
                }
                Ok(array_index(key)
                    .and_then(|index| string.encode_utf16().nth(index))
                    .map_or(Value::Undefined, |unit| {
                        Value::String(Cow::Owned(String::from_utf16_lossy(&[unit])))
                    }))
            }
            Value::Bool(_) | Value::Number(_) => Ok(Value::Undefined),
        }
    }
}

impl<'a> From<&'a Json> for Value<'a> {
    fn from(value: &'a Json) -> Self {
        match value {
            Json::Null => Value::Null,
            Json::Bool(bool) => Value::Bool(*bool),
            Json::Number(number) => Value::Number(number.as_f64().unwrap_or(f64::NAN)),
            Json::String(string) => Value::String(Cow::Borrowed(string)),
            Json::Array(array) => Value::Array(array),
            Json::Object(object) => Value::Object(object),
        }
    }
}

impl Display for Value<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Pipe::new(f).write_value(self)
    }
}

/// Format a number the way it is written into rendered output.
///
/// Integers print without a fraction, and exponents are only used for very
/// large or very small magnitudes.
pub fn number_to_string(number: f64) -> String {
    if number.is_nan() {
        return "NaN".to_owned();
    }
    if number.is_infinite() {
        return if number > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    if number == 0.0 {
        return "0".to_owned();
    }

    let magnitude = number.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return number.to_string();
    }

    let exponent = format!("{number:e}");
    match exponent.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exponent,
    }
}

/// Convert text to a number.
///
/// Surrounding whitespace is ignored, and text that is empty after trimming
/// is zero. Text that is not entirely a number is `NaN`.
pub fn string_to_number(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }

    match text {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = text.strip_prefix(prefix) {
            return parse_radix(digits, radix);
        }
    }

    if !text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return f64::NAN;
    }

    text.parse().unwrap_or(f64::NAN)
}

/// Parse digits in the given radix, without a sign.
fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }

    digits
        .chars()
        .try_fold(0.0, |total, c| {
            c.to_digit(radix)
                .map(|digit| total * f64::from(radix) + f64::from(digit))
        })
        .unwrap_or(f64::NAN)
}

/// Return the index named by the key, when it is written as a canonical
/// non-negative integer.
fn array_index(key: &str) -> Option<usize> {
    let index: usize = key.parse().ok()?;

    (index.to_string() == key).then_some(index)
}
