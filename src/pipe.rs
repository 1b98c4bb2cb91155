use crate::render::value::{number_to_string, Value};
use serde_json::Value as Json;
use std::fmt::{Arguments, Display, Result, Write};

/// Wraps some underlying buffer by providing methods that write to it
/// in different formats.
pub struct Pipe<'buffer> {
    buffer: &'buffer mut (dyn Write + 'buffer),
}

impl<'buffer> Pipe<'buffer> {
    /// Create a new Pipe that writes to the given buffer.
    pub fn new(buffer: &'buffer mut (dyn Write + 'buffer)) -> Self {
        Self { buffer }
    }

    /// Write the given Value to the Pipe buffer.
    ///
    /// The Pipe will handle formatting the value.
    ///
    /// # Errors
    ///
    /// The Pipe supports all Value types, so the only error that will
    /// be returned is propagated from the underlying buffer.
    pub fn write_value(&mut self, value: &Value) -> Result {
        match value {
            Value::Undefined => self.write_str("undefined"),
            Value::Null => self.write_str("null"),
            Value::Bool(bool) => self.write_display(bool),
            Value::Number(number) => self.write_str(&number_to_string(*number)),
            Value::String(string) => self.write_str(string),
            Value::Array(array) => self.write_array(array),
            Value::Object(_) => self.write_str("[object Object]"),
        }
    }

    /// Write the value to the buffer using the Display implementation.
    fn write_display(&mut self, value: impl Display) -> Result {
        write!(self.buffer, "{}", value)
    }

    /// Write the value to the buffer as a comma separated list.
    ///
    /// `null` items are written as nothing, and nested arrays are flattened
    /// into the same list.
    fn write_array(&mut self, array: &[Json]) -> Result {
        for (index, item) in array.iter().enumerate() {
            if index > 0 {
                self.write_char(',')?;
            }
            if !item.is_null() {
                self.write_value(&Value::from(item))?;
            }
        }

        Ok(())
    }
}

impl Write for Pipe<'_> {
    #[inline]
    fn write_str(&mut self, s: &str) -> Result {
        Write::write_str(self.buffer, s)
    }

    #[inline]
    fn write_char(&mut self, c: char) -> Result {
        Write::write_char(self.buffer, c)
    }

    #[inline]
    fn write_fmt(&mut self, args: Arguments<'_>) -> Result {
        Write::write_fmt(self.buffer, args)
    }
}
