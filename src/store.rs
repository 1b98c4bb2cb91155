use crate::log::{Error, ErrorKind};
use serde::Serialize;
use serde_json::{to_value, Map, Value};

/// Provides storage for data that templates can be rendered against.
///
/// Keys keep the order in which they were first inserted, which is the
/// order the immediate mode helpers declare them in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    data: Map<String, Value>,
}

impl Store {
    /// Create a new Store.
    #[inline]
    pub fn new() -> Self {
        Self { data: Map::new() }
    }

    /// Create a Store from any value that serializes to a map, such as a
    /// struct or a `HashMap<String, T>`.
    ///
    /// # Errors
    ///
    /// Returns an error if the serialization fails, or the value does not
    /// serialize to a map.
    pub fn from_serialize<T>(value: &T) -> Result<Self, Error>
    where
        T: Serialize + ?Sized,
    {
        let serialized = to_value(value).map_err(|e| {
            Error::build(ErrorKind::Serialize, "value is unserializable").with_help(e.to_string())
        })?;

        Self::try_from(serialized)
    }

    /// Insert the value into the Store.
    ///
    /// # Errors
    ///
    /// Returns an error if the serialization fails.
    pub fn insert<S, T>(&mut self, key: S, value: T) -> Result<(), Error>
    where
        S: Into<String>,
        T: Serialize,
    {
        let key = key.into();
        let serialized = to_value(&value).map_err(|e| {
            Error::build(ErrorKind::Serialize, format!("value for `{key}` is unserializable"))
                .with_help(e.to_string())
        })?;

        self.data.insert(key, serialized);
        Ok(())
    }

    /// Insert the value into the Store.
    ///
    /// # Panics
    ///
    /// Will panic if the serialization fails.
    #[inline]
    pub fn insert_must<S, T>(&mut self, key: S, value: T)
    where
        S: Into<String>,
        T: Serialize,
    {
        if let Err(error) = self.insert(key, value) {
            panic!("{error:#}");
        }
    }

    /// Insert the value into the Store.
    ///
    /// Returns the Store, so additional methods may be chained.
    ///
    /// # Errors
    ///
    /// Returns an error if the serialization fails.
    pub fn with<S, T>(mut self, key: S, value: T) -> Result<Self, Error>
    where
        S: Into<String>,
        T: Serialize,
    {
        self.insert(key, value)?;
        Ok(self)
    }

    /// Insert the value into the Store.
    ///
    /// Returns the Store, so additional methods may be chained.
    ///
    /// # Panics
    ///
    /// Will panic if the serialization fails.
    #[inline]
    pub fn with_must<S, T>(mut self, key: S, value: T) -> Self
    where
        S: Into<String>,
        T: Serialize,
    {
        self.insert_must(key, value);
        self
    }

    /// Get the value of the given key, if any.
    #[inline]
    pub fn get(&self, index: &str) -> Option<&Value> {
        self.data.get(index)
    }

    /// Return the keys of the Store, in insertion order.
    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    /// Return the number of keys in the Store.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Return true if the Store holds no keys.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Return the underlying map.
    #[inline]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.data
    }
}

impl From<Map<String, Value>> for Store {
    fn from(data: Map<String, Value>) -> Self {
        Self { data }
    }
}

impl TryFrom<Value> for Store {
    type Error = Error;

    /// Create a Store from a [`Value::Object`].
    ///
    /// # Errors
    ///
    /// Returns an error for any other kind of `Value`.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(data) => Ok(Self { data }),
            other => Err(Error::build(
                ErrorKind::Serialize,
                "values must serialize to a map",
            )
            .with_help(format!("found `{other}`, wrap it in a map with a key"))),
        }
    }
}
