//! Gateway value model
//!
//! Replies only ever carry three shapes: a string, a container of keyed
//! entries (sent as an ECMA array), or bytes that are already AMF encoded
//! and must be spliced in untouched.

use bytes::Bytes;

/// Value returned by a responder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Scalar, sent as an AMF0 string (0x02)
    String(String),

    /// Ordered keyed entries, sent as an ECMA array (0x08)
    /// Keys are always in string form
    Container(Vec<(String, Value)>),

    /// Pre-encoded AMF bytes, emitted verbatim with no marker
    Raw(Bytes),
}

impl Value {
    /// Build an indexed container keyed "0", "1", ...
    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::Container(
            items
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v.into()))
                .collect(),
        )
    }

    /// Build a container from key/value pairs, keys converted to strings
    pub fn container<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: ToString,
        V: Into<Value>,
    {
        Value::Container(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.into()))
                .collect(),
        )
    }

    /// Try to get this value as a string reference
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value's entries
    pub fn as_entries(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Container(entries) => Some(entries),
            _ => None,
        }
    }

    /// Get an entry from a container value (first match wins)
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_entries()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Get a string entry from a container value
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str()
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::String(String::new())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::String(if v { "1".into() } else { String::new() })
    }
}

macro_rules! value_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::String(v.to_string())
                }
            }
        )*
    };
}

value_from_integer!(i32, i64, u16, u32, u64, usize);

impl From<Bytes> for Value {
    fn from(v: Bytes) -> Self {
        Value::Raw(v)
    }
}

impl<V: Into<Value>> From<Vec<V>> for Value {
    fn from(v: Vec<V>) -> Self {
        Value::list(v)
    }
}
