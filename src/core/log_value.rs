//! Renderable argument values and ordered structured fields
//!
//! This module provides:
//! - `LogValue`: a heterogeneous value with a natural text form, used both
//!   as a positional template argument and as a structured field value
//! - `Fields`: an insertion-ordered list of `key=value` pairs

use super::error::{LoggerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value type for template arguments and structured fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LogValue {
    String(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    /// Raw address, rendered as `0x…`
    Pointer(usize),
    Null,
}

impl fmt::Display for LogValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogValue::String(s) => write!(f, "{}", s),
            LogValue::Int(i) => write!(f, "{}", i),
            LogValue::UInt(u) => write!(f, "{}", u),
            LogValue::Float(fl) => write!(f, "{}", fl),
            LogValue::Bool(b) => write!(f, "{}", b),
            LogValue::Pointer(addr) => write!(f, "{:#x}", addr),
            LogValue::Null => write!(f, "null"),
        }
    }
}

impl LogValue {
    /// Convert to serde_json::Value for JSON output
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            LogValue::String(s) => serde_json::Value::String(s.clone()),
            LogValue::Int(i) => serde_json::Value::Number((*i).into()),
            LogValue::UInt(u) => serde_json::Value::Number((*u).into()),
            LogValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            LogValue::Bool(b) => serde_json::Value::Bool(*b),
            LogValue::Pointer(_) => serde_json::Value::String(self.to_string()),
            LogValue::Null => serde_json::Value::Null,
        }
    }
}

impl From<String> for LogValue {
    fn from(s: String) -> Self {
        LogValue::String(s)
    }
}

impl From<&str> for LogValue {
    fn from(s: &str) -> Self {
        LogValue::String(s.to_string())
    }
}

impl From<&String> for LogValue {
    fn from(s: &String) -> Self {
        LogValue::String(s.clone())
    }
}

impl From<char> for LogValue {
    fn from(c: char) -> Self {
        LogValue::String(c.to_string())
    }
}

macro_rules! impl_from_signed {
    ($($ty:ty),*) => {
        $(impl From<$ty> for LogValue {
            fn from(i: $ty) -> Self {
                LogValue::Int(i as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($ty:ty),*) => {
        $(impl From<$ty> for LogValue {
            fn from(u: $ty) -> Self {
                LogValue::UInt(u as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for LogValue {
    fn from(f: f32) -> Self {
        LogValue::Float(f as f64)
    }
}

impl From<f64> for LogValue {
    fn from(f: f64) -> Self {
        LogValue::Float(f)
    }
}

impl From<bool> for LogValue {
    fn from(b: bool) -> Self {
        LogValue::Bool(b)
    }
}

impl<T: ?Sized> From<*const T> for LogValue {
    fn from(ptr: *const T) -> Self {
        LogValue::Pointer(ptr.cast::<()>() as usize)
    }
}

impl<T: ?Sized> From<*mut T> for LogValue {
    fn from(ptr: *mut T) -> Self {
        LogValue::Pointer(ptr.cast::<()>() as usize)
    }
}

impl<T: Into<LogValue>> From<Option<T>> for LogValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(LogValue::Null)
    }
}

/// Ordered `key=value` pairs attached to a structured log call
///
/// Insertion order is preserved; fields are never sorted.
///
/// # Example
///
/// ```
/// use interlaced_logger::Fields;
///
/// let fields = Fields::new().with("user_id", 12345).with("ip", "192.168.1.1");
/// assert_eq!(fields.to_string(), "user_id=12345 ip=192.168.1.1");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fields {
    pairs: Vec<(String, LogValue)>,
}

impl Fields {
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Add a field (builder form)
    #[must_use = "builder methods return a new value"]
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<LogValue>,
    {
        self.pairs.push((key.into(), value.into()));
        self
    }

    /// Add a field
    pub fn push<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<LogValue>,
    {
        self.pairs.push((key.into(), value.into()));
    }

    /// Build fields from an alternating `key, value, key, value, …` list
    ///
    /// # Errors
    ///
    /// Returns `InvalidFieldList` when the list has a trailing key without a value.
    pub fn from_flat<I>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = LogValue>,
    {
        let values: Vec<LogValue> = values.into_iter().collect();
        if values.len() % 2 != 0 {
            return Err(LoggerError::field_list(values.len()));
        }

        let mut fields = Fields::new();
        let mut iter = values.into_iter();
        while let (Some(key), Some(value)) = (iter.next(), iter.next()) {
            fields.pairs.push((key.to_string(), value));
        }
        Ok(fields)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LogValue)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Format fields as space-separated key=value pairs
    pub fn format_fields(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_fields())
    }
}

impl<K, V> FromIterator<(K, V)> for Fields
where
    K: Into<String>,
    V: Into<LogValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
