//! Typed entry payloads.

use crate::protocol::entry::header::EntryType;

/// Decoded payload of an entry, one variant per wire type.
///
/// Doubles compare by bit pattern, so a NaN payload equals itself and
/// `-0.0 != 0.0`; equality means "same wire value".
#[derive(Debug, Clone)]
pub enum EntryValue {
    Boolean(bool),
    Double(f64),
    String(String),
    Raw(Vec<u8>),
    BooleanArray(Vec<bool>),
    DoubleArray(Vec<f64>),
    StringArray(Vec<String>),
}

impl EntryValue {
    pub fn entry_type(&self) -> EntryType {
        match self {
            EntryValue::Boolean(_) => EntryType::Boolean,
            EntryValue::Double(_) => EntryType::Double,
            EntryValue::String(_) => EntryType::String,
            EntryValue::Raw(_) => EntryType::Raw,
            EntryValue::BooleanArray(_) => EntryType::BooleanArray,
            EntryValue::DoubleArray(_) => EntryType::DoubleArray,
            EntryValue::StringArray(_) => EntryType::StringArray,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            EntryValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            EntryValue::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            EntryValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> Option<&[u8]> {
        match self {
            EntryValue::Raw(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool_array(&self) -> Option<&[bool]> {
        match self {
            EntryValue::BooleanArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_double_array(&self) -> Option<&[f64]> {
        match self {
            EntryValue::DoubleArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_string_array(&self) -> Option<&[String]> {
        match self {
            EntryValue::StringArray(v) => Some(v),
            _ => None,
        }
    }

    /// Element count for array payloads, `None` for everything else.
    pub fn len(&self) -> Option<usize> {
        match self {
            EntryValue::BooleanArray(v) => Some(v.len()),
            EntryValue::DoubleArray(v) => Some(v.len()),
            EntryValue::StringArray(v) => Some(v.len()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    pub fn bool_at(&self, index: usize) -> Option<bool> {
        self.as_bool_array()?.get(index).copied()
    }

    pub fn double_at(&self, index: usize) -> Option<f64> {
        self.as_double_array()?.get(index).copied()
    }

    pub fn string_at(&self, index: usize) -> Option<&str> {
        self.as_string_array()?.get(index).map(String::as_str)
    }
}

impl PartialEq for EntryValue {
    fn eq(&self, other: &Self) -> bool {
        use EntryValue::*;
        match (self, other) {
            (Boolean(a), Boolean(b)) => a == b,
            (Double(a), Double(b)) => a.to_bits() == b.to_bits(),
            (String(a), String(b)) => a == b,
            (Raw(a), Raw(b)) => a == b,
            (BooleanArray(a), BooleanArray(b)) => a == b,
            (DoubleArray(a), DoubleArray(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
            }
            (StringArray(a), StringArray(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for EntryValue {
    fn from(v: bool) -> Self {
        EntryValue::Boolean(v)
    }
}

impl From<f64> for EntryValue {
    fn from(v: f64) -> Self {
        EntryValue::Double(v)
    }
}

impl From<String> for EntryValue {
    fn from(v: String) -> Self {
        EntryValue::String(v)
    }
}

impl From<&str> for EntryValue {
    fn from(v: &str) -> Self {
        EntryValue::String(v.to_owned())
    }
}

impl From<Vec<u8>> for EntryValue {
    fn from(v: Vec<u8>) -> Self {
        EntryValue::Raw(v)
    }
}

impl From<Vec<bool>> for EntryValue {
    fn from(v: Vec<bool>) -> Self {
        EntryValue::BooleanArray(v)
    }
}

impl From<Vec<f64>> for EntryValue {
    fn from(v: Vec<f64>) -> Self {
        EntryValue::DoubleArray(v)
    }
}

impl From<Vec<String>> for EntryValue {
    fn from(v: Vec<String>) -> Self {
        EntryValue::StringArray(v)
    }
}
