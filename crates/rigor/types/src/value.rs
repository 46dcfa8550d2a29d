//! Dynamic runtime values.
//!
//! `Value` is the unit every constraint is checked against: a flat, JSON-like
//! runtime value carrying its concrete [`Kind`]. Truthiness, numeric
//! conversion, containment, and ordering semantics live here; which of them a
//! composed type actually exposes is decided by the capability composer.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ContainerError;
use crate::kind::Kind;

/// A dynamic runtime value.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// The concrete kind of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::None => Kind::None,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Float(_) => Kind::Float,
            Value::Str(_) => Kind::Str,
            Value::List(_) => Kind::List,
            Value::Map(_) => Kind::Map,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Truthiness: absent, zero, and empty values are false.
    pub fn truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(x) => *x != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Map(entries) => !entries.is_empty(),
        }
    }

    /// Integer conversion. Floats truncate, strings parse, other kinds refuse.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Bool(b) => Some(i64::from(*b)),
            Value::Int(n) => Some(*n),
            Value::Float(x) => Some(*x as i64),
            Value::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Float conversion. Integers widen, strings parse, other kinds refuse.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Bool(b) => Some(f64::from(u8::from(*b))),
            Value::Int(n) => Some(*n as f64),
            Value::Float(x) => Some(*x),
            Value::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Element count for container-shaped values.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Str(s) => Some(s.chars().count()),
            Value::List(items) => Some(items.len()),
            Value::Map(entries) => Some(entries.len()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> Option<bool> {
        self.len().map(|n| n == 0)
    }

    /// Membership: substring for strings, element for lists, key for maps.
    pub fn contains(&self, needle: &Value) -> bool {
        match (self, needle) {
            (Value::Str(s), Value::Str(sub)) => s.contains(sub.as_str()),
            (Value::List(items), _) => items.iter().any(|item| item == needle),
            (Value::Map(entries), Value::Str(key)) => entries.contains_key(key),
            _ => false,
        }
    }

    /// Index lookup. Lists and strings take integer keys (negative counts
    /// from the end), maps take string keys.
    pub fn item(&self, key: &Value) -> Option<Value> {
        match (self, key) {
            (Value::List(items), Value::Int(i)) => {
                resolve_index(*i, items.len()).map(|idx| items[idx].clone())
            }
            (Value::Str(s), Value::Int(i)) => {
                let chars: Vec<char> = s.chars().collect();
                resolve_index(*i, chars.len()).map(|idx| Value::Str(chars[idx].to_string()))
            }
            (Value::Map(entries), Value::Str(k)) => entries.get(k).cloned(),
            _ => None,
        }
    }

    /// Index assignment. Strings are immutable.
    pub fn set_item(&mut self, key: &Value, value: Value) -> Result<(), ContainerError> {
        match self {
            Value::List(items) => {
                let len = items.len();
                let idx = int_key(Kind::List, key)?;
                let resolved = resolve_index(idx, len)
                    .ok_or(ContainerError::IndexOutOfRange { index: idx, len })?;
                items[resolved] = value;
                Ok(())
            }
            Value::Map(entries) => {
                let k = str_key(Kind::Map, key)?;
                entries.insert(k.to_string(), value);
                Ok(())
            }
            other => Err(ContainerError::Unsupported { kind: other.kind() }),
        }
    }

    /// Index deletion. Strings are immutable.
    pub fn del_item(&mut self, key: &Value) -> Result<(), ContainerError> {
        match self {
            Value::List(items) => {
                let len = items.len();
                let idx = int_key(Kind::List, key)?;
                let resolved = resolve_index(idx, len)
                    .ok_or(ContainerError::IndexOutOfRange { index: idx, len })?;
                items.remove(resolved);
                Ok(())
            }
            Value::Map(entries) => {
                let k = str_key(Kind::Map, key)?;
                entries
                    .remove(k)
                    .map(|_| ())
                    .ok_or_else(|| ContainerError::KeyNotFound { key: k.to_string() })
            }
            other => Err(ContainerError::Unsupported { kind: other.kind() }),
        }
    }

    /// Iteration order: list elements, map keys, string characters.
    pub fn items(&self) -> Option<Vec<Value>> {
        match self {
            Value::List(items) => Some(items.clone()),
            Value::Map(entries) => Some(entries.keys().cloned().map(Value::Str).collect()),
            Value::Str(s) => Some(s.chars().map(|c| Value::Str(c.to_string())).collect()),
            _ => None,
        }
    }
}

fn int_key(kind: Kind, key: &Value) -> Result<i64, ContainerError> {
    match key {
        Value::Int(i) => Ok(*i),
        other => Err(ContainerError::BadIndex {
            kind,
            key_kind: other.kind(),
        }),
    }
}

fn str_key(kind: Kind, key: &Value) -> Result<&str, ContainerError> {
    match key {
        Value::Str(k) => Ok(k.as_str()),
        other => Err(ContainerError::BadIndex {
            kind,
            key_kind: other.kind(),
        }),
    }
}

fn resolve_index(index: i64, len: usize) -> Option<usize> {
    if index < 0 {
        len.checked_sub(index.unsigned_abs() as usize)
    } else {
        let idx = index as usize;
        (idx < len).then_some(idx)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => matches!(self.partial_cmp(other), Some(Ordering::Equal)),
        }
    }
}

impl PartialOrd for Value {
    /// Same-kind values order naturally; integers and floats compare
    /// numerically across kinds. Everything else is unordered.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
            (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Str(a), Value::Str(b)) => a.partial_cmp(b),
            (Value::List(a), Value::List(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("none"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(entries: BTreeMap<String, Value>) -> Self {
        Value::Map(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: Vec<i64>) -> Value {
        Value::List(items.into_iter().map(Value::Int).collect())
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::None.truthy());
        assert!(!Value::Int(0).truthy());
        assert!(Value::Int(5).truthy());
        assert!(!Value::Str(String::new()).truthy());
        assert!(Value::from("x").truthy());
        assert!(!Value::List(vec![]).truthy());
        assert!(list(vec![1]).truthy());
    }

    #[test]
    fn test_numeric_conversion() {
        assert_eq!(Value::Int(7).as_int(), Some(7));
        assert_eq!(Value::Float(2.9).as_int(), Some(2));
        assert_eq!(Value::from("42").as_int(), Some(42));
        assert_eq!(Value::from("nope").as_int(), None);
        assert_eq!(Value::Bool(true).as_float(), Some(1.0));
        assert_eq!(Value::None.as_int(), None);
    }

    #[test]
    fn test_container_indexing() {
        let v = list(vec![1, 2, 3]);
        assert_eq!(v.item(&Value::Int(0)), Some(Value::Int(1)));
        assert_eq!(v.item(&Value::Int(-1)), Some(Value::Int(3)));
        assert_eq!(v.item(&Value::Int(3)), None);

        let s = Value::from("abc");
        assert_eq!(s.item(&Value::Int(1)), Some(Value::from("b")));
    }

    #[test]
    fn test_container_mutation() {
        let mut v = list(vec![1, 2, 3]);
        v.set_item(&Value::Int(1), Value::Int(9)).unwrap();
        assert_eq!(v.item(&Value::Int(1)), Some(Value::Int(9)));
        v.del_item(&Value::Int(0)).unwrap();
        assert_eq!(v.len(), Some(2));

        let err = v.set_item(&Value::Int(10), Value::Int(0)).unwrap_err();
        assert_eq!(err, ContainerError::IndexOutOfRange { index: 10, len: 2 });

        let mut s = Value::from("abc");
        let err = s.set_item(&Value::Int(0), Value::from("z")).unwrap_err();
        assert_eq!(err, ContainerError::Unsupported { kind: Kind::Str });
    }

    #[test]
    fn test_map_operations() {
        let mut m = Value::Map(BTreeMap::new());
        m.set_item(&Value::from("a"), Value::Int(1)).unwrap();
        assert!(m.contains(&Value::from("a")));
        assert_eq!(m.item(&Value::from("a")), Some(Value::Int(1)));
        assert_eq!(m.items(), Some(vec![Value::from("a")]));
        m.del_item(&Value::from("a")).unwrap();
        let err = m.del_item(&Value::from("a")).unwrap_err();
        assert_eq!(err, ContainerError::KeyNotFound { key: "a".into() });
    }

    #[test]
    fn test_cross_kind_ordering() {
        assert!(Value::Int(1) < Value::Float(1.5));
        assert!(Value::Float(2.0) <= Value::Int(2));
        assert_eq!(Value::Int(2), Value::Float(2.0));
        assert_eq!(Value::Int(1).partial_cmp(&Value::from("1")), None);
        assert_ne!(Value::Int(1), Value::from("1"));
    }

    #[test]
    fn test_display() {
        assert_eq!(list(vec![1, 2]).to_string(), "[1, 2]");
        assert_eq!(Value::from("hi").to_string(), "hi");
        assert_eq!(Value::None.to_string(), "none");
    }

    #[test]
    fn test_serde_untagged() {
        let v: Value = serde_json::from_str("[1, \"two\", null]").unwrap();
        assert_eq!(
            v,
            Value::List(vec![Value::Int(1), Value::from("two"), Value::None])
        );
    }
}
