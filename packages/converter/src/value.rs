//! Values produced by the converter.
//!
//! A built element is a dynamically shaped, insertion-ordered map: the spec
//! decides which keys exist, not the type system.

use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Insertion-ordered string keyed map.
pub type Map = IndexMap<String, Value>;

/// Represents any value held by a built element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value (raw or trimmed, never coerced)
    String(String),
    /// Date value
    Date(DateTime<FixedOffset>),
    /// Symbolic token
    Symbol(Symbol),
    /// Ordered sequence
    Array(Vec<Value>),
    /// Ordered key/value pairs with typed keys
    Entries(Vec<(Value, Value)>),
    /// String keyed map (indexed/grouped descendants, object collections)
    Map(Map),
    /// A nested built element
    Element(BuiltElement),
}

impl Value {
    /// Try to get value as boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get value as i64
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get value as f64
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get value as string reference
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get value as array reference
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Try to get value as map reference
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Try to get value as a nested element
    pub fn as_element(&self) -> Option<&BuiltElement> {
        match self {
            Value::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Try to get value as a symbol
    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get value as a date
    pub fn as_date(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Value::Date(d) => Some(d),
            _ => None,
        }
    }

    /// Render a scalar as a map key.
    ///
    /// Collections and elements have no key form.
    pub fn to_key(&self) -> Option<String> {
        match self {
            Value::Bool(b) => Some(b.to_string()),
            Value::Int(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::String(s) => Some(s.clone()),
            Value::Date(d) => Some(d.to_rfc3339()),
            Value::Symbol(s) => Some(s.description().to_string()),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<BuiltElement> for Value {
    fn from(e: BuiltElement) -> Self {
        Value::Element(e)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

static NEXT_SYMBOL_ID: AtomicU64 = AtomicU64::new(1);

/// An opaque symbolic token.
///
/// Global symbols are interned by description: two global symbols with the
/// same description are equal. Unique symbols are equal only to themselves
/// (and their clones).
#[derive(Debug, Clone)]
pub struct Symbol {
    description: String,
    id: Option<u64>,
}

impl Symbol {
    /// Interned symbol for `description`.
    pub fn global(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            id: None,
        }
    }

    /// Fresh symbol, distinct from every other symbol.
    pub fn unique(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            id: Some(NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed)),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_global(&self) -> bool {
        self.id.is_none()
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        match (self.id, other.id) {
            (None, None) => self.description == other.description,
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Symbol {}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description)
    }
}

impl Serialize for Symbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.description)
    }
}

/// The native form of one markup element.
///
/// Always carries the element label; carries the descendants label only when
/// the element has child elements and the text label only when it has text.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BuiltElement {
    entries: Map,
}

impl BuiltElement {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Insert or replace a key. A replaced key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Remove a key, preserving the order of the remaining keys.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// String value stored under `key`, if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn as_map(&self) -> &Map {
        &self.entries
    }
}

impl From<Map> for BuiltElement {
    fn from(entries: Map) -> Self {
        Self { entries }
    }
}

impl IntoIterator for BuiltElement {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for BuiltElement {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_symbols_are_interned() {
        assert_eq!(Symbol::global("$x"), Symbol::global("$x"));
        assert_ne!(Symbol::global("$x"), Symbol::global("$y"));
    }

    #[test]
    fn test_unique_symbols_are_distinct() {
        let a = Symbol::unique("$x");
        let b = Symbol::unique("$x");
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert_ne!(a, Symbol::global("$x"));
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut element: BuiltElement =
            [("a", Value::from(1i64)), ("b", 2i64.into()), ("c", 3i64.into())]
                .into_iter()
                .collect();
        element.remove("b");
        assert_eq!(element.keys().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn test_to_key() {
        assert_eq!(Value::from(4i64).to_key(), Some("4".to_string()));
        assert_eq!(Value::from("x").to_key(), Some("x".to_string()));
        assert_eq!(Value::Array(vec![]).to_key(), None);
    }

    #[test]
    fn test_serialize_element() {
        let mut element = BuiltElement::new();
        element.insert("name", "leaf");
        element.insert("count", 3i64);
        element.insert("tag", Value::Symbol(Symbol::global("$t")));
        let json = serde_json::to_string(&element).unwrap();
        assert_eq!(json, r#"{"name":"leaf","count":3,"tag":"$t"}"#);
    }
}
