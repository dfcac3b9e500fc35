//! Collection literals such as `!<[]>[1,2,3]` or `!<Object>[a=one,b=two]`.
//!
//! A literal is `<open prefix><type tag><open suffix><payload><close>`,
//! where the open token carries the `type` placeholder marking the split
//! between prefix and suffix. The payload is split on the item delimiter.

use crate::config::TYPE_PLACEHOLDER;
use crate::value::{Map, Value};

/// Literal tokens, already resolved against defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Tokens {
    pub delim: String,
    pub open: String,
    pub close: String,
}

/// What a type tag builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    /// `[]`: ordered items.
    Sequence,
    /// `Set`: ordered items, duplicates dropped.
    Set,
    /// `Object`: string keyed map.
    Object,
    /// `Map`: ordered pairs with typed keys.
    Map,
    /// Typed numeric arrays.
    Numeric(Numeric),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Numeric {
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Float32,
    Float64,
}

impl Shape {
    pub(crate) fn from_tag(tag: &str) -> Option<Self> {
        let shape = match tag {
            "[]" => Self::Sequence,
            "Set" => Self::Set,
            "Object" => Self::Object,
            "Map" => Self::Map,
            "Int8Array" => Self::Numeric(Numeric::Int8),
            "Uint8Array" => Self::Numeric(Numeric::Uint8),
            "Int16Array" => Self::Numeric(Numeric::Int16),
            "Uint16Array" => Self::Numeric(Numeric::Uint16),
            "Int32Array" => Self::Numeric(Numeric::Int32),
            "Uint32Array" => Self::Numeric(Numeric::Uint32),
            "Float32Array" => Self::Numeric(Numeric::Float32),
            "Float64Array" => Self::Numeric(Numeric::Float64),
            _ => return None,
        };
        Some(shape)
    }

    pub(crate) fn is_associative(self) -> bool {
        matches!(self, Self::Object | Self::Map)
    }
}

impl Numeric {
    /// Convert a coerced number to this element type, if representable.
    pub(crate) fn convert(self, value: &Value) -> Option<Value> {
        let int = match value {
            Value::Int(i) => Some(*i),
            Value::Float(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => Some(*f as i64),
            _ => None,
        };
        match self {
            Self::Int8 => int.filter(|i| i8::try_from(*i).is_ok()).map(Value::Int),
            Self::Uint8 => int.filter(|i| u8::try_from(*i).is_ok()).map(Value::Int),
            Self::Int16 => int.filter(|i| i16::try_from(*i).is_ok()).map(Value::Int),
            Self::Uint16 => int.filter(|i| u16::try_from(*i).is_ok()).map(Value::Int),
            Self::Int32 => int.filter(|i| i32::try_from(*i).is_ok()).map(Value::Int),
            Self::Uint32 => int.filter(|i| u32::try_from(*i).is_ok()).map(Value::Int),
            Self::Float32 => {
                let f = value.as_float()?;
                if f.abs() > f64::from(f32::MAX) {
                    return None;
                }
                Some(Value::Float(f64::from(f as f32)))
            }
            Self::Float64 => value.as_float().map(Value::Float),
        }
    }
}

/// A literal split into its type tag and raw items.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Literal<'v> {
    pub tag: &'v str,
    pub items: Vec<&'v str>,
}

/// Split a raw value into type tag and items, or `None` if it is not a
/// well-formed literal for these tokens.
pub(crate) fn split_literal<'v>(raw: &'v str, tokens: &Tokens) -> Option<Literal<'v>> {
    let (prefix, suffix) = tokens.open.split_once(TYPE_PLACEHOLDER)?;
    let rest = raw.strip_prefix(prefix)?;
    let (tag, rest) = rest.split_once(suffix)?;
    let payload = rest.strip_suffix(tokens.close.as_str())?;

    if tag.is_empty() {
        return None;
    }

    let items = if payload.is_empty() {
        Vec::new()
    } else {
        payload.split(tokens.delim.as_str()).collect()
    };
    Some(Literal { tag, items })
}

/// Assemble sequence-like shapes from already coerced items.
pub(crate) fn sequence(shape: Shape, items: Vec<Value>) -> Option<Value> {
    match shape {
        Shape::Sequence => Some(Value::Array(items)),
        Shape::Set => {
            let mut unique: Vec<Value> = Vec::with_capacity(items.len());
            for item in items {
                if !unique.contains(&item) {
                    unique.push(item);
                }
            }
            Some(Value::Array(unique))
        }
        Shape::Numeric(numeric) => items
            .iter()
            .map(|item| numeric.convert(item))
            .collect::<Option<Vec<_>>>()
            .map(Value::Array),
        Shape::Object | Shape::Map => None,
    }
}

/// Assemble associative shapes from coerced key/value pairs.
pub(crate) fn associative(shape: Shape, pairs: Vec<(Value, Value)>) -> Option<Value> {
    match shape {
        Shape::Object => {
            let mut map = Map::new();
            for (key, value) in pairs {
                map.insert(key.to_key()?, value);
            }
            Some(Value::Map(map))
        }
        Shape::Map => Some(Value::Entries(pairs)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_COLLECTION_CLOSE, DEFAULT_COLLECTION_DELIM, DEFAULT_COLLECTION_OPEN};

    fn defaults() -> Tokens {
        Tokens {
            delim: DEFAULT_COLLECTION_DELIM.to_string(),
            open: DEFAULT_COLLECTION_OPEN.to_string(),
            close: DEFAULT_COLLECTION_CLOSE.to_string(),
        }
    }

    #[test]
    fn test_split_literal() {
        let literal = split_literal("!<[]>[1,2,3]", &defaults()).unwrap();
        assert_eq!(literal.tag, "[]");
        assert_eq!(literal.items, vec!["1", "2", "3"]);

        let literal = split_literal("!<Object>[a=one,b=two]", &defaults()).unwrap();
        assert_eq!(literal.tag, "Object");
        assert_eq!(literal.items, vec!["a=one", "b=two"]);
    }

    #[test]
    fn test_empty_payload() {
        let literal = split_literal("!<Set>[]", &defaults()).unwrap();
        assert!(literal.items.is_empty());
    }

    #[test]
    fn test_malformed_literals() {
        for raw in ["[1,2]", "!<[]>[1,2", "!<>[1]", "!<[]>", "!<[]", "plain"] {
            assert!(split_literal(raw, &defaults()).is_none(), "{raw}");
        }
    }

    #[test]
    fn test_custom_tokens() {
        let tokens = Tokens {
            delim: ";".to_string(),
            open: "{type}(".to_string(),
            close: ")".to_string(),
        };
        let literal = split_literal("{Set}(a;b)", &tokens).unwrap();
        assert_eq!(literal.tag, "Set");
        assert_eq!(literal.items, vec!["a", "b"]);
    }

    #[test]
    fn test_shapes() {
        assert_eq!(Shape::from_tag("[]"), Some(Shape::Sequence));
        assert!(Shape::from_tag("Object").unwrap().is_associative());
        assert_eq!(Shape::from_tag("List"), None);
    }

    #[test]
    fn test_set_drops_duplicates() {
        let items = vec![Value::Int(1), Value::Int(2), Value::Int(1)];
        assert_eq!(
            sequence(Shape::Set, items),
            Some(Value::Array(vec![Value::Int(1), Value::Int(2)]))
        );
    }

    #[test]
    fn test_numeric_arrays() {
        let shape = Shape::Numeric(Numeric::Uint8);
        assert_eq!(
            sequence(shape, vec![Value::Int(0), Value::Int(255)]),
            Some(Value::Array(vec![Value::Int(0), Value::Int(255)]))
        );
        assert_eq!(sequence(shape, vec![Value::Int(256)]), None);
        assert_eq!(sequence(shape, vec![Value::from("x")]), None);
        assert_eq!(
            sequence(Shape::Numeric(Numeric::Float64), vec![Value::Int(2)]),
            Some(Value::Array(vec![Value::Float(2.0)]))
        );
    }

    #[test]
    fn test_object_keys() {
        let pairs = vec![
            (Value::from("a"), Value::from("one")),
            (Value::Int(2), Value::Bool(true)),
        ];
        let Some(Value::Map(map)) = associative(Shape::Object, pairs) else {
            panic!("expected a map");
        };
        assert_eq!(map.get("a"), Some(&Value::from("one")));
        assert_eq!(map.get("2"), Some(&Value::Bool(true)));

        let nested = vec![(Value::Array(vec![]), Value::Int(1))];
        assert_eq!(associative(Shape::Object, nested), None);
    }
}
