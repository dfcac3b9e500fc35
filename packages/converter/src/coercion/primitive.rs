//! `number`, `boolean` and `primitive` matchers.

use crate::config::NUMBER_PATTERN;
use crate::spec::PrimitiveKind;
use crate::value::Value;

/// Decimal literal to `Int` when it has no fraction or exponent and fits an
/// `i64`, otherwise to `Float`. Literals overflowing `f64` do not match.
pub(crate) fn number(raw: &str) -> Option<Value> {
    if !NUMBER_PATTERN.is_match(raw) {
        return None;
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Some(Value::Int(i));
    }
    raw.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(Value::Float)
}

pub(crate) fn boolean(raw: &str) -> Option<Value> {
    if raw.eq_ignore_ascii_case("true") {
        Some(Value::Bool(true))
    } else if raw.eq_ignore_ascii_case("false") {
        Some(Value::Bool(false))
    } else {
        None
    }
}

/// First primitive in `kinds` order that matches.
pub(crate) fn primitive(raw: &str, kinds: &[PrimitiveKind]) -> Option<Value> {
    kinds.iter().find_map(|kind| match kind {
        PrimitiveKind::Number => number(raw),
        PrimitiveKind::Boolean => boolean(raw),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number() {
        assert_eq!(number("42"), Some(Value::Int(42)));
        assert_eq!(number("-7"), Some(Value::Int(-7)));
        assert_eq!(number("+3"), Some(Value::Int(3)));
        assert_eq!(number("3.5"), Some(Value::Float(3.5)));
        assert_eq!(number("1e3"), Some(Value::Float(1000.0)));
        assert_eq!(number("1.0"), Some(Value::Float(1.0)));
        assert_eq!(number("99999999999999999999"), Some(Value::Float(1e20)));
        assert_eq!(number("12abc"), None);
        assert_eq!(number("inf"), None);
        assert_eq!(number("1e400"), None);
        assert_eq!(number("-1e400"), None);
        assert_eq!(number("1e-400"), Some(Value::Float(0.0)));
        assert_eq!(number(""), None);
    }

    #[test]
    fn test_boolean() {
        assert_eq!(boolean("true"), Some(Value::Bool(true)));
        assert_eq!(boolean("FALSE"), Some(Value::Bool(false)));
        assert_eq!(boolean("True"), Some(Value::Bool(true)));
        assert_eq!(boolean("yes"), None);
        assert_eq!(boolean("1"), None);
    }

    #[test]
    fn test_primitive_order() {
        let both = [PrimitiveKind::Number, PrimitiveKind::Boolean];
        assert_eq!(primitive("5", &both), Some(Value::Int(5)));
        assert_eq!(primitive("true", &both), Some(Value::Bool(true)));
        assert_eq!(primitive("5", &[PrimitiveKind::Boolean]), None);
        assert_eq!(primitive("word", &both), None);
    }
}
