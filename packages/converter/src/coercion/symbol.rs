//! `symbol` matcher.

use crate::value::{Symbol, Value};

/// A prefixed value becomes a symbol described by the text after the prefix.
pub(crate) fn symbol(raw: &str, prefix: &str, global: bool) -> Option<Value> {
    let description = raw.strip_prefix(prefix).filter(|rest| !rest.is_empty())?;
    let symbol = if global {
        Symbol::global(description)
    } else {
        Symbol::unique(description)
    };
    Some(Value::Symbol(symbol))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_symbols_are_interned() {
        let a = symbol("$expr", "$", true).unwrap();
        let b = symbol("$expr", "$", true).unwrap();
        assert_eq!(a, b);
        assert!(a.as_symbol().unwrap().is_global());
        assert_eq!(a.as_symbol().unwrap().description(), "expr");
    }

    #[test]
    fn test_unique_symbols_differ() {
        let a = symbol("$expr", "$", false).unwrap();
        let b = symbol("$expr", "$", false).unwrap();
        assert_ne!(a, b);
        assert!(!a.as_symbol().unwrap().is_global());
        assert_eq!(a.clone(), a);
    }

    #[test]
    fn test_prefix_required() {
        assert!(symbol("expr", "$", true).is_none());
        assert!(symbol("$", "$", true).is_none());
        assert!(symbol("::expr", "::", true).is_some());
    }
}
