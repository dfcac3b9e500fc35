//! Value coercion engine.
//!
//! A raw attribute or text value is run through the matcher chain of its
//! context in declared order; the first matcher that accepts the value
//! decides its type. Matcher parameters left unset in the `textNodes`
//! context are looked up in the `attributes` context, then fall back to
//! the built-in defaults in [`crate::config`]. The collection delimiter and
//! brackets only exist for attributes.

mod collection;
mod date;
mod primitive;
mod symbol;

use std::fmt;

use crate::config::{
    DEFAULT_ASSOC_DELIM, DEFAULT_COLLECTION_CLOSE, DEFAULT_COLLECTION_DELIM,
    DEFAULT_COLLECTION_OPEN, DEFAULT_SYMBOL_GLOBAL, DEFAULT_SYMBOL_PREFIX, DEFAULT_TRIM,
};
use crate::error::{ConverterError, Result};
use crate::spec::{MatcherChain, MatcherKind, MatcherSpec, PrimitiveKind, Spec, ValueType};
use crate::value::Value;

pub use crate::spec::CoercionContext;

use collection::{Shape, Tokens};

const DEFAULT_PRIMITIVES: &[PrimitiveKind] = &[PrimitiveKind::Number, PrimitiveKind::Boolean];
const DEFAULT_KEY_TYPES: &[ValueType] = &[ValueType::String];
const DEFAULT_VALUE_TYPES: &[ValueType] = &[ValueType::Primitive];

/// Coerce one raw value with `spec`.
///
/// # Errors
/// `CoercionExhausted` when nothing matched and the string matcher is
/// disabled.
pub fn coerce(raw: &str, context: CoercionContext, spec: &Spec) -> Result<Value> {
    Coercer::new(spec).coerce(raw, context)
}

/// Delimiter tokens of the collection matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionToken {
    Delim,
    Open,
    Close,
}

impl fmt::Display for CollectionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Delim => "delim",
            Self::Open => "open",
            Self::Close => "close",
        })
    }
}

/// Applies a spec's coercion settings to raw values.
#[derive(Debug, Clone, Copy)]
pub struct Coercer<'s> {
    spec: &'s Spec,
}

impl<'s> Coercer<'s> {
    pub fn new(spec: &'s Spec) -> Self {
        Self { spec }
    }

    /// Whether values in `context` are coerced at all.
    ///
    /// Text nodes borrow the attributes context when they have none of
    /// their own; attributes never borrow from text nodes.
    pub fn is_enabled(&self, context: CoercionContext) -> bool {
        let configured = |ctx| self.spec.coercion_context(ctx).is_some();
        configured(context)
            || (context == CoercionContext::TextNodes && configured(CoercionContext::Attributes))
    }

    /// Effective trim flag of a context.
    ///
    /// Text nodes honour the deprecated top-level `trim` before falling
    /// back to the attributes context.
    pub fn trim(&self, context: CoercionContext) -> bool {
        let own = self.spec.coercion_context(context).and_then(|c| c.trim);
        let fallback = || match context {
            CoercionContext::TextNodes => self.spec.trim.or_else(|| {
                self.spec
                    .coercion_context(CoercionContext::Attributes)
                    .and_then(|c| c.trim)
            }),
            CoercionContext::Attributes => None,
        };
        own.or_else(fallback).unwrap_or(DEFAULT_TRIM)
    }

    /// The matcher chain a context runs; text nodes without matchers of
    /// their own use the attributes chain.
    pub fn chain(&self, context: CoercionContext) -> Option<&'s MatcherChain> {
        self.own_chain(context).or_else(|| match context {
            CoercionContext::TextNodes => self.own_chain(CoercionContext::Attributes),
            CoercionContext::Attributes => None,
        })
    }

    fn own_chain(&self, context: CoercionContext) -> Option<&'s MatcherChain> {
        self.spec.coercion_context(context)?.matchers.as_ref()
    }

    /// Resolve a matcher parameter for `context`, looking at the attributes
    /// context when text nodes leave it unset.
    fn lookup<T>(
        &self,
        context: CoercionContext,
        pick: impl Fn(&'s MatcherSpec) -> Option<T>,
    ) -> Option<T> {
        let find = |ctx| self.own_chain(ctx).and_then(|chain| chain.iter().find_map(&pick));
        find(context).or_else(|| match context {
            CoercionContext::TextNodes => find(CoercionContext::Attributes),
            CoercionContext::Attributes => None,
        })
    }

    /// Resolve a collection token.
    ///
    /// # Errors
    /// `InternalConfig` when asked for the text nodes context, where
    /// collection tokens have no meaning.
    pub fn collection_token(
        &self,
        context: CoercionContext,
        token: CollectionToken,
    ) -> Result<String> {
        if context == CoercionContext::TextNodes {
            return Err(ConverterError::InternalConfig(format!(
                "collection.{token} requested for {}",
                context.as_str()
            )));
        }
        let configured = self.lookup(context, |m| match m {
            MatcherSpec::Collection(c) => match token {
                CollectionToken::Delim => c.delim.clone(),
                CollectionToken::Open => c.open.clone(),
                CollectionToken::Close => c.close.clone(),
            },
            _ => None,
        });
        Ok(configured.unwrap_or_else(|| {
            match token {
                CollectionToken::Delim => DEFAULT_COLLECTION_DELIM,
                CollectionToken::Open => DEFAULT_COLLECTION_OPEN,
                CollectionToken::Close => DEFAULT_COLLECTION_CLOSE,
            }
            .to_string()
        }))
    }

    /// Coerce a raw value in `context`.
    ///
    /// When the context is not configured the raw value is returned
    /// untouched, without trimming.
    ///
    /// # Errors
    /// `CoercionExhausted` when no matcher accepted the value and the chain
    /// disables the string matcher.
    pub fn coerce(&self, raw: &str, context: CoercionContext) -> Result<Value> {
        if !self.is_enabled(context) {
            return Ok(Value::String(raw.to_string()));
        }
        let value = if self.trim(context) { raw.trim() } else { raw };

        let Some(chain) = self.chain(context) else {
            return Ok(Value::String(value.to_string()));
        };

        for matcher in chain {
            if let Some(coerced) = self.apply(matcher, value, context)? {
                tracing::trace!(
                    context = context.as_str(),
                    matcher = %matcher.kind(),
                    value,
                    "Coerced value"
                );
                return Ok(coerced);
            }
        }

        if chain.get(MatcherKind::String) == Some(&MatcherSpec::String(false)) {
            return Err(ConverterError::CoercionExhausted {
                context: context.as_str().to_string(),
                value: value.to_string(),
            });
        }
        Ok(Value::String(value.to_string()))
    }

    fn apply(
        &self,
        matcher: &MatcherSpec,
        value: &str,
        context: CoercionContext,
    ) -> Result<Option<Value>> {
        let coerced = match matcher {
            MatcherSpec::Number => primitive::number(value),
            MatcherSpec::Boolean => primitive::boolean(value),
            MatcherSpec::Primitive(_) => self.primitive(value, context),
            MatcherSpec::Collection(_) => self.collection(value, context)?,
            MatcherSpec::Date(_) => self.date(value, context),
            MatcherSpec::Symbol(_) => self.symbol(value, context),
            MatcherSpec::String(enabled) => enabled.then(|| Value::String(value.to_string())),
        };
        Ok(coerced)
    }

    fn primitive(&self, value: &str, context: CoercionContext) -> Option<Value> {
        let kinds = self.lookup(context, |m| match m {
            MatcherSpec::Primitive(Some(kinds)) => Some(kinds.as_slice()),
            _ => None,
        });
        primitive::primitive(value, kinds.unwrap_or(DEFAULT_PRIMITIVES))
    }

    fn date(&self, value: &str, context: CoercionContext) -> Option<Value> {
        let format = self.lookup(context, |m| match m {
            MatcherSpec::Date(d) => d.format.as_deref(),
            _ => None,
        });
        date::date(value, format)
    }

    fn symbol(&self, value: &str, context: CoercionContext) -> Option<Value> {
        let prefix = self
            .lookup(context, |m| match m {
                MatcherSpec::Symbol(s) => s.prefix.as_deref(),
                _ => None,
            })
            .unwrap_or(DEFAULT_SYMBOL_PREFIX);
        let global = self
            .lookup(context, |m| match m {
                MatcherSpec::Symbol(s) => s.global,
                _ => None,
            })
            .unwrap_or(DEFAULT_SYMBOL_GLOBAL);
        symbol::symbol(value, prefix, global)
    }

    fn collection(&self, value: &str, context: CoercionContext) -> Result<Option<Value>> {
        // Collection literals are always delimited with the attribute tokens.
        let tokens_from = CoercionContext::Attributes;
        let tokens = Tokens {
            delim: self.collection_token(tokens_from, CollectionToken::Delim)?,
            open: self.collection_token(tokens_from, CollectionToken::Open)?,
            close: self.collection_token(tokens_from, CollectionToken::Close)?,
        };

        let Some(literal) = collection::split_literal(value, &tokens) else {
            return Ok(None);
        };
        let Some(shape) = Shape::from_tag(literal.tag) else {
            return Ok(None);
        };
        let trim = self.trim(context);
        let item_text = |item: &str| if trim { item.trim().to_string() } else { item.to_string() };

        if !shape.is_associative() {
            let items = literal
                .items
                .iter()
                .map(|&item| {
                    let item = item_text(item);
                    self.primitive(&item, context).unwrap_or(Value::String(item))
                })
                .collect();
            return Ok(collection::sequence(shape, items));
        }

        let assoc_delim = self
            .lookup(context, |m| match m {
                MatcherSpec::Collection(c) => c.assoc.as_ref().and_then(|a| a.delim.as_deref()),
                _ => None,
            })
            .unwrap_or(DEFAULT_ASSOC_DELIM);
        let key_types = self
            .lookup(context, |m| match m {
                MatcherSpec::Collection(c) => c.assoc.as_ref().and_then(|a| a.key_type.as_ref()),
                _ => None,
            })
            .map_or(DEFAULT_KEY_TYPES, |t| t.types());
        let value_types = self
            .lookup(context, |m| match m {
                MatcherSpec::Collection(c) => c.assoc.as_ref().and_then(|a| a.value_type.as_ref()),
                _ => None,
            })
            .map_or(DEFAULT_VALUE_TYPES, |t| t.types());

        let mut pairs = Vec::with_capacity(literal.items.len());
        for item in &literal.items {
            let Some((key, val)) = item.split_once(assoc_delim) else {
                return Ok(None);
            };
            pairs.push((
                self.typed(&item_text(key), key_types, context),
                self.typed(&item_text(val), value_types, context),
            ));
        }
        Ok(collection::associative(shape, pairs))
    }

    /// First type in `types` that accepts `raw`, else the raw string.
    fn typed(&self, raw: &str, types: &[ValueType], context: CoercionContext) -> Value {
        types
            .iter()
            .find_map(|t| match t {
                ValueType::Number => primitive::number(raw),
                ValueType::Boolean => primitive::boolean(raw),
                ValueType::Primitive => self.primitive(raw, context),
                ValueType::Date => self.date(raw, context),
                ValueType::Symbol => self.symbol(raw, context),
                ValueType::String => Some(Value::String(raw.to_string())),
            })
            .unwrap_or_else(|| Value::String(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{
        presets, AssocSpec, CoercionSpec, CollectionSpec, ContextSpec, Labels, SymbolSpec,
        TypeList,
    };

    fn spec_with(attributes: Option<ContextSpec>, text_nodes: Option<ContextSpec>) -> Spec {
        Spec::new(Labels::default()).with_coercion(CoercionSpec {
            attributes,
            text_nodes,
        })
    }

    fn chain(matchers: Vec<MatcherSpec>) -> MatcherChain {
        MatcherChain::new(matchers)
    }

    #[test]
    fn test_no_coercion_keeps_raw() {
        let spec = presets::raw_spec();
        let value = coerce(" 42 ", CoercionContext::Attributes, &spec).unwrap();
        assert_eq!(value, Value::from(" 42 "));
    }

    #[test]
    fn test_default_preset_values() {
        let spec = presets::default_spec();
        let c = Coercer::new(&spec);
        let attr = CoercionContext::Attributes;
        assert_eq!(c.coerce("42", attr).unwrap(), Value::Int(42));
        assert_eq!(c.coerce(" true ", attr).unwrap(), Value::Bool(true));
        assert_eq!(c.coerce("plain", attr).unwrap(), Value::from("plain"));
        assert!(c.coerce("2016-06-23", attr).unwrap().as_date().is_some());
        assert_eq!(
            c.coerce("$sym", attr).unwrap().as_symbol().unwrap().description(),
            "sym"
        );
    }

    #[test]
    fn test_sequence_literal() {
        let spec = presets::default_spec();
        let value = coerce("!<[]>[1,2,3]", CoercionContext::Attributes, &spec).unwrap();
        assert_eq!(
            value,
            Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        );
    }

    #[test]
    fn test_sequence_items_keep_unmatched_strings() {
        let spec = presets::default_spec();
        let value = coerce("!<[]>[1, two ,true]", CoercionContext::Attributes, &spec).unwrap();
        assert_eq!(
            value,
            Value::Array(vec![Value::Int(1), Value::from("two"), Value::Bool(true)])
        );
    }

    #[test]
    fn test_object_literal() {
        let spec = presets::full_spec_with_defaults();
        let value = coerce("!<Object>[a=one,b=two]", CoercionContext::Attributes, &spec).unwrap();
        let map = value.as_map().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a"), Some(&Value::from("one")));
        assert_eq!(map.get("b"), Some(&Value::from("two")));
    }

    #[test]
    fn test_map_literal_with_typed_keys() {
        let collection = CollectionSpec {
            assoc: Some(AssocSpec {
                delim: Some(":".to_string()),
                key_type: Some(TypeList(vec![ValueType::Number, ValueType::String])),
                value_type: Some(TypeList::one(ValueType::Boolean)),
            }),
            ..CollectionSpec::default()
        };
        let spec = spec_with(
            Some(ContextSpec::new(true, chain(vec![MatcherSpec::Collection(collection)]))),
            None,
        );
        let value = coerce("!<Map>[1:true,x:false]", CoercionContext::Attributes, &spec).unwrap();
        assert_eq!(
            value,
            Value::Entries(vec![
                (Value::Int(1), Value::Bool(true)),
                (Value::from("x"), Value::Bool(false)),
            ])
        );
    }

    #[test]
    fn test_unknown_collection_tag_falls_through() {
        let spec = presets::default_spec();
        let value = coerce("!<List>[1,2]", CoercionContext::Attributes, &spec).unwrap();
        assert_eq!(value, Value::from("!<List>[1,2]"));
    }

    #[test]
    fn test_associative_item_without_delim_falls_through() {
        let spec = presets::default_spec();
        let value = coerce("!<Object>[a=1,b]", CoercionContext::Attributes, &spec).unwrap();
        assert_eq!(value, Value::from("!<Object>[a=1,b]"));
    }

    #[test]
    fn test_custom_collection_tokens() {
        let collection = CollectionSpec {
            delim: Some(";".to_string()),
            open: Some("@type(".to_string()),
            close: Some(")".to_string()),
            assoc: None,
        };
        let spec = spec_with(
            Some(ContextSpec::new(true, chain(vec![MatcherSpec::Collection(collection)]))),
            None,
        );
        let value = coerce("@Set(1;1;2)", CoercionContext::Attributes, &spec).unwrap();
        assert_eq!(value, Value::Array(vec![Value::Int(1), Value::Int(2)]));
    }

    #[test]
    fn test_matcher_order_decides() {
        let spec = spec_with(
            Some(ContextSpec::new(
                true,
                chain(vec![MatcherSpec::Boolean, MatcherSpec::String(true)]),
            )),
            None,
        );
        let c = Coercer::new(&spec);
        assert_eq!(c.coerce("42", CoercionContext::Attributes).unwrap(), Value::from("42"));
        assert_eq!(c.coerce("false", CoercionContext::Attributes).unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_disabled_string_exhausts() {
        let spec = spec_with(
            Some(ContextSpec::new(
                true,
                chain(vec![MatcherSpec::Number, MatcherSpec::String(false)]),
            )),
            None,
        );
        let err = coerce("abc", CoercionContext::Attributes, &spec).unwrap_err();
        assert!(matches!(err, ConverterError::CoercionExhausted { .. }));
        assert_eq!(coerce("7", CoercionContext::Attributes, &spec).unwrap(), Value::Int(7));
    }

    #[test]
    fn test_exhausted_chain_without_string_keeps_raw() {
        let spec = spec_with(Some(ContextSpec::new(true, chain(vec![MatcherSpec::Number]))), None);
        assert_eq!(
            coerce("abc", CoercionContext::Attributes, &spec).unwrap(),
            Value::from("abc")
        );
    }

    #[test]
    fn test_trim_flags() {
        let spec = spec_with(
            Some(ContextSpec::new(false, chain(vec![MatcherSpec::String(true)]))),
            None,
        );
        let c = Coercer::new(&spec);
        assert!(!c.trim(CoercionContext::Attributes));
        // Falls back to the attributes context.
        assert!(!c.trim(CoercionContext::TextNodes));
        assert_eq!(c.coerce(" x ", CoercionContext::Attributes).unwrap(), Value::from(" x "));

        let mut legacy = presets::default_spec();
        legacy.trim = Some(false);
        if let Some(coercion) = legacy.coercion.as_mut() {
            coercion.text_nodes = None;
        }
        let c = Coercer::new(&legacy);
        assert!(!c.trim(CoercionContext::TextNodes));
        assert!(c.trim(CoercionContext::Attributes));

        assert!(Coercer::new(&presets::raw_spec()).trim(CoercionContext::TextNodes));
    }

    #[test]
    fn test_text_nodes_fall_back_to_attribute_parameters() {
        let attributes = ContextSpec::new(
            true,
            chain(vec![
                MatcherSpec::Symbol(SymbolSpec {
                    prefix: Some("#".to_string()),
                    global: Some(true),
                }),
                MatcherSpec::String(true),
            ]),
        );
        let text_nodes = ContextSpec::new(
            true,
            chain(vec![
                MatcherSpec::Symbol(SymbolSpec::default()),
                MatcherSpec::String(true),
            ]),
        );
        let spec = spec_with(Some(attributes), Some(text_nodes));
        let value = coerce("#tag", CoercionContext::TextNodes, &spec).unwrap();
        assert_eq!(value.as_symbol().unwrap().description(), "tag");
    }

    #[test]
    fn test_overflowing_number_stays_a_string() {
        let spec = presets::default_spec();
        assert_eq!(
            coerce("1e400", CoercionContext::Attributes, &spec).unwrap(),
            Value::from("1e400")
        );
    }

    #[test]
    fn test_text_nodes_only_leaves_attributes_raw() {
        let spec = spec_with(
            None,
            Some(ContextSpec::new(
                true,
                chain(vec![MatcherSpec::Number, MatcherSpec::String(true)]),
            )),
        );
        let c = Coercer::new(&spec);
        assert!(!c.is_enabled(CoercionContext::Attributes));
        assert!(c.is_enabled(CoercionContext::TextNodes));
        assert_eq!(
            c.coerce("  x  ", CoercionContext::Attributes).unwrap(),
            Value::from("  x  ")
        );
        assert_eq!(
            c.coerce(" 42 ", CoercionContext::Attributes).unwrap(),
            Value::from(" 42 ")
        );
        assert_eq!(c.coerce(" 42 ", CoercionContext::TextNodes).unwrap(), Value::Int(42));
    }

    #[test]
    fn test_text_nodes_without_matchers_use_attribute_chain() {
        let spec = presets::default_spec();
        assert_eq!(
            coerce(" 12 ", CoercionContext::TextNodes, &spec).unwrap(),
            Value::Int(12)
        );
    }

    #[test]
    fn test_collection_tokens_not_available_for_text() {
        let spec = presets::default_spec();
        let c = Coercer::new(&spec);
        let err = c
            .collection_token(CoercionContext::TextNodes, CollectionToken::Delim)
            .unwrap_err();
        assert!(matches!(err, ConverterError::InternalConfig(_)));
        assert_eq!(
            c.collection_token(CoercionContext::Attributes, CollectionToken::Open)
                .unwrap(),
            DEFAULT_COLLECTION_OPEN
        );
    }

    #[test]
    fn test_text_collection_uses_attribute_tokens() {
        let spec = presets::full_spec_with_defaults();
        let text = ContextSpec::new(
            true,
            chain(vec![MatcherSpec::Collection(CollectionSpec::default())]),
        );
        let spec = spec_with(
            spec.coercion.and_then(|c| c.attributes),
            Some(text),
        );
        assert_eq!(
            coerce("!<[]>[4]", CoercionContext::TextNodes, &spec).unwrap(),
            Value::Array(vec![Value::Int(4)])
        );
    }
}
