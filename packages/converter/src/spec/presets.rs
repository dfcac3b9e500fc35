//! Canned specs.

use super::{
    AssocSpec, AttributesType, CoercionSpec, CollectionSpec, ContextSpec, DateSpec, Labels,
    MatcherChain, MatcherSpec, PrimitiveKind, Spec, SymbolSpec, TypeList, ValueType,
};
use crate::config::{
    DEFAULT_ASSOC_DELIM, DEFAULT_COLLECTION_CLOSE, DEFAULT_COLLECTION_DELIM,
    DEFAULT_COLLECTION_OPEN, DEFAULT_SYMBOL_GLOBAL, DEFAULT_SYMBOL_PREFIX,
};

/// Names accepted by [`by_name`].
pub const NAMES: [&str; 4] = ["default", "attributes-as-array", "full", "raw"];

/// Look up a preset by name.
#[must_use]
pub fn by_name(name: &str) -> Option<Spec> {
    match name {
        "default" => Some(default_spec()),
        "attributes-as-array" => Some(attributes_as_array_spec()),
        "full" => Some(full_spec_with_defaults()),
        "raw" => Some(raw_spec()),
        _ => None,
    }
}

fn default_chain() -> MatcherChain {
    MatcherChain::new(vec![
        MatcherSpec::Primitive(None),
        MatcherSpec::Collection(CollectionSpec::default()),
        MatcherSpec::Date(DateSpec::default()),
        MatcherSpec::Symbol(SymbolSpec::default()),
        MatcherSpec::String(true),
    ])
}

/// Inline attributes, full coercion with built-in parameters, trimmed text.
#[must_use]
pub fn default_spec() -> Spec {
    Spec::new(Labels::default())
        .with_name("default")
        .with_coercion(CoercionSpec {
            attributes: Some(ContextSpec::new(true, default_chain())),
            text_nodes: Some(ContextSpec {
                trim: Some(true),
                matchers: None,
            }),
        })
}

/// As [`default_spec`] but attributes are collected under `_attributes`.
#[must_use]
pub fn attributes_as_array_spec() -> Spec {
    default_spec()
        .with_name("attributes-as-array")
        .with_attributes_type(AttributesType::Array)
}

/// Every coercion parameter spelled out with its built-in value.
#[must_use]
pub fn full_spec_with_defaults() -> Spec {
    let chain = MatcherChain::new(vec![
        MatcherSpec::Primitive(Some(vec![PrimitiveKind::Number, PrimitiveKind::Boolean])),
        MatcherSpec::Collection(CollectionSpec {
            delim: Some(DEFAULT_COLLECTION_DELIM.to_string()),
            open: Some(DEFAULT_COLLECTION_OPEN.to_string()),
            close: Some(DEFAULT_COLLECTION_CLOSE.to_string()),
            assoc: Some(AssocSpec {
                delim: Some(DEFAULT_ASSOC_DELIM.to_string()),
                key_type: Some(TypeList::one(ValueType::String)),
                value_type: Some(TypeList::one(ValueType::Primitive)),
            }),
        }),
        MatcherSpec::Date(DateSpec::default()),
        MatcherSpec::Symbol(SymbolSpec {
            prefix: Some(DEFAULT_SYMBOL_PREFIX.to_string()),
            global: Some(DEFAULT_SYMBOL_GLOBAL),
        }),
        MatcherSpec::String(true),
    ]);

    Spec::new(Labels::default())
        .with_name("full")
        .with_coercion(CoercionSpec {
            attributes: Some(ContextSpec::new(true, chain)),
            text_nodes: Some(ContextSpec {
                trim: Some(true),
                matchers: Some(MatcherChain::new(vec![
                    MatcherSpec::Primitive(None),
                    MatcherSpec::String(true),
                ])),
            }),
        })
}

/// No coercion: every attribute and text value stays a raw string.
#[must_use]
pub fn raw_spec() -> Spec {
    Spec::new(Labels::default()).with_name("raw")
}
