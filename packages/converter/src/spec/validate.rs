//! Static shape checks for a spec.
//!
//! Type-level problems (a number where a delimiter string belongs, an
//! unknown matcher name) are already rejected when a spec document is
//! deserialized. The checks here cover what the types cannot express.

use chrono::format::{Item, StrftimeItems};

use super::{
    AttributesType, CoercionContext, CollectionSpec, ContextSpec, DescendantsBy, DescendantsSpec,
    MatcherChain, MatcherKind, MatcherSpec, Spec,
};
use crate::config::TYPE_PLACEHOLDER;
use crate::error::{ConverterError, Result};

/// Ensure a spec is valid before any tree is walked.
///
/// # Errors
/// Returns `SpecInvalid` naming the first problem found.
pub fn validate_spec(spec: &Spec) -> Result<()> {
    validate_labels(spec)?;

    if let Some(descendants) = &spec.descendants {
        validate_descendants(descendants, "descendants")?;
        let by = descendants.by.unwrap_or_default();
        if by != DescendantsBy::List
            && descendants
                .attribute
                .as_deref()
                .is_none_or(str::is_empty)
        {
            return Err(ConverterError::spec(format!(
                "descendants.attribute is required when by=\"{}\"",
                by_name(by)
            )));
        }
        if by == DescendantsBy::List {
            let flag = [
                ("throwIfCollision", descendants.throw_if_collision),
                ("throwIfMissing", descendants.throw_if_missing),
            ]
            .into_iter()
            .find_map(|(name, value)| (value == Some(true)).then_some(name));
            if let Some(flag) = flag {
                return Err(ConverterError::spec(format!(
                    "descendants.{flag} has no effect when by=\"list\""
                )));
            }
        }
    }

    if let Some(coercion) = &spec.coercion {
        if let Some(attributes) = &coercion.attributes {
            validate_context(attributes, CoercionContext::Attributes)?;
        }
        if let Some(text_nodes) = &coercion.text_nodes {
            validate_context(text_nodes, CoercionContext::TextNodes)?;
        }
    }

    Ok(())
}

/// Checks shared by the spec's descendants and per-element overrides.
pub(crate) fn validate_descendants(descendants: &DescendantsSpec, from: &str) -> Result<()> {
    if descendants.by == Some(DescendantsBy::Group) && descendants.throw_if_collision == Some(true) {
        return Err(ConverterError::spec(format!(
            "{from}: can't specify by=\"group\" and throwIfCollision=\"true\""
        )));
    }
    if descendants.attribute.as_deref() == Some("") {
        return Err(ConverterError::spec(format!("{from}.attribute is empty")));
    }
    Ok(())
}

fn by_name(by: DescendantsBy) -> &'static str {
    match by {
        DescendantsBy::List => "list",
        DescendantsBy::Index => "index",
        DescendantsBy::Group => "group",
    }
}

fn validate_labels(spec: &Spec) -> Result<()> {
    let labels = &spec.labels;
    let mut named = vec![
        ("element", labels.element.as_str()),
        ("descendants", labels.descendants.as_str()),
        ("text", labels.text.as_str()),
    ];

    match (&labels.attribute, spec.attributes_type) {
        (Some(attribute), _) => named.push(("attribute", attribute.as_str())),
        (None, AttributesType::Array) => {
            return Err(ConverterError::spec(
                "\"attribute\" label missing from spec.labels, required by attributesType=\"Array\"",
            ));
        }
        (None, AttributesType::Member) => {}
    }

    for (i, (name, value)) in named.iter().enumerate() {
        if value.is_empty() {
            return Err(ConverterError::spec(format!("labels.{name} is empty")));
        }
        if let Some((other, _)) = named[..i].iter().find(|(_, v)| v == value) {
            return Err(ConverterError::spec(format!(
                "labels.{name} and labels.{other} are both \"{value}\""
            )));
        }
    }

    Ok(())
}

fn validate_context(context: &ContextSpec, which: CoercionContext) -> Result<()> {
    let Some(chain) = &context.matchers else {
        return Ok(());
    };
    let from = format!("coercion.{}.matchers", which.as_str());

    validate_order(chain, &from)?;

    for matcher in chain {
        match matcher {
            MatcherSpec::Primitive(Some(primitives)) => {
                if primitives.is_empty() {
                    return Err(ConverterError::spec(format!("{from}.primitive is empty")));
                }
                for (i, p) in primitives.iter().enumerate() {
                    if primitives[..i].contains(p) {
                        return Err(ConverterError::spec(format!(
                            "{from}.primitive lists {p:?} twice"
                        )));
                    }
                }
            }
            MatcherSpec::Collection(collection) => {
                validate_collection(collection, which, &from)?;
            }
            MatcherSpec::Date(date) => {
                if let Some(format) = &date.format {
                    if format.is_empty()
                        || StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
                    {
                        return Err(ConverterError::spec(format!(
                            "{from}.date.format \"{format}\" is not a valid date format"
                        )));
                    }
                }
            }
            MatcherSpec::Symbol(symbol) => {
                if symbol.prefix.as_deref() == Some("") {
                    return Err(ConverterError::spec(format!("{from}.symbol.prefix is empty")));
                }
            }
            _ => {}
        }
    }

    Ok(())
}

/// `string` always matches, so anything after it would be unreachable.
fn validate_order(chain: &MatcherChain, from: &str) -> Result<()> {
    let kinds: Vec<MatcherKind> = chain.kinds().collect();
    if let Some(pos) = kinds.iter().position(|k| *k == MatcherKind::String) {
        if pos + 1 != kinds.len() {
            return Err(ConverterError::spec(format!(
                "{from}: \"string\" matcher must be the last matcher, found before \"{}\"",
                kinds[pos + 1]
            )));
        }
    }
    Ok(())
}

fn validate_collection(
    collection: &CollectionSpec,
    which: CoercionContext,
    from: &str,
) -> Result<()> {
    if which == CoercionContext::TextNodes {
        for (name, value) in [
            ("delim", &collection.delim),
            ("open", &collection.open),
            ("close", &collection.close),
        ] {
            if value.is_some() {
                return Err(ConverterError::spec(format!(
                    "{from}.collection.{name} is not applicable to text nodes"
                )));
            }
        }
    }

    for (name, value) in [
        ("delim", &collection.delim),
        ("open", &collection.open),
        ("close", &collection.close),
    ] {
        if value.as_deref() == Some("") {
            return Err(ConverterError::spec(format!("{from}.collection.{name} is empty")));
        }
    }

    if let Some(open) = &collection.open {
        if open.matches(TYPE_PLACEHOLDER).count() != 1 {
            return Err(ConverterError::spec(format!(
                "{from}.collection.open \"{open}\" must contain the \"{TYPE_PLACEHOLDER}\" placeholder exactly once"
            )));
        }
    }

    if let (Some(delim), Some(close)) = (&collection.delim, &collection.close) {
        if delim == close {
            return Err(ConverterError::spec(format!(
                "{from}.collection.delim and close are both \"{delim}\""
            )));
        }
    }

    if let Some(assoc) = &collection.assoc {
        if assoc.delim.as_deref() == Some("") {
            return Err(ConverterError::spec(format!("{from}.collection.assoc.delim is empty")));
        }
        for (name, types) in [("keyType", &assoc.key_type), ("valueType", &assoc.value_type)] {
            if types.as_ref().is_some_and(|t| t.types().is_empty()) {
                return Err(ConverterError::spec(format!(
                    "{from}.collection.assoc.{name} is empty"
                )));
            }
        }
    }

    Ok(())
}
