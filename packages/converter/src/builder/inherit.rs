//! Inheritance between sibling elements.
//!
//! An element naming one parent in its recurse attribute inherits
//! vertically; naming several (`inherits="a,b,c"`) inherits horizontally.
//! In both cases the element's own keys win over anything inherited, and
//! among several parents the rightmost wins. Descendant collections are
//! never overwritten: they are concatenated, inherited first.

use crate::config::RECURSE_SEPARATOR;
use crate::error::{ConverterError, Result};
use crate::node::{select_element_node_by_id, NodeAccess};
use crate::spec::{AttributesType, ElementOptions, OptionsLookup, Spec};
use crate::value::{BuiltElement, Value};

use super::attributes::entry_name;
use super::{descendants, Builder, Visited};

impl<O: OptionsLookup + ?Sized> Builder<'_, O> {
    /// Fold the elements named by the node's recurse attribute into `element`.
    pub(super) fn resolve_inheritance<N: NodeAccess>(
        &self,
        element: BuiltElement,
        node: &N,
        parent: &N,
        options: &ElementOptions,
        visited: &Visited<'_>,
    ) -> Result<BuiltElement> {
        let (Some(id_attribute), Some(recurse_attribute)) =
            (options.id_attribute(), options.recurse_attribute())
        else {
            return Ok(element);
        };
        let tag = node.tag_name();
        let identifier = node.attribute(id_attribute).unwrap_or_default();
        if identifier.is_empty() {
            return Ok(element);
        }

        if visited.contains(tag, identifier) {
            let mut chain = visited.identifiers();
            chain.push(identifier.to_string());
            return Err(ConverterError::CircularReference {
                identifier: identifier.to_string(),
                chain,
            });
        }
        let visited = visited.push(tag, identifier);

        let targets: Vec<&str> = node
            .attribute(recurse_attribute)
            .unwrap_or_default()
            .split(RECURSE_SEPARATOR)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect();
        if targets.is_empty() {
            return Ok(element);
        }

        tracing::debug!(
            element = tag,
            identifier,
            parents = ?targets,
            "Resolving inheritance"
        );

        let mut inherited = BuiltElement::new();
        for name in targets {
            let built = match select_element_node_by_id(parent, tag, id_attribute, name) {
                Some(target) => self.build(&target, parent, &visited)?,
                None => {
                    tracing::debug!(
                        element = tag,
                        identifier,
                        missing = name,
                        "Inheritance target not found"
                    );
                    BuiltElement::new()
                }
            };
            inherited = merge(inherited, built, self.spec);
        }

        Ok(merge(inherited, element, self.spec))
    }
}

/// Merge `overlay` onto `base`.
///
/// Keys of `overlay` win; descendant collections are concatenated (base
/// first). In array attribute mode the attribute lists are merged by name:
/// a later value replaces an earlier one in its original position.
pub(crate) fn merge(mut base: BuiltElement, overlay: BuiltElement, spec: &Spec) -> BuiltElement {
    let descendants_label = spec.labels.descendants.as_str();
    let attribute_label = match spec.attributes_type {
        AttributesType::Array => spec.labels.attribute.as_deref(),
        AttributesType::Member => None,
    };

    for (key, value) in overlay {
        match base.get_mut(&key) {
            Some(existing) => {
                let previous = std::mem::replace(existing, Value::Bool(false));
                *existing = if key == descendants_label {
                    let mut items = descendants::flatten(previous);
                    items.extend(descendants::flatten(value));
                    Value::Array(items)
                } else if Some(key.as_str()) == attribute_label {
                    match (previous, value) {
                        (Value::Array(previous), Value::Array(value)) => {
                            Value::Array(merge_attribute_lists(previous, value))
                        }
                        (_, value) => value,
                    }
                } else {
                    value
                };
            }
            None => {
                base.insert(key, value);
            }
        }
    }
    base
}

fn merge_attribute_lists(mut base: Vec<Value>, overlay: Vec<Value>) -> Vec<Value> {
    for entry in overlay {
        let position = entry_name(&entry)
            .and_then(|name| base.iter().position(|e| entry_name(e) == Some(name)));
        match position {
            Some(i) => base[i] = entry,
            None => base.push(entry),
        }
    }
    base
}
