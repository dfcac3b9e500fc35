//! Descendant aggregation.

use crate::error::{ConverterError, Result};
use crate::node::NodeAccess;
use crate::spec::{
    validate_descendants, DescendantsBy, DescendantsSpec, ElementOptions, Labels, OptionsLookup,
    Spec,
};
use crate::value::{BuiltElement, Map, Value};

use super::attributes::{entry_name, ATTRIBUTE_VALUE_KEY};
use super::{Builder, Visited};

/// Effective aggregation settings for one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Aggregation<'a> {
    pub by: DescendantsBy,
    pub attribute: Option<&'a str>,
    pub throw_if_collision: bool,
    pub throw_if_missing: bool,
}

impl<'a> Aggregation<'a> {
    /// Combine the spec's settings with an element's override, field by
    /// field. The key attribute finally falls back to the element's id.
    pub(crate) fn resolve(
        spec: &'a Spec,
        options: &'a ElementOptions,
        tag: &str,
    ) -> Result<Self> {
        let base = spec.descendants.as_ref();
        let over = options.descendants.as_ref();
        if let Some(over) = over {
            validate_descendants(over, &format!("options of <{tag}>: descendants"))?;
        }

        let by = over
            .and_then(|d| d.by)
            .or_else(|| base.and_then(|d| d.by))
            .unwrap_or_default();
        let attribute = over
            .and_then(|d| d.attribute.as_deref())
            .or_else(|| base.and_then(|d| d.attribute.as_deref()))
            .or_else(|| options.id_attribute())
            .filter(|a| !a.is_empty());
        let flag = |pick: fn(&DescendantsSpec) -> Option<bool>| {
            over.and_then(pick)
                .or_else(|| base.and_then(pick))
                .unwrap_or(false)
        };
        let aggregation = Self {
            by,
            attribute,
            throw_if_collision: flag(|d| d.throw_if_collision),
            throw_if_missing: flag(|d| d.throw_if_missing),
        };

        if aggregation.by == DescendantsBy::Group && aggregation.throw_if_collision {
            return Err(ConverterError::spec(format!(
                "<{tag}>: can't specify by=\"group\" and throwIfCollision=\"true\""
            )));
        }
        if aggregation.by != DescendantsBy::List && aggregation.attribute.is_none() {
            return Err(ConverterError::spec(format!(
                "<{tag}>: descendants by=\"{}\" has no key attribute",
                match aggregation.by {
                    DescendantsBy::Index => "index",
                    _ => "group",
                }
            )));
        }
        Ok(aggregation)
    }
}

impl<O: OptionsLookup + ?Sized> Builder<'_, O> {
    /// Build the node's child elements and fold them, after any inherited
    /// descendants, into the element's descendants collection.
    pub(super) fn aggregate_descendants<N: NodeAccess>(
        &self,
        element: &mut BuiltElement,
        node: &N,
        visited: &Visited<'_>,
    ) -> Result<()> {
        let label = self.spec.labels.descendants.as_str();
        let mut items = element.remove(label).map(flatten).unwrap_or_default();
        for child in node.element_children() {
            items.push(Value::Element(self.build(&child, node, visited)?));
        }

        let tag = node.tag_name();
        let options = self.options.options(tag);
        let aggregation = Aggregation::resolve(self.spec, &options, tag)?;
        let collection = rekey(items, &aggregation, tag, &self.spec.labels)?;
        element.insert(label, collection);
        Ok(())
    }
}

/// Apply the aggregation mode to an ordered list of built children.
pub(crate) fn rekey(
    items: Vec<Value>,
    aggregation: &Aggregation<'_>,
    parent: &str,
    labels: &Labels,
) -> Result<Value> {
    let attribute = match (aggregation.by, aggregation.attribute) {
        (DescendantsBy::List, _) | (_, None) => return Ok(Value::Array(items)),
        (_, Some(attribute)) => attribute,
    };

    let attribute_label = labels.attribute.as_deref();
    let keys: Vec<Option<String>> = items
        .iter()
        .map(|item| key_of(item, attribute, attribute_label))
        .collect();
    if let Some(missing) = keys.iter().position(Option::is_none) {
        if aggregation.throw_if_missing {
            return Err(ConverterError::MissingKeyAttribute {
                parent: parent.to_string(),
                element: element_name(&items[missing], &labels.element),
                attribute: attribute.to_string(),
            });
        }
        return Ok(Value::Array(items));
    }
    let keys: Vec<String> = keys.into_iter().flatten().collect();

    if aggregation.by == DescendantsBy::Index && aggregation.throw_if_collision {
        for (i, key) in keys.iter().enumerate() {
            if keys[..i].contains(key) {
                return Err(ConverterError::ElementCollision {
                    parent: parent.to_string(),
                    key: key.clone(),
                });
            }
        }
    }

    let mut map = Map::new();
    for (key, item) in keys.into_iter().zip(items) {
        match aggregation.by {
            DescendantsBy::Index => {
                map.insert(key, item);
            }
            _ => {
                if let Some(Value::Array(group)) = map.get_mut(&key) {
                    group.push(item);
                } else {
                    map.insert(key, Value::Array(vec![item]));
                }
            }
        }
    }

    tracing::debug!(
        element = parent,
        by = ?aggregation.by,
        attribute,
        keys = map.len(),
        "Re-keyed descendants"
    );
    Ok(Value::Map(map))
}

/// Turn any descendants collection back into an ordered list of children.
pub(crate) fn flatten(collection: Value) -> Vec<Value> {
    match collection {
        Value::Array(items) => items,
        Value::Map(map) => map
            .into_values()
            .flat_map(|value| match value {
                Value::Array(group) => group,
                other => vec![other],
            })
            .collect(),
        other => vec![other],
    }
}

/// Key of a built child: its member attribute, or the matching entry of
/// its attribute list in array mode.
fn key_of(item: &Value, attribute: &str, attribute_label: Option<&str>) -> Option<String> {
    let element = item.as_element()?;
    if let Some(value) = element.get(attribute) {
        return value.to_key();
    }
    element
        .get(attribute_label?)?
        .as_array()?
        .iter()
        .find(|entry| entry_name(entry) == Some(attribute))?
        .as_map()?
        .get(ATTRIBUTE_VALUE_KEY)?
        .to_key()
}

fn element_name(item: &Value, element_label: &str) -> String {
    item.as_element()
        .and_then(|e| e.get_str(element_label))
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{default_options, presets};

    fn child(name: Option<&str>) -> Value {
        let mut element = BuiltElement::new();
        if let Some(name) = name {
            element.insert("name", name);
        }
        element.insert("_", "Item");
        Value::Element(element)
    }

    fn aggregation(by: DescendantsBy) -> Aggregation<'static> {
        Aggregation {
            by,
            attribute: Some("name"),
            throw_if_collision: false,
            throw_if_missing: false,
        }
    }

    #[test]
    fn test_index_with_unique_keys() {
        let items = ["a", "b", "c", "d"].map(|n| child(Some(n))).to_vec();
        let labels = Labels::default();
        let value = rekey(items, &aggregation(DescendantsBy::Index), "List", &labels).unwrap();
        assert_eq!(value.as_map().unwrap().len(), 4);
    }

    #[test]
    fn test_list_mode_ignores_keys() {
        let items = vec![child(None), child(Some("a"))];
        let labels = Labels::default();
        let list = aggregation(DescendantsBy::List);
        let value = rekey(items.clone(), &list, "List", &labels).unwrap();
        assert_eq!(value, Value::Array(items));
    }

    #[test]
    fn test_flatten_group_map() {
        let mut map = Map::new();
        map.insert("a".to_string(), Value::Array(vec![child(Some("a")), child(Some("a"))]));
        map.insert("b".to_string(), child(Some("b")));
        assert_eq!(flatten(Value::Map(map)).len(), 3);
    }

    #[test]
    fn test_override_replaces_single_fields() {
        let spec = presets::default_spec().with_descendants(
            DescendantsSpec::new(DescendantsBy::Index)
                .with_attribute("name")
                .with_throw_if_collision(true),
        );
        let options =
            default_options().with_descendants(DescendantsSpec::new(DescendantsBy::Group));
        let resolved = Aggregation::resolve(&spec, &options, "List");
        // group inherits throwIfCollision from the spec, which is contradictory
        assert!(matches!(resolved, Err(ConverterError::SpecInvalid(_))));

        let options = default_options().with_descendants(DescendantsSpec {
            throw_if_missing: Some(true),
            ..DescendantsSpec::default()
        });
        let resolved = Aggregation::resolve(&spec, &options, "List").unwrap();
        assert_eq!(resolved.by, DescendantsBy::Index);
        assert_eq!(resolved.attribute, Some("name"));
        assert!(resolved.throw_if_collision);
        assert!(resolved.throw_if_missing);
    }

    #[test]
    fn test_key_attribute_falls_back_to_id() {
        let spec = presets::raw_spec();
        let options = default_options()
            .with_id("key")
            .with_descendants(DescendantsSpec::new(DescendantsBy::Index));
        let resolved = Aggregation::resolve(&spec, &options, "List").unwrap();
        assert_eq!(resolved.attribute, Some("key"));
    }

    #[test]
    fn test_no_descendants_configured_is_list() {
        let spec = presets::raw_spec();
        let options = ElementOptions::new();
        let resolved = Aggregation::resolve(&spec, &options, "List").unwrap();
        assert_eq!(resolved.by, DescendantsBy::List);
    }
}
