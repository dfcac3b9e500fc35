//! Local attributes of an element.

use crate::coercion::{CoercionContext, Coercer};
use crate::error::Result;
use crate::node::NodeAccess;
use crate::spec::{AttributesType, Spec};
use crate::value::{BuiltElement, Map, Value};

/// Key of an attribute's name in array mode.
pub const ATTRIBUTE_NAME_KEY: &str = "name";
/// Key of an attribute's value in array mode.
pub const ATTRIBUTE_VALUE_KEY: &str = "value";

/// Build the node's own attributes into a fresh element.
///
/// In `Member` mode every attribute becomes a key. In `Array` mode the
/// attributes are listed in document order under the attribute label as
/// `{name, value}` maps. Values are coerced when the spec configures the
/// attributes coercion context and kept verbatim otherwise.
///
/// # Errors
/// Propagates coercion failures.
pub fn build_local_attributes<N: NodeAccess>(node: &N, spec: &Spec) -> Result<BuiltElement> {
    let coercer = Coercer::new(spec);
    let mut element = BuiltElement::new();

    match (spec.attributes_type, spec.labels.attribute.as_deref()) {
        (AttributesType::Array, Some(label)) => {
            let list = node
                .attributes()
                .into_iter()
                .map(|(name, raw)| {
                    Ok(attribute_entry(
                        name,
                        coercer.coerce(raw, CoercionContext::Attributes)?,
                    ))
                })
                .collect::<Result<Vec<_>>>()?;
            if !list.is_empty() {
                element.insert(label, Value::Array(list));
            }
        }
        _ => {
            for (name, raw) in node.attributes() {
                element.insert(name, coercer.coerce(raw, CoercionContext::Attributes)?);
            }
        }
    }

    Ok(element)
}

fn attribute_entry(name: &str, value: Value) -> Value {
    let mut entry = Map::new();
    entry.insert(ATTRIBUTE_NAME_KEY.to_string(), Value::from(name));
    entry.insert(ATTRIBUTE_VALUE_KEY.to_string(), value);
    Value::Map(entry)
}

/// Name of an array-mode attribute entry.
pub(crate) fn entry_name(entry: &Value) -> Option<&str> {
    entry.as_map()?.get(ATTRIBUTE_NAME_KEY)?.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::presets;
    use crate::xml::Document;
    use pretty_assertions::assert_eq;

    const XML: &str = r#"<Argument name="loglevel" optional="true" alt=" 3 "/>"#;

    #[test]
    fn test_member_mode_raw() {
        let doc = Document::parse(XML).unwrap();
        let element = build_local_attributes(&doc.root_element(), &presets::raw_spec()).unwrap();
        assert_eq!(element.keys().collect::<Vec<_>>(), vec!["name", "optional", "alt"]);
        assert_eq!(element.get("optional"), Some(&Value::from("true")));
        assert_eq!(element.get("alt"), Some(&Value::from(" 3 ")));
    }

    #[test]
    fn test_member_mode_coerced() {
        let doc = Document::parse(XML).unwrap();
        let element =
            build_local_attributes(&doc.root_element(), &presets::default_spec()).unwrap();
        assert_eq!(element.get("optional"), Some(&Value::Bool(true)));
        assert_eq!(element.get("alt"), Some(&Value::Int(3)));
        assert_eq!(element.get("name"), Some(&Value::from("loglevel")));
    }

    #[test]
    fn test_array_mode() {
        let doc = Document::parse(XML).unwrap();
        let spec = presets::attributes_as_array_spec();
        let element = build_local_attributes(&doc.root_element(), &spec).unwrap();
        assert_eq!(element.len(), 1);

        let list = element.get("_attributes").unwrap().as_array().unwrap();
        let names: Vec<_> = list.iter().filter_map(entry_name).collect();
        assert_eq!(names, vec!["name", "optional", "alt"]);
        assert_eq!(
            list[1].as_map().unwrap().get(ATTRIBUTE_VALUE_KEY),
            Some(&Value::Bool(true))
        );
    }

    #[test]
    fn test_no_attributes() {
        let doc = Document::parse("<Empty/>").unwrap();
        let spec = presets::attributes_as_array_spec();
        assert!(build_local_attributes(&doc.root_element(), &spec)
            .unwrap()
            .is_empty());
    }
}
