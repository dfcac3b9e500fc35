//! The element builder.
//!
//! For every element, in order:
//!
//! 1. build the local attributes (coerced when the spec asks for it)
//! 2. tag the element with its name under the element label
//! 3. fold in inherited elements when the options name a recurse attribute
//! 4. drop the recurse attribute and every discarded key
//! 5. build and aggregate child elements, then attach the composed text
//!
//! Inherited elements and children are built by the same procedure, so
//! discards apply at every level.

mod attributes;
mod descendants;
mod inherit;
mod text;

use crate::coercion::{CoercionContext, Coercer};
use crate::error::Result;
use crate::node::NodeAccess;
use crate::spec::{AttributesType, OptionsLookup, Spec};
use crate::value::{BuiltElement, Value};

pub use attributes::{build_local_attributes, ATTRIBUTE_NAME_KEY, ATTRIBUTE_VALUE_KEY};
pub use text::compose_text;

/// Build `node` into a native element.
///
/// `parent` is the scope searched for inheritance targets: every
/// descendant of it with the same tag is a candidate. The spec is used as
/// given; see [`crate::Converter`] for a validating entry point.
///
/// # Errors
/// `CircularReference`, `ElementCollision`, `MissingKeyAttribute`,
/// `CoercionExhausted`, or `SpecInvalid` for an invalid per-element
/// descendants override.
pub fn build_element<N, O>(node: &N, parent: &N, spec: &Spec, options: &O) -> Result<BuiltElement>
where
    N: NodeAccess,
    O: OptionsLookup + ?Sized,
{
    Builder::new(spec, options).build(node, parent, &Visited::Root)
}

/// Identifiers on the active inheritance chain, newest first.
///
/// Each resolution step links a new entry onto the chain it was given,
/// so sibling branches never see each other's entries.
#[derive(Debug)]
pub(crate) enum Visited<'a> {
    Root,
    Seen {
        tag: String,
        identifier: String,
        previous: &'a Visited<'a>,
    },
}

impl<'a> Visited<'a> {
    pub(crate) fn push(&'a self, tag: &str, identifier: &str) -> Visited<'a> {
        Visited::Seen {
            tag: tag.to_string(),
            identifier: identifier.to_string(),
            previous: self,
        }
    }

    pub(crate) fn contains(&self, tag: &str, identifier: &str) -> bool {
        self.iter().any(|(t, i)| t == tag && i == identifier)
    }

    /// Identifiers from the start of the chain.
    pub(crate) fn identifiers(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.iter().map(|(_, i)| i.to_string()).collect();
        ids.reverse();
        ids
    }

    fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        let mut current = self;
        std::iter::from_fn(move || match current {
            Visited::Root => None,
            Visited::Seen {
                tag,
                identifier,
                previous,
            } => {
                current = *previous;
                Some((tag.as_str(), identifier.as_str()))
            }
        })
    }
}

pub(crate) struct Builder<'a, O: ?Sized> {
    spec: &'a Spec,
    options: &'a O,
    coercer: Coercer<'a>,
}

impl<'a, O: OptionsLookup + ?Sized> Builder<'a, O> {
    pub(crate) fn new(spec: &'a Spec, options: &'a O) -> Self {
        Self {
            spec,
            options,
            coercer: Coercer::new(spec),
        }
    }

    pub(crate) fn build<N: NodeAccess>(
        &self,
        node: &N,
        parent: &N,
        visited: &Visited<'_>,
    ) -> Result<BuiltElement> {
        let tag = node.tag_name();
        let options = self.options.options(tag);

        let mut element = build_local_attributes(node, self.spec)?;
        element.insert(self.spec.labels.element.as_str(), tag);

        if options.recurse_attribute().is_some() {
            element = self.resolve_inheritance(element, node, parent, &options, visited)?;
        }

        let discards: Vec<&str> = options
            .discards
            .iter()
            .map(String::as_str)
            .chain(options.recurse_attribute())
            .collect();
        self.discard(&mut element, &discards);

        let has_elements = !node.element_children().is_empty();
        if has_elements || element.contains_key(&self.spec.labels.descendants) {
            self.aggregate_descendants(&mut element, node, visited)?;
        }

        if node.has_child_nodes() {
            let text = compose_text(node, self.spec);
            if !text.is_empty() {
                let value = self.coercer.coerce(&text, CoercionContext::TextNodes)?;
                element.insert(self.spec.labels.text.as_str(), value);
            }
        }

        Ok(element)
    }

    fn discard(&self, element: &mut BuiltElement, names: &[&str]) {
        for name in names {
            element.remove(name);
        }

        let attribute_label = match self.spec.attributes_type {
            AttributesType::Array => self.spec.labels.attribute.as_deref(),
            AttributesType::Member => None,
        };
        let Some(label) = attribute_label else {
            return;
        };
        if let Some(Value::Array(list)) = element.get_mut(label) {
            list.retain(|entry| {
                attributes::entry_name(entry).is_none_or(|name| !names.contains(&name))
            });
            if list.is_empty() {
                element.remove(label);
            }
        }
    }
}
