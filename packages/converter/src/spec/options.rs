//! Per-element builder options.
//!
//! The builder asks an [`OptionsLookup`] for the options of every tag it
//! builds. Any `Fn(&str) -> ElementOptions` is a lookup; an
//! [`OptionsRegistry`] is a data-driven one that can be loaded from a file.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::DescendantsSpec;
use crate::config::{DEFAULT_ABSTRACT_ATTRIBUTE, DEFAULT_ID_ATTRIBUTE, DEFAULT_RECURSE_ATTRIBUTE};
use crate::error::{ConverterError, Result};

/// Builder options for one element name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementOptions {
    /// Attribute that names an element (e.g. `name`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Attribute naming the element(s) this one inherits from (e.g. `inherits`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurse: Option<String>,

    /// Keys removed from the final built element.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub discards: Vec<String>,

    /// Override of the spec's descendant aggregation for this element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descendants: Option<DescendantsSpec>,
}

impl ElementOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_recurse(mut self, recurse: impl Into<String>) -> Self {
        self.recurse = Some(recurse.into());
        self
    }

    #[must_use]
    pub fn with_discards(mut self, discards: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.discards = discards.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_descendants(mut self, descendants: DescendantsSpec) -> Self {
        self.descendants = Some(descendants);
        self
    }

    /// The id attribute name, ignoring an empty setting.
    pub fn id_attribute(&self) -> Option<&str> {
        self.id.as_deref().filter(|s| !s.is_empty())
    }

    /// The recurse attribute name, ignoring an empty setting.
    pub fn recurse_attribute(&self) -> Option<&str> {
        self.recurse.as_deref().filter(|s| !s.is_empty())
    }
}

/// The conventional options: named by `name`, inheriting via `inherits`,
/// discarding `inherits` and `abstract`.
#[must_use]
pub fn default_options() -> ElementOptions {
    ElementOptions::new()
        .with_id(DEFAULT_ID_ATTRIBUTE)
        .with_recurse(DEFAULT_RECURSE_ATTRIBUTE)
        .with_discards([DEFAULT_RECURSE_ATTRIBUTE, DEFAULT_ABSTRACT_ATTRIBUTE])
}

/// Supplies the options for an element name.
pub trait OptionsLookup {
    fn options(&self, tag_name: &str) -> Cow<'_, ElementOptions>;
}

impl<F> OptionsLookup for F
where
    F: Fn(&str) -> ElementOptions,
{
    fn options(&self, tag_name: &str) -> Cow<'_, ElementOptions> {
        Cow::Owned(self(tag_name))
    }
}

/// Options keyed by element name, with a fallback for unlisted names.
///
/// ```yaml
/// default:
///   id: name
/// elements:
///   Command:
///     id: name
///     recurse: inherits
///     discards: [inherits, abstract]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionsRegistry {
    #[serde(default)]
    default: ElementOptions,
    #[serde(default)]
    elements: HashMap<String, ElementOptions>,
}

impl OptionsRegistry {
    /// Create a registry that answers `default` for every element.
    #[must_use]
    pub fn new(default: ElementOptions) -> Self {
        Self {
            default,
            elements: HashMap::new(),
        }
    }

    /// Register options for a specific element name.
    pub fn register(&mut self, tag_name: impl Into<String>, options: ElementOptions) {
        self.elements.insert(tag_name.into(), options);
    }

    /// Check if options are registered for an element name.
    #[must_use]
    pub fn has_options(&self, tag_name: &str) -> bool {
        self.elements.contains_key(tag_name)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ConverterError::spec(format!("options: {e}")))
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| ConverterError::spec(format!("options: {e}")))
    }

    /// Load options from a file; `.json` files are read as JSON, anything else as YAML.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "Loading element options");
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        }
    }
}

impl OptionsLookup for OptionsRegistry {
    fn options(&self, tag_name: &str) -> Cow<'_, ElementOptions> {
        Cow::Borrowed(self.elements.get(tag_name).unwrap_or(&self.default))
    }
}
