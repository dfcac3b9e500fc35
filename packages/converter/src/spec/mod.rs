//! The declarative spec that shapes built elements.
//!
//! A [`Spec`] is plain data. It can be built in code, taken from
//! [`presets`], or loaded from JSON/YAML using camelCase field
//! names:
//!
//! ```
//! use jaxine::spec::{AttributesType, Spec};
//!
//! let spec = Spec::from_json_str(r#"{
//!   "labels": { "element": "_", "descendants": "_children", "text": "_text" },
//!   "attributesType": "Member",
//!   "descendants": { "by": "index", "attribute": "name", "throwIfCollision": "true" }
//! }"#).unwrap();
//!
//! assert_eq!(spec.attributes_type, AttributesType::Member);
//! assert_eq!(spec.descendants.unwrap().throw_if_collision, Some(true));
//! ```

mod matchers;
pub mod options;
pub mod presets;
mod validate;

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::config::{
    DEFAULT_ATTRIBUTES_LABEL, DEFAULT_DESCENDANTS_LABEL, DEFAULT_ELEMENT_LABEL, DEFAULT_TEXT_LABEL,
};
use crate::error::{ConverterError, Result};

pub use matchers::{
    AssocSpec, CollectionSpec, DateSpec, MatcherChain, MatcherKind, MatcherSpec, PrimitiveKind,
    SymbolSpec, TypeList, ValueType,
};
pub use options::{default_options, ElementOptions, OptionsLookup, OptionsRegistry};
pub use validate::validate_spec;
pub(crate) use validate::validate_descendants;

/// Describes the structure of built elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spec {
    /// Informational name (presets carry one).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Reserved key names used in built elements.
    pub labels: Labels,

    /// How attributes are represented on a built element.
    #[serde(default, alias = "attributesRepresentation")]
    pub attributes_type: AttributesType,

    /// Aggregation of child elements; absent means a plain ordered list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descendants: Option<DescendantsSpec>,

    /// Value coercion; absent means values stay raw strings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coercion: Option<CoercionSpec>,

    /// Deprecated alias of `coercion.textNodes.trim`.
    #[serde(
        default,
        deserialize_with = "flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub trim: Option<bool>,
}

impl Spec {
    /// A spec with the given labels, inline attributes and no coercion.
    #[must_use]
    pub fn new(labels: Labels) -> Self {
        Self {
            name: None,
            labels,
            attributes_type: AttributesType::Member,
            descendants: None,
            coercion: None,
            trim: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_attributes_type(mut self, attributes_type: AttributesType) -> Self {
        self.attributes_type = attributes_type;
        self
    }

    #[must_use]
    pub fn with_descendants(mut self, descendants: DescendantsSpec) -> Self {
        self.descendants = Some(descendants);
        self
    }

    #[must_use]
    pub fn with_coercion(mut self, coercion: CoercionSpec) -> Self {
        self.coercion = Some(coercion);
        self
    }

    /// Parse a spec from JSON. Shape errors are reported as `SpecInvalid`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ConverterError::spec(e.to_string()))
    }

    /// Parse a spec from YAML. Shape errors are reported as `SpecInvalid`.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| ConverterError::spec(e.to_string()))
    }

    /// Load a spec file; `.json` files are read as JSON, anything else as YAML.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "Loading spec");
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        }
    }

    /// The coercion settings of one context, if configured.
    pub fn coercion_context(&self, context: CoercionContext) -> Option<&ContextSpec> {
        let coercion = self.coercion.as_ref()?;
        match context {
            CoercionContext::Attributes => coercion.attributes.as_ref(),
            CoercionContext::TextNodes => coercion.text_nodes.as_ref(),
        }
    }
}

/// Reserved key names used in built elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    /// Key carrying the element's tag name.
    pub element: String,
    /// Key carrying the descendants collection.
    pub descendants: String,
    /// Key carrying the composed text.
    pub text: String,
    /// Key carrying the attribute list in array mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            element: DEFAULT_ELEMENT_LABEL.to_string(),
            descendants: DEFAULT_DESCENDANTS_LABEL.to_string(),
            text: DEFAULT_TEXT_LABEL.to_string(),
            attribute: Some(DEFAULT_ATTRIBUTES_LABEL.to_string()),
        }
    }
}

/// How attributes are represented on a built element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributesType {
    /// Each attribute becomes a same-named key.
    #[default]
    #[serde(alias = "member")]
    Member,
    /// All attributes go under `labels.attribute` as a list of `{name, value}`.
    #[serde(alias = "array")]
    Array,
}

/// Descendant aggregation mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescendantsBy {
    /// Plain ordered list.
    #[default]
    List,
    /// Map from key attribute to the last child carrying it.
    Index,
    /// Map from key attribute to the ordered list of children carrying it.
    Group,
}

/// Descendant aggregation settings.
///
/// Used both on the spec and as a per-element override in
/// [`ElementOptions`]; every field is optional so an override can replace
/// just one of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescendantsSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub by: Option<DescendantsBy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    #[serde(
        default,
        deserialize_with = "flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub throw_if_collision: Option<bool>,
    #[serde(
        default,
        deserialize_with = "flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub throw_if_missing: Option<bool>,
}

impl DescendantsSpec {
    #[must_use]
    pub fn new(by: DescendantsBy) -> Self {
        Self {
            by: Some(by),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    #[must_use]
    pub fn with_throw_if_collision(mut self, flag: bool) -> Self {
        self.throw_if_collision = Some(flag);
        self
    }

    #[must_use]
    pub fn with_throw_if_missing(mut self, flag: bool) -> Self {
        self.throw_if_missing = Some(flag);
        self
    }
}

/// Which kind of raw value is being coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoercionContext {
    Attributes,
    TextNodes,
}

impl CoercionContext {
    /// Name as it appears in a spec document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attributes => "attributes",
            Self::TextNodes => "textNodes",
        }
    }
}

/// Per-context coercion settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoercionSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<ContextSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_nodes: Option<ContextSpec>,
}

/// Coercion settings of one context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextSpec {
    #[serde(
        default,
        deserialize_with = "flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub trim: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matchers: Option<MatcherChain>,
}

impl ContextSpec {
    #[must_use]
    pub fn new(trim: bool, matchers: MatcherChain) -> Self {
        Self {
            trim: Some(trim),
            matchers: Some(matchers),
        }
    }
}

/// Boolean flag that also accepts the strings `"true"` and `"false"`.
pub(crate) fn flag<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Option::<Flag>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Flag::Bool(b)) => Ok(Some(b)),
        Some(Flag::Text(s)) => match s.as_str() {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            other => Err(serde::de::Error::custom(format!(
                "expected a boolean, got '{other}'"
            ))),
        },
    }
}
