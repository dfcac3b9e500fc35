//! Error types for the converter.
//!
//! Every error terminates the enclosing top-level build; there is no
//! partial result. A missing inheritance target is deliberately not an
//! error and therefore has no variant here.

use thiserror::Error;

/// Main error type for the converter library.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// The spec (or an element's options) failed shape validation.
    #[error("Invalid spec: {0}")]
    SpecInvalid(String),

    /// An element's identifier reappeared in the active inheritance chain.
    #[error("Circular reference detected, element '{identifier}' has already been encountered (chain: {})", .chain.join(" -> "))]
    CircularReference {
        identifier: String,
        chain: Vec<String>,
    },

    /// Index-mode aggregation found a duplicate key with `throwIfCollision` set.
    #[error("Element collision found under <{parent}>: key '{key}' is not unique")]
    ElementCollision { parent: String, key: String },

    /// Index/group aggregation found a child without the key attribute.
    #[error("Element <{element}> is missing key attribute \"{attribute}\" (parent <{parent}>)")]
    MissingKeyAttribute {
        parent: String,
        element: String,
        attribute: String,
    },

    /// No matcher accepted the value and the terminal string matcher is disabled.
    #[error("No matcher accepted {context} value '{value}' and the string matcher is disabled")]
    CoercionExhausted { context: String, value: String },

    /// A coercion parameter was requested in a context where it has no meaning.
    #[error("Internal error: {0}")]
    InternalConfig(String),

    /// The markup could not be read.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] quick_xml::Error),

    /// The markup was read but is not a single well-formed element tree.
    #[error("Malformed XML: {0}")]
    MalformedMarkup(String),

    /// Selected element does not exist in the document.
    #[error("No <{tag}> element with {attribute}=\"{value}\" found")]
    ElementNotFound {
        tag: String,
        attribute: String,
        value: String,
    },

    /// Preset name not known.
    #[error("Unknown spec preset '{0}'")]
    UnknownPreset(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ConverterError {
    /// Shorthand for a [`ConverterError::SpecInvalid`] with a formatted reason.
    pub(crate) fn spec(reason: impl Into<String>) -> Self {
        Self::SpecInvalid(reason.into())
    }
}

/// Result type alias for converter operations.
pub type Result<T> = std::result::Result<T, ConverterError>;
