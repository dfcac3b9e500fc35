//! Built-in defaults and constants for the converter.
//!
//! These are the values a spec falls back to when it leaves a label or a
//! matcher parameter unspecified.

use regex::Regex;
use std::sync::LazyLock;

/// Default label carrying the element's tag name.
pub const DEFAULT_ELEMENT_LABEL: &str = "_";

/// Default label carrying the descendants collection.
pub const DEFAULT_DESCENDANTS_LABEL: &str = "_children";

/// Default label carrying the composed text.
pub const DEFAULT_TEXT_LABEL: &str = "_text";

/// Default label carrying attributes in array mode.
pub const DEFAULT_ATTRIBUTES_LABEL: &str = "_attributes";

/// Separator between items of a collection literal.
pub const DEFAULT_COLLECTION_DELIM: &str = ",";

/// Opening token of a collection literal; [`TYPE_PLACEHOLDER`] marks the type tag.
pub const DEFAULT_COLLECTION_OPEN: &str = "!<type>[";

/// Closing token of a collection literal.
pub const DEFAULT_COLLECTION_CLOSE: &str = "]";

/// Separator between key and value inside an associative collection item.
pub const DEFAULT_ASSOC_DELIM: &str = "=";

/// Placeholder inside the `open` token that stands for the type tag.
pub const TYPE_PLACEHOLDER: &str = "type";

/// Prefix identifying a symbol literal.
pub const DEFAULT_SYMBOL_PREFIX: &str = "$";

/// Whether symbols are interned by default.
pub const DEFAULT_SYMBOL_GLOBAL: bool = true;

/// Whether attribute values and text runs are trimmed by default.
pub const DEFAULT_TRIM: bool = true;

/// Date formats tried, in order, when the date matcher has no format.
///
/// RFC 3339 is always tried first.
pub const DEFAULT_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y-%m-%dT%H:%M:%S"];

/// Attribute names used by the default element options.
pub const DEFAULT_ID_ATTRIBUTE: &str = "name";
pub const DEFAULT_RECURSE_ATTRIBUTE: &str = "inherits";
pub const DEFAULT_ABSTRACT_ATTRIBUTE: &str = "abstract";

/// Separator between identifiers in a recurse attribute.
pub const RECURSE_SEPARATOR: char = ',';

/// Decimal numeric literal: optional sign, digits with optional fraction, optional exponent.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
pub(crate) static NUMBER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?$").expect("valid regex")
});
