//! Validating entry point that ties the spec, the options and a document together.

use crate::builder::build_element;
use crate::error::{ConverterError, Result};
use crate::node::{select_element_node_by_id, NodeAccess};
use crate::spec::{presets, validate_spec, OptionsLookup, Spec};
use crate::value::BuiltElement;
use crate::xml::Document;

/// Builds elements with a spec that was validated once, up front.
///
/// # Example
///
/// ```
/// use jaxine::{default_options, Converter, Value};
///
/// let converter = Converter::from_preset("default").unwrap();
/// let element = converter
///     .build_from_str(
///         r#"<Commands>
///              <Command name="base" timeout="30"/>
///              <Command name="run" inherits="base"/>
///            </Commands>"#,
///         "Command",
///         "name",
///         "run",
///         &|_: &str| default_options(),
///     )
///     .unwrap();
///
/// assert_eq!(element.get("timeout"), Some(&Value::Int(30)));
/// assert!(!element.contains_key("inherits"));
/// ```
#[derive(Debug, Clone)]
pub struct Converter {
    spec: Spec,
}

impl Converter {
    /// Validate `spec` and keep it for every subsequent build.
    ///
    /// # Errors
    /// `SpecInvalid` when the spec fails validation.
    pub fn new(spec: Spec) -> Result<Self> {
        validate_spec(&spec)?;
        tracing::debug!(spec = spec.name.as_deref().unwrap_or("custom"), "Spec validated");
        Ok(Self { spec })
    }

    /// Create a converter for one of the [`presets`].
    pub fn from_preset(name: &str) -> Result<Self> {
        let spec =
            presets::by_name(name).ok_or_else(|| ConverterError::UnknownPreset(name.to_string()))?;
        Self::new(spec)
    }

    pub fn spec(&self) -> &Spec {
        &self.spec
    }

    /// Build `node`, searching `parent` for inheritance targets.
    pub fn build_element<N, O>(&self, node: &N, parent: &N, options: &O) -> Result<BuiltElement>
    where
        N: NodeAccess,
        O: OptionsLookup + ?Sized,
    {
        build_element(node, parent, &self.spec, options)
    }

    /// Parse `xml` and build the `tag` element whose `id_attribute` is `name`.
    ///
    /// The selected element's parent is the inheritance scope; the document
    /// element is its own scope.
    ///
    /// # Errors
    /// Markup errors, `ElementNotFound` when nothing matches, and any build error.
    pub fn build_from_str<O>(
        &self,
        xml: &str,
        tag: &str,
        id_attribute: &str,
        name: &str,
        options: &O,
    ) -> Result<BuiltElement>
    where
        O: OptionsLookup + ?Sized,
    {
        let doc = Document::parse(xml)?;
        let root = doc.root_element();

        let is_root = root.tag_name() == tag && root.attribute(id_attribute) == Some(name);
        let node = if is_root {
            root
        } else {
            select_element_node_by_id(&root, tag, id_attribute, name).ok_or_else(|| {
                ConverterError::ElementNotFound {
                    tag: tag.to_string(),
                    attribute: id_attribute.to_string(),
                    value: name.to_string(),
                }
            })?
        };
        let parent = node.parent_element().unwrap_or(root);

        self.build_element(&node, &parent, options)
    }
}
