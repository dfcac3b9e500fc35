//! The node access capability consumed by the builder.
//!
//! The builder never looks at a concrete tree type. Anything that can answer
//! these questions about a node can be converted: see [`crate::xml`] for the
//! two implementations shipped with the crate.

/// Read access to one node of a markup tree.
///
/// Implementations are cheap handles (typically a reference or an index
/// into an arena), hence `Clone`.
pub trait NodeAccess: Clone {
    /// Tag name of the element.
    fn tag_name(&self) -> &str;

    /// Attributes in document order as `(name, raw value)`.
    fn attributes(&self) -> Vec<(&str, &str)>;

    /// Raw value of a single attribute.
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    /// Whether the node has any children at all (elements, text, comments).
    fn has_child_nodes(&self) -> bool;

    /// Immediate child elements in document order.
    fn element_children(&self) -> Vec<Self>;

    /// Data of the immediate text-bearing children in document order.
    ///
    /// Raw text and CDATA runs are reported separately where the underlying
    /// tree keeps them apart. Comment data is included too.
    fn text_runs(&self) -> Vec<&str>;

    /// First descendant of `self` (the scope) with tag `tag` whose attribute
    /// `attribute` equals `value`, in document order.
    ///
    /// Both shipped implementations scan the scope linearly and stop at the
    /// first match, so every inheritance hop costs up to the size of the
    /// scope. No index is kept between calls.
    fn find_by_tag_and_attribute(&self, tag: &str, attribute: &str, value: &str) -> Option<Self>;
}

/// Select the node named `value` among the descendants of `scope`.
///
/// Element names are expected to be unique within a scope; when they are
/// not, the first in document order is returned.
pub fn select_element_node_by_id<N: NodeAccess>(
    scope: &N,
    tag: &str,
    id_attribute: &str,
    value: &str,
) -> Option<N> {
    scope.find_by_tag_and_attribute(tag, id_attribute, value)
}
