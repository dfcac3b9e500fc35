//! `roxmltree` navigation helpers and its [`NodeAccess`] implementation.

use roxmltree::Node;

use crate::node::NodeAccess;

/// Get the tag name without namespace prefix.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use jaxine::xml::get_tag_name;
///
/// let xml = r#"<Application><Cli/></Application>"#;
/// let doc = Document::parse(xml).unwrap();
/// let cli = doc.root_element().first_element_child().unwrap();
/// assert_eq!(get_tag_name(cli), "Cli");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Find the first child element with the given tag name.
pub fn find_child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && get_tag_name(*child) == tag)
}

/// Find a descendant element matching a slash-separated path of tag names.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use jaxine::xml::find_by_path;
///
/// let xml = r#"<Application><Cli><Commands/></Cli></Application>"#;
/// let doc = Document::parse(xml).unwrap();
///
/// let commands = find_by_path(doc.root_element(), "Cli/Commands");
/// assert!(commands.is_some());
/// ```
pub fn find_by_path<'a, 'input>(node: Node<'a, 'input>, path: &str) -> Option<Node<'a, 'input>> {
    path.split('/')
        .filter(|part| !part.is_empty())
        .try_fold(node, find_child)
}

/// Qualified tag name (`prefix:local`) as written in the source.
fn qualified_tag_name<'a, 'input: 'a>(node: Node<'a, 'input>) -> &'a str {
    let input: &'a str = node.document().input_text();
    input
        .get(node.range().start + 1..)
        .and_then(|rest| {
            rest.split(|c: char| c.is_whitespace() || c == '/' || c == '>')
                .next()
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| get_tag_name(node))
}

/// Qualified attribute name as written in the source.
fn qualified_attribute_name<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    attr: &roxmltree::Attribute<'a, 'input>,
) -> &'a str {
    let input: &'a str = node.document().input_text();
    input.get(attr.range_qname()).unwrap_or_else(|| attr.name())
}

impl<'a, 'input: 'a> NodeAccess for Node<'a, 'input> {
    fn tag_name(&self) -> &str {
        qualified_tag_name(*self)
    }

    fn attributes(&self) -> Vec<(&str, &str)> {
        Node::attributes(self)
            .map(|attr| (qualified_attribute_name(*self, &attr), attr.value()))
            .collect()
    }

    fn has_child_nodes(&self) -> bool {
        self.has_children()
    }

    fn element_children(&self) -> Vec<Self> {
        self.children().filter(Node::is_element).collect()
    }

    fn text_runs(&self) -> Vec<&str> {
        self.children()
            .filter(|child| child.is_text() || child.is_comment())
            .filter_map(|child| child.text())
            .collect()
    }

    fn find_by_tag_and_attribute(&self, tag: &str, attribute: &str, value: &str) -> Option<Self> {
        self.descendants().skip(1).find(|node| {
            node.is_element()
                && qualified_tag_name(*node) == tag
                && NodeAccess::attribute(node, attribute) == Some(value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::select_element_node_by_id;
    use roxmltree::Document;

    const XML: &str = r#"<Application name="app">
  <Cli>
    <Commands>
      <Command name="base" abstract="true"/>
      <Command name="leaf" inherits="base"><!-- note -->Leaf text</Command>
    </Commands>
  </Cli>
</Application>"#;

    #[test]
    fn test_find_by_path() {
        let doc = Document::parse(XML).unwrap();
        let commands = find_by_path(doc.root_element(), "Cli/Commands").unwrap();
        assert_eq!(get_tag_name(commands), "Commands");
        assert!(find_by_path(doc.root_element(), "Cli/Missing").is_none());
    }

    #[test]
    fn test_attributes_in_document_order() {
        let doc = Document::parse(XML).unwrap();
        let leaf = select_element_node_by_id(&doc.root_element(), "Command", "name", "leaf")
            .unwrap();
        assert_eq!(
            NodeAccess::attributes(&leaf),
            vec![("name", "leaf"), ("inherits", "base")]
        );
        assert_eq!(NodeAccess::attribute(&leaf, "inherits"), Some("base"));
    }

    #[test]
    fn test_text_runs_include_comments() {
        let doc = Document::parse(XML).unwrap();
        let leaf = select_element_node_by_id(&doc.root_element(), "Command", "name", "leaf")
            .unwrap();
        assert_eq!(leaf.text_runs(), vec![" note ", "Leaf text"]);
    }

    #[test]
    fn test_element_children_skip_text() {
        let doc = Document::parse(XML).unwrap();
        let commands = find_by_path(doc.root_element(), "Cli/Commands").unwrap();
        let children = commands.element_children();
        assert_eq!(children.len(), 2);
        assert!(commands.has_child_nodes());
        assert!(!children[0].has_child_nodes());
    }

    #[test]
    fn test_qualified_names_are_kept() {
        let doc = Document::parse(r#"<R xmlns:x="urn:x"><x:C name="a" x:k="1" k="2"/></R>"#)
            .unwrap();
        let root = doc.root_element();
        let c = select_element_node_by_id(&root, "x:C", "name", "a").unwrap();
        assert_eq!(NodeAccess::tag_name(&c), "x:C");
        assert_eq!(
            NodeAccess::attributes(&c),
            vec![("name", "a"), ("x:k", "1"), ("k", "2")]
        );
        assert_eq!(NodeAccess::attribute(&c, "x:k"), Some("1"));
        assert_eq!(NodeAccess::tag_name(&root), "R");
    }

    #[test]
    fn test_selection_excludes_scope() {
        let doc = Document::parse(XML).unwrap();
        let root = doc.root_element();
        assert!(select_element_node_by_id(&root, "Application", "name", "app").is_none());
        assert!(select_element_node_by_id(&root, "Command", "name", "missing").is_none());
    }
}
