//! Arena tree read with quick-xml.
//!
//! Unlike most tree parsers this one never merges neighbouring character
//! data: `a <![CDATA[b]]> c` stays three runs. Comments are kept as nodes,
//! processing instructions and the doctype are dropped.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{ConverterError, Result};
use crate::node::NodeAccess;

type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeKind {
    Root,
    Element {
        name: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
    CData(String),
    Comment(String),
}

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A parsed XML document.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<NodeData>,
    root_element: NodeId,
}

impl Document {
    /// Parse a document from text.
    ///
    /// # Errors
    /// `XmlParse` for lexical errors, `MalformedMarkup` when the tags do not
    /// form exactly one closed element tree.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut nodes = vec![NodeData {
            kind: NodeKind::Root,
            parent: None,
            children: Vec::new(),
        }];
        let mut open: Vec<NodeId> = vec![0];

        loop {
            let parent = *open.last().unwrap_or(&0);
            match reader.read_event()? {
                Event::Start(start) => {
                    let kind = element_kind(&start)?;
                    let id = push(&mut nodes, parent, kind);
                    open.push(id);
                }
                Event::Empty(start) => {
                    let kind = element_kind(&start)?;
                    push(&mut nodes, parent, kind);
                }
                Event::End(_) => {
                    if open.len() == 1 {
                        return Err(ConverterError::MalformedMarkup(
                            "closing tag without an open element".to_string(),
                        ));
                    }
                    open.pop();
                }
                Event::Text(text) => {
                    // Character data outside the root element is not content.
                    if parent != 0 {
                        let text = text
                            .unescape()
                            .map_err(quick_xml::Error::from)?
                            .into_owned();
                        push(&mut nodes, parent, NodeKind::Text(text));
                    }
                }
                Event::CData(data) => {
                    let data = reader
                        .decoder()
                        .decode(&data)
                        .map_err(quick_xml::Error::from)?
                        .into_owned();
                    push(&mut nodes, parent, NodeKind::CData(data));
                }
                Event::Comment(comment) => {
                    let comment = reader
                        .decoder()
                        .decode(&comment)
                        .map_err(quick_xml::Error::from)?
                        .into_owned();
                    push(&mut nodes, parent, NodeKind::Comment(comment));
                }
                Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
                Event::Eof => break,
            }
        }

        if open.len() > 1 {
            return Err(ConverterError::MalformedMarkup(
                "unexpected end of document inside an element".to_string(),
            ));
        }

        let mut elements = nodes[0]
            .children
            .iter()
            .copied()
            .filter(|id| matches!(nodes[*id].kind, NodeKind::Element { .. }));
        let root_element = elements
            .next()
            .ok_or_else(|| ConverterError::MalformedMarkup("no root element".to_string()))?;
        if elements.next().is_some() {
            return Err(ConverterError::MalformedMarkup(
                "more than one root element".to_string(),
            ));
        }

        tracing::trace!(nodes = nodes.len(), "Parsed XML document");
        Ok(Self {
            nodes,
            root_element,
        })
    }

    /// The document element.
    pub fn root_element(&self) -> Node<'_> {
        Node {
            doc: self,
            id: self.root_element,
        }
    }

    /// Find an element by absolute slash-separated path, starting with the
    /// document element's own name (e.g. `/Application/Cli/Commands`).
    pub fn select(&self, path: &str) -> Option<Node<'_>> {
        let mut parts = path.split('/').filter(|part| !part.is_empty());
        let root = self.root_element();
        if parts.next()? != root.name()? {
            return None;
        }
        parts.try_fold(root, |node, part| node.find_child(part))
    }
}

fn element_kind(start: &BytesStart<'_>) -> Result<NodeKind> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(quick_xml::Error::from)?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(NodeKind::Element { name, attributes })
}

fn push(nodes: &mut Vec<NodeData>, parent: NodeId, kind: NodeKind) -> NodeId {
    let id = nodes.len();
    nodes.push(NodeData {
        kind,
        parent: Some(parent),
        children: Vec::new(),
    });
    nodes[parent].children.push(id);
    id
}

/// Handle to one node of a [`Document`].
#[derive(Clone, Copy)]
pub struct Node<'d> {
    doc: &'d Document,
    id: NodeId,
}

impl std::fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Node").field(&self.data().kind).finish()
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl<'d> Node<'d> {
    fn data(&self) -> &'d NodeData {
        &self.doc.nodes[self.id]
    }

    fn at(&self, id: NodeId) -> Node<'d> {
        Node { doc: self.doc, id }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.data().kind, NodeKind::Element { .. })
    }

    pub fn is_cdata(&self) -> bool {
        matches!(self.data().kind, NodeKind::CData(_))
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.data().kind, NodeKind::Comment(_))
    }

    /// Element name including any namespace prefix, `None` for other nodes.
    pub fn name(&self) -> Option<&'d str> {
        match &self.data().kind {
            NodeKind::Element { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }

    /// Data of a text, CDATA or comment node.
    pub fn text(&self) -> Option<&'d str> {
        match &self.data().kind {
            NodeKind::Text(s) | NodeKind::CData(s) | NodeKind::Comment(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn parent_element(&self) -> Option<Node<'d>> {
        let parent = self.at(self.data().parent?);
        parent.is_element().then_some(parent)
    }

    pub fn children(&self) -> impl Iterator<Item = Node<'d>> + 'd {
        let doc = self.doc;
        self.data().children.iter().map(move |&id| Node { doc, id })
    }

    /// Descendants in document order, excluding `self`.
    ///
    /// Walked lazily with a stack of pending siblings.
    pub fn descendants(&self) -> impl Iterator<Item = Node<'d>> + 'd {
        let doc = self.doc;
        let mut stack: Vec<NodeId> = self.data().children.iter().rev().copied().collect();
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(doc.nodes[id].children.iter().rev());
            Some(Node { doc, id })
        })
    }

    /// First child element named `tag`.
    pub fn find_child(&self, tag: &str) -> Option<Node<'d>> {
        self.children()
            .find(|child| child.name() == Some(tag))
    }

    /// Element reached by a relative slash-separated path of tag names.
    pub fn find_by_path(&self, path: &str) -> Option<Node<'d>> {
        path.split('/')
            .filter(|part| !part.is_empty())
            .try_fold(*self, |node, part| node.find_child(part))
    }
}

impl NodeAccess for Node<'_> {
    fn tag_name(&self) -> &str {
        self.name().unwrap_or_default()
    }

    fn attributes(&self) -> Vec<(&str, &str)> {
        match &self.data().kind {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn has_child_nodes(&self) -> bool {
        !self.data().children.is_empty()
    }

    fn element_children(&self) -> Vec<Self> {
        self.children().filter(Node::is_element).collect()
    }

    fn text_runs(&self) -> Vec<&str> {
        self.children().filter_map(|child| child.text()).collect()
    }

    fn find_by_tag_and_attribute(&self, tag: &str, attribute: &str, value: &str) -> Option<Self> {
        self.descendants().find(|node| {
            node.name() == Some(tag) && node.attribute(attribute) == Some(value)
        })
    }
}
