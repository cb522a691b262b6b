//! Arena-backed XML document tree.
//!
//! Nodes live in a single `Vec` in document order (pre-order) and only point
//! at their parent. That is enough to walk children, and it lets the writer
//! emit the whole document in one linear pass: before writing a node, close
//! every open element that is not its parent.
//!
//! [`XmlTree::parse`] builds a tree from text with namespaces resolved, and
//! the XRD encoder builds one through the `append_*` methods before writing
//! it out.

use crate::error::{Result, XrdError};
use crate::xml::utils::{self, XML_NAMESPACE, XMLNS_NAMESPACE};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::{QName, ResolveResult};
use quick_xml::{NsReader, Writer};
use std::borrow::Cow;
use std::io::Write;
use tracing::trace;

/// Index of a node in an [`XmlTree`].
pub type NodeId = usize;

/// A namespace-resolved XML name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlName {
    /// Resolved namespace URI, `None` when the name is in no namespace.
    pub namespace: Option<String>,
    /// Prefix as written, used when the tree is serialized.
    pub prefix: Option<String>,
    pub local: String,
}

impl XmlName {
    /// A name in no namespace.
    pub fn local(local: impl Into<String>) -> Self {
        Self {
            namespace: None,
            prefix: None,
            local: local.into(),
        }
    }

    /// An unprefixed name in `namespace`, for elements under a default namespace.
    pub fn in_default(namespace: &str, local: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.to_string()),
            prefix: None,
            local: local.into(),
        }
    }

    /// A prefixed name in `namespace`.
    pub fn prefixed(namespace: &str, prefix: &str, local: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.to_string()),
            prefix: Some(prefix.to_string()),
            local: local.into(),
        }
    }

    /// Name of an `xmlns` (default) or `xmlns:prefix` declaration attribute.
    pub fn namespace_declaration(prefix: Option<&str>) -> Self {
        match prefix {
            Some(prefix) => Self::prefixed(XMLNS_NAMESPACE, "xmlns", prefix),
            None => Self::in_default(XMLNS_NAMESPACE, "xmlns"),
        }
    }

    pub fn is(&self, namespace: &str, local: &str) -> bool {
        self.namespace.as_deref() == Some(namespace) && self.local == local
    }

    /// The name as written in markup, `prefix:local` or `local`.
    pub fn qualified(&self) -> Cow<'_, str> {
        match &self.prefix {
            Some(prefix) => Cow::Owned(format!("{}:{}", prefix, self.local)),
            None => Cow::Borrowed(&self.local),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    pub name: XmlName,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element {
        name: XmlName,
        attributes: Vec<XmlAttribute>,
    },
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
}

/// An XML document: an optional declaration and a single root element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlTree {
    nodes: Vec<Node>,
    declaration: bool,
}

impl XmlTree {
    /// An empty tree. Set `declaration` to emit `<?xml version="1.0" encoding="UTF-8"?>`.
    pub fn new(declaration: bool) -> Self {
        Self {
            nodes: Vec::new(),
            declaration,
        }
    }

    pub fn has_declaration(&self) -> bool {
        self.declaration
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// The root element.
    pub fn root(&self) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.parent.is_none() && matches!(n.kind, NodeKind::Element { .. }))
    }

    /// Element name of `id`, `None` for text nodes.
    pub fn name(&self, id: NodeId) -> Option<&XmlName> {
        match &self.nodes.get(id)?.kind {
            NodeKind::Element { name, .. } => Some(name),
            NodeKind::Text(_) => None,
        }
    }

    pub fn attributes(&self, id: NodeId) -> &[XmlAttribute] {
        match self.nodes.get(id).map(|n| &n.kind) {
            Some(NodeKind::Element { attributes, .. }) => attributes,
            _ => &[],
        }
    }

    /// Value of the attribute with the given namespace (`None` for unqualified) and local name.
    pub fn attribute(&self, id: NodeId, namespace: Option<&str>, local: &str) -> Option<&str> {
        self.attributes(id)
            .iter()
            .find(|a| a.name.namespace.as_deref() == namespace && a.name.local == local)
            .map(|a| a.value.as_str())
    }

    /// Direct children of `id`, in document order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        // Descendants of a pre-order node directly follow it. The subtree ends
        // at the first node whose parent comes before `id`.
        (id + 1..self.nodes.len())
            .take_while(move |&node| self.nodes[node].parent.is_some_and(|p| p >= id))
            .filter(move |&node| self.nodes[node].parent == Some(id))
    }

    /// Direct element children of `id`, in document order.
    pub fn child_elements(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .filter(move |&child| matches!(self.nodes[child].kind, NodeKind::Element { .. }))
    }

    /// Concatenated direct text content of `id`.
    pub fn text(&self, id: NodeId) -> String {
        self.children(id)
            .filter_map(|child| match &self.nodes[child].kind {
                NodeKind::Text(text) => Some(text.as_str()),
                NodeKind::Element { .. } => None,
            })
            .collect()
    }

    /// Appends an element as the last child of `parent`, or as the root when `parent` is `None`.
    ///
    /// Nodes must be appended in document order: `parent` has to be the most
    /// recently appended element or one of its ancestors.
    pub fn append_element(&mut self, parent: Option<NodeId>, name: XmlName) -> Result<NodeId> {
        self.check_append(parent)?;
        if parent.is_none() && self.root().is_some() {
            return Err(XrdError::format("XML document already has a root element"));
        }
        self.nodes.push(Node {
            parent,
            kind: NodeKind::Element {
                name,
                attributes: Vec::new(),
            },
        });
        Ok(self.nodes.len() - 1)
    }

    /// Appends text to `parent`, merging with an immediately preceding text child.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Result<()> {
        self.check_append(Some(parent))?;
        if let Some(Node {
            parent: Some(last_parent),
            kind: NodeKind::Text(existing),
        }) = self.nodes.last_mut()
        {
            if *last_parent == parent {
                existing.push_str(text);
                return Ok(());
            }
        }
        self.nodes.push(Node {
            parent: Some(parent),
            kind: NodeKind::Text(text.to_string()),
        });
        Ok(())
    }

    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: XmlName,
        value: impl Into<String>,
    ) -> Result<()> {
        match self.nodes.get_mut(id).map(|n| &mut n.kind) {
            Some(NodeKind::Element { attributes, .. }) => {
                let value = value.into();
                match attributes.iter_mut().find(|a| a.name == name) {
                    Some(existing) => existing.value = value,
                    None => attributes.push(XmlAttribute { name, value }),
                }
                Ok(())
            }
            _ => Err(XrdError::format(format!("node {} is not an element", id))),
        }
    }

    fn check_append(&self, parent: Option<NodeId>) -> Result<()> {
        let Some(parent) = parent else {
            return Ok(());
        };
        if !matches!(
            self.nodes.get(parent).map(|n| &n.kind),
            Some(NodeKind::Element { .. })
        ) {
            return Err(XrdError::format(format!("node {} is not an element", parent)));
        }
        // `parent` must be on the path from the last node up to the root.
        let mut cursor = self.nodes.len().checked_sub(1);
        while let Some(id) = cursor {
            if id == parent {
                return Ok(());
            }
            cursor = self.nodes[id].parent;
        }
        Err(XrdError::format(format!(
            "node {} is closed; append nodes in document order",
            parent
        )))
    }

    /// Parses XML text into a tree.
    ///
    /// The document must contain exactly one root element. Only the XML
    /// declaration, processing instructions, comments, and whitespace may
    /// appear around it.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = NsReader::from_str(xml);
        let mut tree = XmlTree::new(false);
        let mut open: Vec<NodeId> = Vec::new();

        loop {
            let (resolved, event) = reader.read_resolved_event()?;
            match event {
                Event::Start(e) => {
                    let namespace = namespace_uri(resolved)?;
                    let id = tree.open_element(&reader, &e, namespace, open.last().copied())?;
                    open.push(id);
                }
                Event::Empty(e) => {
                    let namespace = namespace_uri(resolved)?;
                    tree.open_element(&reader, &e, namespace, open.last().copied())?;
                }
                Event::End(_) => {
                    open.pop();
                }
                Event::Text(t) => {
                    let text = unescape_text(utf8(&t)?)?;
                    tree.push_content(open.last().copied(), &text)?;
                }
                Event::CData(c) => {
                    let text = utf8(&c)?.to_string();
                    tree.push_content(open.last().copied(), &text)?;
                }
                Event::GeneralRef(r) => {
                    let reference = format!("&{};", utf8(&r)?);
                    let text = unescape_text(&reference)?.into_owned();
                    tree.push_content(open.last().copied(), &text)?;
                }
                Event::Decl(_) => {
                    if tree.is_empty() {
                        tree.declaration = true;
                    }
                }
                Event::PI(_) | Event::Comment(_) => {}
                Event::DocType(_) => {
                    return Err(XrdError::format("document type declarations are not supported"));
                }
                Event::Eof => break,
            }
        }

        if !open.is_empty() {
            return Err(XrdError::format("unexpected end of XML document"));
        }
        if tree.root().is_none() {
            return Err(XrdError::format("XML document has no root element"));
        }
        trace!(nodes = tree.len(), "parsed XML tree");
        Ok(tree)
    }

    fn open_element(
        &mut self,
        reader: &NsReader<&[u8]>,
        start: &BytesStart<'_>,
        namespace: Option<String>,
        parent: Option<NodeId>,
    ) -> Result<NodeId> {
        if parent.is_none() && self.root().is_some() {
            return Err(XrdError::format(
                "XML document has more than one top-level element",
            ));
        }
        let qname = start.name();
        let name = XmlName {
            namespace,
            prefix: owned_prefix(qname)?,
            local: utf8(start.local_name().as_ref())?.to_string(),
        };
        let id = self.append_element(parent, name)?;

        for attr in start.attributes() {
            let attr = attr?;
            let name = attribute_name(reader, attr.key)?;
            let value = unescape_text(utf8(&attr.value)?)?;
            self.set_attribute(id, name, value.into_owned())?;
        }
        Ok(id)
    }

    fn push_content(&mut self, parent: Option<NodeId>, text: &str) -> Result<()> {
        match parent {
            Some(parent) => self.append_text(parent, text),
            None if utils::is_whitespace(text) => Ok(()),
            None => Err(XrdError::format("text outside the root element")),
        }
    }

    /// Writes the tree as XML text, optionally indented by `indent` spaces per level.
    pub fn write_to<W: Write>(&self, writer: W, indent: Option<usize>) -> Result<()> {
        let mut writer = match indent {
            Some(size) => Writer::new_with_indent(writer, b' ', size),
            None => Writer::new(writer),
        };

        if self.declaration {
            writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        }

        let mut open: Vec<NodeId> = Vec::new();
        for (id, node) in self.nodes.iter().enumerate() {
            while let Some(&top) = open.last() {
                if Some(top) == node.parent {
                    break;
                }
                self.write_end(&mut writer, top)?;
                open.pop();
            }

            match &node.kind {
                NodeKind::Text(text) => {
                    writer.write_event(Event::Text(BytesText::new(text)))?;
                }
                NodeKind::Element { name, attributes } => {
                    let qualified = name.qualified();
                    let mut start = BytesStart::new(qualified.as_ref());
                    for attr in attributes {
                        let key = attr.name.qualified();
                        start.push_attribute((key.as_ref(), attr.value.as_str()));
                    }
                    let has_children = self
                        .nodes
                        .get(id + 1)
                        .is_some_and(|next| next.parent == Some(id));
                    if has_children {
                        writer.write_event(Event::Start(start))?;
                        open.push(id);
                    } else {
                        writer.write_event(Event::Empty(start))?;
                    }
                }
            }
        }

        while let Some(top) = open.pop() {
            self.write_end(&mut writer, top)?;
        }
        Ok(())
    }

    fn write_end<W: Write>(&self, writer: &mut Writer<W>, id: NodeId) -> Result<()> {
        if let Some(name) = self.name(id) {
            writer.write_event(Event::End(BytesEnd::new(name.qualified())))?;
        }
        Ok(())
    }

    /// Serializes the tree to a string.
    pub fn to_xml_string(&self, indent: Option<usize>) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer, indent)?;
        String::from_utf8(buffer).map_err(|e| XrdError::format(e.to_string()))
    }
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| XrdError::format(format!("invalid UTF-8: {}", e)))
}

fn unescape_text(raw: &str) -> Result<Cow<'_, str>> {
    quick_xml::escape::unescape(raw)
        .map_err(|e| XrdError::format(format!("invalid character reference: {}", e)))
}

fn namespace_uri(resolved: ResolveResult<'_>) -> Result<Option<String>> {
    match resolved {
        ResolveResult::Bound(ns) => Ok(Some(utf8(ns.as_ref())?.to_string())),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(XrdError::format(format!(
            "undeclared namespace prefix '{}'",
            String::from_utf8_lossy(&prefix)
        ))),
    }
}

fn owned_prefix(name: QName<'_>) -> Result<Option<String>> {
    name.prefix()
        .map(|p| utf8(p.as_ref()).map(str::to_string))
        .transpose()
}

fn attribute_name(reader: &NsReader<&[u8]>, key: QName<'_>) -> Result<XmlName> {
    let prefix = owned_prefix(key)?;
    let local = utf8(key.local_name().as_ref())?.to_string();

    if key.as_namespace_binding().is_some() {
        let declared = prefix.as_ref().map(|_| local.as_str());
        return Ok(XmlName::namespace_declaration(declared));
    }
    if prefix.as_deref() == Some("xml") {
        return Ok(XmlName::prefixed(XML_NAMESPACE, "xml", local));
    }

    let (resolved, _) = reader.resolve_attribute(key);
    Ok(XmlName {
        namespace: namespace_uri(resolved)?,
        prefix,
        local,
    })
}
