// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Arena-backed markup tree.
//!
//! A [`Document`] owns every node of one markup tree. Nodes reference each other by
//! [`NodeId`], which keeps parent links cheap and lets attributes be real nodes with
//! an owner element, the shape the diagnostic locator walks.
//!
//! Handles that outlive a borrow of the document are [`MarkupNode`]s: an
//! `Arc<Document>` plus a node id, cheap to clone and safe to share across threads.

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

/// Index of a node inside its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The kinds of node a [`Document`] can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element,
    Attribute,
    Text,
    CData,
    Comment,
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let label = match self {
            NodeKind::Document => "document",
            NodeKind::Element => "element",
            NodeKind::Attribute => "attribute",
            NodeKind::Text => "text",
            NodeKind::CData => "cdata",
            NodeKind::Comment => "comment",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    name: String,
    value: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: Vec<NodeId>,
}

impl NodeData {
    fn new(kind: NodeKind, name: String, value: String) -> Self {
        Self {
            kind,
            name,
            value,
            parent: None,
            children: Vec::new(),
            attributes: Vec::new(),
        }
    }
}

/// A markup tree. Node `0` is always the document node.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document holding only the document node.
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData::new(NodeKind::Document, "#document".to_string(), String::new())],
        }
    }

    /// The document node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// The top-level element, if one has been appended.
    pub fn document_element(&self) -> Option<NodeId> {
        self.child_elements(self.root()).next()
    }

    /// Create an element that is not attached anywhere yet.
    pub fn create_element(&mut self, name: impl Into<String>) -> NodeId {
        self.push(NodeData::new(NodeKind::Element, name.into(), String::new()))
    }

    /// Attach `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Create an element and attach it under `parent`.
    pub fn append_element(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
        let id = self.create_element(name);
        self.append_child(parent, id);
        id
    }

    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        self.append_leaf(parent, NodeKind::Text, "#text", text.into())
    }

    pub fn append_cdata(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        self.append_leaf(parent, NodeKind::CData, "#cdata-section", text.into())
    }

    pub fn append_comment(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        self.append_leaf(parent, NodeKind::Comment, "#comment", text.into())
    }

    /// Set an attribute on `element`, replacing the value if it already exists.
    pub fn set_attribute(
        &mut self,
        element: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> NodeId {
        let name = name.into();
        let value = value.into();
        if let Some(existing) = self.attribute_node(element, &name) {
            self.nodes[existing.0].value = value;
            return existing;
        }
        let id = self.push(NodeData::new(NodeKind::Attribute, name, value));
        self.nodes[id.0].parent = Some(element);
        self.nodes[element.0].attributes.push(id);
        id
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.0].kind
    }

    /// Qualified name as written in the markup (`bpmn:task`, `id`, `#text`).
    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id.0].name
    }

    /// Attribute value or text content; empty for elements.
    pub fn value(&self, id: NodeId) -> &str {
        &self.nodes[id.0].value
    }

    /// Parent element or document for child nodes, owner element for attributes.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn attributes(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].attributes
    }

    pub fn child_elements(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[id.0]
            .children
            .iter()
            .copied()
            .filter(move |child| self.nodes[child.0].kind == NodeKind::Element)
    }

    pub fn attribute_node(&self, element: NodeId, name: &str) -> Option<NodeId> {
        self.nodes[element.0]
            .attributes
            .iter()
            .copied()
            .find(|attr| self.nodes[attr.0].name == name)
    }

    pub fn attribute(&self, element: NodeId, name: &str) -> Option<&str> {
        self.attribute_node(element, name)
            .map(|attr| self.nodes[attr.0].value.as_str())
    }

    /// Concatenated text and CDATA content of the direct children of `id`.
    pub fn text(&self, id: NodeId) -> String {
        self.nodes[id.0]
            .children
            .iter()
            .filter(|child| matches!(self.nodes[child.0].kind, NodeKind::Text | NodeKind::CData))
            .map(|child| self.nodes[child.0].value.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.document_element().is_none()
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        self.nodes.push(data);
        NodeId(self.nodes.len() - 1)
    }

    fn append_leaf(&mut self, parent: NodeId, kind: NodeKind, name: &str, value: String) -> NodeId {
        let id = self.push(NodeData::new(kind, name.to_string(), value));
        self.append_child(parent, id);
        id
    }
}

/// Shared handle to one node of a frozen [`Document`].
#[derive(Debug, Clone)]
pub struct MarkupNode {
    document: Arc<Document>,
    id: NodeId,
}

impl PartialEq for MarkupNode {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Arc::ptr_eq(&self.document, &other.document)
    }
}

impl Eq for MarkupNode {}

impl MarkupNode {
    pub fn new(document: Arc<Document>, id: NodeId) -> Self {
        Self { document, id }
    }

    /// Handle to the document's top-level element.
    pub fn document_element(document: &Arc<Document>) -> Option<Self> {
        document
            .document_element()
            .map(|id| Self::new(Arc::clone(document), id))
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn document(&self) -> &Arc<Document> {
        &self.document
    }

    pub fn kind(&self) -> NodeKind {
        self.document.kind(self.id)
    }

    pub fn name(&self) -> &str {
        self.document.name(self.id)
    }

    /// Prefix part of the qualified name, empty when unprefixed.
    pub fn prefix(&self) -> &str {
        split_qualified_name(self.name()).0
    }

    pub fn local_name(&self) -> &str {
        split_qualified_name(self.name()).1
    }

    pub fn value(&self) -> &str {
        self.document.value(self.id)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.document.attribute(self.id, name)
    }

    pub fn attribute_node(&self, name: &str) -> Option<MarkupNode> {
        self.document
            .attribute_node(self.id, name)
            .map(|id| self.sibling_handle(id))
    }

    pub fn attributes(&self) -> Vec<MarkupNode> {
        self.document
            .attributes(self.id)
            .iter()
            .map(|id| self.sibling_handle(*id))
            .collect()
    }

    pub fn child_elements(&self) -> Vec<MarkupNode> {
        self.document
            .child_elements(self.id)
            .map(|id| self.sibling_handle(id))
            .collect()
    }

    pub fn parent(&self) -> Option<MarkupNode> {
        self.document
            .parent(self.id)
            .map(|id| self.sibling_handle(id))
    }

    pub fn text(&self) -> String {
        self.document.text(self.id)
    }

    fn sibling_handle(&self, id: NodeId) -> MarkupNode {
        MarkupNode::new(Arc::clone(&self.document), id)
    }
}

/// Split `prefix:local` into its parts; unprefixed names get an empty prefix.
pub fn split_qualified_name(name: &str) -> (&str, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (prefix, local),
        None => ("", name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_are_nodes_owned_by_their_element() {
        let mut doc = Document::new();
        let root = doc.append_element(doc.root(), "a");
        let attr = doc.set_attribute(root, "id", "x");

        assert_eq!(doc.kind(attr), NodeKind::Attribute);
        assert_eq!(doc.parent(attr), Some(root));
        assert_eq!(doc.attribute(root, "id"), Some("x"));
        assert!(doc.children(root).is_empty());
    }

    #[test]
    fn test_set_attribute_replaces_existing_value() {
        let mut doc = Document::new();
        let root = doc.append_element(doc.root(), "a");
        let first = doc.set_attribute(root, "id", "x");
        let second = doc.set_attribute(root, "id", "y");

        assert_eq!(first, second);
        assert_eq!(doc.attribute(root, "id"), Some("y"));
        assert_eq!(doc.attributes(root).len(), 1);
    }

    #[test]
    fn test_text_concatenates_text_and_cdata_children() {
        let mut doc = Document::new();
        let root = doc.append_element(doc.root(), "v");
        doc.append_text(root, "ab");
        doc.append_comment(root, "ignored");
        doc.append_cdata(root, "c]]");
        doc.append_cdata(root, ">d");

        assert_eq!(doc.text(root), "abc]]>d");
    }

    #[test]
    fn test_markup_node_splits_qualified_names() {
        let mut doc = Document::new();
        let root = doc.append_element(doc.root(), "bpmn:task");
        let node = MarkupNode::new(Arc::new(doc), root);

        assert_eq!(node.prefix(), "bpmn");
        assert_eq!(node.local_name(), "task");
        assert_eq!(split_qualified_name("task"), ("", "task"));
    }

    #[test]
    fn test_created_elements_start_detached() {
        let mut doc = Document::new();
        let orphan = doc.create_element("loose");

        assert_eq!(doc.parent(orphan), None);
        assert!(doc.document_element().is_none());
    }
}
