// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use super::document::{MarkupNode, NodeKind};

/// Namespace bound to the reserved `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Prefix to namespace-URI bindings in scope at one markup node.
///
/// Namespaces may be declared with different prefixes at different nesting
/// levels, so a map is always computed for a specific node rather than shared
/// across a whole document. The empty prefix holds the default namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixMap {
    bindings: HashMap<String, String>,
}

impl PrefixMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binding(mut self, prefix: impl Into<String>, namespace: impl Into<String>) -> Self {
        self.bind(prefix, namespace);
        self
    }

    pub fn bind(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.bindings.insert(prefix.into(), namespace.into());
    }

    /// Namespace URI for `prefix`, or `None` when it is not declared in scope.
    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        if prefix == "xml" {
            return Some(XML_NAMESPACE);
        }
        self.bindings.get(prefix).map(String::as_str)
    }

    /// Bindings in scope at `node`, applying declarations from the root down.
    pub fn for_node(node: &MarkupNode) -> Self {
        let mut lineage = Vec::new();
        let mut current = Some(node.clone());
        while let Some(n) = current {
            if n.kind() == NodeKind::Element {
                lineage.push(n.clone());
            }
            current = n.parent();
        }

        lineage
            .iter()
            .rev()
            .fold(PrefixMap::new(), |map, element| map.extended_with(element))
    }

    /// Copy of this map with `element`'s own `xmlns` declarations applied on top.
    pub fn extended_with(&self, element: &MarkupNode) -> Self {
        let mut map = self.clone();
        for attribute in element.attributes() {
            let name = attribute.name();
            if name == "xmlns" {
                map.bind("", attribute.value());
            } else if let Some(prefix) = name.strip_prefix("xmlns:") {
                map.bind(prefix, attribute.value());
            }
        }
        map
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::Document;
    use std::sync::Arc;

    #[test]
    fn test_inner_declarations_override_outer_ones() {
        let doc = Arc::new(
            Document::parse(
                r#"<a:root xmlns:a="urn:outer" xmlns="urn:default">
                     <a:inner xmlns:a="urn:inner"><leaf/></a:inner>
                   </a:root>"#,
            )
            .unwrap(),
        );
        let root = MarkupNode::document_element(&doc).unwrap();
        let inner = root.child_elements().remove(0);
        let leaf = inner.child_elements().remove(0);

        let root_map = PrefixMap::for_node(&root);
        assert_eq!(root_map.resolve("a"), Some("urn:outer"));

        let leaf_map = PrefixMap::for_node(&leaf);
        assert_eq!(leaf_map.resolve("a"), Some("urn:inner"));
        assert_eq!(leaf_map.resolve(""), Some("urn:default"));
        assert_eq!(leaf_map.resolve("missing"), None);
    }

    #[test]
    fn test_xml_prefix_is_always_bound() {
        assert_eq!(PrefixMap::new().resolve("xml"), Some(XML_NAMESPACE));
    }
}
