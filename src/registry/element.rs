// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::any::Any;
use std::fmt::Debug;

use super::TagMarker;
use crate::markup::{describe, MarkupNode, PrefixMap};

/// A constructed process-definition element bound to its markup.
pub trait Element: Debug + Send + Sync {
    fn base(&self) -> &ElementBase;

    fn type_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn id(&self) -> Option<&str> {
        self.base().attribute("id")
    }

    fn name(&self) -> Option<&str> {
        self.base().attribute("name")
    }
}

impl dyn Element + '_ {
    /// Borrow this element as its concrete type.
    pub fn downcast_ref<T: Element + 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// Static declaration of an element type: the tags it answers to, the
/// attributes it requires, and how to build it.
///
/// Every resolvable element is built from exactly the markup node, the prefix
/// map in scope at that node, and its parent element (absent for a root).
pub trait ElementKind: Element + Sized + 'static {
    const TYPE_NAME: &'static str;
    const TAGS: &'static [TagMarker];
    const REQUIRED_ATTRIBUTES: &'static [&'static str];

    fn construct(node: MarkupNode, prefix_map: PrefixMap, parent: Option<&dyn Element>) -> Self;
}

/// What an element remembers about its parent in the element tree.
#[derive(Debug, Clone)]
pub struct ParentLink {
    pub type_name: &'static str,
    pub id: Option<String>,
    pub node: MarkupNode,
}

/// State shared by every element implementation.
#[derive(Debug, Clone)]
pub struct ElementBase {
    node: MarkupNode,
    prefix_map: PrefixMap,
    parent: Option<ParentLink>,
}

impl ElementBase {
    pub fn new(node: MarkupNode, prefix_map: PrefixMap, parent: Option<&dyn Element>) -> Self {
        let parent = parent.map(|p| ParentLink {
            type_name: p.type_name(),
            id: p.id().map(str::to_string),
            node: p.base().node().clone(),
        });
        Self {
            node,
            prefix_map,
            parent,
        }
    }

    pub fn node(&self) -> &MarkupNode {
        &self.node
    }

    pub fn prefix_map(&self) -> &PrefixMap {
        &self.prefix_map
    }

    pub fn parent(&self) -> Option<&ParentLink> {
        self.parent.as_ref()
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.node.attribute(name)
    }

    /// Structural path of the backing markup, for diagnostics.
    pub fn path(&self) -> String {
        describe(&self.node)
    }
}
