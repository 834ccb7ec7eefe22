// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Registration rows for the element registry.
//!
//! An [`ElementDeclaration`] carries everything the registry needs to dispatch
//! a tag without knowing the concrete element type:
//! * the type name used in logs and errors
//! * the tag markers the type claims
//! * the attributes that must be present and non-empty
//! * a plain function pointer that builds the boxed element
//!
//! Declarations are `Copy`, so the registry hands them out by value once a
//! tag resolves.

use super::{Element, ElementKind, TagMarker};
use crate::markup::{MarkupNode, PrefixMap};

/// Uniform construction entry point stored in the registry.
pub type ElementConstructor =
    fn(MarkupNode, PrefixMap, Option<&dyn Element>) -> Box<dyn Element>;

/// One row of the registration table.
///
/// # Example
/// ```
/// use flowwood::elements::SequenceFlow;
/// use flowwood::registry::ElementDeclaration;
///
/// let declaration = ElementDeclaration::of::<SequenceFlow>();
/// assert_eq!(declaration.type_name, "SequenceFlow");
/// assert_eq!(declaration.required_attributes, ["id", "sourceRef", "targetRef"]);
/// ```
#[derive(Clone, Copy)]
pub struct ElementDeclaration {
    pub type_name: &'static str,
    pub tags: &'static [TagMarker],
    pub required_attributes: &'static [&'static str],
    construct: ElementConstructor,
}

impl std::fmt::Debug for ElementDeclaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementDeclaration")
            .field("type_name", &self.type_name)
            .field("tags", &self.tags)
            .field("required_attributes", &self.required_attributes)
            .finish()
    }
}

impl ElementDeclaration {
    pub fn new(
        type_name: &'static str,
        tags: &'static [TagMarker],
        required_attributes: &'static [&'static str],
        construct: ElementConstructor,
    ) -> Self {
        Self {
            type_name,
            tags,
            required_attributes,
            construct,
        }
    }

    /// Declaration built from an [`ElementKind`]'s associated constants.
    pub fn of<T: ElementKind>() -> Self {
        Self::new(T::TYPE_NAME, T::TAGS, T::REQUIRED_ATTRIBUTES, construct_boxed::<T>)
    }

    /// Whether any declared marker matches `prefix:local_name` under `map`.
    pub fn claims(&self, prefix: &str, local_name: &str, map: &PrefixMap) -> bool {
        self.tags
            .iter()
            .any(|tag| tag.matches(prefix, local_name, map))
    }

    pub fn instantiate(
        &self,
        node: MarkupNode,
        prefix_map: PrefixMap,
        parent: Option<&dyn Element>,
    ) -> Box<dyn Element> {
        (self.construct)(node, prefix_map, parent)
    }

    /// First required attribute that is absent or empty on `node`.
    pub fn missing_attribute(&self, node: &MarkupNode) -> Option<&'static str> {
        self.required_attributes
            .iter()
            .copied()
            .find(|name| node.attribute(name).map_or(true, str::is_empty))
    }
}

fn construct_boxed<T: ElementKind>(
    node: MarkupNode,
    prefix_map: PrefixMap,
    parent: Option<&dyn Element>,
) -> Box<dyn Element> {
    Box::new(T::construct(node, prefix_map, parent))
}
