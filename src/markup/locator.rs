// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structural paths for diagnostics.
//!
//! A structural path names a node by walking from the document root:
//! `/definitions[1]/process[1]/task[3]/@id`. Each element segment carries the
//! 1-based ordinal of the element among same-named siblings under its parent.

use super::document::{MarkupNode, NodeKind};
use crate::errors::LocatorError;

/// Compute the `/tag[ordinal]/.../@attr` path from the document root to `node`.
pub fn structural_path(node: &MarkupNode) -> Result<String, LocatorError> {
    if !matches!(node.kind(), NodeKind::Element | NodeKind::Attribute) {
        return Err(LocatorError::UnsupportedNodeKind {
            kind: node.kind().to_string(),
        });
    }

    let mut segments: Vec<String> = Vec::new();
    let mut current = Some(node.clone());

    while let Some(n) = current {
        match n.kind() {
            NodeKind::Attribute => {
                segments.push(format!("/@{}", n.name()));
                current = n.parent();
            }
            NodeKind::Element => {
                let ordinal = element_ordinal(&n)?;
                segments.push(format!("/{}[{}]", n.name(), ordinal));
                current = n.parent();
            }
            NodeKind::Document => {
                segments.reverse();
                return Ok(segments.concat());
            }
            other => {
                return Err(LocatorError::UnsupportedNodeKind {
                    kind: other.to_string(),
                });
            }
        }
    }

    Err(LocatorError::DetachedNode {
        name: node.name().to_string(),
    })
}

/// 1-based position of `element` among same-named element siblings.
///
/// Detached elements have no siblings and report ordinal 1; the caller then
/// notices the missing document root.
pub fn element_ordinal(element: &MarkupNode) -> Result<usize, LocatorError> {
    let parent = match element.parent() {
        Some(parent) if parent.kind() == NodeKind::Element => parent,
        _ => return Ok(1),
    };

    parent
        .child_elements()
        .iter()
        .filter(|candidate| candidate.name() == element.name())
        .position(|candidate| candidate == element)
        .map(|index| index + 1)
        .ok_or_else(|| LocatorError::NotFoundInParent {
            name: element.name().to_string(),
        })
}

/// Like [`structural_path`], but falls back to the bare node name when no path
/// can be computed. Used when building error messages that must not fail.
pub fn describe(node: &MarkupNode) -> String {
    structural_path(node).unwrap_or_else(|_| node.name().to_string())
}
