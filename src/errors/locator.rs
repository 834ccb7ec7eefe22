// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors produced when computing the structural path of a markup node.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocatorError {
    /// Only elements and attributes have a structural path.
    #[error("Unsupported node kind '{kind}': only elements and attributes are supported")]
    UnsupportedNodeKind { kind: String },

    /// Walking the parents never reached a document root.
    #[error("Node '{name}' is not attached to a document")]
    DetachedNode { name: String },

    /// The element is not listed among its parent's children.
    #[error("Element '{name}' could not be found within its parent")]
    NotFoundInParent { name: String },
}
