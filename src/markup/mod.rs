// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Markup documents: the tree model the registry, locator and state persistence share.

mod document;
pub mod locator;
mod prefix_map;
mod reader;
mod writer;

pub use document::{split_qualified_name, Document, MarkupNode, NodeId, NodeKind};
pub use locator::{describe, structural_path};
pub use prefix_map::{PrefixMap, XML_NAMESPACE};
