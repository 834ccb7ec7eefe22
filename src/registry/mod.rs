// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Element-type registry.
//!
//! Maps qualified markup tags to element types. Each element type declares the
//! `(namespace, local name)` markers it implements and the attributes it
//! requires; the registry resolves a tag through the prefix map in scope at the
//! node, constructs the element, and reports configuration errors with the
//! node's structural path.

mod declaration;
mod element;
mod element_registry;
pub mod resources;
mod tag;
mod tree;

pub use declaration::{ElementConstructor, ElementDeclaration};
pub use element::{Element, ElementBase, ElementKind, ParentLink};
pub use element_registry::{ElementRegistry, ResolutionPolicy};
pub use resources::{DirectoryResources, ResourceBundle, StaticResources};
pub use tag::TagMarker;
pub use tree::{ElementKey, ElementTree};
