// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for element-type resolution and construction.
//!
//! This module contains message types for logging events related to:
//! * Loading a definition document into an element tree
//! * Resolving tags to registered element types, including overlaps
//! * Constructing elements and rejecting missing required attributes
//! * Looking up bundled resources

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A definition document is being turned into an element tree.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use flowwood::observability::messages::registry::LoadingDefinition;
///
/// let msg = LoadingDefinition {
///     root_tag: "bpmn:definitions",
///     registered_types: 16,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct LoadingDefinition<'a> {
    pub root_tag: &'a str,
    pub registered_types: usize,
}

impl Display for LoadingDefinition<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loading process definition <{}> with {} registered element types",
            self.root_tag, self.registered_types
        )
    }
}

impl StructuredLog for LoadingDefinition<'_> {
    fn log(&self) {
        tracing::info!(
            root_tag = self.root_tag,
            registered_types = self.registered_types,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "load_definition",
            span_name = name,
            root_tag = self.root_tag,
            registered_types = self.registered_types,
        )
    }
}

/// Element tree built.
///
/// # Log Level
/// `info!` - Important operational event
pub struct DefinitionLoaded {
    pub element_count: usize,
    pub skipped_count: usize,
}

impl Display for DefinitionLoaded {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Process definition loaded: {} elements constructed, {} unresolved subtrees skipped",
            self.element_count, self.skipped_count
        )
    }
}

impl StructuredLog for DefinitionLoaded {
    fn log(&self) {
        tracing::info!(
            element_count = self.element_count,
            skipped_count = self.skipped_count,
            "{}", self
        );
    }
}

/// A tag resolved to a registered element type.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct TagResolved<'a> {
    pub tag: &'a str,
    pub type_name: &'a str,
}

impl Display for TagResolved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Located type {} for tag <{}>", self.type_name, self.tag)
    }
}

impl StructuredLog for TagResolved<'_> {
    fn log(&self) {
        tracing::debug!(tag = self.tag, type_name = self.type_name, "{}", self);
    }
}

/// No registered element type claims a tag; its subtree is skipped.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct TagUnresolved<'a> {
    pub tag: &'a str,
    pub path: &'a str,
}

impl Display for TagUnresolved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "No element type for tag <{}> at {}", self.tag, self.path)
    }
}

impl StructuredLog for TagUnresolved<'_> {
    fn log(&self) {
        tracing::debug!(tag = self.tag, path = self.path, "{}", self);
    }
}

/// Several element types claim one tag; the first registered wins.
///
/// # Log Level
/// `warn!` - Configuration smell that does not stop loading
///
/// # Example
/// ```
/// use flowwood::observability::messages::registry::AmbiguousTag;
///
/// let msg = AmbiguousTag {
///     tag: "bpmn:task",
///     chosen: "Task",
///     candidates: &["Task", "AuditedTask"],
/// };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct AmbiguousTag<'a> {
    pub tag: &'a str,
    pub chosen: &'a str,
    pub candidates: &'a [&'a str],
}

impl Display for AmbiguousTag<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Tag <{}> is claimed by [{}]; using first registered type {}",
            self.tag,
            self.candidates.join(", "),
            self.chosen
        )
    }
}

impl StructuredLog for AmbiguousTag<'_> {
    fn log(&self) {
        tracing::warn!(
            tag = self.tag,
            chosen = self.chosen,
            candidates = self.candidates.join(", "),
            "{}", self
        );
    }
}

/// An element instance was constructed from markup.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct ElementConstructed<'a> {
    pub tag: &'a str,
    pub type_name: &'a str,
    pub element_id: Option<&'a str>,
}

impl Display for ElementConstructed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Constructed {} from tag <{}> (id={})",
            self.type_name,
            self.tag,
            self.element_id.unwrap_or("-")
        )
    }
}

impl StructuredLog for ElementConstructed<'_> {
    fn log(&self) {
        tracing::debug!(
            tag = self.tag,
            type_name = self.type_name,
            element_id = self.element_id,
            "{}", self
        );
    }
}

/// Construction failed because a required attribute is absent or empty.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct RequiredAttributeMissing<'a> {
    pub attribute: &'a str,
    pub tag: &'a str,
    pub path: &'a str,
}

impl Display for RequiredAttributeMissing<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Required attribute '{}' missing on <{}> at {}",
            self.attribute, self.tag, self.path
        )
    }
}

impl StructuredLog for RequiredAttributeMissing<'_> {
    fn log(&self) {
        tracing::error!(
            attribute = self.attribute,
            tag = self.tag,
            path = self.path,
            "{}", self
        );
    }
}

/// Outcome of an embedded resource lookup.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct ResourceLookup<'a> {
    pub resource: &'a str,
    pub bundle: Option<&'a str>,
}

impl Display for ResourceLookup<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.bundle {
            Some(bundle) => write!(f, "Resource '{}' found in bundle '{}'", self.resource, bundle),
            None => write!(f, "Resource '{}' not found in any bundle", self.resource),
        }
    }
}

impl StructuredLog for ResourceLookup<'_> {
    fn log(&self) {
        tracing::debug!(resource = self.resource, bundle = self.bundle, "{}", self);
    }
}
