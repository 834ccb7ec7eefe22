// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Configuration errors raised while resolving and constructing elements.

use thiserror::Error;

use super::LocatorError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A resolved element is missing a required attribute, or it is empty.
    #[error("Missing required attribute '{attribute}' on <{tag}> at {path}")]
    MissingRequiredAttribute {
        attribute: String,
        tag: String,
        path: String,
    },

    /// No registered element type claims the tag.
    #[error("No element type registered for <{tag}> at {path}")]
    UnresolvedTag { tag: String, path: String },

    /// More than one registered element type claims the tag under the strict policy.
    #[error("Tag <{tag}> at {path} is claimed by multiple element types: {}", candidates.join(", "))]
    AmbiguousTag {
        tag: String,
        path: String,
        candidates: Vec<String>,
    },

    /// The markup handed to the registry was not an element node.
    #[error("Cannot construct an element from a {kind} node")]
    NotAnElement { kind: String },

    /// The structural path of an offending node could not be computed.
    #[error(transparent)]
    Locator(#[from] LocatorError),
}
