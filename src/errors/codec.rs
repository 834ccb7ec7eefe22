// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Malformed-data errors raised by the typed-value codec.

use thiserror::Error;

use crate::codec::VariableKind;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The persisted text does not parse under its declared kind.
    #[error("Malformed literal for kind {kind}: '{text}' ({reason})")]
    MalformedLiteral {
        kind: VariableKind,
        text: String,
        reason: String,
    },

    /// The `type` attribute names no known kind.
    #[error("Unknown variable kind '{0}'")]
    UnknownKind(String),

    /// A variable record has no `type` attribute.
    #[error("Variable record at {path} has no 'type' attribute")]
    MissingKind { path: String },

    /// The kind serializes as a sub-structure and cannot be decoded from bare text.
    #[error("Kind {0} is self-describing and must be decoded from its record")]
    StructuredKind(VariableKind),
}
