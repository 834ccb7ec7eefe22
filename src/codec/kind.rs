// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::errors::CodecError;

/// The closed set of persisted variable kinds.
///
/// The variant names are the values written to a variable record's `type`
/// attribute, so they must not be renamed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariableKind {
    Null,
    Boolean,
    /// Binary blob, persisted as base64.
    Byte,
    Char,
    DateTime,
    Decimal,
    Double,
    Float,
    Integer,
    Long,
    Short,
    String,
    /// Self-describing file attachment.
    File,
}

impl VariableKind {
    pub const ALL: [VariableKind; 13] = [
        VariableKind::Null,
        VariableKind::Boolean,
        VariableKind::Byte,
        VariableKind::Char,
        VariableKind::DateTime,
        VariableKind::Decimal,
        VariableKind::Double,
        VariableKind::Float,
        VariableKind::Integer,
        VariableKind::Long,
        VariableKind::Short,
        VariableKind::String,
        VariableKind::File,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VariableKind::Null => "Null",
            VariableKind::Boolean => "Boolean",
            VariableKind::Byte => "Byte",
            VariableKind::Char => "Char",
            VariableKind::DateTime => "DateTime",
            VariableKind::Decimal => "Decimal",
            VariableKind::Double => "Double",
            VariableKind::Float => "Float",
            VariableKind::Integer => "Integer",
            VariableKind::Long => "Long",
            VariableKind::Short => "Short",
            VariableKind::String => "String",
            VariableKind::File => "File",
        }
    }
}

impl Display for VariableKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariableKind {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VariableKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CodecError::UnknownKind(s.to_string()))
    }
}
