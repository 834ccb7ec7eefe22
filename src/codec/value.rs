// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{literal, FileAttachment, VariableKind};
use crate::errors::CodecError;

/// A process variable value.
///
/// One variant per non-null [`VariableKind`]; the null kind is modelled as
/// `Option::<TypedValue>::None` wherever a value may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PersistedValue", into = "PersistedValue")]
pub enum TypedValue {
    Boolean(bool),
    Bytes(Vec<u8>),
    Char(char),
    DateTime(DateTime<Utc>),
    Decimal(Decimal),
    Double(f64),
    Float(f32),
    Integer(i32),
    Long(i64),
    Short(i16),
    String(String),
    File(FileAttachment),
}

impl TypedValue {
    pub fn kind(&self) -> VariableKind {
        match self {
            TypedValue::Boolean(_) => VariableKind::Boolean,
            TypedValue::Bytes(_) => VariableKind::Byte,
            TypedValue::Char(_) => VariableKind::Char,
            TypedValue::DateTime(_) => VariableKind::DateTime,
            TypedValue::Decimal(_) => VariableKind::Decimal,
            TypedValue::Double(_) => VariableKind::Double,
            TypedValue::Float(_) => VariableKind::Float,
            TypedValue::Integer(_) => VariableKind::Integer,
            TypedValue::Long(_) => VariableKind::Long,
            TypedValue::Short(_) => VariableKind::Short,
            TypedValue::String(_) => VariableKind::String,
            TypedValue::File(_) => VariableKind::File,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Widen any integer kind to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            TypedValue::Short(v) => Some(i64::from(*v)),
            TypedValue::Integer(v) => Some(i64::from(*v)),
            TypedValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<bool> for TypedValue {
    fn from(value: bool) -> Self {
        TypedValue::Boolean(value)
    }
}

impl From<Vec<u8>> for TypedValue {
    fn from(value: Vec<u8>) -> Self {
        TypedValue::Bytes(value)
    }
}

impl From<char> for TypedValue {
    fn from(value: char) -> Self {
        TypedValue::Char(value)
    }
}

impl From<DateTime<Utc>> for TypedValue {
    fn from(value: DateTime<Utc>) -> Self {
        TypedValue::DateTime(value)
    }
}

impl From<Decimal> for TypedValue {
    fn from(value: Decimal) -> Self {
        TypedValue::Decimal(value)
    }
}

impl From<f64> for TypedValue {
    fn from(value: f64) -> Self {
        TypedValue::Double(value)
    }
}

impl From<f32> for TypedValue {
    fn from(value: f32) -> Self {
        TypedValue::Float(value)
    }
}

impl From<i32> for TypedValue {
    fn from(value: i32) -> Self {
        TypedValue::Integer(value)
    }
}

impl From<i64> for TypedValue {
    fn from(value: i64) -> Self {
        TypedValue::Long(value)
    }
}

impl From<i16> for TypedValue {
    fn from(value: i16) -> Self {
        TypedValue::Short(value)
    }
}

impl From<String> for TypedValue {
    fn from(value: String) -> Self {
        TypedValue::String(value)
    }
}

impl From<&str> for TypedValue {
    fn from(value: &str) -> Self {
        TypedValue::String(value.to_string())
    }
}

impl From<FileAttachment> for TypedValue {
    fn from(value: FileAttachment) -> Self {
        TypedValue::File(value)
    }
}

/// Serde form of a value: the same kind names and text grammar as the markup
/// record, so JSON snapshots and markup snapshots cannot drift apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedValue {
    kind: VariableKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file: Option<FileAttachment>,
}

impl From<TypedValue> for PersistedValue {
    fn from(value: TypedValue) -> Self {
        let kind = value.kind();
        match value {
            TypedValue::File(file) => PersistedValue {
                kind,
                content: None,
                file: Some(file),
            },
            other => PersistedValue {
                kind,
                content: literal::render(&other),
                file: None,
            },
        }
    }
}

impl TryFrom<PersistedValue> for TypedValue {
    type Error = CodecError;

    fn try_from(persisted: PersistedValue) -> Result<Self, Self::Error> {
        if let Some(file) = persisted.file {
            return Ok(TypedValue::File(file));
        }
        let text = persisted.content.unwrap_or_default();
        literal::decode(persisted.kind, &text)?.ok_or_else(|| CodecError::MalformedLiteral {
            kind: persisted.kind,
            text,
            reason: "null is represented by an absent value".to_string(),
        })
    }
}

/// Serde `deserialize_with` for optional values: a JSON `null` and a
/// `{"kind":"Null"}` value both read as absent.
pub(crate) fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<TypedValue>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<PersistedValue>::deserialize(deserializer)? {
        None => Ok(None),
        Some(persisted) if persisted.kind == VariableKind::Null => Ok(None),
        Some(persisted) => TypedValue::try_from(persisted)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
