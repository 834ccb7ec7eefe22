// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use super::{ValueSink, VariableKind};
use crate::errors::CodecError;
use crate::markup::MarkupNode;

const FILE_TAG: &str = "File";

/// A file carried as a process variable.
///
/// File attachments bypass the generic text codec: the record is tagged
/// `type="File"` and carries a `<File>` child holding name, extension and
/// content type as attributes and the content as base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttachment {
    pub name: String,
    pub extension: String,
    pub content_type: String,
    #[serde(with = "base64_content")]
    pub content: Vec<u8>,
}

impl FileAttachment {
    pub fn new(
        name: impl Into<String>,
        extension: impl Into<String>,
        content_type: impl Into<String>,
        content: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            extension: extension.into(),
            content_type: content_type.into(),
            content,
        }
    }

    /// `name.extension`, or just the name when there is no extension.
    pub fn file_name(&self) -> String {
        if self.extension.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.name, self.extension)
        }
    }

    /// Write this attachment's self-describing record.
    pub fn append<S: ValueSink + ?Sized>(&self, sink: &mut S) {
        sink.attribute("type", VariableKind::File.as_str());
        sink.start_child(FILE_TAG);
        sink.attribute("name", &self.name);
        sink.attribute("extension", &self.extension);
        sink.attribute("contentType", &self.content_type);
        sink.cdata(&STANDARD.encode(&self.content));
        sink.end_child();
    }

    /// Read an attachment back from the record written by [`FileAttachment::append`].
    pub fn from_record(record: &MarkupNode) -> Result<Self, CodecError> {
        let node = record
            .child_elements()
            .into_iter()
            .find(|child| child.name() == FILE_TAG)
            .ok_or_else(|| CodecError::MalformedLiteral {
                kind: VariableKind::File,
                text: record.text(),
                reason: format!("missing <{}> element", FILE_TAG),
            })?;
        let name = node.attribute("name").ok_or_else(|| CodecError::MalformedLiteral {
            kind: VariableKind::File,
            text: String::new(),
            reason: "missing 'name' attribute".to_string(),
        })?;
        let text = node.text();
        let content = STANDARD
            .decode(text.trim())
            .map_err(|e| CodecError::MalformedLiteral {
                kind: VariableKind::File,
                text: text.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            name: name.to_string(),
            extension: node.attribute("extension").unwrap_or_default().to_string(),
            content_type: node.attribute("contentType").unwrap_or_default().to_string(),
            content,
        })
    }
}

mod base64_content {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(content: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(content))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD.decode(text).map_err(serde::de::Error::custom)
    }
}
