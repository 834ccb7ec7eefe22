// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Persisted variable records.
//!
//! A record is one markup element whose `type` attribute names the
//! [`VariableKind`] and whose payload carries the encoded value, either as a
//! `value` attribute or as escaped text / CDATA content:
//!
//! ```text
//! <Variable name="total" type="Decimal"><![CDATA[12.50]]></Variable>
//! <Variable name="nothing" type="Null"/>
//! <Variable name="scan" type="File">
//!   <File name="scan" extension="png" contentType="image/png"><![CDATA[iVBOR...]]></File>
//! </Variable>
//! ```

use super::{literal, FileAttachment, TypedValue, VariableKind};
use crate::errors::CodecError;
use crate::markup::{describe, Document, MarkupNode, NodeId};

/// Destination for an encoded value.
///
/// Writes land on the record element until [`ValueSink::start_child`] opens a
/// nested element; [`ValueSink::end_child`] returns to the enclosing one.
pub trait ValueSink {
    fn attribute(&mut self, name: &str, value: &str);
    fn cdata(&mut self, text: &str);
    fn start_child(&mut self, name: &str);
    fn end_child(&mut self);
}

/// Writes an encoded value onto an element of a [`Document`].
pub struct ElementSink<'a> {
    document: &'a mut Document,
    open: Vec<NodeId>,
}

impl<'a> ElementSink<'a> {
    pub fn new(document: &'a mut Document, element: NodeId) -> Self {
        Self {
            document,
            open: vec![element],
        }
    }

    fn current(&self) -> NodeId {
        // `open` never drops below the record element.
        self.open[self.open.len() - 1]
    }
}

impl ValueSink for ElementSink<'_> {
    fn attribute(&mut self, name: &str, value: &str) {
        let element = self.current();
        self.document.set_attribute(element, name, value);
    }

    fn cdata(&mut self, text: &str) {
        let element = self.current();
        self.document.append_cdata(element, text);
    }

    fn start_child(&mut self, name: &str) {
        let child = self.document.append_element(self.current(), name);
        self.open.push(child);
    }

    fn end_child(&mut self) {
        if self.open.len() > 1 {
            self.open.pop();
        }
    }
}

/// Encode `value` into `sink`. Absent values write only the null kind tag.
pub fn encode<S: ValueSink + ?Sized>(value: Option<&TypedValue>, sink: &mut S) {
    match value {
        None => sink.attribute("type", VariableKind::Null.as_str()),
        Some(TypedValue::File(file)) => file.append(sink),
        Some(other) => {
            sink.attribute("type", other.kind().as_str());
            if let Some(text) = literal::render(other) {
                sink.cdata(&text);
            }
        }
    }
}

/// Decode the value held by a record element.
pub fn decode_record(node: &MarkupNode) -> Result<Option<TypedValue>, CodecError> {
    let kind: VariableKind = node
        .attribute("type")
        .ok_or_else(|| CodecError::MissingKind {
            path: describe(node),
        })?
        .parse()?;

    if kind == VariableKind::File {
        return FileAttachment::from_record(node).map(|file| Some(TypedValue::File(file)));
    }

    match node.attribute("value") {
        Some(text) => literal::decode(kind, text),
        None => literal::decode(kind, &node.text()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn encode_into_record(value: Option<&TypedValue>) -> MarkupNode {
        let mut doc = Document::new();
        let element = doc.append_element(doc.root(), "Variable");
        encode(value, &mut ElementSink::new(&mut doc, element));
        // Go through text so the test covers the persisted form.
        let text = doc.to_markup_string().unwrap();
        let doc = Arc::new(Document::parse(&text).unwrap());
        MarkupNode::document_element(&doc).unwrap()
    }

    #[test]
    fn test_records_round_trip_through_markup() {
        let values = vec![
            TypedValue::Integer(-7),
            TypedValue::String("line one\nline two ]]> end".to_string()),
            TypedValue::Bytes(b"\x00binary\xff".to_vec()),
            TypedValue::File(FileAttachment::new(
                "scan",
                "png",
                "image/png",
                vec![137, 80, 78, 71],
            )),
        ];

        for value in values {
            let record = encode_into_record(Some(&value));
            assert_eq!(record.attribute("type"), Some(value.kind().as_str()));
            assert_eq!(decode_record(&record).unwrap(), Some(value));
        }
    }

    #[test]
    fn test_absent_value_writes_only_null_tag() {
        let record = encode_into_record(None);

        assert_eq!(record.attribute("type"), Some("Null"));
        assert!(record.text().is_empty());
        assert_eq!(decode_record(&record).unwrap(), None);
    }

    #[test]
    fn test_value_attribute_payload_is_accepted() {
        let doc = Arc::new(Document::parse(r#"<Variable type="Long" value="9000000000"/>"#).unwrap());
        let record = MarkupNode::document_element(&doc).unwrap();

        assert_eq!(decode_record(&record).unwrap(), Some(TypedValue::Long(9_000_000_000)));
    }

    #[test]
    fn test_plain_text_payload_keeps_its_whitespace() {
        let doc = Arc::new(
            Document::parse(
                "<root>\n  <Variable type=\"String\">  padded  </Variable>\n  <Variable type=\"Char\"> </Variable>\n  <Variable type=\"String\">a &amp; b</Variable>\n</root>",
            )
            .unwrap(),
        );
        let records = MarkupNode::document_element(&doc).unwrap().child_elements();

        assert_eq!(
            decode_record(&records[0]).unwrap(),
            Some(TypedValue::String("  padded  ".to_string()))
        );
        assert_eq!(decode_record(&records[1]).unwrap(), Some(TypedValue::Char(' ')));
        assert_eq!(
            decode_record(&records[2]).unwrap(),
            Some(TypedValue::String("a & b".to_string()))
        );
    }

    #[test]
    fn test_record_errors_name_the_problem() {
        let doc = Arc::new(Document::parse(r#"<root><Variable name="x"/><Variable type="Integer">abc</Variable></root>"#).unwrap());
        let root = MarkupNode::document_element(&doc).unwrap();
        let records = root.child_elements();

        match decode_record(&records[0]).unwrap_err() {
            CodecError::MissingKind { path } => assert_eq!(path, "/root[1]/Variable[1]"),
            other => panic!("unexpected error {:?}", other),
        }
        assert!(matches!(
            decode_record(&records[1]).unwrap_err(),
            CodecError::MalformedLiteral { kind: VariableKind::Integer, .. }
        ));
    }
}
