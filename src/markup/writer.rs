// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Renders a [`Document`] back to markup text with the `quick-xml` writer.

use std::io::Cursor;

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::document::{Document, NodeId, NodeKind};
use crate::errors::MarkupError;

type MarkupWriter = Writer<Cursor<Vec<u8>>>;

impl Document {
    /// Render the document as indented markup with an XML declaration.
    pub fn to_markup_string(&self) -> Result<String, MarkupError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        for child in self.children(self.root()) {
            self.write_node(&mut writer, *child)?;
        }
        let bytes = writer.into_inner().into_inner();
        String::from_utf8(bytes).map_err(|e| MarkupError::Write(e.to_string()))
    }

    fn write_node(&self, writer: &mut MarkupWriter, id: NodeId) -> Result<(), MarkupError> {
        match self.kind(id) {
            NodeKind::Element => {
                let mut start = BytesStart::new(self.name(id));
                for attribute in self.attributes(id) {
                    start.push_attribute((self.name(*attribute), self.value(*attribute)));
                }
                if self.children(id).is_empty() {
                    return write(writer, Event::Empty(start));
                }
                write(writer, Event::Start(start))?;
                for child in self.children(id) {
                    self.write_node(writer, *child)?;
                }
                write(writer, Event::End(BytesEnd::new(self.name(id))))
            }
            NodeKind::Text => write(writer, Event::Text(BytesText::new(self.value(id)))),
            NodeKind::CData => {
                // A CDATA section cannot contain its own terminator, so split around it.
                let text = self.value(id);
                let mut rest = text;
                while let Some(at) = rest.find("]]>") {
                    write(writer, Event::CData(BytesCData::new(&rest[..at + 2])))?;
                    rest = &rest[at + 2..];
                }
                write(writer, Event::CData(BytesCData::new(rest)))
            }
            NodeKind::Comment => write(writer, Event::Comment(BytesText::new(self.value(id)))),
            NodeKind::Document | NodeKind::Attribute => Ok(()),
        }
    }
}

fn write(writer: &mut MarkupWriter, event: Event<'_>) -> Result<(), MarkupError> {
    writer
        .write_event(event)
        .map_err(|e| MarkupError::Write(e.to_string()))
}
