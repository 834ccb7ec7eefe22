// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Builds a [`Document`] from markup text with the `quick-xml` event reader.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::document::{Document, NodeId};
use crate::errors::MarkupError;

impl Document {
    /// Parse markup text into a document.
    ///
    /// Text content is kept exactly as written. A whitespace-only run survives
    /// only when it is the whole content of its element, so `<v> </v>` holds a
    /// single space while indentation between elements is dropped. CDATA
    /// sections are kept verbatim. Declarations, processing instructions and
    /// doctypes are skipped.
    pub fn parse(text: &str) -> Result<Document, MarkupError> {
        let mut reader = Reader::from_str(text);
        reader.trim_text(false);

        let mut doc = Document::new();
        let mut open: Vec<NodeId> = vec![doc.root()];
        // Whitespace-only text waiting to learn whether it is the element's only content.
        let mut blank: Option<(NodeId, String)> = None;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| malformed(reader.buffer_position(), e))?;
            let position = reader.buffer_position();
            let parent = *open.last().ok_or(MarkupError::Malformed {
                position,
                reason: "unbalanced element nesting".to_string(),
            })?;

            if !matches!(event, Event::End(_)) {
                blank = None;
            }

            match event {
                Event::Start(start) => {
                    let id = open_element(&mut doc, parent, &start, position)?;
                    open.push(id);
                }
                Event::Empty(start) => {
                    open_element(&mut doc, parent, &start, position)?;
                }
                Event::End(end) => {
                    let found = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                    if open.len() < 2 {
                        return Err(MarkupError::Malformed {
                            position,
                            reason: format!("unexpected end tag </{}>", found),
                        });
                    }
                    let closing = open.pop().unwrap_or(parent);
                    if doc.name(closing) != found {
                        return Err(MarkupError::MismatchedEndTag {
                            position,
                            expected: doc.name(closing).to_string(),
                            found,
                        });
                    }
                    if let Some((owner, text)) = blank.take() {
                        if owner == closing && doc.children(closing).is_empty() {
                            doc.append_text(closing, text);
                        }
                    }
                }
                Event::Text(text) => {
                    let text = text.unescape().map_err(|e| malformed(position, e))?;
                    if text.trim().is_empty() {
                        if !text.is_empty() {
                            blank = Some((parent, text.into_owned()));
                        }
                    } else {
                        doc.append_text(parent, text.into_owned());
                    }
                }
                Event::CData(cdata) => {
                    let text = String::from_utf8_lossy(&cdata.into_inner()).into_owned();
                    doc.append_cdata(parent, text);
                }
                Event::Comment(comment) => {
                    let text = String::from_utf8_lossy(&comment).into_owned();
                    doc.append_comment(parent, text);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if open.len() != 1 {
            return Err(MarkupError::Malformed {
                position: reader.buffer_position(),
                reason: format!("unclosed element <{}>", doc.name(open[open.len() - 1])),
            });
        }
        if doc.document_element().is_none() {
            return Err(MarkupError::MissingRoot);
        }
        Ok(doc)
    }
}

fn open_element(
    doc: &mut Document,
    parent: NodeId,
    start: &BytesStart<'_>,
    position: usize,
) -> Result<NodeId, MarkupError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let id = doc.append_element(parent, name);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| malformed(position, e))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|e| malformed(position, e))?
            .into_owned();
        doc.set_attribute(id, key, value);
    }
    Ok(id)
}

fn malformed(position: usize, err: impl std::fmt::Display) -> MarkupError {
    MarkupError::Malformed {
        position,
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::NodeKind;

    #[test]
    fn test_parse_builds_elements_attributes_and_text() {
        let doc = Document::parse(
            r#"<?xml version="1.0"?>
            <a xmlns="http://x"><b id="1">hello &amp; bye</b><b/><!-- note --></a>"#,
        )
        .unwrap();

        let a = doc.document_element().unwrap();
        assert_eq!(doc.name(a), "a");
        assert_eq!(doc.attribute(a, "xmlns"), Some("http://x"));

        let bs: Vec<_> = doc.child_elements(a).collect();
        assert_eq!(bs.len(), 2);
        assert_eq!(doc.attribute(bs[0], "id"), Some("1"));
        assert_eq!(doc.text(bs[0]), "hello & bye");
        assert!(doc
            .children(a)
            .iter()
            .any(|c| doc.kind(*c) == NodeKind::Comment));
    }

    #[test]
    fn test_parse_keeps_cdata_verbatim() {
        let doc = Document::parse("<v><![CDATA[  <raw> & spaced  ]]></v>").unwrap();
        let v = doc.document_element().unwrap();
        assert_eq!(doc.text(v), "  <raw> & spaced  ");
    }

    #[test]
    fn test_parse_keeps_significant_whitespace() {
        let doc = Document::parse(
            "<root>\n  <v>  padded  </v>\n  <c> </c>\n  <mixed>\n    <inner/>\n  </mixed>\n</root>",
        )
        .unwrap();
        let root = doc.document_element().unwrap();
        let children: Vec<_> = doc.child_elements(root).collect();

        assert_eq!(doc.children(root).len(), 3);
        assert_eq!(doc.text(children[0]), "  padded  ");
        assert_eq!(doc.text(children[1]), " ");
        assert_eq!(doc.children(children[2]).len(), 1);
        assert_eq!(doc.text(children[2]), "");
    }

    #[test]
    fn test_parse_rejects_broken_markup() {
        let cases = vec![
            ("unclosed", "<a><b></b>"),
            ("mismatched", "<a></b>"),
            ("empty", ""),
            ("bad attribute", "<a id=1/>"),
        ];

        for (name, text) in cases {
            assert!(
                Document::parse(text).is_err(),
                "case '{}' should fail to parse",
                name
            );
        }
    }
}
