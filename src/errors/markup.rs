// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while reading or writing markup documents.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarkupError {
    /// The markup text could not be parsed.
    #[error("Malformed markup at byte {position}: {reason}")]
    Malformed { position: usize, reason: String },

    /// An end tag did not match the element it closes.
    #[error("Mismatched end tag at byte {position}: expected </{expected}>, found </{found}>")]
    MismatchedEndTag {
        position: usize,
        expected: String,
        found: String,
    },

    /// The document has no root element.
    #[error("Document has no root element")]
    MissingRoot,

    /// Rendering the document to text failed.
    #[error("Failed to write markup: {0}")]
    Write(String),
}

impl From<quick_xml::Error> for MarkupError {
    fn from(err: quick_xml::Error) -> Self {
        MarkupError::Write(err.to_string())
    }
}
