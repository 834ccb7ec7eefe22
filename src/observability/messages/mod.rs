// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! * `registry` - element-type dispatch and resource lookup events
//! * `state` - path tracking, variable scope and snapshot events

use tracing::Span;

pub mod registry;
pub mod state;

/// A log message that knows its own level and structured fields.
pub trait StructuredLog {
    /// Emit the message as a single event.
    fn log(&self);

    /// A span carrying the message's fields, for messages that open a unit of work.
    fn span(&self, _name: &str) -> Span {
        Span::none()
    }
}
