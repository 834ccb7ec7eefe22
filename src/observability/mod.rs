// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Message types are centralized here so log text is not scattered through the
//! codebase. Each message is a struct implementing `Display` for the human
//! readable line and [`messages::StructuredLog`] to emit it with structured
//! fields at the level appropriate to the event.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::registry` - tag resolution, element construction, resource lookup
//! * `messages::state` - step activation, variable scopes, fold-back, snapshots
//!
//! # Usage
//!
//! ```rust
//! use flowwood::observability::messages::StructuredLog;
//! use flowwood::observability::messages::state::StepActivated;
//!
//! StepActivated {
//!     element_id: "Task_1",
//!     step_index: 0,
//!     sequence: 3,
//! }
//! .log();
//! ```

pub mod messages;

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global fmt subscriber.
///
/// `RUST_LOG` wins over `default_filter` when set. Calling this again after a
/// subscriber is installed has no effect.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
