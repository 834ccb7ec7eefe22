// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Execution state of one process instance.
//!
//! * [`ProcessPath`] records every element activation in order and hands out
//!   per-element step indices.
//! * [`ProcessState`] is the durable snapshot: the path plus every variable
//!   entry recorded for every element.
//! * [`VariableScope`] is the ephemeral per-activation view over the snapshot
//!   that element behavior reads and writes through.
//!
//! Variables resolve local entries first, then the owning process's
//! process-level store, then an optional ambient [`ProcessContext`]. Writes
//! stay inside the scope until they are folded back into the snapshot.

mod context;
mod path;
mod process_state;
mod scope;
mod snapshot;

#[cfg(test)]
mod integration_tests;

pub use context::{ProcessContext, ProcessVariables};
pub use path::{PathEntry, ProcessPath, StepStatus};
pub use process_state::{ProcessState, VariableEntry};
pub use scope::VariableScope;

/// Per-element activation counter. The first activation of an element is step 0.
pub type StepIndex = u32;
