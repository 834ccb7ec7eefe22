// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for step tracking, variable scopes and snapshots.
//!
//! This module contains message types for logging events related to:
//! * Element activations and the status each step finishes with
//! * Building a variable scope from the recorded entries
//! * Folding an activation's writes back into the process state
//! * Restoring a persisted snapshot
//!
//! Activation and fold-back events log at `debug!`; per-entry seeding is
//! `trace!` because a long-running instance seeds many entries per scope.

use crate::observability::messages::StructuredLog;
use crate::state::StepIndex;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// An element activated and received a step index.
///
/// # Log Level
/// `debug!` - Diagnostic detail
///
/// # Example
/// ```
/// use flowwood::observability::messages::state::StepActivated;
/// use flowwood::observability::messages::StructuredLog;
///
/// let msg = StepActivated {
///     element_id: "Task_Validate",
///     step_index: 1,
///     sequence: 4,
/// };
///
/// let span = msg.span("activation");
/// let _guard = span.enter();
/// msg.log();
/// ```
pub struct StepActivated<'a> {
    pub element_id: &'a str,
    pub step_index: StepIndex,
    pub sequence: usize,
}

impl Display for StepActivated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Element[{}] activated at step {} (path position {})",
            self.element_id, self.step_index, self.sequence
        )
    }
}

impl StructuredLog for StepActivated<'_> {
    fn log(&self) {
        tracing::debug!(
            element_id = self.element_id,
            step_index = self.step_index,
            sequence = self.sequence,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "activation",
            span_name = name,
            element_id = self.element_id,
            step_index = self.step_index,
        )
    }
}

/// An activation finished with a status.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct StepFinished<'a> {
    pub element_id: &'a str,
    pub step_index: StepIndex,
    pub status: &'a str,
}

impl Display for StepFinished<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Element[{}] step {} finished as {}",
            self.element_id, self.step_index, self.status
        )
    }
}

impl StructuredLog for StepFinished<'_> {
    fn log(&self) {
        tracing::debug!(
            element_id = self.element_id,
            step_index = self.step_index,
            status = self.status,
            "{}", self
        );
    }
}

/// A variable scope was produced for an activation.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct ScopeCreated<'a> {
    pub element_id: &'a str,
    pub step_index: StepIndex,
    pub seeded_entries: usize,
}

impl Display for ScopeCreated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Producing variable scope for element[{}] at step {} with {} entries",
            self.element_id, self.step_index, self.seeded_entries
        )
    }
}

impl StructuredLog for ScopeCreated<'_> {
    fn log(&self) {
        tracing::debug!(
            element_id = self.element_id,
            step_index = self.step_index,
            seeded_entries = self.seeded_entries,
            "{}", self
        );
    }
}

/// One entry copied into a new scope.
///
/// # Log Level
/// `trace!` - Fine-grained detail
pub struct ScopeEntrySeeded<'a> {
    pub element_id: &'a str,
    pub name: &'a str,
    pub entry_step: StepIndex,
}

impl Display for ScopeEntrySeeded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Adding variable {} (step {}) to scope for element[{}]",
            self.name, self.entry_step, self.element_id
        )
    }
}

impl StructuredLog for ScopeEntrySeeded<'_> {
    fn log(&self) {
        tracing::trace!(
            element_id = self.element_id,
            name = self.name,
            entry_step = self.entry_step,
            "{}", self
        );
    }
}

/// A scope's writes were folded back into the snapshot.
///
/// # Log Level
/// `debug!` - Diagnostic detail
///
/// # Example
/// ```
/// use flowwood::observability::messages::state::FoldBackCompleted;
///
/// let msg = FoldBackCompleted {
///     element_id: "Gateway_Join",
///     step_index: 0,
///     written: 3,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct FoldBackCompleted<'a> {
    pub element_id: &'a str,
    pub step_index: StepIndex,
    pub written: usize,
}

impl Display for FoldBackCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Folded {} variable writes of element[{}] step {} into process state",
            self.written, self.element_id, self.step_index
        )
    }
}

impl StructuredLog for FoldBackCompleted<'_> {
    fn log(&self) {
        tracing::debug!(
            element_id = self.element_id,
            step_index = self.step_index,
            written = self.written,
            "{}", self
        );
    }
}

/// A snapshot was restored from its persisted form.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use flowwood::observability::messages::state::SnapshotRestored;
///
/// let msg = SnapshotRestored {
///     format: "json",
///     path_entries: 12,
///     variable_entries: 30,
/// };
///
/// assert_eq!(
///     msg.to_string(),
///     "Restored process state from json: 12 path entries, 30 variable entries"
/// );
/// ```
pub struct SnapshotRestored<'a> {
    pub format: &'a str,
    pub path_entries: usize,
    pub variable_entries: usize,
}

impl Display for SnapshotRestored<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Restored process state from {}: {} path entries, {} variable entries",
            self.format, self.path_entries, self.variable_entries
        )
    }
}

impl StructuredLog for SnapshotRestored<'_> {
    fn log(&self) {
        tracing::info!(
            format = self.format,
            path_entries = self.path_entries,
            variable_entries = self.variable_entries,
            "{}", self
        );
    }
}
