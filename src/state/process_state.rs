// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use super::{ProcessContext, ProcessPath, StepIndex, StepStatus, VariableScope};
use crate::codec::TypedValue;
use crate::errors::StateError;
use crate::observability::messages::state::{FoldBackCompleted, StepActivated, StepFinished};
use crate::observability::messages::StructuredLog;

/// A variable value written by one step of one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableEntry {
    pub name: String,
    pub step_index: StepIndex,
    #[serde(default, deserialize_with = "crate::codec::deserialize_optional")]
    pub value: Option<TypedValue>,
}

/// Durable state of one process instance: the activation path plus every
/// variable entry recorded per element.
///
/// Branches of one instance share a `ProcessState`. Appends to an element's
/// entry list hold that element's shard lock, so two branches folding back
/// into the same element never interleave.
#[derive(Debug, Default)]
pub struct ProcessState {
    path: RwLock<ProcessPath>,
    variables: DashMap<String, Vec<VariableEntry>>,
}

impl ProcessState {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(
        path: ProcessPath,
        variables: impl IntoIterator<Item = (String, Vec<VariableEntry>)>,
    ) -> Self {
        Self {
            path: RwLock::new(path),
            variables: variables.into_iter().collect(),
        }
    }

    /// Record an activation of `element_id` and return its step index.
    pub fn activate(&self, element_id: &str) -> StepIndex {
        let mut path = self.write_path();
        let step_index = path.activate(element_id);
        StepActivated {
            element_id,
            step_index,
            sequence: path.len() - 1,
        }
        .log();
        step_index
    }

    pub fn current_step_index(&self, element_id: &str) -> Option<StepIndex> {
        self.read_path().current_step_index(element_id)
    }

    pub fn has_step(&self, element_id: &str, step_index: StepIndex) -> bool {
        self.read_path().entry(element_id, step_index).is_some()
    }

    /// Copy of the activation path.
    pub fn path(&self) -> ProcessPath {
        self.read_path().clone()
    }

    pub fn complete_step(&self, element_id: &str, step_index: StepIndex) -> Result<(), StateError> {
        self.finish(element_id, step_index, StepStatus::Succeeded)
    }

    pub fn fail_step(&self, element_id: &str, step_index: StepIndex) -> Result<(), StateError> {
        self.finish(element_id, step_index, StepStatus::Failed)
    }

    pub fn suspend_step(&self, element_id: &str, step_index: StepIndex) -> Result<(), StateError> {
        self.finish(element_id, step_index, StepStatus::Suspended)
    }

    pub fn resume_step(&self, element_id: &str, step_index: StepIndex) -> Result<(), StateError> {
        self.finish(element_id, step_index, StepStatus::Started)
    }

    pub fn abort_step(&self, element_id: &str, step_index: StepIndex) -> Result<(), StateError> {
        self.finish(element_id, step_index, StepStatus::Aborted)
    }

    /// Elements with recorded variables, sorted.
    pub fn element_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.variables.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Distinct variable names recorded for `element_id`, in first-recorded order.
    pub fn variable_names(&self, element_id: &str) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        if let Some(entries) = self.variables.get(element_id) {
            for entry in entries.iter() {
                if !names.contains(&entry.name) {
                    names.push(entry.name.clone());
                }
            }
        }
        names
    }

    pub fn entries_for(&self, element_id: &str) -> Vec<VariableEntry> {
        self.variables
            .get(element_id)
            .map(|entries| entries.value().clone())
            .unwrap_or_default()
    }

    /// Append one entry to `element_id`'s list.
    pub fn record(&self, element_id: &str, entry: VariableEntry) {
        self.variables
            .entry(element_id.to_string())
            .or_default()
            .push(entry);
    }

    /// Append the scope's writes to its element's entry list as one atomic append.
    ///
    /// Callers hold the path write lock and have checked the step is still open.
    pub(crate) fn fold_back(&self, scope: &VariableScope) -> usize {
        let writes = scope.writes();
        let written = writes.len();
        if written > 0 {
            self.variables
                .entry(scope.element_id().to_string())
                .or_default()
                .extend(writes);
        }
        FoldBackCompleted {
            element_id: scope.element_id(),
            step_index: scope.step_index(),
            written,
        }
        .log();
        written
    }

    /// Activate `element_id` and build the scope for the new step.
    pub fn begin_activation(
        &self,
        element_id: &str,
        owner: Option<Arc<dyn ProcessContext>>,
    ) -> Result<VariableScope, StateError> {
        let step_index = self.activate(element_id);
        VariableScope::at_step(element_id, step_index, self, owner)
    }

    /// Fold the scope back and mark its step succeeded.
    pub fn complete_activation(&self, scope: VariableScope) -> Result<usize, StateError> {
        self.settle(&scope, StepStatus::Succeeded)
    }

    /// Fold the scope back and mark its step suspended.
    pub fn suspend_activation(&self, scope: VariableScope) -> Result<usize, StateError> {
        self.settle(&scope, StepStatus::Suspended)
    }

    /// Discard the scope's writes and mark its step aborted.
    pub fn abort_activation(&self, scope: VariableScope) -> Result<(), StateError> {
        self.abort_step(scope.element_id(), scope.step_index())
    }

    /// Check, fold and transition under one path write lock. Two scopes racing
    /// to settle the same step leave exactly one set of writes behind.
    fn settle(&self, scope: &VariableScope, status: StepStatus) -> Result<usize, StateError> {
        let mut path = self.write_path();
        let entry = path
            .entry(scope.element_id(), scope.step_index())
            .ok_or_else(|| StateError::UnknownStep {
                element_id: scope.element_id().to_string(),
                step_index: scope.step_index(),
            })?;
        if entry.status.is_final() {
            return Err(StateError::StepAlreadyFinished {
                element_id: scope.element_id().to_string(),
                step_index: scope.step_index(),
                status: entry.status.to_string(),
            });
        }

        let written = self.fold_back(scope);
        transition(&mut path, scope.element_id(), scope.step_index(), status)?;
        Ok(written)
    }

    fn finish(
        &self,
        element_id: &str,
        step_index: StepIndex,
        status: StepStatus,
    ) -> Result<(), StateError> {
        let mut path = self.write_path();
        transition(&mut path, element_id, step_index, status)
    }

    pub(crate) fn read_path(&self) -> RwLockReadGuard<'_, ProcessPath> {
        self.path.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write_path(&self) -> RwLockWriteGuard<'_, ProcessPath> {
        self.path.write().unwrap_or_else(|p| p.into_inner())
    }
}

fn transition(
    path: &mut ProcessPath,
    element_id: &str,
    step_index: StepIndex,
    status: StepStatus,
) -> Result<(), StateError> {
    match status {
        StepStatus::Succeeded => path.complete(element_id, step_index)?,
        StepStatus::Failed => path.fail(element_id, step_index)?,
        StepStatus::Suspended => path.suspend(element_id, step_index)?,
        StepStatus::Started => path.resume(element_id, step_index)?,
        StepStatus::Aborted => path.abort(element_id, step_index)?,
    }
    StepFinished {
        element_id,
        step_index,
        status: status.as_str(),
    }
    .log();
    Ok(())
}
