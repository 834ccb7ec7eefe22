// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::StepIndex;
use crate::errors::StateError;

/// Lifecycle of one activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    Started,
    Succeeded,
    Failed,
    Suspended,
    Aborted,
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Started => "Started",
            StepStatus::Succeeded => "Succeeded",
            StepStatus::Failed => "Failed",
            StepStatus::Suspended => "Suspended",
            StepStatus::Aborted => "Aborted",
        }
    }

    /// Succeeded, failed and aborted steps never change again.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            StepStatus::Succeeded | StepStatus::Failed | StepStatus::Aborted
        )
    }
}

impl Display for StepStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepStatus {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Started" => Ok(StepStatus::Started),
            "Succeeded" => Ok(StepStatus::Succeeded),
            "Failed" => Ok(StepStatus::Failed),
            "Suspended" => Ok(StepStatus::Suspended),
            "Aborted" => Ok(StepStatus::Aborted),
            other => Err(StateError::InvalidDocument(format!(
                "unknown step status '{}'",
                other
            ))),
        }
    }
}

/// One activation in the process path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathEntry {
    pub element_id: String,
    pub step_index: StepIndex,
    /// Position of this activation in the whole instance's history.
    pub sequence: usize,
    pub status: StepStatus,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

/// Ordered activation history of one process instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PathEntry>", into = "Vec<PathEntry>")]
pub struct ProcessPath {
    entries: Vec<PathEntry>,
    latest: HashMap<String, StepIndex>,
}

impl ProcessPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a path from persisted entries.
    ///
    /// Entries are ordered by sequence; each element's step indices must
    /// strictly increase along that order.
    pub fn from_entries(mut entries: Vec<PathEntry>) -> Result<Self, StateError> {
        entries.sort_by_key(|entry| entry.sequence);

        let mut latest: HashMap<String, StepIndex> = HashMap::new();
        for (position, entry) in entries.iter_mut().enumerate() {
            if let Some(previous) = latest.get(&entry.element_id) {
                if entry.step_index <= *previous {
                    return Err(StateError::InvalidDocument(format!(
                        "element '{}' repeats or reorders step {} in the process path",
                        entry.element_id, entry.step_index
                    )));
                }
            }
            latest.insert(entry.element_id.clone(), entry.step_index);
            entry.sequence = position;
        }

        Ok(Self { entries, latest })
    }

    /// Record a new activation of `element_id` and return its step index.
    pub fn activate(&mut self, element_id: &str) -> StepIndex {
        let step_index = match self.latest.get(element_id) {
            Some(previous) => previous + 1,
            None => 0,
        };
        self.latest.insert(element_id.to_string(), step_index);
        self.entries.push(PathEntry {
            element_id: element_id.to_string(),
            step_index,
            sequence: self.entries.len(),
            status: StepStatus::Started,
            started_at: Utc::now(),
            ended_at: None,
        });
        step_index
    }

    pub fn complete(&mut self, element_id: &str, step_index: StepIndex) -> Result<(), StateError> {
        self.transition(element_id, step_index, StepStatus::Succeeded)
    }

    pub fn fail(&mut self, element_id: &str, step_index: StepIndex) -> Result<(), StateError> {
        self.transition(element_id, step_index, StepStatus::Failed)
    }

    pub fn suspend(&mut self, element_id: &str, step_index: StepIndex) -> Result<(), StateError> {
        self.transition(element_id, step_index, StepStatus::Suspended)
    }

    /// Mark a suspended step as running again.
    pub fn resume(&mut self, element_id: &str, step_index: StepIndex) -> Result<(), StateError> {
        self.transition(element_id, step_index, StepStatus::Started)
    }

    pub fn abort(&mut self, element_id: &str, step_index: StepIndex) -> Result<(), StateError> {
        self.transition(element_id, step_index, StepStatus::Aborted)
    }

    /// Step index of the most recent activation of `element_id`.
    pub fn current_step_index(&self, element_id: &str) -> Option<StepIndex> {
        self.latest.get(element_id).copied()
    }

    pub fn steps_for(&self, element_id: &str) -> Vec<StepIndex> {
        self.entries
            .iter()
            .filter(|entry| entry.element_id == element_id)
            .map(|entry| entry.step_index)
            .collect()
    }

    pub fn entry(&self, element_id: &str, step_index: StepIndex) -> Option<&PathEntry> {
        self.entries
            .iter()
            .find(|entry| entry.element_id == element_id && entry.step_index == step_index)
    }

    pub fn last_status(&self, element_id: &str) -> Option<StepStatus> {
        let step = self.current_step_index(element_id)?;
        self.entry(element_id, step).map(|entry| entry.status)
    }

    pub fn entries(&self) -> &[PathEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn transition(
        &mut self,
        element_id: &str,
        step_index: StepIndex,
        status: StepStatus,
    ) -> Result<(), StateError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.element_id == element_id && entry.step_index == step_index)
            .ok_or_else(|| StateError::UnknownStep {
                element_id: element_id.to_string(),
                step_index,
            })?;

        let allowed = match status {
            StepStatus::Started => entry.status == StepStatus::Suspended,
            _ => !entry.status.is_final(),
        };
        if !allowed {
            return Err(StateError::StepAlreadyFinished {
                element_id: element_id.to_string(),
                step_index,
                status: entry.status.to_string(),
            });
        }

        entry.status = status;
        entry.ended_at = if status.is_final() {
            Some(Utc::now())
        } else {
            None
        };
        Ok(())
    }
}

impl TryFrom<Vec<PathEntry>> for ProcessPath {
    type Error = StateError;

    fn try_from(entries: Vec<PathEntry>) -> Result<Self, Self::Error> {
        ProcessPath::from_entries(entries)
    }
}

impl From<ProcessPath> for Vec<PathEntry> {
    fn from(path: ProcessPath) -> Self {
        path.entries
    }
}
