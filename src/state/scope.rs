// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-activation variable view.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{ProcessContext, ProcessState, StepIndex, VariableEntry};
use crate::codec::TypedValue;
use crate::errors::StateError;
use crate::observability::messages::state::{ScopeCreated, ScopeEntrySeeded};
use crate::observability::messages::StructuredLog;

#[derive(Debug, Default)]
struct WorkingSet {
    entries: Vec<VariableEntry>,
    written: Vec<String>,
}

/// Variables visible to one activation of one element.
///
/// The scope owns a private copy of the element's entries recorded at or
/// before its step. Reads fall back to the owning process and then to the
/// ambient process; writes replace the scope's own entry for the name and are
/// not visible to the snapshot until folded back.
///
/// All operations on the private entries hold a scope-local lock. Scopes never
/// share a lock with each other.
pub struct VariableScope {
    element_id: String,
    step_index: StepIndex,
    owner: Option<Arc<dyn ProcessContext>>,
    ambient: Option<Arc<dyn ProcessContext>>,
    working: Mutex<WorkingSet>,
}

impl fmt::Debug for VariableScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariableScope")
            .field("element_id", &self.element_id)
            .field("step_index", &self.step_index)
            .field("owner", &self.owner.as_ref().map(|o| o.instance_id().to_string()))
            .field("ambient", &self.ambient.as_ref().map(|a| a.instance_id().to_string()))
            .finish()
    }
}

impl VariableScope {
    /// Scope for the most recent activation of `element_id`.
    pub fn new(
        element_id: impl Into<String>,
        state: &ProcessState,
        owner: Option<Arc<dyn ProcessContext>>,
    ) -> Result<Self, StateError> {
        let element_id = element_id.into();
        let step_index = state
            .current_step_index(&element_id)
            .ok_or_else(|| StateError::ElementNotActivated {
                element_id: element_id.clone(),
            })?;
        Ok(Self::seeded(element_id, step_index, state, owner))
    }

    /// Scope for an earlier activation of `element_id`, as that step saw its variables.
    pub fn at_step(
        element_id: impl Into<String>,
        step_index: StepIndex,
        state: &ProcessState,
        owner: Option<Arc<dyn ProcessContext>>,
    ) -> Result<Self, StateError> {
        let element_id = element_id.into();
        if !state.has_step(&element_id, step_index) {
            return Err(StateError::UnknownStep {
                element_id,
                step_index,
            });
        }
        Ok(Self::seeded(element_id, step_index, state, owner))
    }

    fn seeded(
        element_id: String,
        step_index: StepIndex,
        state: &ProcessState,
        owner: Option<Arc<dyn ProcessContext>>,
    ) -> Self {
        let entries: Vec<VariableEntry> = state
            .entries_for(&element_id)
            .into_iter()
            .filter(|entry| entry.step_index <= step_index)
            .collect();

        ScopeCreated {
            element_id: &element_id,
            step_index,
            seeded_entries: entries.len(),
        }
        .log();
        for entry in &entries {
            ScopeEntrySeeded {
                element_id: &element_id,
                name: &entry.name,
                entry_step: entry.step_index,
            }
            .log();
        }

        Self {
            element_id,
            step_index,
            owner,
            ambient: None,
            working: Mutex::new(WorkingSet {
                entries,
                written: Vec::new(),
            }),
        }
    }

    /// Add the ambient process consulted after the owning process.
    pub fn with_ambient(mut self, ambient: Arc<dyn ProcessContext>) -> Self {
        self.ambient = Some(ambient);
        self
    }

    pub fn element_id(&self) -> &str {
        &self.element_id
    }

    pub fn step_index(&self) -> StepIndex {
        self.step_index
    }

    /// Resolve `name` through the scope's own entries, then the owner, then the ambient process.
    ///
    /// An entry holding a null value hides the fallback tiers.
    pub fn get(&self, name: &str) -> Option<TypedValue> {
        {
            let working = self.lock();
            let mut found: Option<&VariableEntry> = None;
            for entry in working
                .entries
                .iter()
                .filter(|e| e.name == name && e.step_index <= self.step_index)
            {
                if found.map_or(true, |best| entry.step_index >= best.step_index) {
                    found = Some(entry);
                }
            }
            if let Some(entry) = found {
                return entry.value.clone();
            }
        }

        if let Some(value) = self.owner.as_ref().and_then(|owner| owner.variable(name)) {
            return Some(value);
        }

        let ambient = self.ambient.as_ref()?;
        let same_instance = self
            .owner
            .as_ref()
            .map_or(false, |owner| owner.instance_id() == ambient.instance_id());
        if same_instance {
            None
        } else {
            ambient.variable(name)
        }
    }

    pub fn set(&self, name: impl Into<String>, value: impl Into<TypedValue>) {
        self.store(name.into(), Some(value.into()));
    }

    /// Record an explicit null for `name`.
    pub fn set_null(&self, name: impl Into<String>) {
        self.store(name.into(), None);
    }

    /// Names held in the scope's own entries.
    pub fn keys(&self) -> BTreeSet<String> {
        self.lock()
            .entries
            .iter()
            .map(|entry| entry.name.clone())
            .collect()
    }

    /// Names set during this activation, in first-write order.
    pub fn written(&self) -> Vec<String> {
        self.lock().written.clone()
    }

    /// Entries written during this activation.
    pub fn writes(&self) -> Vec<VariableEntry> {
        let working = self.lock();
        working
            .entries
            .iter()
            .filter(|entry| working.written.contains(&entry.name))
            .cloned()
            .collect()
    }

    pub fn into_writes(self) -> Vec<VariableEntry> {
        let working = self
            .working
            .into_inner()
            .unwrap_or_else(|p| p.into_inner());
        let WorkingSet { entries, written } = working;
        entries
            .into_iter()
            .filter(|entry| written.contains(&entry.name))
            .collect()
    }

    fn store(&self, name: String, value: Option<TypedValue>) {
        let mut working = self.lock();
        working.entries.retain(|entry| entry.name != name);
        if !working.written.contains(&name) {
            working.written.push(name.clone());
        }
        tracing::trace!(
            element_id = %self.element_id,
            step_index = self.step_index,
            name = %name,
            "Setting scoped variable"
        );
        working.entries.push(VariableEntry {
            name,
            step_index: self.step_index,
            value,
        });
    }

    fn lock(&self) -> MutexGuard<'_, WorkingSet> {
        self.working.lock().unwrap_or_else(|p| p.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ProcessVariables;

    fn entry(name: &str, step: StepIndex, value: i32) -> VariableEntry {
        VariableEntry {
            name: name.to_string(),
            step_index: step,
            value: Some(TypedValue::Integer(value)),
        }
    }

    /// State with `E` activated three times and `x` recorded at every step.
    fn looped_state() -> ProcessState {
        let state = ProcessState::new();
        for step in 0..3 {
            state.activate("E");
            state.record("E", entry("x", step, step as i32 * 10));
        }
        state
    }

    #[test]
    fn test_scope_never_sees_later_steps() {
        let state = looped_state();

        for step in 0..3u32 {
            let scope = VariableScope::at_step("E", step, &state, None).unwrap();
            assert_eq!(
                scope.get("x"),
                Some(TypedValue::Integer(step as i32 * 10)),
                "scope at step {}",
                step
            );
            assert_eq!(scope.keys().len(), 1);
        }
    }

    #[test]
    fn test_new_scope_uses_latest_activation() {
        let state = looped_state();
        let scope = VariableScope::new("E", &state, None).unwrap();

        assert_eq!(scope.step_index(), 2);
        assert_eq!(scope.get("x"), Some(TypedValue::Integer(20)));
    }

    #[test]
    fn test_scope_requires_activation() {
        let state = ProcessState::new();
        assert!(matches!(
            VariableScope::new("E", &state, None),
            Err(StateError::ElementNotActivated { .. })
        ));

        state.activate("E");
        assert!(matches!(
            VariableScope::at_step("E", 4, &state, None),
            Err(StateError::UnknownStep { step_index: 4, .. })
        ));
    }

    #[test]
    fn test_equal_steps_resolve_to_last_added() {
        let state = ProcessState::new();
        state.activate("E");
        state.record("E", entry("x", 0, 1));
        state.record("E", entry("x", 0, 2));

        let scope = VariableScope::new("E", &state, None).unwrap();
        assert_eq!(scope.get("x"), Some(TypedValue::Integer(2)));
    }

    #[test]
    fn test_set_then_get_overrides_every_tier() {
        let owner: Arc<dyn ProcessContext> =
            Arc::new(ProcessVariables::new("p1").with_variable("x", "from owner"));
        let ambient: Arc<dyn ProcessContext> =
            Arc::new(ProcessVariables::new("p2").with_variable("x", "from ambient"));
        let state = looped_state();

        let scope = VariableScope::new("E", &state, Some(owner))
            .unwrap()
            .with_ambient(ambient);
        scope.set("x", "local");
        assert_eq!(scope.get("x"), Some(TypedValue::String("local".into())));

        scope.set("fresh", true);
        assert_eq!(scope.get("fresh"), Some(TypedValue::Boolean(true)));
        assert_eq!(scope.written(), vec!["x", "fresh"]);
    }

    #[test]
    fn test_set_keeps_one_entry_per_name() {
        let state = looped_state();
        let scope = VariableScope::new("E", &state, None).unwrap();

        scope.set("x", 1i32);
        scope.set("x", 2i32);

        let writes = scope.into_writes();
        assert_eq!(writes, vec![entry("x", 2, 2)]);
        assert_eq!(state.entries_for("E").len(), 3);
    }

    #[test]
    fn test_fallback_chain() {
        struct Case {
            name: &'static str,
            owner: Option<(&'static str, Option<&'static str>)>,
            ambient: Option<(&'static str, Option<&'static str>)>,
            expected: Option<&'static str>,
        }

        let cases = vec![
            Case { name: "owner wins", owner: Some(("p1", Some("owner"))), ambient: Some(("p2", Some("ambient"))), expected: Some("owner") },
            Case { name: "ambient after owner", owner: Some(("p1", None)), ambient: Some(("p2", Some("ambient"))), expected: Some("ambient") },
            Case { name: "ambient is owner", owner: Some(("p1", None)), ambient: Some(("p1", Some("ambient"))), expected: None },
            Case { name: "ambient only", owner: None, ambient: Some(("p2", Some("ambient"))), expected: Some("ambient") },
            Case { name: "no tiers", owner: None, ambient: None, expected: None },
        ];

        let context = |tier: (&'static str, Option<&'static str>)| -> Arc<dyn ProcessContext> {
            let process = ProcessVariables::new(tier.0);
            if let Some(value) = tier.1 {
                process.set("y", value);
            }
            Arc::new(process)
        };

        for case in cases {
            let state = ProcessState::new();
            state.activate("E");
            let mut scope = VariableScope::new("E", &state, case.owner.map(context)).unwrap();
            if let Some(ambient) = case.ambient {
                scope = scope.with_ambient(context(ambient));
            }

            assert_eq!(
                scope.get("y"),
                case.expected.map(TypedValue::from),
                "case '{}'",
                case.name
            );
        }
    }

    #[test]
    fn test_null_entry_hides_fallback() {
        let owner: Arc<dyn ProcessContext> =
            Arc::new(ProcessVariables::new("p1").with_variable("x", 5i32));
        let state = ProcessState::new();
        state.activate("E");

        let scope = VariableScope::new("E", &state, Some(owner)).unwrap();
        assert_eq!(scope.get("x"), Some(TypedValue::Integer(5)));

        scope.set_null("x");
        assert_eq!(scope.get("x"), None);
        assert!(scope.keys().contains("x"));
    }
}
