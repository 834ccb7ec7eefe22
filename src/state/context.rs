// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::RwLock;

use crate::codec::TypedValue;

/// Handle to a running process instance, used as a variable fallback tier.
///
/// Scopes receive their owning process and, optionally, an ambient process
/// explicitly at construction; nothing is looked up from global state.
pub trait ProcessContext: Send + Sync {
    fn instance_id(&self) -> &str;

    /// Process-level value of `name`, or `None` when the process has none.
    fn variable(&self, name: &str) -> Option<TypedValue>;
}

/// In-memory process-level variable store.
#[derive(Debug, Default)]
pub struct ProcessVariables {
    instance_id: String,
    values: RwLock<HashMap<String, TypedValue>>,
}

impl ProcessVariables {
    pub fn new(instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            values: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_variable(self, name: impl Into<String>, value: impl Into<TypedValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&self, name: impl Into<String>, value: impl Into<TypedValue>) {
        let mut values = self.values.write().unwrap_or_else(|p| p.into_inner());
        values.insert(name.into(), value.into());
    }

    pub fn remove(&self, name: &str) -> Option<TypedValue> {
        let mut values = self.values.write().unwrap_or_else(|p| p.into_inner());
        values.remove(name)
    }

    pub fn names(&self) -> Vec<String> {
        let values = self.values.read().unwrap_or_else(|p| p.into_inner());
        let mut names: Vec<String> = values.keys().cloned().collect();
        names.sort();
        names
    }
}

impl ProcessContext for ProcessVariables {
    fn instance_id(&self) -> &str {
        &self.instance_id
    }

    fn variable(&self, name: &str) -> Option<TypedValue> {
        let values = self.values.read().unwrap_or_else(|p| p.into_inner());
        values.get(name).cloned()
    }
}
