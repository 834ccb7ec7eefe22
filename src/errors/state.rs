// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised by the path tracker, snapshot and variable scopes.

use thiserror::Error;

use super::{CodecError, MarkupError};
use crate::state::StepIndex;

#[derive(Error, Debug)]
pub enum StateError {
    /// A scope was requested for an element that has never activated.
    #[error("Element '{element_id}' has not been activated in this process instance")]
    ElementNotActivated { element_id: String },

    /// A status change referenced a step that is not in the path.
    #[error("Element '{element_id}' has no step {step_index} in the process path")]
    UnknownStep {
        element_id: String,
        step_index: StepIndex,
    },

    /// A step that already finished cannot change status again.
    #[error("Step {step_index} of element '{element_id}' already finished as {status}")]
    StepAlreadyFinished {
        element_id: String,
        step_index: StepIndex,
        status: String,
    },

    /// A persisted state document is structurally invalid.
    #[error("Invalid process state document: {0}")]
    InvalidDocument(String),

    /// A persisted variable failed to decode.
    #[error("Variable '{name}' of element '{element_id}' could not be decoded: {source}")]
    Variable {
        element_id: String,
        name: String,
        #[source]
        source: CodecError,
    },

    #[error(transparent)]
    Markup(#[from] MarkupError),

    #[error("JSON snapshot error: {0}")]
    Json(#[from] serde_json::Error),
}
