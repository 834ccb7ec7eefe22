// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Persisted forms of [`ProcessState`].
//!
//! Markup form:
//!
//! ```text
//! <ProcessState>
//!   <ProcessPath>
//!     <PathEntry elementID="Task_1" step="0" sequence="0" status="Succeeded"
//!                startedAt="2025-01-01T10:00:00Z" endedAt="2025-01-01T10:00:02Z"/>
//!   </ProcessPath>
//!   <ProcessVariables>
//!     <Variable elementID="Task_1" step="0" name="total" type="Decimal"><![CDATA[12.50]]></Variable>
//!   </ProcessVariables>
//! </ProcessState>
//! ```
//!
//! The JSON form carries the same data through serde.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::{PathEntry, ProcessPath, ProcessState, StepIndex, StepStatus, VariableEntry};
use crate::codec::{decode_record, encode, ElementSink};
use crate::errors::StateError;
use crate::markup::{describe, Document, MarkupNode};
use crate::observability::messages::state::SnapshotRestored;
use crate::observability::messages::StructuredLog;

const STATE_TAG: &str = "ProcessState";
const PATH_TAG: &str = "ProcessPath";
const PATH_ENTRY_TAG: &str = "PathEntry";
const VARIABLES_TAG: &str = "ProcessVariables";
const VARIABLE_TAG: &str = "Variable";

#[derive(Serialize, Deserialize)]
struct PersistedState {
    path: ProcessPath,
    #[serde(default)]
    variables: BTreeMap<String, Vec<VariableEntry>>,
}

impl ProcessState {
    /// Render the snapshot as a markup document.
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        let root = doc.append_element(doc.root(), STATE_TAG);

        let path_node = doc.append_element(root, PATH_TAG);
        for entry in self.read_path().entries() {
            let node = doc.append_element(path_node, PATH_ENTRY_TAG);
            doc.set_attribute(node, "elementID", entry.element_id.as_str());
            doc.set_attribute(node, "step", entry.step_index.to_string());
            doc.set_attribute(node, "sequence", entry.sequence.to_string());
            doc.set_attribute(node, "status", entry.status.as_str());
            doc.set_attribute(node, "startedAt", timestamp(&entry.started_at));
            if let Some(ended_at) = &entry.ended_at {
                doc.set_attribute(node, "endedAt", timestamp(ended_at));
            }
        }

        let variables_node = doc.append_element(root, VARIABLES_TAG);
        for element_id in self.element_ids() {
            for entry in self.entries_for(&element_id) {
                let node = doc.append_element(variables_node, VARIABLE_TAG);
                doc.set_attribute(node, "elementID", element_id.as_str());
                doc.set_attribute(node, "step", entry.step_index.to_string());
                doc.set_attribute(node, "name", entry.name.as_str());
                encode(entry.value.as_ref(), &mut ElementSink::new(&mut doc, node));
            }
        }

        doc
    }

    /// Rebuild a snapshot from its markup document.
    pub fn from_document(document: Document) -> Result<Self, StateError> {
        let document = Arc::new(document);
        let root = MarkupNode::document_element(&document)
            .ok_or_else(|| StateError::InvalidDocument("document has no root element".into()))?;
        if root.name() != STATE_TAG {
            return Err(StateError::InvalidDocument(format!(
                "expected <{}> root, found <{}>",
                STATE_TAG,
                root.name()
            )));
        }

        let mut path_entries = Vec::new();
        let mut variables: BTreeMap<String, Vec<VariableEntry>> = BTreeMap::new();
        let mut variable_count = 0usize;

        for section in root.child_elements() {
            match section.name() {
                PATH_TAG => {
                    for node in section.child_elements() {
                        path_entries.push(read_path_entry(&node)?);
                    }
                }
                VARIABLES_TAG => {
                    for node in section.child_elements() {
                        let (element_id, entry) = read_variable(&node)?;
                        variables.entry(element_id).or_default().push(entry);
                        variable_count += 1;
                    }
                }
                other => {
                    return Err(StateError::InvalidDocument(format!(
                        "unexpected section <{}> at {}",
                        other,
                        describe(&section)
                    )))
                }
            }
        }

        let path = ProcessPath::from_entries(path_entries)?;
        check_variables_against_path(&path, &variables)?;

        SnapshotRestored {
            format: "markup",
            path_entries: path.len(),
            variable_entries: variable_count,
        }
        .log();
        Ok(ProcessState::from_parts(path, variables))
    }

    pub fn to_markup_string(&self) -> Result<String, StateError> {
        Ok(self.to_document().to_markup_string()?)
    }

    pub fn from_markup_str(text: &str) -> Result<Self, StateError> {
        Self::from_document(Document::parse(text)?)
    }

    pub fn to_json(&self) -> Result<String, StateError> {
        let persisted = PersistedState {
            path: self.path(),
            variables: self
                .element_ids()
                .into_iter()
                .map(|id| {
                    let entries = self.entries_for(&id);
                    (id, entries)
                })
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&persisted)?)
    }

    pub fn from_json(text: &str) -> Result<Self, StateError> {
        let persisted: PersistedState = serde_json::from_str(text)?;
        check_variables_against_path(&persisted.path, &persisted.variables)?;

        SnapshotRestored {
            format: "json",
            path_entries: persisted.path.len(),
            variable_entries: persisted.variables.values().map(Vec::len).sum(),
        }
        .log();
        Ok(ProcessState::from_parts(persisted.path, persisted.variables))
    }
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn required<'a>(node: &'a MarkupNode, name: &str) -> Result<&'a str, StateError> {
    node.attribute(name).ok_or_else(|| {
        StateError::InvalidDocument(format!(
            "missing attribute '{}' at {}",
            name,
            describe(node)
        ))
    })
}

fn parsed<T: FromStr>(node: &MarkupNode, name: &str) -> Result<T, StateError>
where
    T::Err: std::fmt::Display,
{
    let text = required(node, name)?;
    text.parse().map_err(|e: T::Err| {
        StateError::InvalidDocument(format!(
            "attribute '{}'='{}' at {}: {}",
            name,
            text,
            describe(node),
            e
        ))
    })
}

fn read_path_entry(node: &MarkupNode) -> Result<PathEntry, StateError> {
    if node.name() != PATH_ENTRY_TAG {
        return Err(StateError::InvalidDocument(format!(
            "unexpected <{}> at {}",
            node.name(),
            describe(node)
        )));
    }

    let ended_at = match node.attribute("endedAt") {
        Some(_) => Some(parsed::<DateTime<Utc>>(node, "endedAt")?),
        None => None,
    };

    Ok(PathEntry {
        element_id: required(node, "elementID")?.to_string(),
        step_index: parsed(node, "step")?,
        sequence: parsed(node, "sequence")?,
        status: StepStatus::from_str(required(node, "status")?)?,
        started_at: parsed(node, "startedAt")?,
        ended_at,
    })
}

fn read_variable(node: &MarkupNode) -> Result<(String, VariableEntry), StateError> {
    if node.name() != VARIABLE_TAG {
        return Err(StateError::InvalidDocument(format!(
            "unexpected <{}> at {}",
            node.name(),
            describe(node)
        )));
    }

    let element_id = required(node, "elementID")?.to_string();
    let name = required(node, "name")?.to_string();
    let step_index: StepIndex = parsed(node, "step")?;
    let value = decode_record(node).map_err(|source| StateError::Variable {
        element_id: element_id.clone(),
        name: name.clone(),
        source,
    })?;

    Ok((
        element_id,
        VariableEntry {
            name,
            step_index,
            value,
        },
    ))
}

/// Every variable entry must belong to a step that exists in the path.
fn check_variables_against_path(
    path: &ProcessPath,
    variables: &BTreeMap<String, Vec<VariableEntry>>,
) -> Result<(), StateError> {
    for (element_id, entries) in variables {
        for entry in entries {
            if path.entry(element_id, entry.step_index).is_none() {
                return Err(StateError::InvalidDocument(format!(
                    "variable '{}' of element '{}' belongs to step {}, which is not in the process path",
                    entry.name, element_id, entry.step_index
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{FileAttachment, TypedValue};
    use crate::errors::CodecError;

    fn sample_state() -> ProcessState {
        let state = ProcessState::new();

        let first = state.begin_activation("Task_A", None).unwrap();
        first.set("amount", TypedValue::Decimal("12.50".parse().unwrap()));
        first.set("note", "  padded <text> ]]> end  ");
        first.set_null("cleared");
        state.complete_activation(first).unwrap();

        let second = state.begin_activation("Task_A", None).unwrap();
        second.set(
            "scan",
            FileAttachment::new("scan", "png", "image/png", vec![1, 2, 3]),
        );
        state.suspend_activation(second).unwrap();

        let gateway = state.begin_activation("Gateway", None).unwrap();
        gateway.set("valid", true);
        state.complete_activation(gateway).unwrap();
        state
    }

    fn assert_same_state(restored: &ProcessState, original: &ProcessState) {
        assert_eq!(restored.path(), original.path());
        assert_eq!(restored.element_ids(), original.element_ids());
        for id in original.element_ids() {
            assert_eq!(restored.entries_for(&id), original.entries_for(&id), "element {}", id);
        }
    }

    #[test]
    fn test_markup_snapshot_restores_path_and_variables() {
        let original = sample_state();
        let text = original.to_markup_string().unwrap();
        let restored = ProcessState::from_markup_str(&text).unwrap();

        assert_same_state(&restored, &original);
        assert_eq!(restored.activate("Task_A"), 2);
    }

    #[test]
    fn test_json_snapshot_restores_path_and_variables() {
        let original = sample_state();
        let json = original.to_json().unwrap();
        let restored = ProcessState::from_json(&json).unwrap();

        assert_same_state(&restored, &original);
    }

    #[test]
    fn test_malformed_variable_names_element_and_variable() {
        let text = r#"<ProcessState>
            <ProcessPath>
              <PathEntry elementID="E" step="0" sequence="0" status="Started" startedAt="2025-01-01T00:00:00Z"/>
            </ProcessPath>
            <ProcessVariables>
              <Variable elementID="E" step="0" name="count" type="Integer">twelve</Variable>
            </ProcessVariables>
          </ProcessState>"#;

        match ProcessState::from_markup_str(text) {
            Err(StateError::Variable {
                element_id,
                name,
                source: CodecError::MalformedLiteral { .. },
            }) => {
                assert_eq!(element_id, "E");
                assert_eq!(name, "count");
            }
            other => panic!("expected variable error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_documents_are_rejected() {
        let cases = vec![
            ("wrong root", "<Other/>"),
            ("unknown section", "<ProcessState><History/></ProcessState>"),
            (
                "missing step",
                r#"<ProcessState><ProcessPath><PathEntry elementID="E" sequence="0" status="Started" startedAt="2025-01-01T00:00:00Z"/></ProcessPath></ProcessState>"#,
            ),
            (
                "bad status",
                r#"<ProcessState><ProcessPath><PathEntry elementID="E" step="0" sequence="0" status="Paused" startedAt="2025-01-01T00:00:00Z"/></ProcessPath></ProcessState>"#,
            ),
            (
                "variable outside path",
                r#"<ProcessState><ProcessVariables><Variable elementID="E" step="0" name="x" type="Null"/></ProcessVariables></ProcessState>"#,
            ),
        ];

        for (name, text) in cases {
            assert!(
                matches!(
                    ProcessState::from_markup_str(text),
                    Err(StateError::InvalidDocument(_))
                ),
                "case '{}' should be an invalid document",
                name
            );
        }
    }
}
