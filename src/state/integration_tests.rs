// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeSet;
use std::sync::Arc;

use super::*;
use crate::codec::TypedValue;
use crate::elements::ScriptTask;
use crate::markup::Document;
use crate::registry::{Element, ElementRegistry, ResolutionPolicy};

const ORDER_PROCESS: &str = include_str!("../../demos/order-process.bpmn");

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_scopes_for_different_elements_write_independently() {
    let state = Arc::new(ProcessState::new());
    let left = Arc::new(state.begin_activation("Branch_Left", None).unwrap());
    let right = Arc::new(state.begin_activation("Branch_Right", None).unwrap());

    let handles: Vec<_> = [("left", Arc::clone(&left)), ("right", Arc::clone(&right))]
        .into_iter()
        .map(|(label, scope)| {
            tokio::spawn(async move {
                for i in 0..500i32 {
                    scope.set(format!("{}_{}", label, i % 10), i);
                    scope.set("owner", label);
                    tokio::task::yield_now().await;
                }
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(left.get("owner"), Some(TypedValue::from("left")));
    assert_eq!(right.get("owner"), Some(TypedValue::from("right")));
    assert!(left.keys().iter().all(|k| k == "owner" || k.starts_with("left_")));
    assert!(right.keys().iter().all(|k| k == "owner" || k.starts_with("right_")));
    assert_eq!(left.get("left_9"), Some(TypedValue::Integer(499)));
    assert_eq!(right.get("left_9"), None);

    let left = Arc::try_unwrap(left).unwrap();
    let right = Arc::try_unwrap(right).unwrap();
    assert_eq!(state.complete_activation(left).unwrap(), 11);
    assert_eq!(state.complete_activation(right).unwrap(), 11);
    assert!(state
        .entries_for("Branch_Left")
        .iter()
        .all(|entry| entry.name == "owner" || entry.name.starts_with("left_")));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_fold_back_into_one_element_keeps_every_write() {
    let state = Arc::new(ProcessState::new());
    let branches = 16;

    let handles: Vec<_> = (0..branches)
        .map(|branch| {
            let state = Arc::clone(&state);
            tokio::spawn(async move {
                let scope = state.begin_activation("Join", None).unwrap();
                scope.set("branch", branch as i32);
                tokio::task::yield_now().await;
                state.complete_activation(scope).unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), 1);
    }

    let entries = state.entries_for("Join");
    assert_eq!(entries.len(), branches);

    let steps: BTreeSet<StepIndex> = entries.iter().map(|e| e.step_index).collect();
    assert_eq!(steps, (0..branches as StepIndex).collect());

    let values: BTreeSet<i64> = entries
        .iter()
        .filter_map(|e| e.value.as_ref().and_then(TypedValue::as_i64))
        .collect();
    assert_eq!(values.len(), branches);
}

#[test]
fn test_definition_drives_activation_persist_and_restore() {
    let document = Arc::new(Document::parse(ORDER_PROCESS).unwrap());
    let tree = ElementRegistry::with_builtin(ResolutionPolicy::Strict)
        .load(document)
        .unwrap();
    let validate = tree.of_type::<ScriptTask>().next().unwrap();
    let validate_id = validate.id().unwrap().to_string();

    let owner: Arc<dyn ProcessContext> =
        Arc::new(ProcessVariables::new("order-42").with_variable("total", 0i32));
    let state = ProcessState::new();

    // The validation task runs twice: once rejected, once after a correction.
    let first = state
        .begin_activation(&validate_id, Some(Arc::clone(&owner)))
        .unwrap();
    assert_eq!(first.get("total"), Some(TypedValue::Integer(0)));
    first.set("total", 120i32);
    first.set("valid", false);
    state.complete_activation(first).unwrap();

    let second = state
        .begin_activation(&validate_id, Some(Arc::clone(&owner)))
        .unwrap();
    assert_eq!(second.get("valid"), Some(TypedValue::Boolean(false)));
    second.set("valid", true);
    state.suspend_activation(second).unwrap();

    let restored = ProcessState::from_markup_str(&state.to_markup_string().unwrap()).unwrap();

    let at_first = VariableScope::at_step(&validate_id, 0, &restored, Some(Arc::clone(&owner))).unwrap();
    assert_eq!(at_first.get("valid"), Some(TypedValue::Boolean(false)));
    assert_eq!(at_first.get("total"), Some(TypedValue::Integer(120)));

    let at_second = VariableScope::new(&validate_id, &restored, Some(owner)).unwrap();
    assert_eq!(at_second.step_index(), 1);
    assert_eq!(at_second.get("valid"), Some(TypedValue::Boolean(true)));
    assert_eq!(
        restored.path().last_status(&validate_id),
        Some(StepStatus::Suspended)
    );
}
