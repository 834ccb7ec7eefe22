// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use super::*;
use crate::errors::RegistryError;
use crate::markup::{describe, Document};
use crate::registry::{Element, ElementRegistry, ResolutionPolicy};

const ORDER_PROCESS: &str = include_str!("../../demos/order-process.bpmn");

fn load(text: &str) -> Result<crate::registry::ElementTree, RegistryError> {
    let document = Arc::new(Document::parse(text).unwrap());
    ElementRegistry::with_builtin(ResolutionPolicy::Strict).load(document)
}

#[test]
fn test_order_process_loads_every_structural_element() {
    let tree = load(ORDER_PROCESS).unwrap();

    assert_eq!(tree.len(), 19);
    assert_eq!(tree.roots().len(), 1);
    assert_eq!(tree.get(tree.roots()[0]).type_name(), "Definitions");

    let counts = vec![
        ("SequenceFlow", tree.of_type::<SequenceFlow>().count(), 6),
        ("Participant", tree.of_type::<Participant>().count(), 2),
        ("EndEvent", tree.of_type::<EndEvent>().count(), 2),
        ("MessageFlow", tree.of_type::<MessageFlow>().count(), 1),
        ("ScriptTask", tree.of_type::<ScriptTask>().count(), 1),
    ];
    for (name, actual, expected) in counts {
        assert_eq!(actual, expected, "count of {}", name);
    }

    assert!(tree.find_by_id("Hidden_Task").is_none());
}

#[test]
fn test_flow_accessors_expose_endpoints() {
    let tree = load(ORDER_PROCESS).unwrap();

    let message = tree.of_type::<MessageFlow>().next().unwrap();
    assert_eq!(message.source_ref(), "Task_Reserve");
    assert_eq!(message.target_ref(), "Participant_Warehouse");
    assert_eq!(message.message_ref(), Some("Message_Pick"));

    let accept = tree
        .of_type::<SequenceFlow>()
        .find(|flow| flow.id() == Some("Flow_Accept"))
        .unwrap();
    assert_eq!(accept.source_ref(), "Gateway_Valid");
    assert_eq!(accept.condition_expression().as_deref(), Some("valid == true"));
}

#[test]
fn test_elements_know_their_parents_and_paths() {
    let tree = load(ORDER_PROCESS).unwrap();

    let key = tree.find_by_id("Task_Validate").unwrap();
    let validate = tree.get(key);
    let parent = validate.base().parent().unwrap();
    assert_eq!(parent.type_name, "Process");
    assert_eq!(parent.id.as_deref(), Some("Process_Order"));
    assert_eq!(
        validate.base().path(),
        "/bpmn:definitions[1]/bpmn:process[1]/bpmn:scriptTask[1]"
    );

    let script = validate.downcast_ref::<ScriptTask>().unwrap();
    assert_eq!(script.script_format(), Some("javascript"));
    assert_eq!(script.script().as_deref(), Some("variables.total > 0"));

    let gateway = tree.get(tree.find_by_id("Gateway_Valid").unwrap());
    assert_eq!(
        gateway.downcast_ref::<ExclusiveGateway>().unwrap().default_flow(),
        Some("Flow_Reject")
    );
    assert!(tree
        .of_type::<Process>()
        .all(|process| process.is_executable()));
}

#[test]
fn test_participant_without_id_names_the_attribute_and_location() {
    let text = r#"<definitions xmlns="http://www.omg.org/spec/BPMN/20100524/MODEL">
        <collaboration id="C">
          <participant id="P1"/>
          <participant name="anonymous"/>
        </collaboration>
      </definitions>"#;

    match load(text) {
        Err(RegistryError::MissingRequiredAttribute {
            attribute,
            tag,
            path,
        }) => {
            assert_eq!(attribute, "id");
            assert_eq!(tag, "participant");
            assert_eq!(path, "/definitions[1]/collaboration[1]/participant[2]");
        }
        other => panic!("expected missing attribute, got {:?}", other),
    }
}

#[test]
fn test_message_flow_requires_both_endpoints() {
    let cases = vec![
        ("sourceRef", r#"<messageFlow xmlns="http://www.omg.org/spec/BPMN/20100524/MODEL" id="m" targetRef="b"/>"#),
        ("targetRef", r#"<messageFlow xmlns="http://www.omg.org/spec/BPMN/20100524/MODEL" id="m" sourceRef="a"/>"#),
        ("id", r#"<messageFlow xmlns="http://www.omg.org/spec/BPMN/20100524/MODEL" sourceRef="a" targetRef="b"/>"#),
    ];

    for (missing, text) in cases {
        match load(text) {
            Err(RegistryError::MissingRequiredAttribute { attribute, .. }) => {
                assert_eq!(attribute, missing)
            }
            other => panic!("case {}: expected missing attribute, got {:?}", missing, other),
        }
    }
}

#[test]
fn test_foreign_namespace_is_not_a_bpmn_task() {
    let tree = load(r#"<task xmlns="urn:other" id="t"/>"#).unwrap();
    assert!(tree.is_empty());

    let document = Arc::new(Document::parse(r#"<task xmlns="urn:other" id="t"/>"#).unwrap());
    let node = crate::markup::MarkupNode::document_element(&document).unwrap();
    assert_eq!(describe(&node), "/task[1]");
}
