// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Connecting objects. Both flow kinds must name their endpoints.

use crate::registry::Element;

structural_element!(
    /// Ordering between two flow nodes of one process.
    SequenceFlow,
    "sequenceFlow",
    ["id", "sourceRef", "targetRef"]
);

structural_element!(
    /// A message exchanged between two participants of a collaboration.
    MessageFlow,
    "messageFlow",
    ["id", "sourceRef", "targetRef"]
);

impl SequenceFlow {
    pub fn source_ref(&self) -> &str {
        self.base().attribute("sourceRef").unwrap_or_default()
    }

    pub fn target_ref(&self) -> &str {
        self.base().attribute("targetRef").unwrap_or_default()
    }

    /// Text of the `conditionExpression` child, when the flow is guarded.
    pub fn condition_expression(&self) -> Option<String> {
        self.base()
            .node()
            .child_elements()
            .into_iter()
            .find(|child| child.local_name() == "conditionExpression")
            .map(|child| child.text())
    }
}

impl MessageFlow {
    pub fn source_ref(&self) -> &str {
        self.base().attribute("sourceRef").unwrap_or_default()
    }

    pub fn target_ref(&self) -> &str {
        self.base().attribute("targetRef").unwrap_or_default()
    }

    pub fn message_ref(&self) -> Option<&str> {
        self.base().attribute("messageRef")
    }
}
