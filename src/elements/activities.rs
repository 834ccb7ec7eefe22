// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Flow nodes: events, activities and gateways.

use crate::registry::Element;

structural_element!(StartEvent, "startEvent", ["id"]);
structural_element!(EndEvent, "endEvent", ["id"]);
structural_element!(
    /// An event the process waits on mid-flow (timer, message, signal).
    IntermediateCatchEvent,
    "intermediateCatchEvent",
    ["id"]
);

structural_element!(Task, "task", ["id"]);
structural_element!(UserTask, "userTask", ["id"]);
structural_element!(
    /// A task whose body is a script held in its `script` child.
    ScriptTask,
    "scriptTask",
    ["id"]
);
structural_element!(ServiceTask, "serviceTask", ["id"]);

structural_element!(ExclusiveGateway, "exclusiveGateway", ["id"]);
structural_element!(ParallelGateway, "parallelGateway", ["id"]);
structural_element!(InclusiveGateway, "inclusiveGateway", ["id"]);

impl ScriptTask {
    pub fn script_format(&self) -> Option<&str> {
        self.base().attribute("scriptFormat")
    }

    pub fn script(&self) -> Option<String> {
        self.base()
            .node()
            .child_elements()
            .into_iter()
            .find(|child| child.local_name() == "script")
            .map(|child| child.text())
    }
}

impl ExclusiveGateway {
    /// Id of the flow taken when no condition holds.
    pub fn default_flow(&self) -> Option<&str> {
        self.base().attribute("default")
    }
}

impl InclusiveGateway {
    pub fn default_flow(&self) -> Option<&str> {
        self.base().attribute("default")
    }
}
