// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::registry::Element;

structural_element!(
    /// Root of a BPMN definition document.
    Definitions,
    "definitions",
    []
);

structural_element!(
    /// An executable process.
    Process,
    "process",
    ["id"]
);

structural_element!(Collaboration, "collaboration", ["id"]);

structural_element!(
    /// A pool inside a collaboration, usually bound to a process.
    Participant,
    "participant",
    ["id"]
);

impl Definitions {
    pub fn target_namespace(&self) -> Option<&str> {
        self.base().attribute("targetNamespace")
    }
}

impl Participant {
    /// Id of the process this participant runs, if any.
    pub fn process_ref(&self) -> Option<&str> {
        self.base().attribute("processRef")
    }
}

impl Process {
    pub fn is_executable(&self) -> bool {
        self.base()
            .attribute("isExecutable")
            .map_or(false, |v| v.eq_ignore_ascii_case("true"))
    }
}
