// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Built-in BPMN element kinds.
//!
//! These carry structure only: each kind knows its tag, its required
//! attributes and its place in the element tree. Execution behavior is layered
//! on by the engine that consumes the tree.
//!
//! # Registered kinds
//! - containers: `definitions`, `process`, `collaboration`, `participant`
//! - flows: `sequenceFlow`, `messageFlow`
//! - events: `startEvent`, `endEvent`, `intermediateCatchEvent`
//! - activities: `task`, `userTask`, `scriptTask`, `serviceTask`
//! - gateways: `exclusiveGateway`, `parallelGateway`, `inclusiveGateway`

/// Declares a structural element kind bound to one BPMN tag.
macro_rules! structural_element {
    ($(#[$meta:meta])* $name:ident, $tag:literal, [$($required:literal),* $(,)?]) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            base: $crate::registry::ElementBase,
        }

        impl $crate::registry::Element for $name {
            fn base(&self) -> &$crate::registry::ElementBase {
                &self.base
            }

            fn type_name(&self) -> &'static str {
                <Self as $crate::registry::ElementKind>::TYPE_NAME
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
        }

        impl $crate::registry::ElementKind for $name {
            const TYPE_NAME: &'static str = stringify!($name);
            const TAGS: &'static [$crate::registry::TagMarker] = &[
                $crate::registry::TagMarker::new($crate::config::consts::BPMN_MODEL_NS, $tag),
            ];
            const REQUIRED_ATTRIBUTES: &'static [&'static str] = &[$($required),*];

            fn construct(
                node: $crate::markup::MarkupNode,
                prefix_map: $crate::markup::PrefixMap,
                parent: Option<&dyn $crate::registry::Element>,
            ) -> Self {
                Self {
                    base: $crate::registry::ElementBase::new(node, prefix_map, parent),
                }
            }
        }
    };
}

mod activities;
mod containers;
mod flows;

#[cfg(test)]
mod integration_tests;

pub use activities::{
    EndEvent, ExclusiveGateway, InclusiveGateway, IntermediateCatchEvent, ParallelGateway,
    ScriptTask, ServiceTask, StartEvent, Task, UserTask,
};
pub use containers::{Collaboration, Definitions, Participant, Process};
pub use flows::{MessageFlow, SequenceFlow};

use crate::registry::ElementRegistry;

/// Register every built-in kind, containers first.
pub fn register_builtin(registry: &mut ElementRegistry) {
    registry.register_kind::<Definitions>();
    registry.register_kind::<Process>();
    registry.register_kind::<Collaboration>();
    registry.register_kind::<Participant>();
    registry.register_kind::<SequenceFlow>();
    registry.register_kind::<MessageFlow>();
    registry.register_kind::<StartEvent>();
    registry.register_kind::<EndEvent>();
    registry.register_kind::<IntermediateCatchEvent>();
    registry.register_kind::<Task>();
    registry.register_kind::<UserTask>();
    registry.register_kind::<ScriptTask>();
    registry.register_kind::<ServiceTask>();
    registry.register_kind::<ExclusiveGateway>();
    registry.register_kind::<ParallelGateway>();
    registry.register_kind::<InclusiveGateway>();
}
