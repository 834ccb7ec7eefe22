// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod codec;      // typed variable values and their persisted form
pub mod config;     // engine configuration
pub mod elements;   // built-in BPMN element kinds
pub mod errors;     // error handling
pub mod markup;     // markup tree, prefix maps, structural paths
pub mod observability;
pub mod registry;   // tag -> element type dispatch
pub mod state;      // path tracking, snapshots, variable scopes
