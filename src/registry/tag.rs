// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt::{self, Display, Formatter};

use crate::markup::PrefixMap;

/// A `(namespace, local name)` pair an element type claims to implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagMarker {
    pub namespace: &'static str,
    pub local_name: &'static str,
}

impl TagMarker {
    pub const fn new(namespace: &'static str, local_name: &'static str) -> Self {
        Self {
            namespace,
            local_name,
        }
    }

    /// Whether a tag written as `prefix:local_name` denotes this marker under `map`.
    pub fn matches(&self, prefix: &str, local_name: &str, map: &PrefixMap) -> bool {
        self.local_name == local_name
            && map
                .resolve(prefix)
                .map_or(false, |namespace| namespace == self.namespace)
    }
}

impl Display for TagMarker {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}{}", self.namespace, self.local_name)
    }
}
