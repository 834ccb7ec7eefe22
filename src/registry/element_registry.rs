// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Tag-to-type dispatch for process-definition markup.
//!
//! The registry is an ordered table of [`ElementDeclaration`]s. Registration
//! order is resolution order: when several declarations claim the same tag the
//! first one registered wins, and the [`ResolutionPolicy`] decides whether that
//! is tolerated (with a warning) or rejected.

use std::io::Read;
use std::sync::Arc;

use serde::Deserialize;

use super::resources::{DirectoryResources, ResourceBundle, CORE_RESOURCES};
use super::{Element, ElementDeclaration, ElementKey, ElementKind, ElementTree};
use crate::config::EngineConfig;
use crate::errors::RegistryError;
use crate::markup::{structural_path, Document, MarkupNode, NodeKind, PrefixMap};
use crate::observability::messages::registry::{
    AmbiguousTag, DefinitionLoaded, ElementConstructed, LoadingDefinition,
    RequiredAttributeMissing, ResourceLookup, TagResolved, TagUnresolved,
};
use crate::observability::messages::StructuredLog;

/// How to treat a tag claimed by more than one registered element type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionPolicy {
    /// The first registered type wins; the overlap is logged as a warning.
    #[default]
    FirstMatch,
    /// Overlapping claims fail resolution with [`RegistryError::AmbiguousTag`].
    Strict,
}

/// Ordered table of element declarations plus the resource bundles that ship with them.
pub struct ElementRegistry {
    declarations: Vec<ElementDeclaration>,
    policy: ResolutionPolicy,
    resources: Vec<Box<dyn ResourceBundle>>,
}

impl std::fmt::Debug for ElementRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementRegistry")
            .field("declarations", &self.declarations.len())
            .field("policy", &self.policy)
            .field(
                "resources",
                &self.resources.iter().map(|b| b.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ElementRegistry {
    /// An empty registry.
    pub fn new(policy: ResolutionPolicy) -> Self {
        Self {
            declarations: Vec::new(),
            policy,
            resources: Vec::new(),
        }
    }

    /// A registry preloaded with the built-in BPMN structural element kinds.
    pub fn with_builtin(policy: ResolutionPolicy) -> Self {
        let mut registry = Self::new(policy);
        crate::elements::register_builtin(&mut registry);
        registry
    }

    /// Built-in registry with the configured policy and resource directories.
    pub fn from_config(config: &EngineConfig) -> Self {
        let mut registry = Self::with_builtin(config.resolution_policy);
        for dir in &config.resource_dirs {
            registry.register_resources(Box::new(DirectoryResources::new(dir.clone())));
        }
        registry
    }

    pub fn register(&mut self, declaration: ElementDeclaration) {
        self.declarations.push(declaration);
    }

    pub fn register_kind<T: ElementKind>(&mut self) {
        self.register(ElementDeclaration::of::<T>());
    }

    /// Add an extension bundle, searched after the core bundle and earlier extensions.
    pub fn register_resources(&mut self, bundle: Box<dyn ResourceBundle>) {
        self.resources.push(bundle);
    }

    pub fn declarations(&self) -> &[ElementDeclaration] {
        &self.declarations
    }

    pub fn policy(&self) -> ResolutionPolicy {
        self.policy
    }

    /// First declaration claiming `prefix:local_name` under `map`.
    pub fn resolve(
        &self,
        prefix: &str,
        local_name: &str,
        map: &PrefixMap,
    ) -> Option<&ElementDeclaration> {
        let candidates = self.candidates(prefix, local_name, map);
        let chosen = candidates.first().copied()?;
        if candidates.len() > 1 {
            let names: Vec<&str> = candidates.iter().map(|d| d.type_name).collect();
            AmbiguousTag {
                tag: &qualified(prefix, local_name),
                chosen: chosen.type_name,
                candidates: &names,
            }
            .log();
        }
        Some(chosen)
    }

    /// Resolve the tag of `node`, applying the registry's policy to overlaps.
    ///
    /// `Ok(None)` means no registered type claims the tag.
    pub fn resolve_node(
        &self,
        node: &MarkupNode,
        map: &PrefixMap,
    ) -> Result<Option<&ElementDeclaration>, RegistryError> {
        let candidates = self.candidates(node.prefix(), node.local_name(), map);
        if candidates.len() > 1 && self.policy == ResolutionPolicy::Strict {
            return Err(RegistryError::AmbiguousTag {
                tag: node.name().to_string(),
                path: structural_path(node)?,
                candidates: candidates.iter().map(|d| d.type_name.to_string()).collect(),
            });
        }

        let resolved = self.resolve(node.prefix(), node.local_name(), map);
        if let Some(declaration) = resolved {
            TagResolved {
                tag: node.name(),
                type_name: declaration.type_name,
            }
            .log();
        }
        Ok(resolved)
    }

    /// Like [`resolve_node`](Self::resolve_node), but an unclaimed tag is an error.
    pub fn resolve_required(
        &self,
        node: &MarkupNode,
        map: &PrefixMap,
    ) -> Result<&ElementDeclaration, RegistryError> {
        match self.resolve_node(node, map)? {
            Some(declaration) => Ok(declaration),
            None => Err(RegistryError::UnresolvedTag {
                tag: node.name().to_string(),
                path: structural_path(node)?,
            }),
        }
    }

    /// Resolve and construct the element for `node`, validating required attributes.
    pub fn construct(
        &self,
        node: MarkupNode,
        map: PrefixMap,
        parent: Option<&dyn Element>,
    ) -> Result<Box<dyn Element>, RegistryError> {
        ensure_element(&node)?;
        let declaration = *self.resolve_required(&node, &map)?;
        instantiate(&declaration, node, map, parent)
    }

    /// Build the element tree for a whole definition document.
    ///
    /// Each resolvable element is constructed with its nearest constructed
    /// ancestor as parent. Elements whose tag nobody claims are skipped along
    /// with everything beneath them.
    pub fn load(&self, document: Arc<Document>) -> Result<ElementTree, RegistryError> {
        let mut tree = ElementTree::new(Arc::clone(&document));
        let Some(root) = MarkupNode::document_element(&document) else {
            return Ok(tree);
        };

        let root_tag = root.name().to_string();
        let load_msg = LoadingDefinition {
            root_tag: &root_tag,
            registered_types: self.declarations.len(),
        };
        let span = load_msg.span("registry_load");
        let _guard = span.enter();
        load_msg.log();

        let mut skipped = 0usize;
        let mut pending: Vec<(MarkupNode, PrefixMap, Option<ElementKey>)> =
            vec![(root, PrefixMap::new(), None)];

        while let Some((node, inherited, parent_key)) = pending.pop() {
            let map = inherited.extended_with(&node);
            let Some(declaration) = self.resolve_node(&node, &map)? else {
                TagUnresolved {
                    tag: node.name(),
                    path: &structural_path(&node)?,
                }
                .log();
                skipped += 1;
                continue;
            };

            let children = node.child_elements();
            let parent = parent_key.map(|key| tree.get(key));
            let element = instantiate(declaration, node, map.clone(), parent)?;
            let key = tree.insert(element, parent_key);

            for child in children.into_iter().rev() {
                pending.push((child, map.clone(), Some(key)));
            }
        }

        DefinitionLoaded {
            element_count: tree.len(),
            skipped_count: skipped,
        }
        .log();
        Ok(tree)
    }

    /// Open a bundled resource, searching the core bundle first and then
    /// extension bundles in registration order.
    pub fn locate_embedded_resource(&self, name: &str) -> Option<Box<dyn Read + Send>> {
        let core: &dyn ResourceBundle = &CORE_RESOURCES;
        let bundles = std::iter::once(core).chain(self.resources.iter().map(|b| b.as_ref()));

        for bundle in bundles {
            if let Some(stream) = bundle.open(name) {
                ResourceLookup {
                    resource: name,
                    bundle: Some(bundle.name()),
                }
                .log();
                return Some(stream);
            }
        }

        ResourceLookup {
            resource: name,
            bundle: None,
        }
        .log();
        None
    }

    fn candidates(
        &self,
        prefix: &str,
        local_name: &str,
        map: &PrefixMap,
    ) -> Vec<&ElementDeclaration> {
        self.declarations
            .iter()
            .filter(|declaration| declaration.claims(prefix, local_name, map))
            .collect()
    }
}

fn instantiate(
    declaration: &ElementDeclaration,
    node: MarkupNode,
    map: PrefixMap,
    parent: Option<&dyn Element>,
) -> Result<Box<dyn Element>, RegistryError> {
    if let Some(attribute) = declaration.missing_attribute(&node) {
        let path = structural_path(&node)?;
        RequiredAttributeMissing {
            attribute,
            tag: node.name(),
            path: &path,
        }
        .log();
        return Err(RegistryError::MissingRequiredAttribute {
            attribute: attribute.to_string(),
            tag: node.name().to_string(),
            path,
        });
    }

    let element = declaration.instantiate(node, map, parent);
    ElementConstructed {
        tag: element.base().node().name(),
        type_name: element.type_name(),
        element_id: element.id(),
    }
    .log();
    Ok(element)
}

fn ensure_element(node: &MarkupNode) -> Result<(), RegistryError> {
    if node.kind() == NodeKind::Element {
        Ok(())
    } else {
        Err(RegistryError::NotAnElement {
            kind: node.kind().to_string(),
        })
    }
}

fn qualified(prefix: &str, local_name: &str) -> String {
    if prefix.is_empty() {
        local_name.to_string()
    } else {
        format!("{}:{}", prefix, local_name)
    }
}
