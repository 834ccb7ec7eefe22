// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use super::Element;
use crate::markup::Document;

/// Position of an element inside an [`ElementTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementKey(usize);

/// Elements constructed from one process-definition document, in document order.
#[derive(Debug)]
pub struct ElementTree {
    document: Arc<Document>,
    elements: Vec<Box<dyn Element>>,
    parents: Vec<Option<ElementKey>>,
    children: Vec<Vec<ElementKey>>,
    roots: Vec<ElementKey>,
}

impl ElementTree {
    pub fn new(document: Arc<Document>) -> Self {
        Self {
            document,
            elements: Vec::new(),
            parents: Vec::new(),
            children: Vec::new(),
            roots: Vec::new(),
        }
    }

    pub(crate) fn insert(&mut self, element: Box<dyn Element>, parent: Option<ElementKey>) -> ElementKey {
        let key = ElementKey(self.elements.len());
        self.elements.push(element);
        self.parents.push(parent);
        self.children.push(Vec::new());
        match parent {
            Some(parent) => self.children[parent.0].push(key),
            None => self.roots.push(key),
        }
        key
    }

    pub fn document(&self) -> &Arc<Document> {
        &self.document
    }

    pub fn get(&self, key: ElementKey) -> &dyn Element {
        self.elements[key.0].as_ref()
    }

    pub fn parent(&self, key: ElementKey) -> Option<ElementKey> {
        self.parents[key.0]
    }

    pub fn children(&self, key: ElementKey) -> &[ElementKey] {
        &self.children[key.0]
    }

    pub fn roots(&self) -> &[ElementKey] {
        &self.roots
    }

    /// First element, in document order, whose `id` attribute equals `id`.
    pub fn find_by_id(&self, id: &str) -> Option<ElementKey> {
        self.iter()
            .find(|(_, element)| element.id() == Some(id))
            .map(|(key, _)| key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ElementKey, &dyn Element)> + '_ {
        self.elements
            .iter()
            .enumerate()
            .map(|(index, element)| (ElementKey(index), element.as_ref()))
    }

    /// All elements of concrete type `T`.
    pub fn of_type<T: Element + 'static>(&self) -> impl Iterator<Item = &T> + '_ {
        self.elements
            .iter()
            .filter_map(|element| element.as_ref().downcast_ref::<T>())
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
