// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The entity walk.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use hashbrown::HashSet;
use log::warn;

use crate::{EntityPredicate, EntitySet, TreeView};

/// How to classify the nodes of a tree.
///
/// Read-only for the duration of a walk.
#[derive(Clone, Debug, Default)]
pub struct EntitySpec<P> {
    /// Direct-child selectors; a matching child is always an entity.
    pub selectors: Vec<String>,
    /// Decides children that no selector matched.
    pub predicate: P,
}

impl<P> EntitySpec<P> {
    /// Creates a classification with no selectors.
    pub fn new(predicate: P) -> Self {
        Self {
            selectors: Vec::new(),
            predicate,
        }
    }

    /// Appends a direct-child selector.
    #[must_use]
    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selectors.push(selector.into());
        self
    }

    /// Appends several direct-child selectors, keeping their order.
    #[must_use]
    pub fn with_selectors<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selectors.extend(selectors.into_iter().map(Into::into));
        self
    }
}

/// Walks the tree below `container` and returns its entities.
///
/// See the [crate docs](crate) for the rules. `container` itself is never part
/// of the result. Each node is visited at most once, even if the host reports
/// it under several parents.
pub async fn select<T, P>(tree: &T, container: &T::Node, spec: &EntitySpec<P>) -> EntitySet<T::Node>
where
    T: TreeView + ?Sized,
    P: EntityPredicate<T>,
{
    let mut found = EntitySet::new();
    let mut visited: HashSet<T::Node> = HashSet::new();
    visited.insert(container.clone());
    let mut pending = vec![container.clone()];

    while let Some(current) = pending.pop() {
        let children = tree.children(&current);

        for child in &children {
            if spec
                .selectors
                .iter()
                .any(|selector| tree.matches_selector(child, selector))
            {
                visited.insert(child.clone());
                found.insert(child.clone());
            }
        }

        let mut containers = Vec::new();
        for child in children {
            if found.contains(&child) || !visited.insert(child.clone()) {
                continue;
            }
            match spec.predicate.is_entity(tree, &child).await {
                Ok(true) => {
                    found.insert(child);
                }
                Ok(false) => containers.push(child),
                Err(err) => {
                    warn!("entity predicate failed for {child:?}, skipping its subtree: {err}");
                }
            }
        }

        // Reversed so that the stack pops siblings in document order.
        pending.extend(containers.into_iter().rev());
    }

    found.retain(|node| !tree.bounding_rect(node).is_zero_area());
    found
}
