// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Entity predicates: semantic "is this node an entity?" tests.

use core::convert::Infallible;
use core::fmt;

use crate::TreeView;

/// Decides whether a node not matched by a selector is an entity.
///
/// Returning `Ok(false)` marks the node as a container; the walk then looks at
/// its children. Returning an error skips the node and its subtree.
#[allow(
    async_fn_in_trait,
    reason = "the walk runs on a single-threaded host; no Send bound is wanted"
)]
pub trait EntityPredicate<T: TreeView + ?Sized> {
    /// Error reported when the predicate cannot decide.
    type Error: fmt::Display;

    /// Returns whether `node` is an entity.
    async fn is_entity(&self, tree: &T, node: &T::Node) -> Result<bool, Self::Error>;
}

/// Predicate matching nodes without children.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Leaf;

impl<T: TreeView + ?Sized> EntityPredicate<T> for Leaf {
    type Error = Infallible;

    async fn is_entity(&self, tree: &T, node: &T::Node) -> Result<bool, Infallible> {
        Ok(tree.children(node).is_empty())
    }
}

/// Adapter turning a synchronous closure into an [`EntityPredicate`].
///
/// Build one with [`predicate_fn`].
#[derive(Clone, Copy)]
pub struct FnPredicate<F>(F);

impl<F> fmt::Debug for FnPredicate<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPredicate").finish_non_exhaustive()
    }
}

/// Wraps a synchronous `Fn(&tree, &node) -> bool` as a predicate.
///
/// ```rust
/// use understory_entity_select::{EntitySpec, predicate_fn};
///
/// // Treat every node whose id is even as an entity.
/// let spec = EntitySpec::new(predicate_fn(|_tree: &(), node: &u32| node % 2 == 0))
///     .with_selector("button");
/// assert_eq!(spec.selectors, ["button"]);
/// ```
pub fn predicate_fn<F>(f: F) -> FnPredicate<F> {
    FnPredicate(f)
}

impl<T, F> EntityPredicate<T> for FnPredicate<F>
where
    T: TreeView + ?Sized,
    F: Fn(&T, &T::Node) -> bool,
{
    type Error = Infallible;

    async fn is_entity(&self, tree: &T, node: &T::Node) -> Result<bool, Infallible> {
        Ok((self.0)(tree, node))
    }
}
