// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read-only view of a host UI tree.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use kurbo::Rect;

/// Read access to a host UI tree.
///
/// The tree is owned by the host; this trait only exposes what the entity walk
/// needs. Layout is never computed here: positions and sizes are read as the
/// host last laid them out.
pub trait TreeView {
    /// Identity of a node, stable across mutations of that node.
    type Node: Clone + Eq + Hash + Debug;

    /// Direct children of `node`, in document order.
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Rendered bounds of `node` in the tree's shared coordinate space.
    fn bounding_rect(&self, node: &Self::Node) -> Rect;

    /// Returns `true` if `node` itself matches `selector`.
    ///
    /// The walk only ever calls this on direct children of the container
    /// being visited, so implementations should not consider ancestors or
    /// descendants beyond what `selector` itself expresses.
    fn matches_selector(&self, node: &Self::Node, selector: &str) -> bool;
}
