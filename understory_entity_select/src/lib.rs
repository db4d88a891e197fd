// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Entity Select: decide which nodes of a UI tree become entities.
//!
//! A scene that mirrors a UI tree into some other representation (a physics
//! simulation, a 3D stage, an overview map) rarely wants every node. Leaf-like
//! nodes such as buttons, labels and inputs should become standalone
//! *entities*; wrappers such as lists and layout boxes should be looked through
//! as *containers*. This crate performs that partition.
//!
//! ## Rules
//!
//! [`select`] walks the tree from a container and, at every level:
//!
//! 1. Adds each direct child that matches one of the [`EntitySpec::selectors`].
//!    Selector matches always win, regardless of the predicate.
//! 2. Asks the [`EntityPredicate`] about every remaining direct child. `true`
//!    makes the child an entity (its subtree is not visited); `false` makes it a
//!    container whose own children are considered next.
//! 3. Finally drops every selected node whose bounding rectangle has zero area.
//!
//! Selectors are evaluated against direct children only, so the same selector
//! decides each level independently. A predicate error skips that child's
//! subtree with a warning; siblings are unaffected.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_entity_select::{EntitySpec, Leaf, TreeView, select};
//!
//! // A tiny tree: 0 = root, 1 = <button>, 2 = <div>, 3 = <span> inside the div.
//! struct Doc;
//!
//! impl TreeView for Doc {
//!     type Node = u32;
//!
//!     fn children(&self, node: &u32) -> Vec<u32> {
//!         match node {
//!             0 => vec![1, 2],
//!             2 => vec![3],
//!             _ => vec![],
//!         }
//!     }
//!
//!     fn bounding_rect(&self, _: &u32) -> Rect {
//!         Rect::new(0.0, 0.0, 10.0, 10.0)
//!     }
//!
//!     fn matches_selector(&self, node: &u32, selector: &str) -> bool {
//!         selector == "button" && *node == 1
//!     }
//! }
//!
//! let spec = EntitySpec::new(Leaf).with_selector("button");
//! let entities = futures::executor::block_on(select(&Doc, &0, &spec));
//! assert_eq!(entities.as_slice(), &[1, 3]);
//! ```
//!
//! ## Async predicates
//!
//! [`EntityPredicate::is_entity`] is an `async fn` so that a predicate can wait
//! on host state (for example a pending layout or resource load). The walk
//! awaits one predicate at a time and visits each node exactly once, so results
//! are deterministic and ordered: parents' selector matches come before their
//! predicate matches, and siblings keep document order.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod predicate;
mod set;
mod tree;
mod walk;

pub use predicate::{EntityPredicate, FnPredicate, Leaf, predicate_fn};
pub use set::EntitySet;
pub use tree::TreeView;
pub use walk::{EntitySpec, select};
