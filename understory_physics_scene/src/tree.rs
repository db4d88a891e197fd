// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The observable host tree: change notifications, activation and styling.

use std::borrow::Cow;

use understory_entity_select::TreeView;

use crate::MissingHostContext;

bitflags::bitflags! {
    /// Why a node reported a change.
    ///
    /// Hosts typically have several notification sources (input events,
    /// attribute observers, child-list observers). They all funnel into one
    /// listener; the cause only feeds diagnostics and coalescing, every cause
    /// triggers the same resync.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ChangeCause: u8 {
        /// The node's value changed (text input, checkbox state, ...).
        const VALUE     = 0b0000_0001;
        /// An attribute of the node or a descendant changed.
        const ATTRIBUTE = 0b0000_0010;
        /// Children were added or removed somewhere below the node.
        const STRUCTURE = 0b0000_0100;
    }
}

/// Handle for a registered change listener, minted by the host.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Wraps a host-specific listener id.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the host-specific listener id.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Callback invoked by the host whenever a watched node changes.
pub type ChangeListener = Box<dyn FnMut(ChangeCause)>;

/// A small style override applied to entity nodes before they are captured.
///
/// The host tags every entity with `marker` and scopes `style` to that marker,
/// so nodes that are not entities are left untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Normalization {
    /// Marker attached to each entity node.
    pub marker: Cow<'static, str>,
    /// Declarations applied to marked nodes.
    pub style: Cow<'static, str>,
}

impl Normalization {
    /// Shrink-wraps each entity to its content so its snapshot has no slack.
    pub const fn shrink() -> Self {
        Self {
            marker: Cow::Borrowed("understory-entity"),
            style: Cow::Borrowed("display: inline-block; width: max-content; margin: 0;"),
        }
    }
}

impl Default for Normalization {
    fn default() -> Self {
        Self::shrink()
    }
}

/// A host UI tree that reports changes and can replay activations.
///
/// All methods take `&self`; hosts are expected to use interior mutability.
/// Listeners may be invoked at any time after registration, but never while
/// the host is inside one of these methods on behalf of the scene.
pub trait ObservableTree: TreeView {
    /// Calls `listener` whenever `node`, or anything below it, changes.
    fn on_changed(&self, node: &Self::Node, listener: ChangeListener) -> ListenerId;

    /// Unregisters a listener. Unknown ids are ignored.
    fn remove_listener(&self, id: ListenerId);

    /// Simulates the node's native click and focus behavior.
    fn activate(&self, node: &Self::Node);

    /// Marks `nodes` and applies `normalization` to them.
    fn apply_normalization(
        &self,
        nodes: &[Self::Node],
        normalization: &Normalization,
    ) -> Result<(), MissingHostContext>;
}
