// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Forward clicks on simulated bodies back to their source nodes.
//!
//! The world's pointer constraint already drags bodies around. The forwarder
//! listens to the same pointer stream and, using [`PressState`], activates
//! the pressed node only when the gesture was a click, never at the end of a
//! drag.

use log::debug;
use understory_press::{PressPhase, PressState};

use crate::{EntityManager, ObservableTree, PhysicsWorld, PointerEvent, PointerKind, SnapshotService};

/// Click-versus-drag classifier wired to an [`EntityManager`].
#[derive(Debug)]
pub struct InteractionForwarder<T: ObservableTree, S, W> {
    press: PressState<T::Node>,
    entities: EntityManager<T, S, W>,
}

impl<T, S, W> InteractionForwarder<T, S, W>
where
    T: ObservableTree + 'static,
    S: SnapshotService<T::Node> + 'static,
    W: PhysicsWorld + 'static,
{
    /// Creates an idle forwarder; a press becomes a drag after
    /// `drag_threshold` moves.
    pub fn new(entities: EntityManager<T, S, W>, drag_threshold: u32) -> Self {
        Self {
            press: PressState::new(drag_threshold),
            entities,
        }
    }

    /// Current gesture phase.
    pub fn phase(&self) -> PressPhase {
        self.press.phase()
    }

    /// Feeds one pointer event; returns the node that was activated, if any.
    ///
    /// On press the node behind the body under the pointer is remembered. Walls
    /// and empty space have no node, so releasing over them activates nothing.
    pub fn handle(&mut self, event: &PointerEvent) -> Option<T::Node> {
        match event.kind {
            PointerKind::Down => {
                let target = event.body.and_then(|body| self.entities.node_for_body(body));
                self.press.on_down(target);
                None
            }
            PointerKind::Move => {
                self.press.on_move();
                None
            }
            PointerKind::Up => {
                let node = self.press.on_up().clicked()?;
                debug!("forwarding click to {node:?}");
                self.entities.tree().activate(&node);
                Some(node)
            }
        }
    }

    /// Registers the forwarder on the world's pointer constraint.
    pub fn attach(mut self, world: &mut W) {
        world.on_pointer(Box::new(move |event| {
            self.handle(&event);
        }));
    }
}
