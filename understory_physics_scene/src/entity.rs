// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Entity lifecycle: capture, body creation, and resync on change.
//!
//! ## Ownership
//!
//! Each entity node maps to at most one live body. The manager keeps the
//! association in both directions (`node -> body` and `body -> node`); nothing
//! is stored on the body itself.
//!
//! ## Resync
//!
//! Every host notification for an entity funnels into
//! [`EntityManager::notify`]. At most one resync per entity runs at a time; a
//! notification that arrives while one is in flight merges its cause into a
//! pending set, and the running task goes around once more when it finishes.
//! That second pass re-reads the node, so the newest state always wins and
//! intermediate captures are simply never made.
//!
//! A resync compares the node's current size with the size its body was built
//! for:
//!
//! - same size: only the texture is replaced; the body and its motion are
//!   untouched;
//! - different size: the body is destroyed and a new one is created at the old
//!   position with the old velocity, angle and angular velocity.
//!
//! The replacement happens inside one borrow of the world, so a simulation step
//! can never observe the entity with zero or two bodies.

use std::cell::RefCell;
use std::fmt;
use std::mem;
use std::rc::{Rc, Weak};

use futures::task::{LocalSpawn, LocalSpawnExt};
use hashbrown::HashMap;
use kurbo::{Rect, Size};
use log::{debug, warn};
use peniko::ImageData;

use crate::frame::spawn_point;
use crate::{
    BodyDesc, BodyHandle, BodyMaterial, ChangeCause, Kinematics, ListenerId, ObservableTree,
    PhysicsWorld, SceneFrame, SnapshotAdapter, SnapshotService, Visual,
};

/// Public view of a simulated node.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PhysicsBodyEntity {
    /// The live body, or `None` while the node could not be captured yet.
    pub body: Option<BodyHandle>,
    /// Size the current body was built for.
    pub size: Size,
    /// Motion state recorded when the current body was created.
    pub kinematics: Kinematics,
}

#[derive(Default)]
struct SyncSlot {
    in_flight: bool,
    pending: ChangeCause,
}

struct Slot {
    entity: PhysicsBodyEntity,
    listener: ListenerId,
    sync: SyncSlot,
}

struct Registry<N> {
    slots: HashMap<N, Slot>,
    owners: HashMap<BodyHandle, N>,
    closed: bool,
}

struct Shared<T: ObservableTree, S, W> {
    tree: Rc<T>,
    snapshots: SnapshotAdapter<S>,
    world: Weak<RefCell<W>>,
    frame: SceneFrame,
    material: BodyMaterial,
    spawner: Rc<dyn LocalSpawn>,
    registry: RefCell<Registry<T::Node>>,
}

/// Owns the node/body association and keeps bodies in sync with their nodes.
///
/// Cloning is cheap; clones share the same registry.
pub struct EntityManager<T: ObservableTree, S, W> {
    shared: Rc<Shared<T, S, W>>,
}

impl<T: ObservableTree, S, W> Clone for EntityManager<T, S, W> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T: ObservableTree, S, W> fmt::Debug for EntityManager<T, S, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.shared.registry.borrow();
        f.debug_struct("EntityManager")
            .field("entities", &registry.slots.len())
            .field("closed", &registry.closed)
            .finish_non_exhaustive()
    }
}

impl<T, S, W> EntityManager<T, S, W>
where
    T: ObservableTree + 'static,
    S: SnapshotService<T::Node> + 'static,
    W: PhysicsWorld + 'static,
{
    /// Creates an empty manager.
    ///
    /// The manager only holds a weak reference to `world`; once the world is
    /// dropped, pending work is discarded. Resync tasks are spawned on
    /// `spawner`.
    pub fn new(
        tree: Rc<T>,
        snapshots: S,
        world: &Rc<RefCell<W>>,
        frame: SceneFrame,
        material: BodyMaterial,
        spawner: Rc<dyn LocalSpawn>,
    ) -> Self {
        Self {
            shared: Rc::new(Shared {
                tree,
                snapshots: SnapshotAdapter::new(snapshots),
                world: Rc::downgrade(world),
                frame,
                material,
                spawner,
                registry: RefCell::new(Registry {
                    slots: HashMap::new(),
                    owners: HashMap::new(),
                    closed: false,
                }),
            }),
        }
    }

    /// The host tree.
    pub fn tree(&self) -> &Rc<T> {
        &self.shared.tree
    }

    /// Starts watching `node`, captures it, and gives it a body.
    ///
    /// Returns the new body. If the capture fails the node is still watched
    /// and its next change retries; `None` is returned. Calling this again for
    /// a known node returns its current body without doing anything else.
    ///
    /// The node is watched before the capture starts. A change reported while
    /// the capture is pending is queued like any other change during a
    /// resync, and runs as soon as the body exists.
    pub async fn create_entity(&self, node: T::Node) -> Option<BodyHandle> {
        {
            let registry = self.shared.registry.borrow();
            if registry.closed {
                return None;
            }
            if let Some(slot) = registry.slots.get(&node) {
                return slot.entity.body;
            }
        }

        let rect = self.scene_rect(&node);
        let motion = Kinematics {
            position: spawn_point(rect),
            ..Kinematics::default()
        };
        let listener = self.listen(&node);
        self.shared.registry.borrow_mut().slots.insert(
            node.clone(),
            Slot {
                entity: PhysicsBodyEntity {
                    body: None,
                    size: rect.size(),
                    kinematics: motion,
                },
                listener,
                sync: SyncSlot {
                    in_flight: true,
                    pending: ChangeCause::empty(),
                },
            },
        );

        let captured = self.shared.snapshots.capture(&node).await;
        let world = self.shared.world.upgrade();

        let mut registry = self.shared.registry.borrow_mut();
        if registry.closed {
            // Torn down while the capture was pending; teardown already
            // removed the listener and there is no body yet.
            return None;
        }
        let Registry { slots, owners, .. } = &mut *registry;
        let slot = slots.get_mut(&node)?;
        let body = match (captured, world) {
            (Ok(image), Some(world)) => {
                let body = world
                    .borrow_mut()
                    .create_body(self.body_desc(motion, rect.size(), image));
                debug!("created body {body:?} for {node:?}");
                owners.insert(body, node.clone());
                slot.entity.body = Some(body);
                Some(body)
            }
            (Ok(_), None) => None,
            (Err(err), _) => {
                warn!("could not capture {node:?}, leaving it unsimulated until it changes: {err}");
                None
            }
        };

        let pending = mem::take(&mut slot.sync.pending);
        if pending.is_empty() {
            slot.sync.in_flight = false;
        } else {
            drop(registry);
            debug!("{node:?} changed during its first capture, resyncing");
            self.spawn_resync(&node, pending);
        }
        body
    }

    /// Entry point for every change notification of an entity node.
    ///
    /// Starts a resync task, or folds `cause` into the pending set if one is
    /// already running for `node`. Notifications for unknown nodes are
    /// ignored.
    pub fn notify(&self, node: &T::Node, cause: ChangeCause) {
        {
            let mut registry = self.shared.registry.borrow_mut();
            if registry.closed {
                return;
            }
            let Some(slot) = registry.slots.get_mut(node) else {
                return;
            };
            if slot.sync.in_flight {
                slot.sync.pending |= cause;
                debug!("resync of {node:?} already running, queued {cause:?}");
                return;
            }
            slot.sync.in_flight = true;
        }
        self.spawn_resync(node, cause);
    }

    /// Runs `drive_resync` for a node whose slot is already marked in flight.
    fn spawn_resync(&self, node: &T::Node, cause: ChangeCause) {
        let this = self.clone();
        let target = node.clone();
        let task = async move { this.drive_resync(target, cause).await };
        if let Err(err) = self.shared.spawner.spawn_local(task) {
            warn!("could not spawn resync for {node:?}: {err}");
            if let Some(slot) = self.shared.registry.borrow_mut().slots.get_mut(node) {
                slot.sync.in_flight = false;
                slot.sync.pending = ChangeCause::empty();
            }
        }
    }

    /// Body currently representing `node`.
    pub fn body_for_node(&self, node: &T::Node) -> Option<BodyHandle> {
        let registry = self.shared.registry.borrow();
        registry.slots.get(node).and_then(|slot| slot.entity.body)
    }

    /// Node represented by `body`, if it is an entity body.
    pub fn node_for_body(&self, body: BodyHandle) -> Option<T::Node> {
        self.shared.registry.borrow().owners.get(&body).cloned()
    }

    /// Current state of the entity for `node`.
    pub fn entity(&self, node: &T::Node) -> Option<PhysicsBodyEntity> {
        let registry = self.shared.registry.borrow();
        registry.slots.get(node).map(|slot| slot.entity)
    }

    /// Number of entities, including ones still waiting for a capture.
    pub fn len(&self) -> usize {
        self.shared.registry.borrow().slots.len()
    }

    /// Returns `true` if there are no entities.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` while the first capture or a resync of `node` is running
    /// or queued.
    pub fn is_syncing(&self, node: &T::Node) -> bool {
        let registry = self.shared.registry.borrow();
        registry
            .slots
            .get(node)
            .is_some_and(|slot| slot.sync.in_flight)
    }

    /// Stops watching every node and destroys every entity body.
    ///
    /// Later notifications and in-flight resyncs become no-ops.
    pub fn teardown(&self) {
        let slots = {
            let mut registry = self.shared.registry.borrow_mut();
            registry.closed = true;
            registry.owners.clear();
            mem::take(&mut registry.slots)
        };
        let world = self.shared.world.upgrade();
        for slot in slots.values() {
            self.shared.tree.remove_listener(slot.listener);
            if let (Some(body), Some(world)) = (slot.entity.body, &world) {
                world.borrow_mut().destroy_body(body);
            }
        }
        debug!("tore down {} entities", slots.len());
    }

    async fn drive_resync(&self, node: T::Node, mut cause: ChangeCause) {
        loop {
            self.resync(&node, cause).await;

            let mut registry = self.shared.registry.borrow_mut();
            let closed = registry.closed;
            let Some(slot) = registry.slots.get_mut(&node) else {
                return;
            };
            if closed || slot.sync.pending.is_empty() {
                slot.sync.in_flight = false;
                return;
            }
            cause = mem::take(&mut slot.sync.pending);
        }
    }

    async fn resync(&self, node: &T::Node, cause: ChangeCause) {
        debug!("resyncing {node:?} after {cause:?}");
        let rect = self.scene_rect(node);
        let image = match self.shared.snapshots.capture(node).await {
            Ok(image) => image,
            Err(err) => {
                warn!("could not recapture {node:?}, keeping its previous texture: {err}");
                return;
            }
        };
        if rect.is_zero_area() {
            debug!("{node:?} collapsed to zero size, keeping its previous body");
            return;
        }
        let Some(world) = self.shared.world.upgrade() else {
            return;
        };

        let mut registry = self.shared.registry.borrow_mut();
        if registry.closed {
            return;
        }
        let Registry { slots, owners, .. } = &mut *registry;
        let Some(slot) = slots.get_mut(node) else {
            return;
        };
        let entity = &mut slot.entity;
        let size = rect.size();
        let mut world = world.borrow_mut();

        match entity.body {
            None => {
                let motion = Kinematics {
                    position: spawn_point(rect),
                    ..Kinematics::default()
                };
                let body = world.create_body(self.body_desc(motion, size, image));
                debug!("created body {body:?} for {node:?} on retry");
                owners.insert(body, node.clone());
                *entity = PhysicsBodyEntity {
                    body: Some(body),
                    size,
                    kinematics: motion,
                };
            }
            Some(body) if entity.size == size => {
                world.set_visual(body, Visual::fit(image, size));
                debug!("retextured {body:?} for {node:?}");
            }
            Some(old) => {
                let motion = world.kinematics(old).unwrap_or(entity.kinematics);
                world.destroy_body(old);
                let body = world.create_body(self.body_desc(motion, size, image));
                world.set_velocity(body, motion.velocity);
                world.set_angle(body, motion.angle);
                world.set_angular_velocity(body, motion.angular_velocity);
                debug!(
                    "replaced {old:?} with {body:?} for {node:?}: {:?} -> {size:?}",
                    entity.size
                );
                owners.remove(&old);
                owners.insert(body, node.clone());
                *entity = PhysicsBodyEntity {
                    body: Some(body),
                    size,
                    kinematics: motion,
                };
            }
        }
    }

    fn listen(&self, node: &T::Node) -> ListenerId {
        let shared = Rc::downgrade(&self.shared);
        let target = node.clone();
        self.shared.tree.on_changed(
            node,
            Box::new(move |cause| {
                if let Some(shared) = shared.upgrade() {
                    EntityManager { shared }.notify(&target, cause);
                }
            }),
        )
    }

    fn scene_rect(&self, node: &T::Node) -> Rect {
        self.shared
            .frame
            .to_scene(self.shared.tree.bounding_rect(node))
    }

    fn body_desc(&self, motion: Kinematics, size: Size, image: ImageData) -> BodyDesc {
        BodyDesc {
            position: motion.position,
            size,
            material: self.shared.material,
            visual: Visual::fit(image, size),
        }
    }
}
