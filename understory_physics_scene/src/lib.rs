// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Physics Scene: mirror a live UI tree into a rigid-body simulation.
//!
//! Given a subtree of a host UI, this crate picks the nodes that should fall,
//! bounce and be thrown around, captures each as a bitmap, gives it a textured
//! rectangle body in an external physics world, keeps that body in sync as the
//! node changes, and forwards clicks on bodies back to their nodes so the UI
//! keeps working.
//!
//! ## Layering
//!
//! The crate never simulates, rasterizes or lays out anything itself. Hosts
//! supply three capabilities:
//!
//! - [`ObservableTree`]: the UI tree, its geometry, change notifications and
//!   native activation (built on [`TreeView`]);
//! - [`SnapshotService`]: a rasterizer for a single node;
//! - [`PhysicsWorld`]: a rigid-body engine with a renderer and a pointer
//!   constraint.
//!
//! On top of those it provides:
//!
//! - entity selection, via [`understory_entity_select`];
//! - [`Boundaries`]: four static walls enclosing the scene;
//! - [`EntityManager`]: body creation and change-driven resync;
//! - [`InteractionForwarder`]: click-versus-drag classification, via
//!   [`understory_press`];
//! - [`Scene`]: the orchestrator tying it all together.
//!
//! ## Workflow
//!
//! ```rust,ignore
//! use std::rc::Rc;
//! use futures::executor::LocalPool;
//! use understory_entity_select::{EntitySpec, Leaf};
//! use understory_physics_scene::{Scene, SceneConfig};
//!
//! let mut pool = LocalPool::new();
//! let spawner = Rc::new(pool.spawner());
//! let config = SceneConfig::new(EntitySpec::new(Leaf).with_selectors(["button", "input"]));
//! let scene = pool
//!     .run_until(Scene::build(tree, root, rasterizer, world, spawner, config))
//!     .expect("physics world failed to start");
//! // Keep polling `pool` from the host's event loop so resyncs make progress.
//! ```
//!
//! ## Coordinates
//!
//! Scene space has its origin at the root container's top-left corner (see
//! [`SceneFrame`]). A node occupying `rect` spawns a body of the same size
//! positioned at `(rect.x0 + rect.width() / 2, rect.y0)`.
//!
//! ## Concurrency
//!
//! Everything runs on one thread. The world's loops run on their own schedule;
//! captures are `async` and resyncs are spawned on a caller-provided
//! [`LocalSpawn`](futures::task::LocalSpawn). Resyncs for one node never
//! overlap, and body replacement is a single synchronous world mutation.
//!
//! ## Failures
//!
//! Per-node problems (a predicate error, a failed capture, a host that cannot
//! apply styling) are logged with [`log`] and skipped. Only a world that fails
//! to configure aborts [`Scene::build`].

mod boundary;
mod entity;
mod error;
mod forward;
mod frame;
mod options;
mod scene;
mod snapshot;
mod tree;
mod world;

pub use boundary::{Boundaries, WALL_THICKNESS, WallRects};
pub use entity::{EntityManager, PhysicsBodyEntity};
pub use error::{MissingHostContext, SceneError, SnapshotError, WorldError};
pub use forward::InteractionForwarder;
pub use frame::{SceneFrame, spawn_point};
pub use options::{BodyMaterial, EngineOptions, PhysicsOptions, PointerOptions, SceneConfig};
pub use scene::Scene;
pub use snapshot::{SnapshotAdapter, SnapshotService};
pub use tree::{ChangeCause, ChangeListener, ListenerId, Normalization, ObservableTree};
pub use understory_entity_select::TreeView;
pub use world::{
    BodyDesc, BodyHandle, Kinematics, PhysicsWorld, PointerEvent, PointerHandler, PointerKind,
    Visual,
};
