// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene orchestration.

use std::cell::RefCell;
use std::rc::Rc;

use futures::task::LocalSpawn;
use log::{debug, info, warn};
use understory_entity_select::{EntityPredicate, select};

use crate::{
    Boundaries, EntityManager, InteractionForwarder, ObservableTree, PhysicsWorld, SceneConfig,
    SceneError, SceneFrame, SnapshotService,
};

/// A running physics scene mirroring a subtree of the host UI.
///
/// Holds the only strong reference to the world; dropping the scene lets
/// in-flight resyncs wind down without touching the world again.
pub struct Scene<T: ObservableTree, S, W: PhysicsWorld> {
    world: Rc<RefCell<W>>,
    entities: EntityManager<T, S, W>,
    boundaries: Boundaries,
    frame: SceneFrame,
}

impl<T: ObservableTree, S, W: PhysicsWorld> std::fmt::Debug for Scene<T, S, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("entities", &self.entities)
            .field("boundaries", &self.boundaries)
            .field("frame", &self.frame)
            .finish_non_exhaustive()
    }
}

impl<T, S, W> Scene<T, S, W>
where
    T: ObservableTree + 'static,
    S: SnapshotService<T::Node> + 'static,
    W: PhysicsWorld + 'static,
{
    /// Builds the scene for the subtree under `root` and starts simulating.
    ///
    /// In order:
    ///
    /// 1. configure `world` (the only fatal step);
    /// 2. enclose the root's footprint with walls;
    /// 3. select entities and apply the cosmetic normalization to them;
    /// 4. capture each entity and give it a body;
    /// 5. attach the click forwarder;
    /// 6. start the simulation and render loops.
    ///
    /// The loops only start once every entity has been captured, so the first
    /// rendered frame already shows the complete scene. Resyncs triggered
    /// later run on `spawner`.
    pub async fn build<P>(
        tree: Rc<T>,
        root: T::Node,
        snapshots: S,
        mut world: W,
        spawner: Rc<dyn LocalSpawn>,
        config: SceneConfig<P>,
    ) -> Result<Self, SceneError>
    where
        P: EntityPredicate<T>,
    {
        world.configure(&config.physics)?;

        let frame = SceneFrame::from_root_rect(tree.bounding_rect(&root));
        let boundaries = Boundaries::build(&mut world, frame.size());
        let world = Rc::new(RefCell::new(world));

        let selected = select(&*tree, &root, &config.entities).await;
        debug!("selected {} entities under {root:?}", selected.len());
        if let Some(normalization) = &config.normalization
            && let Err(err) = tree.apply_normalization(selected.as_slice(), normalization)
        {
            warn!("building the scene without normalization: {err}");
        }

        let entities = EntityManager::new(
            tree,
            snapshots,
            &world,
            frame,
            config.physics.body,
            spawner,
        );
        for node in selected {
            entities.create_entity(node).await;
        }

        {
            let mut world = world.borrow_mut();
            InteractionForwarder::new(entities.clone(), config.drag_threshold).attach(&mut world);
            world.start_runner();
            world.start_render(config.background);
        }
        info!(
            "scene started with {} entities in a {:?} frame",
            entities.len(),
            frame.size()
        );

        Ok(Self {
            world,
            entities,
            boundaries,
            frame,
        })
    }

    /// The physics world.
    pub fn world(&self) -> &Rc<RefCell<W>> {
        &self.world
    }

    /// The surface the world renders to.
    pub fn canvas(&self) -> W::Canvas {
        self.world.borrow().canvas()
    }

    /// The entity registry.
    pub fn entities(&self) -> &EntityManager<T, S, W> {
        &self.entities
    }

    /// The scene walls.
    pub fn boundaries(&self) -> Boundaries {
        self.boundaries
    }

    /// The scene's footprint in tree coordinates.
    pub fn frame(&self) -> SceneFrame {
        self.frame
    }

    /// Stops the loops, unregisters every listener and removes every body.
    pub fn teardown(self) {
        self.world.borrow_mut().stop();
        self.entities.teardown();
        let mut world = self.world.borrow_mut();
        for wall in self.boundaries.handles() {
            world.destroy_body(wall);
        }
    }
}
