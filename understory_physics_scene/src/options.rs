// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene and physics configuration.
//!
//! Every physics field is optional. `None` means "use the world's own
//! default"; this crate never substitutes a number of its own.

use kurbo::Vec2;
use peniko::Color;
use understory_entity_select::EntitySpec;
use understory_press::DEFAULT_DRAG_THRESHOLD;

use crate::Normalization;

/// Solver and gravity settings for the whole world.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineOptions {
    /// Position solver iterations per step.
    pub position_iterations: Option<u32>,
    /// Velocity solver iterations per step.
    pub velocity_iterations: Option<u32>,
    /// Constraint solver iterations per step.
    pub constraint_iterations: Option<u32>,
    /// Gravity direction and magnitude.
    pub gravity: Option<Vec2>,
    /// Multiplier applied to `gravity`.
    pub gravity_scale: Option<f64>,
}

/// Material applied to every entity body.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BodyMaterial {
    /// Mass per unit area.
    pub density: Option<f64>,
    /// Surface friction.
    pub friction: Option<f64>,
    /// Drag applied while moving through the air.
    pub friction_air: Option<f64>,
    /// Bounciness.
    pub restitution: Option<f64>,
    /// Pins entity bodies in place while keeping them collidable.
    pub is_static: Option<bool>,
}

/// Pointer-constraint spring settings.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PointerOptions {
    /// Spring stiffness between pointer and grabbed body.
    pub stiffness: Option<f64>,
    /// Spring damping.
    pub damping: Option<f64>,
}

/// Everything handed to [`PhysicsWorld::configure`](crate::PhysicsWorld::configure),
/// plus the per-body material.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PhysicsOptions {
    /// World-wide solver and gravity settings.
    pub engine: EngineOptions,
    /// Material for entity bodies.
    pub body: BodyMaterial,
    /// Pointer-constraint settings.
    pub pointer: PointerOptions,
}

/// Configuration of one scene build.
#[derive(Clone, Debug)]
pub struct SceneConfig<P> {
    /// Which nodes become entities.
    pub entities: EntitySpec<P>,
    /// Cosmetic normalization applied to entities before capture.
    pub normalization: Option<Normalization>,
    /// Physics settings.
    pub physics: PhysicsOptions,
    /// Render loop clear color; `None` keeps the world's default.
    pub background: Option<Color>,
    /// Pointer moves after which a press stops being a click.
    pub drag_threshold: u32,
}

impl<P> SceneConfig<P> {
    /// Creates a configuration with the given entity rules and defaults for
    /// everything else.
    pub fn new(entities: EntitySpec<P>) -> Self {
        Self {
            entities,
            normalization: Some(Normalization::shrink()),
            physics: PhysicsOptions::default(),
            background: None,
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
        }
    }

    /// Replaces the physics settings.
    #[must_use]
    pub fn with_physics(mut self, physics: PhysicsOptions) -> Self {
        self.physics = physics;
        self
    }

    /// Replaces (or disables, with `None`) the cosmetic normalization.
    #[must_use]
    pub fn with_normalization(mut self, normalization: Option<Normalization>) -> Self {
        self.normalization = normalization;
        self
    }

    /// Sets the render clear color.
    #[must_use]
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = Some(background);
        self
    }

    /// Sets the click/drag threshold.
    #[must_use]
    pub fn with_drag_threshold(mut self, threshold: u32) -> Self {
        self.drag_threshold = threshold;
        self
    }
}
