// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The physics world contract.
//!
//! The scene never simulates anything itself. It drives an external engine
//! through [`PhysicsWorld`]: create and destroy bodies, read and restore their
//! motion, swap textures, and listen to the engine's pointer constraint.

use kurbo::{Point, Rect, Size, Vec2};
use peniko::{Color, ImageData};

use crate::{BodyMaterial, PhysicsOptions, WorldError};

/// Opaque handle of a body, minted by the physics world.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(u64);

impl BodyHandle {
    /// Wraps a world-specific body id.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the world-specific body id.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Motion state of a body.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Kinematics {
    /// Body position (center of mass) in scene space.
    pub position: Point,
    /// Linear velocity.
    pub velocity: Vec2,
    /// Rotation in radians.
    pub angle: f64,
    /// Angular velocity in radians per step.
    pub angular_velocity: f64,
}

/// Texture of a body: a bitmap and the scale that fits it onto the body.
#[derive(Clone, Debug)]
pub struct Visual {
    /// Captured bitmap.
    pub image: ImageData,
    /// Per-axis factor mapping bitmap pixels to body units.
    pub scale: Vec2,
}

impl Visual {
    /// Scales `image` so that it exactly covers a body of `size`.
    ///
    /// Snapshots are often rendered at a device pixel ratio other than one, so
    /// the bitmap and the body rarely agree on dimensions.
    pub fn fit(image: ImageData, size: Size) -> Self {
        let scale = Vec2::new(
            size.width / f64::from(image.width.max(1)),
            size.height / f64::from(image.height.max(1)),
        );
        Self { image, scale }
    }
}

/// Everything needed to create a dynamic, textured rectangle body.
#[derive(Clone, Debug)]
pub struct BodyDesc {
    /// Spawn position in scene space.
    pub position: Point,
    /// Body width and height.
    pub size: Size,
    /// Material overrides; unset fields use the world's defaults.
    pub material: BodyMaterial,
    /// Texture drawn on the body.
    pub visual: Visual,
}

/// Phase of a pointer-constraint notification.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// The pointer was pressed.
    Down,
    /// The pointer moved.
    Move,
    /// The pointer was released.
    Up,
}

/// A pointer-constraint notification from the physics world.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerEvent {
    /// What happened.
    pub kind: PointerKind,
    /// Pointer position in scene space.
    pub position: Point,
    /// The body under the pointer when the event was dispatched.
    pub body: Option<BodyHandle>,
}

impl PointerEvent {
    /// Builds an event using the world's current body under the pointer.
    pub fn from_world<W: PhysicsWorld + ?Sized>(
        world: &W,
        kind: PointerKind,
        position: Point,
    ) -> Self {
        Self {
            kind,
            position,
            body: world.body_under_pointer(),
        }
    }
}

/// Callback registered on the world's pointer constraint.
pub type PointerHandler = Box<dyn FnMut(PointerEvent)>;

/// An external rigid-body engine with a renderer and a pointer constraint.
///
/// The world may dispatch pointer events from inside its own step; handlers
/// registered by the scene never call back into the world.
pub trait PhysicsWorld {
    /// Surface the world renders to, handed back to the scene's caller.
    type Canvas: Clone;

    /// Applies engine, gravity and pointer-constraint options.
    ///
    /// This is the only fallible setup step; its error aborts scene
    /// construction.
    fn configure(&mut self, options: &PhysicsOptions) -> Result<(), WorldError>;

    /// Adds an invisible, immovable rectangle.
    fn create_static_body(&mut self, rect: Rect) -> BodyHandle;

    /// Adds a dynamic, textured rectangle.
    fn create_body(&mut self, desc: BodyDesc) -> BodyHandle;

    /// Removes a body. Unknown handles are ignored.
    fn destroy_body(&mut self, body: BodyHandle);

    /// Current motion state of a live body.
    fn kinematics(&self, body: BodyHandle) -> Option<Kinematics>;

    /// Sets the linear velocity of a body.
    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2);

    /// Sets the rotation of a body.
    fn set_angle(&mut self, body: BodyHandle, angle: f64);

    /// Sets the angular velocity of a body.
    fn set_angular_velocity(&mut self, body: BodyHandle, angular_velocity: f64);

    /// Replaces the texture of a body without touching its motion.
    fn set_visual(&mut self, body: BodyHandle, visual: Visual);

    /// Registers a pointer-constraint handler for down, move and up events.
    fn on_pointer(&mut self, handler: PointerHandler);

    /// The body currently under the pointer, if any.
    fn body_under_pointer(&self) -> Option<BodyHandle>;

    /// Starts the fixed-tick simulation loop.
    fn start_runner(&mut self);

    /// Starts the frame-driven render loop, clearing to `background` if set.
    fn start_render(&mut self, background: Option<Color>);

    /// Stops both loops.
    fn stop(&mut self);

    /// The surface the world renders to.
    fn canvas(&self) -> Self::Canvas;
}
