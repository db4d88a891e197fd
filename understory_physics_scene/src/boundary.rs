// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The four static walls enclosing a scene.

use kurbo::{Point, Rect, Size};

use crate::{BodyHandle, PhysicsWorld};

/// Thickness of each wall in scene units.
pub const WALL_THICKNESS: f64 = 1.0;

/// Wall rectangles for a scene, in scene space.
///
/// Each wall is centered on one edge of the scene rectangle and spans that
/// edge fully.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WallRects {
    /// Centered on `y = height`, spanning the full width.
    pub floor: Rect,
    /// Centered on `y = 0`, spanning the full width.
    pub ceiling: Rect,
    /// Centered on `x = 0`, spanning the full height.
    pub left: Rect,
    /// Centered on `x = width`, spanning the full height.
    pub right: Rect,
}

impl WallRects {
    /// Computes the walls enclosing a scene of `size`.
    pub fn enclosing(size: Size) -> Self {
        let Size { width, height } = size;
        let horizontal = Size::new(width, WALL_THICKNESS);
        let vertical = Size::new(WALL_THICKNESS, height);
        Self {
            floor: Rect::from_center_size(Point::new(width / 2.0, height), horizontal),
            ceiling: Rect::from_center_size(Point::new(width / 2.0, 0.0), horizontal),
            left: Rect::from_center_size(Point::new(0.0, height / 2.0), vertical),
            right: Rect::from_center_size(Point::new(width, height / 2.0), vertical),
        }
    }
}

/// Handles of a scene's walls. Created once, never mutated.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Boundaries {
    /// Bottom wall.
    pub floor: BodyHandle,
    /// Top wall.
    pub ceiling: BodyHandle,
    /// Left wall.
    pub left: BodyHandle,
    /// Right wall.
    pub right: BodyHandle,
}

impl Boundaries {
    /// Adds the walls enclosing a scene of `size` to `world`.
    ///
    /// Fast bodies can still tunnel through a one-unit wall unless the world
    /// performs continuous collision detection.
    pub fn build<W: PhysicsWorld + ?Sized>(world: &mut W, size: Size) -> Self {
        let rects = WallRects::enclosing(size);
        Self {
            floor: world.create_static_body(rects.floor),
            ceiling: world.create_static_body(rects.ceiling),
            left: world.create_static_body(rects.left),
            right: world.create_static_body(rects.right),
        }
    }

    /// All four handles: floor, ceiling, left, right.
    pub fn handles(&self) -> [BodyHandle; 4] {
        [self.floor, self.ceiling, self.left, self.right]
    }

    /// Returns `true` if `body` is one of the walls.
    pub fn contains(&self, body: BodyHandle) -> bool {
        self.handles().contains(&body)
    }
}
