// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapping between the host tree's coordinate space and scene space.

use kurbo::{Point, Rect, Size};

/// The scene's footprint in tree coordinates.
///
/// Scene space has its origin at the top-left corner of the root container, so
/// a body at `(0, 0)` sits exactly on that corner regardless of where the
/// container is laid out on the page.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SceneFrame {
    origin: Point,
    size: Size,
}

impl SceneFrame {
    /// Builds the frame from the root container's bounding rect.
    pub fn from_root_rect(rect: Rect) -> Self {
        Self {
            origin: rect.origin(),
            size: rect.size(),
        }
    }

    /// Top-left corner of the scene in tree coordinates.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Width and height of the scene.
    pub fn size(&self) -> Size {
        self.size
    }

    /// The scene rectangle in scene space, `(0, 0)` to `(width, height)`.
    pub fn bounds(&self) -> Rect {
        self.size.to_rect()
    }

    /// Translates a tree-space rect into scene space.
    pub fn to_scene(&self, rect: Rect) -> Rect {
        rect - self.origin.to_vec2()
    }
}

/// Where a body for a node occupying `rect` (scene space) is spawned.
///
/// Horizontally centered on the node and level with its top edge.
pub fn spawn_point(rect: Rect) -> Point {
    Point::new(rect.x0 + rect.width() / 2.0, rect.y0)
}
