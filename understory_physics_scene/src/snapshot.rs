// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Snapshot capture: turn a node into a bitmap of its current appearance.

use peniko::ImageData;

use crate::SnapshotError;

/// Host rasterizer producing a bitmap of a node's rendered appearance.
#[allow(
    async_fn_in_trait,
    reason = "captures run on a single-threaded host; no Send bound is wanted"
)]
pub trait SnapshotService<N> {
    /// Captures `node` at its current size.
    async fn capture(&self, node: &N) -> Result<ImageData, SnapshotError>;
}

/// Wraps a [`SnapshotService`] and rejects unusable bitmaps.
///
/// A bitmap with a zero dimension or no pixel data is reported as
/// [`SnapshotError::Empty`], so callers only ever see images they can texture
/// a body with.
#[derive(Debug)]
pub struct SnapshotAdapter<S> {
    service: S,
}

impl<S> SnapshotAdapter<S> {
    /// Wraps `service`.
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// Returns the wrapped service.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Produces the current bitmap of `node`.
    pub async fn capture<N>(&self, node: &N) -> Result<ImageData, SnapshotError>
    where
        S: SnapshotService<N>,
    {
        let image = self.service.capture(node).await?;
        if is_blank(&image) {
            return Err(SnapshotError::Empty);
        }
        Ok(image)
    }
}

fn is_blank(image: &ImageData) -> bool {
    image.width == 0 || image.height == 0 || image.data.data().is_empty()
}
