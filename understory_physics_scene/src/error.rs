// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! Only [`SceneError`] ever reaches the caller of [`Scene::build`](crate::Scene::build).
//! The others describe per-node failures that are logged and swallowed so the
//! rest of the scene keeps working.

use thiserror::Error;

/// A snapshot could not be produced.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    /// The capture succeeded but produced no pixels.
    #[error("snapshot is empty")]
    Empty,
    /// The snapshot service reported a failure.
    #[error("snapshot capture failed: {0}")]
    Failed(String),
}

/// The physics world could not be set up.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    /// The world rejected its configuration or failed to initialize.
    #[error("physics world failed to initialize: {0}")]
    Init(String),
}

/// The host could not apply a cosmetic normalization.
///
/// This is never fatal; the scene is built without the normalization.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("missing host context: {reason}")]
pub struct MissingHostContext {
    /// What the host was missing.
    pub reason: String,
}

impl MissingHostContext {
    /// Creates the error with a human-readable reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Fatal scene construction failures.
#[derive(Debug, Error)]
pub enum SceneError {
    /// The physics world failed to initialize.
    #[error(transparent)]
    World(#[from] WorldError),
}
