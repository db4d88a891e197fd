// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Press: classify a press/release sequence as a click or a drag.
//!
//! When a pointer both drags a simulated object and sits on top of a
//! clickable UI element, every drag would otherwise end with a spurious click.
//! [`PressState`] is a small state machine that watches pointer down, move and
//! up notifications and reports, on release, whether the gesture should be
//! forwarded as an activation of the element that was pressed.
//!
//! ## States
//!
//! - [`PressPhase::Idle`]: no pointer is down.
//! - [`PressPhase::Pressed`]: a pointer is down and has moved fewer than
//!   `threshold` times; the gesture is still click-eligible.
//! - [`PressPhase::Dragging`]: the pointer moved `threshold` times or more;
//!   the gesture is a drag and will not activate anything.
//!
//! Movement is counted in events rather than distance. The pointer source is
//! expected to already coalesce moves (most physics pointer constraints emit
//! one move per simulation tick), so the count is a cheap proxy for "held and
//! moved for a while".
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_press::{PressOutcome, PressState};
//!
//! let mut press = PressState::<u32>::new(3);
//!
//! // Quick tap on element 7.
//! press.on_down(Some(7));
//! press.on_move();
//! assert_eq!(press.on_up(), PressOutcome::Click(7));
//!
//! // Press, then drag far enough to stop being a click.
//! press.on_down(Some(7));
//! for _ in 0..3 {
//!     press.on_move();
//! }
//! assert_eq!(press.on_up(), PressOutcome::Drag);
//! ```
//!
//! ## Targets
//!
//! The target is whatever the caller resolved under the pointer at press time
//! (a node id, a body handle, ...). It is captured on [`PressState::on_down`]
//! and never re-resolved, so a body that slides out from under the pointer
//! still receives the click when released early enough.
//!
//! This crate is `no_std`.

#![no_std]

use log::trace;

/// Default number of pointer moves after which a press becomes a drag.
pub const DEFAULT_DRAG_THRESHOLD: u32 = 3;

/// Current phase of a [`PressState`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PressPhase {
    /// No pointer is down.
    #[default]
    Idle,
    /// Pointer is down and still click-eligible.
    Pressed,
    /// Pointer is down and has moved past the threshold.
    Dragging,
}

/// Result of releasing the pointer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PressOutcome<K> {
    /// The gesture was a click on the target captured at press time.
    Click(K),
    /// The gesture was a drag; nothing should be activated.
    Drag,
    /// The gesture was click-eligible but nothing was under the pointer at press
    /// time, or no press was in progress.
    None,
}

impl<K> PressOutcome<K> {
    /// Returns the clicked target, if any.
    #[must_use]
    pub fn clicked(self) -> Option<K> {
        match self {
            Self::Click(target) => Some(target),
            Self::Drag | Self::None => None,
        }
    }
}

/// Click-versus-drag state machine.
///
/// See the [crate docs](crate) for the transition table.
#[derive(Clone, Debug)]
pub struct PressState<K> {
    threshold: u32,
    moves: u32,
    phase: PressPhase,
    target: Option<K>,
}

impl<K> Default for PressState<K> {
    fn default() -> Self {
        Self::new(DEFAULT_DRAG_THRESHOLD)
    }
}

impl<K> PressState<K> {
    /// Creates an idle state machine.
    ///
    /// A press becomes a drag once it has seen `threshold` moves. A threshold of
    /// `0` classifies every press as a drag.
    #[must_use]
    pub const fn new(threshold: u32) -> Self {
        Self {
            threshold,
            moves: 0,
            phase: PressPhase::Idle,
            target: None,
        }
    }

    /// Returns the configured drag threshold.
    #[must_use]
    pub const fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> PressPhase {
        self.phase
    }

    /// Returns the number of moves seen since the last press.
    #[must_use]
    pub const fn moves(&self) -> u32 {
        self.moves
    }

    /// Returns the target captured at press time, if a press is in progress.
    #[must_use]
    pub fn target(&self) -> Option<&K> {
        self.target.as_ref()
    }

    /// Starts a new press, replacing any press in progress.
    pub fn on_down(&mut self, target: Option<K>) {
        self.moves = 0;
        self.target = target;
        self.phase = if self.threshold == 0 {
            PressPhase::Dragging
        } else {
            PressPhase::Pressed
        };
        trace!("press down, phase {:?}", self.phase);
    }

    /// Records one pointer move and returns the resulting phase.
    ///
    /// Moves while idle (hover) are ignored.
    pub fn on_move(&mut self) -> PressPhase {
        if self.phase == PressPhase::Idle {
            return PressPhase::Idle;
        }
        self.moves = self.moves.saturating_add(1);
        if self.phase == PressPhase::Pressed && self.moves >= self.threshold {
            trace!("press became a drag after {} moves", self.moves);
            self.phase = PressPhase::Dragging;
        }
        self.phase
    }

    /// Ends the press and classifies it.
    ///
    /// The state machine is idle afterwards.
    pub fn on_up(&mut self) -> PressOutcome<K> {
        let phase = core::mem::replace(&mut self.phase, PressPhase::Idle);
        let target = self.target.take();
        let outcome = match phase {
            PressPhase::Idle => PressOutcome::None,
            PressPhase::Dragging => PressOutcome::Drag,
            PressPhase::Pressed => target.map_or(PressOutcome::None, PressOutcome::Click),
        };
        trace!("press up after {} moves", self.moves);
        self.moves = 0;
        outcome
    }

    /// Drops any press in progress without classifying it.
    pub fn reset(&mut self) {
        self.phase = PressPhase::Idle;
        self.target = None;
        self.moves = 0;
    }
}
