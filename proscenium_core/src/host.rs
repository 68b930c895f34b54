// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host platform adapter.
//!
//! The engine reads nothing from ambient globals. Everything it needs from
//! the platform comes through two seams:
//!
//! - [`Host`], injected into the [`Scene`](crate::scene::Scene) at
//!   construction, answers queries (current time, device pixel ratio,
//!   screen size, orientation).
//! - [`HostEvent`] values are pushed in by the host's event loop through
//!   [`Scene::handle`](crate::scene::Scene::handle). Timer callbacks drive
//!   frames; pointer and window events are routed into the tree.
//!
//! [`HeadlessHost`] is a scriptable implementation for tests and offscreen
//! rendering.

use std::cell::Cell;
use std::rc::Rc;

use kurbo::{Point, Size};

use crate::event::PointerButton;
use crate::time::HostTime;

/// Screen orientation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Width at least height.
    #[default]
    Landscape,
    /// Height greater than width.
    Portrait,
}

impl Orientation {
    /// Derives an orientation from a size.
    #[must_use]
    pub fn from_size(size: Size) -> Self {
        if size.height > size.width {
            Self::Portrait
        } else {
            Self::Landscape
        }
    }
}

/// Queries the engine makes of its host platform.
pub trait Host {
    /// Current time on the host's monotonic clock.
    fn now(&self) -> HostTime;

    /// Physical pixels per logical pixel.
    fn device_pixel_ratio(&self) -> f64;

    /// Logical size of the host surface.
    fn screen_size(&self) -> Size;

    /// Current orientation.
    fn orientation(&self) -> Orientation {
        Orientation::from_size(self.screen_size())
    }
}

/// Which discrete pointer action occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerAction {
    /// Press and release on the same spot.
    Click,
    /// Two clicks in quick succession.
    DoubleClick,
    /// Context-menu request.
    ContextMenu,
    /// Button pressed.
    Down,
    /// Button released.
    Up,
}

/// An event delivered by the host platform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HostEvent {
    /// The pointer moved to a stage-space position.
    PointerMove(Point),
    /// A discrete pointer action at a stage-space position.
    PointerButton {
        /// The action.
        action: PointerAction,
        /// Stage-space position.
        position: Point,
        /// The button involved.
        button: PointerButton,
    },
    /// The pointer left the host surface.
    PointerLeave,
    /// The host surface was resized to a logical size.
    Resize(Size),
    /// The device orientation changed; carries the new logical size.
    OrientationChange {
        /// The new orientation.
        orientation: Orientation,
        /// The logical size after the change.
        size: Size,
    },
    /// The device pixel ratio changed (e.g. moved to another monitor).
    PixelRatioChange(f64),
    /// The host's frame timer fired.
    Timer(HostTime),
}

#[derive(Debug)]
struct HeadlessState {
    now: Cell<HostTime>,
    pixel_ratio: Cell<f64>,
    size: Cell<Size>,
}

/// A scriptable [`Host`] with no platform behind it.
///
/// Clones share state, so a test can keep one handle while the scene owns
/// another.
#[derive(Clone, Debug)]
pub struct HeadlessHost {
    state: Rc<HeadlessState>,
}

impl HeadlessHost {
    /// Creates a host with the given logical size and pixel ratio, at time zero.
    #[must_use]
    pub fn new(size: Size, pixel_ratio: f64) -> Self {
        Self {
            state: Rc::new(HeadlessState {
                now: Cell::new(HostTime(0)),
                pixel_ratio: Cell::new(pixel_ratio),
                size: Cell::new(size),
            }),
        }
    }

    /// Sets the current time.
    pub fn set_now(&self, now: HostTime) {
        self.state.now.set(now);
    }

    /// Sets the device pixel ratio.
    pub fn set_pixel_ratio(&self, ratio: f64) {
        self.state.pixel_ratio.set(ratio);
    }

    /// Sets the logical screen size.
    pub fn set_screen_size(&self, size: Size) {
        self.state.size.set(size);
    }
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new(Size::new(320.0, 240.0), 1.0)
    }
}

impl Host for HeadlessHost {
    fn now(&self) -> HostTime {
        self.state.now.get()
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.state.pixel_ratio.get()
    }

    fn screen_size(&self) -> Size {
        self.state.size.get()
    }
}
