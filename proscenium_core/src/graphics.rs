// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Graphics contract and the explicit paint-state stack.
//!
//! Each [layer](crate::scene::Scene::create_layer) owns one [`Graphics`]
//! implementation bound to its raster surface. The engine never hands that
//! context to nodes directly: the paint traversal wraps it in a
//! [`PaintContext`], which keeps the current transform and alpha as an
//! explicit stack of [`PaintState`] values and mirrors every push and pop
//! onto the backend.
//!
//! The discipline is push, act, pop. A node's
//! [`paint`](crate::behavior::Behavior::paint) may push its own levels but
//! must pop them; the traversal unwinds anything left over before painting
//! the next sibling, so graphics state never leaks sideways.

use kurbo::{Affine, BezPath, Rect, Shape, Vec2};
use tracing::warn;

use crate::scene::NodeId;

/// An 8-bit straight-alpha color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8 {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    /// Creates a color from its channels.
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color.
    #[inline]
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }
}

/// Drawing operations a raster surface exposes to the engine.
///
/// `transform` post-multiplies onto the backend's current matrix, like a
/// 2D canvas context. `save`/`restore` bracket every change the traversal
/// makes.
pub trait Graphics {
    /// Pushes the backend's drawing state.
    fn save(&mut self);

    /// Pops the backend's drawing state.
    fn restore(&mut self);

    /// Post-multiplies `affine` onto the current transform.
    fn transform(&mut self, affine: Affine);

    /// Sets the alpha applied to subsequent drawing.
    fn set_global_alpha(&mut self, alpha: f64);

    /// Clears `rect` (in current user space) to transparent.
    fn clear_rect(&mut self, rect: Rect);

    /// Fills a path with a solid color.
    fn fill_path(&mut self, path: &BezPath, color: Rgba8);

    /// Strokes a path with a solid color.
    fn stroke_path(&mut self, path: &BezPath, color: Rgba8, width: f64);

    /// Resizes the backing store to `width` × `height` physical pixels.
    fn resize(&mut self, width: u32, height: u32);
}

/// The transform and alpha in effect at one level of the paint stack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaintState {
    /// Accumulated user-space to surface transform.
    pub transform: Affine,
    /// Alpha applied to drawing at this level.
    pub alpha: f64,
}

impl Default for PaintState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            alpha: 1.0,
        }
    }
}

/// A layer's graphics context plus an explicit state stack.
///
/// Created by the paint traversal and passed to each node's
/// [`paint`](crate::behavior::Behavior::paint).
pub struct PaintContext<'a> {
    graphics: &'a mut dyn Graphics,
    stack: Vec<PaintState>,
    /// Levels at or below this depth belong to the traversal.
    floor: usize,
    node: Option<NodeId>,
}

impl core::fmt::Debug for PaintContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PaintContext")
            .field("stack", &self.stack)
            .field("floor", &self.floor)
            .field("node", &self.node)
            .finish_non_exhaustive()
    }
}

impl<'a> PaintContext<'a> {
    /// Wraps a graphics backend. The stack starts with one identity level.
    pub fn new(graphics: &'a mut dyn Graphics) -> Self {
        Self {
            graphics,
            stack: vec![PaintState::default()],
            floor: 0,
            node: None,
        }
    }

    /// The node currently being painted, if any.
    #[must_use]
    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    pub(crate) fn set_node(&mut self, node: Option<NodeId>) {
        self.node = node;
    }

    /// Returns the state at the top of the stack.
    #[must_use]
    pub fn state(&self) -> PaintState {
        self.stack.last().copied().unwrap_or_default()
    }

    /// Number of levels pushed above the base level.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    /// Pushes a copy of the current state.
    pub fn save(&mut self) {
        let top = self.state();
        self.stack.push(top);
        self.graphics.save();
    }

    /// Pops one level. Popping the base level, or a level pushed before the
    /// current node started painting, is refused.
    pub fn restore(&mut self) {
        if self.depth() <= self.floor {
            warn!(node = ?self.node, "restore without matching save ignored");
            return;
        }
        self.stack.pop();
        self.graphics.restore();
    }

    /// Sets the lowest depth [`restore`](Self::restore) may pop to, returning
    /// the previous floor.
    pub(crate) fn set_floor(&mut self, floor: usize) -> usize {
        core::mem::replace(&mut self.floor, floor)
    }

    /// Pops levels until [`depth`](Self::depth) equals `depth`, returning how
    /// many were popped.
    pub(crate) fn unwind_to(&mut self, depth: usize) -> usize {
        let mut popped = 0;
        while self.depth() > depth.max(self.floor) {
            self.restore();
            popped += 1;
        }
        popped
    }

    /// Post-multiplies `affine` onto the current level.
    pub fn transform(&mut self, affine: Affine) {
        if affine == Affine::IDENTITY {
            return;
        }
        if let Some(top) = self.stack.last_mut() {
            top.transform *= affine;
        }
        self.graphics.transform(affine);
    }

    /// Translates the current level.
    pub fn translate(&mut self, offset: Vec2) {
        self.transform(Affine::translate(offset));
    }

    /// Scales the current level.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.transform(Affine::scale_non_uniform(sx, sy));
    }

    /// Rotates the current level by `radians`.
    pub fn rotate(&mut self, radians: f64) {
        self.transform(Affine::rotate(radians));
    }

    /// Sets the alpha of the current level.
    pub fn set_alpha(&mut self, alpha: f64) {
        if let Some(top) = self.stack.last_mut() {
            top.alpha = alpha;
        }
        self.graphics.set_global_alpha(alpha);
    }

    /// Clears a rectangle in current user space.
    pub fn clear_rect(&mut self, rect: Rect) {
        self.graphics.clear_rect(rect);
    }

    /// Fills a path.
    pub fn fill_path(&mut self, path: &BezPath, color: Rgba8) {
        self.graphics.fill_path(path, color);
    }

    /// Fills a rectangle.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        self.graphics.fill_path(&rect.to_path(0.1), color);
    }

    /// Strokes a path.
    pub fn stroke_path(&mut self, path: &BezPath, color: Rgba8, width: f64) {
        self.graphics.stroke_path(path, color, width);
    }
}
