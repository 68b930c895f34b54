// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layers: containers bound to one raster surface.
//!
//! A layer owns a [`Graphics`] backend sized to its logical width and height
//! times the pixel ratio. With `retina` on, the ratio follows the host's
//! device pixel ratio, so the logical size stays put while the backing store
//! gains resolution. With `retina` off the ratio is always 1.
//!
//! Every node attached beneath a layer is stamped with it (see
//! [`Scene::layer_of`]) and receives `AppendedToLayer`.

use kurbo::{Rect, Size};
use tracing::debug;

use super::id::{NodeId, NodeKind};
use super::store::Scene;
use crate::error::{SceneError, reported};
use crate::graphics::Graphics;

/// Surface and repaint policy for a layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerConfig {
    /// Logical width.
    pub width: f64,
    /// Logical height.
    pub height: f64,
    /// Scale the backing store by the host's device pixel ratio.
    pub retina: bool,
    /// Skip clearing the surface before a repaint.
    pub no_clear: bool,
    /// Repaint only when something beneath the layer changed.
    pub redraw_as_needed: bool,
}

impl LayerConfig {
    /// A layer of the given logical size with default policy.
    #[must_use]
    pub const fn sized(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            retina: true,
            no_clear: false,
            redraw_as_needed: true,
        }
    }

    /// A layer that repaints every frame.
    #[must_use]
    pub const fn always_redraw(self) -> Self {
        Self {
            redraw_as_needed: false,
            ..self
        }
    }
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self::sized(320.0, 240.0)
    }
}

/// The raster binding of one layer.
pub struct LayerSurface {
    pub(crate) config: LayerConfig,
    pub(crate) graphics: Box<dyn Graphics>,
    pub(crate) pixel_ratio: f64,
    pub(crate) repaint_count: u64,
}

impl core::fmt::Debug for LayerSurface {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LayerSurface")
            .field("config", &self.config)
            .field("pixel_ratio", &self.pixel_ratio)
            .field("repaint_count", &self.repaint_count)
            .finish_non_exhaustive()
    }
}

impl LayerSurface {
    fn new(config: LayerConfig, graphics: Box<dyn Graphics>, host_ratio: f64) -> Self {
        let mut surface = Self {
            config,
            graphics,
            pixel_ratio: 1.0,
            repaint_count: 0,
        };
        surface.apply_ratio(host_ratio);
        surface
    }

    /// The layer's configuration.
    #[must_use]
    pub fn config(&self) -> LayerConfig {
        self.config
    }

    /// Ratio between backing-store pixels and logical units.
    #[must_use]
    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    /// Number of completed repaints.
    #[must_use]
    pub fn repaint_count(&self) -> u64 {
        self.repaint_count
    }

    /// Logical size.
    #[must_use]
    pub fn logical_size(&self) -> Size {
        Size::new(self.config.width, self.config.height)
    }

    /// Backing-store size in pixels: logical size times the pixel ratio,
    /// rounded.
    #[must_use]
    pub fn physical_size(&self) -> (u32, u32) {
        (
            to_pixels(self.config.width * self.pixel_ratio),
            to_pixels(self.config.height * self.pixel_ratio),
        )
    }

    /// The full backing store in device space.
    pub(crate) fn physical_rect(&self) -> Rect {
        let (w, h) = self.physical_size();
        Rect::new(0.0, 0.0, f64::from(w), f64::from(h))
    }

    /// Recomputes the pixel ratio and resizes the backend. Returns whether
    /// the physical size changed.
    pub(crate) fn apply_ratio(&mut self, host_ratio: f64) -> bool {
        let ratio = if self.config.retina && host_ratio.is_finite() && host_ratio > 0.0 {
            host_ratio
        } else {
            1.0
        };
        let before = self.physical_size();
        self.pixel_ratio = ratio;
        let (w, h) = self.physical_size();
        self.graphics.resize(w, h);
        before != (w, h)
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "surface dimensions are clamped to the u32 range before the cast"
)]
fn to_pixels(v: f64) -> u32 {
    if v.is_finite() {
        v.round().clamp(0.0, f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

impl Scene {
    /// Creates a layer painting into `graphics`.
    ///
    /// The backend is resized to the layer's physical size right away.
    pub fn create_layer(
        &mut self,
        config: LayerConfig,
        graphics: impl Graphics + 'static,
    ) -> NodeId {
        let id = self.allocate(NodeKind::Layer);
        let surface = LayerSurface::new(config, Box::new(graphics), self.stage.pixel_ratio);
        self.surfaces[id.idx as usize] = Some(surface);
        id
    }

    /// Returns the surface binding of a layer, or `None` for other kinds.
    #[must_use]
    pub fn layer_surface(&self, id: NodeId) -> Option<&LayerSurface> {
        self.validate(id);
        self.surfaces[id.idx as usize].as_ref()
    }

    /// Changes a layer's logical size and resizes its backend.
    pub fn set_layer_size(&mut self, id: NodeId, width: f64, height: f64) -> bool {
        reported(self.with_surface(id, |surface, ratio| {
            if surface.config.width == width && surface.config.height == height {
                return false;
            }
            surface.config.width = width;
            surface.config.height = height;
            surface.apply_ratio(ratio);
            true
        }))
    }

    /// Switches device-pixel-ratio scaling on or off.
    pub fn set_retina(&mut self, id: NodeId, retina: bool) -> bool {
        reported(self.with_surface(id, |surface, ratio| {
            if surface.config.retina == retina {
                return false;
            }
            surface.config.retina = retina;
            surface.apply_ratio(ratio);
            true
        }))
    }

    /// Sets whether the surface is left uncleared before a repaint.
    pub fn set_no_clear(&mut self, id: NodeId, no_clear: bool) -> bool {
        reported(self.with_surface(id, |surface, _| {
            let changed = surface.config.no_clear != no_clear;
            surface.config.no_clear = no_clear;
            changed
        }))
    }

    /// Sets whether the layer repaints only when dirty.
    pub fn set_redraw_as_needed(&mut self, id: NodeId, redraw_as_needed: bool) -> bool {
        reported(self.with_surface(id, |surface, _| {
            let changed = surface.config.redraw_as_needed != redraw_as_needed;
            surface.config.redraw_as_needed = redraw_as_needed;
            changed
        }))
    }

    /// Pushes a new host pixel ratio to every retina layer.
    pub(crate) fn refresh_pixel_ratio(&mut self, ratio: f64) {
        for idx in 0..self.len {
            let Some(surface) = self.surfaces[idx as usize].as_mut() else {
                continue;
            };
            if !surface.config.retina {
                continue;
            }
            let resized = surface.apply_ratio(ratio);
            debug!(layer = ?self.id_at(idx), ratio, resized, "layer pixel ratio updated");
            self.mark_needs_paint(idx);
        }
    }

    /// Runs `f` on a layer's surface, marking the layer for repaint when it
    /// reports a change.
    fn with_surface(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut LayerSurface, f64) -> bool,
    ) -> Result<bool, SceneError> {
        let idx = self.check(id)?;
        let ratio = self.stage.pixel_ratio;
        let Some(surface) = self.surfaces[idx as usize].as_mut() else {
            return Err(SceneError::WrongKind {
                node: id,
                kind: self.kind[idx as usize],
                expected: "a layer",
            });
        };
        let changed = f(surface, ratio);
        if changed {
            self.mark_needs_paint(idx);
        }
        Ok(changed)
    }
}
