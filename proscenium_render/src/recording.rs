// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Command-recording graphics.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Affine, BezPath, Rect};
use proscenium_core::graphics::{Graphics, Rgba8};

/// One recorded graphics call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Push the drawing state.
    Save,
    /// Pop the drawing state.
    Restore,
    /// Post-multiply the current transform.
    Transform(Affine),
    /// Replace the global alpha.
    GlobalAlpha(f64),
    /// Clear a rectangle to transparent.
    ClearRect(Rect),
    /// Fill a path.
    FillPath {
        /// The path, in user space.
        path: BezPath,
        /// Fill color.
        color: Rgba8,
    },
    /// Stroke a path.
    StrokePath {
        /// The path, in user space.
        path: BezPath,
        /// Stroke color.
        color: Rgba8,
        /// Stroke width in user units.
        width: f64,
    },
    /// Resize the backing store.
    Resize {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },
}

impl DrawCommand {
    /// Whether this command puts pixels on the surface (clear, fill, stroke).
    #[must_use]
    pub fn touches_pixels(&self) -> bool {
        matches!(
            self,
            Self::ClearRect(_) | Self::FillPath { .. } | Self::StrokePath { .. }
        )
    }
}

/// A shared, append-only list of [`DrawCommand`]s.
///
/// Clones share storage, so a test can keep one while the scene owns the
/// [`RecordingGraphics`] that writes to it.
#[derive(Clone, Debug, Default)]
pub struct CommandLog(Rc<RefCell<Vec<DrawCommand>>>);

impl CommandLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// A copy of the recorded commands.
    #[must_use]
    pub fn snapshot(&self) -> Vec<DrawCommand> {
        self.0.borrow().clone()
    }

    /// Removes and returns the recorded commands.
    pub fn take(&self) -> Vec<DrawCommand> {
        core::mem::take(&mut *self.0.borrow_mut())
    }

    /// Forgets every recorded command.
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Counts commands matching `pred`.
    pub fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.0.borrow().iter().filter(|c| pred(c)).count()
    }

    /// Colors of every fill, in order.
    #[must_use]
    pub fn fill_colors(&self) -> Vec<Rgba8> {
        self.0
            .borrow()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillPath { color, .. } => Some(*color),
                _ => None,
            })
            .collect()
    }

    fn push(&self, command: DrawCommand) {
        self.0.borrow_mut().push(command);
    }
}

/// A [`Graphics`] backend that only records what it is asked to do.
#[derive(Debug, Default)]
pub struct RecordingGraphics {
    log: CommandLog,
    size: (u32, u32),
}

impl RecordingGraphics {
    /// Creates a backend with a fresh log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend writing to `log`.
    #[must_use]
    pub fn with_log(log: CommandLog) -> Self {
        Self { log, size: (0, 0) }
    }

    /// The log this backend writes to.
    #[must_use]
    pub fn log(&self) -> CommandLog {
        self.log.clone()
    }

    /// The last size passed to [`Graphics::resize`].
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }
}

impl Graphics for RecordingGraphics {
    fn save(&mut self) {
        self.log.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.log.push(DrawCommand::Restore);
    }

    fn transform(&mut self, affine: Affine) {
        self.log.push(DrawCommand::Transform(affine));
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.log.push(DrawCommand::GlobalAlpha(alpha));
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.log.push(DrawCommand::ClearRect(rect));
    }

    fn fill_path(&mut self, path: &BezPath, color: Rgba8) {
        self.log.push(DrawCommand::FillPath {
            path: path.clone(),
            color,
        });
    }

    fn stroke_path(&mut self, path: &BezPath, color: Rgba8, width: f64) {
        self.log.push(DrawCommand::StrokePath {
            path: path.clone(),
            color,
            width,
        });
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.log.push(DrawCommand::Resize { width, height });
    }
}
