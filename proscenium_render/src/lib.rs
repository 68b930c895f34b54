// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Graphics backends for proscenium layers.
//!
//! Each layer paints into one [`Graphics`](proscenium_core::graphics::Graphics)
//! implementation. This crate provides two:
//!
//! - [`RecordingGraphics`]: appends every call to a shared [`CommandLog`] as a
//!   [`DrawCommand`]. Useful for tests and for hosts that replay commands
//!   into a surface of their own.
//! - [`PixmapGraphics`]: rasterizes into a `tiny_skia` pixmap. The host keeps
//!   a [`PixmapHandle`] to read pixels back after each repaint.

mod raster;
mod recording;

pub use raster::{PixmapGraphics, PixmapHandle};
pub use recording::{CommandLog, DrawCommand, RecordingGraphics};
