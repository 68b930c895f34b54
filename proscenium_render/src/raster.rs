// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CPU rasterization on `tiny_skia`.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Affine, BezPath, PathEl, Rect};
use proscenium_core::graphics::{Graphics, Rgba8};
use tiny_skia::{BlendMode, FillRule, Paint, Path, PathBuilder, Pixmap, Stroke, Transform};

/// Shared access to the pixmap a [`PixmapGraphics`] draws into.
///
/// The scene owns the graphics; the host keeps a handle to present or
/// inspect the pixels. The pixmap is `None` while either dimension is zero.
#[derive(Clone, Debug, Default)]
pub struct PixmapHandle(Rc<RefCell<Option<Pixmap>>>);

impl PixmapHandle {
    /// Current size in pixels, if a pixmap is allocated.
    #[must_use]
    pub fn size(&self) -> Option<(u32, u32)> {
        self.0.borrow().as_ref().map(|p| (p.width(), p.height()))
    }

    /// The straight-alpha color at `(x, y)`.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        let pixmap = self.0.borrow();
        let c = pixmap.as_ref()?.pixel(x, y)?.demultiply();
        Some(Rgba8::new(c.red(), c.green(), c.blue(), c.alpha()))
    }

    /// A copy of the premultiplied RGBA bytes, row-major.
    #[must_use]
    pub fn to_rgba_vec(&self) -> Option<Vec<u8>> {
        self.0.borrow().as_ref().map(|p| p.data().to_vec())
    }

    /// Runs `f` with the pixmap borrowed.
    pub fn with_pixmap<R>(&self, f: impl FnOnce(&Pixmap) -> R) -> Option<R> {
        self.0.borrow().as_ref().map(f)
    }
}

/// A [`Graphics`] backend that rasterizes into a `tiny_skia` [`Pixmap`].
///
/// Follows 2D-canvas state semantics: `save`/`restore` push and pop the
/// transform and global alpha, and `transform` post-multiplies.
#[derive(Debug)]
pub struct PixmapGraphics {
    target: PixmapHandle,
    transform: Affine,
    alpha: f64,
    stack: Vec<(Affine, f64)>,
    anti_alias: bool,
}

impl PixmapGraphics {
    /// Creates a backend with a `width` x `height` pixmap.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            target: PixmapHandle(Rc::new(RefCell::new(Pixmap::new(width, height)))),
            transform: Affine::IDENTITY,
            alpha: 1.0,
            stack: Vec::new(),
            anti_alias: true,
        }
    }

    /// Disables anti-aliasing, which makes edge pixels exact in tests.
    #[must_use]
    pub fn without_anti_alias(mut self) -> Self {
        self.anti_alias = false;
        self
    }

    /// A handle sharing this backend's pixmap.
    #[must_use]
    pub fn handle(&self) -> PixmapHandle {
        self.target.clone()
    }

    fn paint(&self, color: Rgba8) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, scaled_alpha(color.a, self.alpha));
        paint.anti_alias = self.anti_alias;
        paint
    }

    fn draw(&self, f: impl FnOnce(&mut Pixmap, Transform)) {
        let transform = to_skia(self.transform);
        if let Some(pixmap) = self.target.0.borrow_mut().as_mut() {
            f(pixmap, transform);
        }
    }
}

impl Graphics for PixmapGraphics {
    fn save(&mut self) {
        self.stack.push((self.transform, self.alpha));
    }

    fn restore(&mut self) {
        if let Some((transform, alpha)) = self.stack.pop() {
            self.transform = transform;
            self.alpha = alpha;
        }
    }

    fn transform(&mut self, affine: Affine) {
        self.transform *= affine;
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn clear_rect(&mut self, rect: Rect) {
        let Some(rect) = to_skia_rect(rect) else {
            return;
        };
        let mut paint = Paint::default();
        paint.blend_mode = BlendMode::Clear;
        paint.anti_alias = self.anti_alias;
        self.draw(|pixmap, transform| {
            pixmap.fill_rect(rect, &paint, transform, None);
        });
    }

    fn fill_path(&mut self, path: &BezPath, color: Rgba8) {
        let Some(path) = to_skia_path(path) else {
            return;
        };
        let paint = self.paint(color);
        self.draw(|pixmap, transform| {
            pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
        });
    }

    fn stroke_path(&mut self, path: &BezPath, color: Rgba8, width: f64) {
        let Some(path) = to_skia_path(path) else {
            return;
        };
        let paint = self.paint(color);
        let stroke = Stroke {
            width: to_f32(width),
            ..Stroke::default()
        };
        self.draw(|pixmap, transform| {
            pixmap.stroke_path(&path, &paint, &stroke, transform, None);
        });
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.target.size() == Some((width, height)) {
            return;
        }
        let pixmap = Pixmap::new(width, height);
        if pixmap.is_none() {
            tracing::debug!(width, height, "zero-sized pixmap, drawing suspended");
        }
        *self.target.0.borrow_mut() = pixmap;
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "geometry is clamped to f32 precision for rasterization"
)]
fn to_f32(v: f64) -> f32 {
    v as f32
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "the product is rounded and clamped to 0..=255"
)]
fn scaled_alpha(a: u8, alpha: f64) -> u8 {
    (f64::from(a) * alpha).round().clamp(0.0, 255.0) as u8
}

fn to_skia(affine: Affine) -> Transform {
    let [a, b, c, d, e, f] = affine.as_coeffs().map(to_f32);
    Transform::from_row(a, b, c, d, e, f)
}

fn to_skia_rect(rect: Rect) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_ltrb(
        to_f32(rect.x0),
        to_f32(rect.y0),
        to_f32(rect.x1),
        to_f32(rect.y1),
    )
}

fn to_skia_path(path: &BezPath) -> Option<Path> {
    let mut pb = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(to_f32(p.x), to_f32(p.y)),
            PathEl::LineTo(p) => pb.line_to(to_f32(p.x), to_f32(p.y)),
            PathEl::QuadTo(p1, p2) => {
                pb.quad_to(to_f32(p1.x), to_f32(p1.y), to_f32(p2.x), to_f32(p2.y));
            }
            PathEl::CurveTo(p1, p2, p3) => pb.cubic_to(
                to_f32(p1.x),
                to_f32(p1.y),
                to_f32(p2.x),
                to_f32(p2.y),
                to_f32(p3.x),
                to_f32(p3.y),
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}
