// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Local display transform.
//!
//! A display object is positioned by five scalars rather than a matrix. This
//! module turns them into a [`kurbo::Affine`] and back into local space for
//! pointer coordinates.

use kurbo::{Affine, Point, Vec2};

/// Position, scale, and rotation of a node relative to its container.
///
/// The matrix form is `translate(x, y) · rotate(rotation) · scale(sx, sy)`:
/// content is scaled first, then rotated about the node origin, then moved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalTransform {
    /// Horizontal offset in container space.
    pub x: f64,
    /// Vertical offset in container space.
    pub y: f64,
    /// Horizontal scale factor.
    pub scale_x: f64,
    /// Vertical scale factor.
    pub scale_y: f64,
    /// Rotation in radians, clockwise in a y-down space.
    pub rotation: f64,
}

impl LocalTransform {
    /// No offset, unit scale, no rotation.
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        scale_x: 1.0,
        scale_y: 1.0,
        rotation: 0.0,
    };

    /// Creates a pure offset.
    #[inline]
    #[must_use]
    pub const fn from_position(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Self::IDENTITY
        }
    }

    /// Returns the offset as a vector.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Returns the matrix form.
    #[must_use]
    pub fn to_affine(&self) -> Affine {
        let mut affine = Affine::translate(self.offset());
        if self.rotation != 0.0 {
            affine *= Affine::rotate(self.rotation);
        }
        if self.scale_x != 1.0 || self.scale_y != 1.0 {
            affine *= Affine::scale_non_uniform(self.scale_x, self.scale_y);
        }
        affine
    }

    /// Maps a point from container space into this node's local space.
    ///
    /// A degenerate (zero) scale has no inverse; the point is then returned
    /// with only the offset removed.
    #[must_use]
    pub fn to_local(&self, point: Point) -> Point {
        let affine = self.to_affine();
        if affine.determinant().abs() < f64::EPSILON {
            return point - self.offset();
        }
        affine.inverse() * point
    }

    /// Is every component finite?
    #[inline]
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.scale_x.is_finite()
            && self.scale_y.is_finite()
            && self.rotation.is_finite()
    }
}

impl Default for LocalTransform {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}
