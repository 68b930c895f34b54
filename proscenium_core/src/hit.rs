// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit regions for pointer routing.

use kurbo::{
    Affine, BezPath, Circle, PathEl, Point, Rect, RoundedRect, RoundedRectRadii, Shape, Vec2,
};

/// A shape in a node's local space that answers pointer hit tests.
///
/// Regions are immutable values supplied by the geometry collaborator; the
/// engine only asks whether a local point falls inside.
#[derive(Clone, Debug, PartialEq)]
pub enum HitRegion {
    /// An axis-aligned rectangle.
    Rect(Rect),
    /// A rectangle with rounded corners.
    RoundedRect(RoundedRect),
    /// A circle.
    Circle(Circle),
    /// A closed polygon through the given vertices (non-zero winding).
    Polygon(BezPath),
}

impl HitRegion {
    /// Builds a closed polygon region from its vertices.
    ///
    /// Fewer than three vertices yield an empty region.
    #[must_use]
    pub fn polygon(vertices: &[Point]) -> Self {
        let mut path = BezPath::new();
        if let [first, rest @ ..] = vertices {
            if rest.len() >= 2 {
                path.move_to(*first);
                for v in rest {
                    path.line_to(*v);
                }
                path.close_path();
            }
        }
        Self::Polygon(path)
    }

    /// Returns whether `point` (in local space) lies inside the region.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        match self {
            Self::Rect(r) => r.contains(point),
            Self::RoundedRect(r) => r.contains(point),
            Self::Circle(c) => c.contains(point),
            Self::Polygon(p) => !p.elements().is_empty() && p.contains(point),
        }
    }

    /// Returns the region's bounding box.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Rect(r) => *r,
            Self::RoundedRect(r) => r.rect(),
            Self::Circle(c) => c.bounding_box(),
            Self::Polygon(p) => p.bounding_box(),
        }
    }

    /// Returns the outline vertices. Curved regions report the corners of
    /// their bounding box.
    #[must_use]
    pub fn vertices(&self) -> Vec<Point> {
        match self {
            Self::Polygon(p) => p
                .elements()
                .iter()
                .filter_map(|el| match el {
                    PathEl::MoveTo(v) | PathEl::LineTo(v) => Some(*v),
                    _ => None,
                })
                .collect(),
            _ => {
                let b = self.bounds();
                vec![
                    Point::new(b.x0, b.y0),
                    Point::new(b.x1, b.y0),
                    Point::new(b.x1, b.y1),
                    Point::new(b.x0, b.y1),
                ]
            }
        }
    }

    /// Returns a copy moved by `offset`.
    #[must_use]
    pub fn moved(&self, offset: Vec2) -> Self {
        match self {
            Self::Rect(r) => Self::Rect(*r + offset),
            Self::RoundedRect(r) => Self::RoundedRect(*r + offset),
            Self::Circle(c) => Self::Circle(*c + offset),
            Self::Polygon(p) => Self::Polygon(Affine::translate(offset) * p.clone()),
        }
    }

    /// Returns a copy scaled about the local origin.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        match self {
            Self::Rect(r) => Self::Rect(r.scale_from_origin(factor)),
            Self::RoundedRect(r) => {
                let radii = r.radii();
                Self::RoundedRect(RoundedRect::from_rect(
                    r.rect().scale_from_origin(factor),
                    RoundedRectRadii::new(
                        radii.top_left * factor,
                        radii.top_right * factor,
                        radii.bottom_right * factor,
                        radii.bottom_left * factor,
                    ),
                ))
            }
            Self::Circle(c) => Self::Circle(Circle::new(
                (c.center.to_vec2() * factor).to_point(),
                c.radius * factor.abs(),
            )),
            Self::Polygon(p) => Self::Polygon(Affine::scale(factor) * p.clone()),
        }
    }
}

impl From<Rect> for HitRegion {
    fn from(rect: Rect) -> Self {
        Self::Rect(rect)
    }
}

impl From<Circle> for HitRegion {
    fn from(circle: Circle) -> Self {
        Self::Circle(circle)
    }
}
