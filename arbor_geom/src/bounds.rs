// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned bounds accumulation.

use kurbo::{Affine, Point, Rect};

/// Accumulates points into an axis-aligned bounding rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoundsBuilder {
    bounds: Option<Rect>,
}

impl BoundsBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub const fn new() -> Self {
        Self { bounds: None }
    }

    /// Extends the bounds to include `p`.
    pub fn add(&mut self, p: Point) {
        self.bounds = Some(match self.bounds {
            None => Rect::from_points(p, p),
            Some(r) => Rect::new(r.x0.min(p.x), r.y0.min(p.y), r.x1.max(p.x), r.y1.max(p.y)),
        });
    }

    /// Returns true if no point has been added.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    /// Returns the accumulated bounds, or `None` if no point has been added.
    #[must_use]
    pub const fn bounds(&self) -> Option<Rect> {
        self.bounds
    }
}

/// Transform an axis-aligned `Rect` by an `Affine` and return the axis-aligned
/// bounding box of its four transformed corners.
#[must_use]
pub fn transform_rect_bbox(affine: Affine, rect: Rect) -> Rect {
    let mut bb = BoundsBuilder::new();
    bb.add(affine * Point::new(rect.x0, rect.y0));
    bb.add(affine * Point::new(rect.x1, rect.y0));
    bb.add(affine * Point::new(rect.x1, rect.y1));
    bb.add(affine * Point::new(rect.x0, rect.y1));
    bb.bounds().unwrap_or(Rect::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::FRAC_PI_4;
    use kurbo::Vec2;

    #[test]
    fn empty_builder_has_no_bounds() {
        let bb = BoundsBuilder::new();
        assert!(bb.is_empty());
        assert_eq!(bb.bounds(), None);
    }

    #[test]
    fn builder_tracks_min_and_max() {
        let mut bb = BoundsBuilder::new();
        bb.add(Point::new(3.0, -1.0));
        bb.add(Point::new(-2.0, 4.0));
        bb.add(Point::new(0.0, 0.0));
        assert_eq!(bb.bounds(), Some(Rect::new(-2.0, -1.0, 3.0, 4.0)));
    }

    #[test]
    fn translate_then_scale_unit_square() {
        let m = Affine::translate(Vec2::new(10.0, 0.0)) * Affine::scale(2.0);
        let r = transform_rect_bbox(m, Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(r, Rect::new(10.0, 0.0, 12.0, 2.0));
    }

    #[test]
    fn rotation_expands_bbox() {
        let r = transform_rect_bbox(Affine::rotate(FRAC_PI_4), Rect::new(0.0, 0.0, 10.0, 10.0));
        let half_diag = 10.0 * core::f64::consts::SQRT_2 / 2.0;
        assert!((r.x0 + half_diag).abs() < 1e-9);
        assert!((r.x1 - half_diag).abs() < 1e-9);
        assert!(r.y0.abs() < 1e-9);
        assert!((r.y1 - 2.0 * half_diag).abs() < 1e-9);
    }

    #[test]
    fn mirrored_rect_is_normalized() {
        let r = transform_rect_bbox(Affine::scale_non_uniform(-1.0, 1.0), Rect::new(1.0, 1.0, 3.0, 2.0));
        assert_eq!(r, Rect::new(-3.0, 1.0, -1.0, 2.0));
    }
}
