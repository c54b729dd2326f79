// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decomposed 2D transforms and matrix interpolation.
//!
//! A [`TransformParts`] is the canonical, editable form of a node's local
//! transform: translation, scale, skew and rotation. It composes into a
//! [`kurbo::Affine`] in the fixed order *scale → skew → rotate → translate*,
//! and an arbitrary affine matrix can be decomposed back into parts.
//!
//! ## Skew convention
//!
//! Skew angles are expressed the way most 2D authoring tools do it: after
//! scaling, the local x axis is rotated by `rotation + skew_y` and the local
//! y axis by `rotation + skew_x`. With both skews at zero this is a plain
//! rotation.
//!
//! ## Canonical decomposition
//!
//! The split between rotation and skew is not unique. [`TransformParts::from_affine`]
//! always assigns the angle of the x axis to `rotation`, puts any remaining
//! shear into `skew_x`, and leaves `skew_y` at zero. Scales come out
//! non-negative; a reflection shows up as a half-turn of `skew_x` (or of the
//! rotation). The round trip `from_affine(m).to_affine() == m` holds up to
//! floating point error for every finite matrix.

use core::f64::consts::{PI, TAU};

use kurbo::{Affine, Point};
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// Skews smaller than this (in radians) are snapped to zero on decomposition.
const SKEW_EPSILON: f64 = 1e-9;

/// A 2D transform in decomposed form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformParts {
    /// Translation along x.
    pub x: f64,
    /// Translation along y.
    pub y: f64,
    /// Scale along the local x axis.
    pub scale_x: f64,
    /// Scale along the local y axis.
    pub scale_y: f64,
    /// Skew of the local y axis, in radians.
    pub skew_x: f64,
    /// Skew of the local x axis, in radians.
    pub skew_y: f64,
    /// Rotation in radians.
    pub rotation: f64,
}

impl Default for TransformParts {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TransformParts {
    /// Parts of the identity transform.
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        scale_x: 1.0,
        scale_y: 1.0,
        skew_x: 0.0,
        skew_y: 0.0,
        rotation: 0.0,
    };

    /// Returns the translation as a point.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Composes the parts into a matrix (scale, then skew, then rotate, then translate).
    #[must_use]
    pub fn to_affine(&self) -> Affine {
        let (sx, sy) = (self.scale_x, self.scale_y);
        if self.skew_x == 0.0 && self.skew_y == 0.0 {
            if self.rotation == 0.0 {
                return Affine::new([sx, 0.0, 0.0, sy, self.x, self.y]);
            }
            let (s, c) = self.rotation.sin_cos();
            return Affine::new([c * sx, s * sx, -s * sy, c * sy, self.x, self.y]);
        }
        let (sin_x_axis, cos_x_axis) = (self.rotation + self.skew_y).sin_cos();
        let (sin_y_axis, cos_y_axis) = (self.rotation + self.skew_x).sin_cos();
        Affine::new([
            cos_x_axis * sx,
            sin_x_axis * sx,
            -sin_y_axis * sy,
            cos_y_axis * sy,
            self.x,
            self.y,
        ])
    }

    /// Decomposes a matrix into canonical parts.
    ///
    /// See the [module docs](self) for the convention.
    #[must_use]
    pub fn from_affine(m: Affine) -> Self {
        let [a, b, c, d, e, f] = m.as_coeffs();
        let x_axis_angle = b.atan2(a);
        let y_axis_angle = (-c).atan2(d);
        let mut skew_x = normalize_angle(y_axis_angle - x_axis_angle);
        if skew_x.abs() < SKEW_EPSILON {
            skew_x = 0.0;
        }
        Self {
            x: e,
            y: f,
            scale_x: a.hypot(b),
            scale_y: c.hypot(d),
            skew_x,
            skew_y: 0.0,
            rotation: x_axis_angle,
        }
    }

    /// Returns the rotation in degrees.
    #[inline]
    #[must_use]
    pub fn rotation_degrees(&self) -> f64 {
        self.rotation.to_degrees()
    }
}

/// Linearly interpolates every coefficient of two matrices.
///
/// `ratio == 0.0` yields `from`, `ratio == 1.0` yields `to`. Values outside
/// `[0, 1]` extrapolate.
#[must_use]
pub fn interpolate(ratio: f64, from: Affine, to: Affine) -> Affine {
    let a = from.as_coeffs();
    let b = to.as_coeffs();
    let mut out = [0.0; 6];
    for (o, (l, r)) in out.iter_mut().zip(a.iter().zip(b.iter())) {
        *o = l + (r - l) * ratio;
    }
    Affine::new(out)
}

/// Wraps a difference of two `atan2` results into `(-PI, PI]`.
fn normalize_angle(a: f64) -> f64 {
    if a > PI {
        a - TAU
    } else if a <= -PI {
        a + TAU
    } else {
        a
    }
}
