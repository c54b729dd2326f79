// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Geom: the value types behind arbor scene-graph nodes.
//!
//! - [`TransformParts`]: a decomposed 2D transform (translation, scale, skew,
//!   rotation) that composes into a [`kurbo::Affine`] in the fixed order
//!   *scale → skew → rotate → translate* and decomposes back canonically.
//! - [`interpolate`]: coefficient-wise interpolation between two matrices.
//! - [`ColorTransform`]: a multiplicative/additive tint with alpha that composes
//!   parent-then-child.
//! - [`BoundsBuilder`] and [`transform_rect_bbox`]: axis-aligned bounds of
//!   transformed rectangles.
//!
//! ## Minimal usage
//!
//! ```
//! use arbor_geom::{ColorTransform, TransformParts, interpolate};
//! use kurbo::Affine;
//!
//! let parts = TransformParts { x: 10.0, scale_x: 2.0, ..TransformParts::IDENTITY };
//! let m = parts.to_affine();
//! assert_eq!(m, Affine::new([2.0, 0.0, 0.0, 1.0, 10.0, 0.0]));
//!
//! // Halfway between identity and a quarter turn is an eighth turn.
//! let half = interpolate(0.5, Affine::IDENTITY, Affine::rotate(core::f64::consts::FRAC_PI_2));
//! let back = TransformParts::from_affine(half);
//! assert!((back.rotation_degrees() - 45.0).abs() < 1e-9);
//!
//! let mut parent = ColorTransform::IDENTITY;
//! parent.set_alpha(0.5);
//! let child = ColorTransform::IDENTITY;
//! assert_eq!(child.concat(&parent).alpha(), 0.5);
//! ```
//!
//! This crate is `no_std` and uses `alloc` only through `kurbo`.

#![cfg_attr(not(feature = "std"), no_std)]

mod bounds;
mod color;
mod transform;

pub use bounds::{BoundsBuilder, transform_rect_bbox};
pub use color::{ColorTransform, WHITE};
pub use transform::{TransformParts, interpolate};
