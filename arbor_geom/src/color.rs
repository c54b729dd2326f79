// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Multiplicative/additive color transforms.
//!
//! A [`ColorTransform`] maps a color channel value `v` (in `0..=255` space)
//! to `v * mul + add`. Alpha is the multiplier of the alpha channel.
//!
//! Transforms compose parent-then-child: [`ColorTransform::concat`] returns
//! the single transform equivalent to applying the parent's transform first
//! and the child's own transform second. Composition is associative and
//! [`ColorTransform::IDENTITY`] is its neutral element.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// Packed opaque white (`0xRRGGBBAA`).
pub const WHITE: u32 = 0xFFFF_FFFF;

/// Packed byte of a zero color offset.
const ADD_ZERO: f64 = 127.0;

/// Channel order used by the array fields: red, green, blue, alpha.
const CHANNELS: usize = 4;

/// A color tint: per-channel multipliers and additive offsets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorTransform {
    /// Per-channel multipliers in RGBA order. `1.0` leaves a channel unchanged.
    pub mul: [f64; 4],
    /// Per-channel additive offsets in RGBA order, nominally in `-255..=255`.
    pub add: [f64; 4],
}

impl Default for ColorTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ColorTransform {
    /// The neutral transform: opaque white multiplier, zero offset.
    pub const IDENTITY: Self = Self {
        mul: [1.0; 4],
        add: [0.0; 4],
    };

    /// Creates a transform from a packed multiplier and a packed offset.
    ///
    /// See [`color_mul`](Self::color_mul) and [`color_add`](Self::color_add)
    /// for the packing.
    #[must_use]
    pub fn from_packed(color_mul: u32, color_add: u32) -> Self {
        let mut out = Self::IDENTITY;
        out.set_color_mul(color_mul);
        out.set_color_add(color_add);
        out
    }

    /// Returns the alpha multiplier.
    #[inline]
    #[must_use]
    pub const fn alpha(&self) -> f64 {
        self.mul[3]
    }

    /// Sets the alpha multiplier.
    #[inline]
    pub const fn set_alpha(&mut self, alpha: f64) {
        self.mul[3] = alpha;
    }

    /// Returns the multipliers packed as `0xRRGGBBAA`, each clamped to `0.0..=1.0`.
    #[must_use]
    pub fn color_mul(&self) -> u32 {
        pack(self.mul.map(|m| m.clamp(0.0, 1.0) * 255.0))
    }

    /// Sets all four multipliers (alpha included) from a packed `0xRRGGBBAA` value.
    pub fn set_color_mul(&mut self, rgba: u32) {
        self.mul = unpack(rgba).map(|c| c / 255.0);
    }

    /// Returns the offsets packed as `0xRRGGBBAA`.
    ///
    /// Each offset is clamped to `-255..=255` and stored as `add / 2 + 127`,
    /// rounded. `0x7F` is exactly the zero offset, so the identity packs to
    /// `0x7F7F7F7F` and reads back unchanged. The precision is two units per
    /// channel.
    #[must_use]
    pub fn color_add(&self) -> u32 {
        pack(self.add.map(|a| ((a.clamp(-255.0, 255.0) / 2.0).round() + ADD_ZERO).clamp(0.0, 255.0)))
    }

    /// Sets all four offsets from a packed value. Inverse of [`color_add`](Self::color_add).
    pub fn set_color_add(&mut self, rgba: u32) {
        self.add = unpack(rgba).map(|c| ((c - ADD_ZERO) * 2.0).clamp(-255.0, 255.0));
    }

    /// Composes `self` (the child's own tint) over `parent` (the parent's effective tint).
    ///
    /// Applying the result to a color equals applying `parent` and then `self`.
    #[must_use]
    pub fn concat(&self, parent: &Self) -> Self {
        let mut out = Self::IDENTITY;
        for i in 0..CHANNELS {
            out.mul[i] = self.mul[i] * parent.mul[i];
            out.add[i] = self.mul[i] * parent.add[i] + self.add[i];
        }
        out
    }

    /// Applies the transform to an RGBA color expressed in `0..=255` channel space.
    ///
    /// The result is not clamped.
    #[must_use]
    pub fn apply(&self, rgba: [f64; 4]) -> [f64; 4] {
        let mut out = [0.0; 4];
        for i in 0..CHANNELS {
            out[i] = rgba[i] * self.mul[i] + self.add[i];
        }
        out
    }

    /// Applies the transform to a packed `0xRRGGBBAA` color, clamping to `0..=255`.
    #[must_use]
    pub fn apply_packed(&self, rgba: u32) -> u32 {
        pack(self.apply(unpack(rgba)).map(|c| c.clamp(0.0, 255.0)))
    }
}

fn unpack(rgba: u32) -> [f64; 4] {
    rgba.to_be_bytes().map(f64::from)
}

fn pack(channels: [f64; 4]) -> u32 {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "channels are clamped to 0..=255 before packing"
    )]
    let bytes = channels.map(|c| c.round() as u8);
    u32::from_be_bytes(bytes)
}
