// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transform and tint state of nodes, and the lazy global caches.
//!
//! ## Cache protocol
//!
//! Each node caches three derived values behind dirty flags:
//!
//! - the local matrix, rebuilt from the decomposed parts in the order
//!   *scale → skew → rotate → translate*;
//! - the global matrix (`parent.global * local`) and the global color
//!   transform (own tint composed over the parent's), recomputed together;
//! - the inverse of the global matrix, recomputed only when the global
//!   matrix's version moved past the version the inverse was built from.
//!
//! Writing a transform part invalidates the local matrix and the global
//! state of the node's whole subtree. Writing the tint only invalidates the
//! global state. Reads revalidate lazily, walking up only as far as the first
//! ancestor whose global state is still valid.
//!
//! The global version is bumped only when a recomputation yields a different
//! matrix, so tint changes and no-op moves never cause a re-inversion.

use alloc::vec::Vec;

use arbor_geom::{ColorTransform, TransformParts, interpolate};
use kurbo::{Affine, Point};

use crate::scene::Scene;
use crate::types::{CacheStats, NodeId};

impl Scene {
    // --- decomposed parts ---

    /// All decomposed transform parts of `id`.
    ///
    /// After [`set_matrix`](Self::set_matrix) these are recovered from the
    /// assigned matrix in canonical form (see [`TransformParts::from_affine`]).
    ///
    /// # Panics
    ///
    /// Panics if `id` is stale.
    pub fn transform_parts(&self, id: NodeId) -> TransformParts {
        self.node(id).parts()
    }

    /// Sets all decomposed parts at once.
    pub fn set_transform_parts(&mut self, id: NodeId, parts: TransformParts) {
        self.edit_parts(id, |p| *p = parts);
    }

    /// Translation along x. Panics if `id` is stale.
    pub fn x(&self, id: NodeId) -> f64 {
        self.transform_parts(id).x
    }

    /// Translation along y. Panics if `id` is stale.
    pub fn y(&self, id: NodeId) -> f64 {
        self.transform_parts(id).y
    }

    /// Translation as a point. Panics if `id` is stale.
    pub fn position(&self, id: NodeId) -> Point {
        self.transform_parts(id).position()
    }

    /// Scale along the local x axis. Panics if `id` is stale.
    pub fn scale_x(&self, id: NodeId) -> f64 {
        self.transform_parts(id).scale_x
    }

    /// Scale along the local y axis. Panics if `id` is stale.
    pub fn scale_y(&self, id: NodeId) -> f64 {
        self.transform_parts(id).scale_y
    }

    /// Mean of the two axis scales. Panics if `id` is stale.
    pub fn scale(&self, id: NodeId) -> f64 {
        let p = self.transform_parts(id);
        (p.scale_x + p.scale_y) / 2.0
    }

    /// Skew of the local y axis, in radians. Panics if `id` is stale.
    pub fn skew_x(&self, id: NodeId) -> f64 {
        self.transform_parts(id).skew_x
    }

    /// Skew of the local x axis, in radians. Panics if `id` is stale.
    pub fn skew_y(&self, id: NodeId) -> f64 {
        self.transform_parts(id).skew_y
    }

    /// Rotation in radians. Panics if `id` is stale.
    pub fn rotation(&self, id: NodeId) -> f64 {
        self.transform_parts(id).rotation
    }

    /// Rotation in degrees. Panics if `id` is stale.
    pub fn rotation_degrees(&self, id: NodeId) -> f64 {
        self.transform_parts(id).rotation_degrees()
    }

    /// Sets the x translation.
    pub fn set_x(&mut self, id: NodeId, x: f64) {
        self.edit_parts(id, |p| p.x = x);
    }

    /// Sets the y translation.
    pub fn set_y(&mut self, id: NodeId, y: f64) {
        self.edit_parts(id, |p| p.y = y);
    }

    /// Sets both translation components.
    pub fn set_position(&mut self, id: NodeId, pos: Point) {
        self.edit_parts(id, |p| {
            p.x = pos.x;
            p.y = pos.y;
        });
    }

    /// Sets the x scale.
    pub fn set_scale_x(&mut self, id: NodeId, scale_x: f64) {
        self.edit_parts(id, |p| p.scale_x = scale_x);
    }

    /// Sets the y scale.
    pub fn set_scale_y(&mut self, id: NodeId, scale_y: f64) {
        self.edit_parts(id, |p| p.scale_y = scale_y);
    }

    /// Sets both scales to `scale`.
    pub fn set_scale(&mut self, id: NodeId, scale: f64) {
        self.edit_parts(id, |p| {
            p.scale_x = scale;
            p.scale_y = scale;
        });
    }

    /// Sets the skew of the local y axis, in radians.
    pub fn set_skew_x(&mut self, id: NodeId, skew_x: f64) {
        self.edit_parts(id, |p| p.skew_x = skew_x);
    }

    /// Sets the skew of the local x axis, in radians.
    pub fn set_skew_y(&mut self, id: NodeId, skew_y: f64) {
        self.edit_parts(id, |p| p.skew_y = skew_y);
    }

    /// Sets the rotation in radians.
    pub fn set_rotation(&mut self, id: NodeId, rotation: f64) {
        self.edit_parts(id, |p| p.rotation = rotation);
    }

    /// Sets the rotation in degrees.
    pub fn set_rotation_degrees(&mut self, id: NodeId, degrees: f64) {
        self.set_rotation(id, degrees.to_radians());
    }

    /// Restores the identity transform. The tint is left alone.
    pub fn reset(&mut self, id: NodeId) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        node.parts.set(TransformParts::IDENTITY);
        node.cache.parts_valid.set(true);
        node.cache.local_valid.set(false);
        self.invalidate_global(id);
    }

    /// Applies `edit` to the parts; invalidates only if something changed.
    fn edit_parts(&mut self, id: NodeId, edit: impl FnOnce(&mut TransformParts)) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        let before = node.parts();
        let mut parts = before;
        edit(&mut parts);
        if parts == before {
            return;
        }
        node.parts.set(parts);
        node.cache.local_valid.set(false);
        self.invalidate_global(id);
    }

    // --- local matrix ---

    /// The local matrix: node space to parent space.
    ///
    /// # Panics
    ///
    /// Panics if `id` is stale.
    pub fn local_matrix(&self, id: NodeId) -> Affine {
        self.node(id).local_matrix()
    }

    /// Forces the local matrix to exactly `m`.
    ///
    /// The decomposed parts are not touched here; they are recovered from `m`
    /// the next time they are read.
    pub fn set_matrix(&mut self, id: NodeId, m: Affine) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        node.cache.local.set(m);
        node.cache.local_valid.set(true);
        node.cache.parts_valid.set(false);
        self.invalidate_global(id);
    }

    /// Sets the local matrix to the interpolation of `from` and `to` at `ratio`
    /// and decomposes it into parts.
    ///
    /// `ratio == 0.0` yields `from`, `ratio == 1.0` yields `to`.
    pub fn set_from_interpolated(&mut self, id: NodeId, ratio: f64, from: Affine, to: Affine) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        let m = interpolate(ratio, from, to);
        node.parts.set(TransformParts::from_affine(m));
        node.cache.local.set(m);
        node.cache.local_valid.set(true);
        node.cache.parts_valid.set(true);
        node.cache.bump(|s| s.decompositions += 1);
        self.invalidate_global(id);
    }

    // --- tint ---

    /// The node's own color transform.
    ///
    /// # Panics
    ///
    /// Panics if `id` is stale.
    pub fn color_transform(&self, id: NodeId) -> ColorTransform {
        self.node(id).color
    }

    /// Replaces the node's own color transform.
    pub fn set_color_transform(&mut self, id: NodeId, color: ColorTransform) {
        self.edit_color(id, |c| *c = color);
    }

    /// The node's own alpha multiplier. Panics if `id` is stale.
    pub fn alpha(&self, id: NodeId) -> f64 {
        self.node(id).color.alpha()
    }

    /// Sets the node's own alpha multiplier.
    pub fn set_alpha(&mut self, id: NodeId, alpha: f64) {
        self.edit_color(id, |c| c.set_alpha(alpha));
    }

    /// The node's own packed multiplier. Panics if `id` is stale.
    pub fn color_mul(&self, id: NodeId) -> u32 {
        self.node(id).color.color_mul()
    }

    /// Sets the node's own multiplier (alpha included) from a packed `0xRRGGBBAA` value.
    pub fn set_color_mul(&mut self, id: NodeId, rgba: u32) {
        self.edit_color(id, |c| c.set_color_mul(rgba));
    }

    /// The node's own packed offset. Panics if `id` is stale.
    pub fn color_add(&self, id: NodeId) -> u32 {
        self.node(id).color.color_add()
    }

    /// Sets the node's own offset from a packed value.
    pub fn set_color_add(&mut self, id: NodeId, rgba: u32) {
        self.edit_color(id, |c| c.set_color_add(rgba));
    }

    fn edit_color(&mut self, id: NodeId, edit: impl FnOnce(&mut ColorTransform)) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        let before = node.color;
        edit(&mut node.color);
        if node.color != before {
            self.invalidate_global(id);
        }
    }

    // --- global state ---

    /// The global matrix: node space to root space.
    ///
    /// # Panics
    ///
    /// Panics if `id` is stale.
    pub fn global_matrix(&self, id: NodeId) -> Affine {
        self.validate_global(id);
        self.node(id).cache.global.get()
    }

    /// The inverse of the global matrix: root space to node space.
    ///
    /// For a singular global matrix the coefficients are non-finite.
    ///
    /// # Panics
    ///
    /// Panics if `id` is stale.
    pub fn global_matrix_inverse(&self, id: NodeId) -> Affine {
        self.validate_global(id);
        let cache = &self.node(id).cache;
        if cache.inverse_version.get() != cache.global_version.get() {
            cache.inverse.set(cache.global.get().inverse());
            cache.inverse_version.set(cache.global_version.get());
            cache.bump(|s| s.inversions += 1);
        }
        cache.inverse.get()
    }

    /// Sets the local matrix so that the global matrix becomes `m`.
    pub fn set_global_matrix(&mut self, id: NodeId, m: Affine) {
        if !self.is_alive(id) {
            return;
        }
        let local = match self.parent(id) {
            Some(p) => self.global_matrix_inverse(p) * m,
            None => m,
        };
        self.set_matrix(id, local);
    }

    /// Composed color transform of the node and all its ancestors.
    ///
    /// # Panics
    ///
    /// Panics if `id` is stale.
    pub fn global_color_transform(&self, id: NodeId) -> ColorTransform {
        self.validate_global(id);
        self.node(id).cache.global_color.get()
    }

    /// Global alpha multiplier. Panics if `id` is stale.
    pub fn global_alpha(&self, id: NodeId) -> f64 {
        self.global_color_transform(id).alpha()
    }

    /// Global packed multiplier. Panics if `id` is stale.
    pub fn global_color_mul(&self, id: NodeId) -> u32 {
        self.global_color_transform(id).color_mul()
    }

    /// Global packed offset. Panics if `id` is stale.
    pub fn global_color_add(&self, id: NodeId) -> u32 {
        self.global_color_transform(id).color_add()
    }

    /// Version of the global matrix.
    ///
    /// The version is bumped only when a recomputation yields a matrix that
    /// differs from the cached one. Invalidating and recomputing to the same
    /// value keeps the version, so callers can key derived data on it.
    pub fn global_version(&self, id: NodeId) -> Option<u64> {
        self.node_opt(id)?;
        self.validate_global(id);
        Some(self.node(id).cache.global_version.get())
    }

    /// Cache activity counters of `id`.
    pub fn cache_stats(&self, id: NodeId) -> Option<CacheStats> {
        Some(self.node_opt(id)?.cache.stats.get())
    }

    // --- coordinate conversion ---

    /// Maps a point from node space to root space. Panics if `id` is stale.
    pub fn local_to_global(&self, id: NodeId, p: Point) -> Point {
        self.global_matrix(id) * p
    }

    /// Maps a point from root space to node space. Panics if `id` is stale.
    pub fn global_to_local(&self, id: NodeId, p: Point) -> Point {
        self.global_matrix_inverse(id) * p
    }

    /// The node's position in root space. Panics if `id` is stale.
    pub fn global_position(&self, id: NodeId) -> Point {
        let pos = self.position(id);
        match self.parent(id) {
            Some(p) => self.local_to_global(p, pos),
            None => pos,
        }
    }

    /// Moves the node so that its position in root space becomes `pos`.
    pub fn set_global_position(&mut self, id: NodeId, pos: Point) {
        if !self.is_alive(id) {
            return;
        }
        let local = match self.parent(id) {
            Some(p) => self.global_to_local(p, pos),
            None => pos,
        };
        self.set_position(id, local);
    }

    /// The pointer position, in root space.
    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// Updates the pointer position, in root space.
    pub fn set_pointer(&mut self, pos: Point) {
        self.pointer = pos;
    }

    /// The pointer position in the node's space. Panics if `id` is stale.
    pub fn local_mouse(&self, id: NodeId) -> Point {
        self.global_to_local(id, self.pointer)
    }

    // --- invalidation ---

    /// Marks the global state of `id` and its subtree stale.
    ///
    /// Stops descending at nodes that are already stale: a stale node never
    /// has a valid descendant.
    pub(crate) fn invalidate_global(&mut self, id: NodeId) {
        let mut stack = core::mem::take(&mut self.scratch_walk);
        let base = stack.len();
        stack.push(id);
        while stack.len() > base {
            let Some(n) = stack.pop() else {
                break;
            };
            let Some(node) = self.node_opt(n) else {
                continue;
            };
            if !node.cache.global_valid.get() {
                continue;
            }
            node.cache.global_valid.set(false);
            stack.extend_from_slice(&node.children);
        }
        self.scratch_walk = stack;
    }

    /// Recomputes the global state of `id` and any stale ancestors, top-down.
    fn validate_global(&self, id: NodeId) {
        let node = self.node(id);
        if node.cache.global_valid.get() {
            return;
        }
        let mut chain: Vec<NodeId> = Vec::new();
        let mut cur = Some(id);
        while let Some(n) = cur {
            let node = self.node(n);
            if node.cache.global_valid.get() {
                break;
            }
            chain.push(n);
            cur = node.parent;
        }
        for &n in chain.iter().rev() {
            let node = self.node(n);
            let (parent_matrix, parent_color) = match node.parent {
                Some(p) => {
                    let parent = &self.node(p).cache;
                    (parent.global.get(), parent.global_color.get())
                }
                None => (Affine::IDENTITY, ColorTransform::IDENTITY),
            };
            let cache = &node.cache;
            let global = parent_matrix * node.local_matrix();
            if global != cache.global.get() {
                cache.global.set(global);
                cache.global_version.set(cache.global_version.get() + 1);
            }
            cache.global_color.set(node.color.concat(&parent_color));
            cache.global_valid.set(true);
            cache.bump(|s| s.global_rebuilds += 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::FRAC_PI_2;
    use kurbo::Vec2;

    fn assert_affine_eq(a: Affine, b: Affine) {
        let (a, b) = (a.as_coeffs(), b.as_coeffs());
        for i in 0..6 {
            assert!((a[i] - b[i]).abs() < 1e-9, "{a:?} != {b:?}");
        }
    }

    /// Global matrix recomputed from scratch, ignoring every cache.
    fn naive_global(scene: &Scene, id: NodeId) -> Affine {
        let mut m = scene.node(id).parts().to_affine();
        let mut cur = scene.parent(id);
        while let Some(p) = cur {
            m = scene.node(p).parts().to_affine() * m;
            cur = scene.parent(p);
        }
        m
    }

    fn chain(scene: &mut Scene, len: usize) -> Vec<NodeId> {
        let mut ids = Vec::new();
        let mut parent = scene.stage();
        for _ in 0..len {
            let n = scene.create_group();
            scene.add_child(parent, n);
            ids.push(n);
            parent = n;
        }
        ids
    }

    #[test]
    fn global_tracks_every_mutation() {
        let mut scene = Scene::new();
        let ids = chain(&mut scene, 4);
        let check = |scene: &Scene| {
            for &n in &ids {
                assert_affine_eq(scene.global_matrix(n), naive_global(scene, n));
            }
        };
        check(&scene);
        scene.set_position(ids[0], Point::new(10.0, 5.0));
        check(&scene);
        scene.set_scale(ids[1], 2.0);
        check(&scene);
        scene.set_rotation_degrees(ids[2], 30.0);
        check(&scene);
        scene.set_skew_x(ids[3], 0.2);
        check(&scene);
        scene.set_x(ids[0], -3.0);
        check(&scene);

        let m = Affine::translate(Vec2::new(4.0, -2.0))
            * Affine::rotate(0.4)
            * Affine::scale_non_uniform(1.5, 0.5);
        scene.set_matrix(ids[1], m);
        check(&scene);
        scene.set_from_interpolated(ids[2], 0.25, Affine::IDENTITY, m);
        check(&scene);
        scene.reset(ids[1]);
        check(&scene);
        scene.set_global_matrix(ids[2], Affine::rotate(-0.3) * Affine::scale(2.0));
        check(&scene);
        assert_affine_eq(
            scene.global_matrix(ids[2]),
            Affine::rotate(-0.3) * Affine::scale(2.0),
        );
        let mut parts = scene.transform_parts(ids[0]);
        parts.scale_x = 3.0;
        parts.scale_y = 0.5;
        parts.rotation = 1.1;
        scene.set_transform_parts(ids[0], parts);
        check(&scene);

        // A tint change leaves every matrix alone.
        let rebuilds = |scene: &Scene| {
            ids.iter()
                .map(|&n| scene.cache_stats(n).unwrap().local_rebuilds)
                .collect::<Vec<_>>()
        };
        let before = rebuilds(&scene);
        scene.set_alpha(ids[1], 0.5);
        scene.set_color_mul(ids[0], 0x8080_80FF);
        check(&scene);
        assert_eq!(rebuilds(&scene), before);

        // Reparenting moves the subtree under a different transform.
        let other = scene.create_group();
        scene.add_child(scene.stage(), other);
        scene.set_position(other, Point::new(100.0, 0.0));
        scene.add_child(other, ids[2]);
        check(&scene);
    }

    #[test]
    fn parentless_global_is_local() {
        let mut scene = Scene::new();
        let n = scene.create_group();
        scene.set_position(n, Point::new(4.0, 2.0));
        assert_eq!(
            scene.global_matrix(n),
            Affine::translate(Vec2::new(4.0, 2.0))
        );
    }

    #[test]
    fn inverse_round_trips() {
        let mut scene = Scene::new();
        let ids = chain(&mut scene, 2);
        scene.set_position(ids[0], Point::new(7.0, -3.0));
        scene.set_rotation_degrees(ids[1], 60.0);
        scene.set_scale_x(ids[1], 3.0);
        let p = Point::new(1.5, 2.5);
        let q = scene.global_to_local(ids[1], scene.local_to_global(ids[1], p));
        assert!((q - p).hypot() < 1e-9);
        assert_affine_eq(
            scene.global_matrix(ids[1]) * scene.global_matrix_inverse(ids[1]),
            Affine::IDENTITY,
        );
    }

    #[test]
    fn inverse_is_not_redone_without_a_matrix_change() {
        let mut scene = Scene::new();
        let ids = chain(&mut scene, 2);
        scene.set_position(ids[0], Point::new(1.0, 1.0));
        let leaf = ids[1];

        scene.global_matrix_inverse(leaf);
        scene.global_matrix_inverse(leaf);
        let stats = scene.cache_stats(leaf).unwrap();
        assert_eq!(stats.inversions, 1);

        // Tint changes force a global rebuild but leave the matrix alone.
        let version = scene.global_version(leaf).unwrap();
        scene.set_alpha(ids[0], 0.25);
        scene.global_matrix_inverse(leaf);
        let after = scene.cache_stats(leaf).unwrap();
        assert_eq!(after.inversions, 1);
        assert!(after.global_rebuilds > stats.global_rebuilds);
        assert_eq!(scene.global_version(leaf), Some(version));

        scene.set_y(ids[0], 9.0);
        scene.global_matrix_inverse(leaf);
        assert_eq!(scene.cache_stats(leaf).unwrap().inversions, 2);
        assert_eq!(scene.global_version(leaf), Some(version + 1));
    }

    #[test]
    fn identity_inverse_needs_no_work() {
        let scene = Scene::new();
        let stage = scene.stage();
        assert_eq!(scene.global_matrix_inverse(stage), Affine::IDENTITY);
        assert_eq!(scene.cache_stats(stage).unwrap().inversions, 0);
    }

    #[test]
    fn color_composes_down_the_tree() {
        let mut scene = Scene::new();
        let ids = chain(&mut scene, 3);
        scene.set_alpha(ids[0], 0.5);
        scene.set_color_mul(ids[1], 0x8080_80FF);
        scene.set_color_add(ids[2], 0x9080_80FF);

        let manual = scene
            .color_transform(ids[2])
            .concat(&scene.color_transform(ids[1]).concat(&scene.color_transform(ids[0])));
        assert_eq!(scene.global_color_transform(ids[2]), manual);
        assert!((scene.global_alpha(ids[2]) - 0.5).abs() < 1e-12);
        assert!((scene.global_alpha(ids[1]) - 0.5).abs() < 1e-12);
        assert_eq!(scene.global_color_mul(ids[0]), 0xFFFF_FF80);
    }

    #[test]
    fn unchanged_writes_do_not_invalidate() {
        let mut scene = Scene::new();
        let ids = chain(&mut scene, 2);
        scene.set_position(ids[0], Point::new(2.0, 2.0));
        scene.global_matrix(ids[1]);
        let before = scene.cache_stats(ids[1]).unwrap();

        scene.set_position(ids[0], Point::new(2.0, 2.0));
        scene.set_scale(ids[0], 1.0);
        scene.set_alpha(ids[0], 1.0);
        scene.set_color_add(ids[0], scene.color_add(ids[0]));
        scene.global_matrix(ids[1]);
        assert_eq!(scene.cache_stats(ids[1]).unwrap(), before);
        assert_eq!(scene.color_transform(ids[0]), ColorTransform::IDENTITY);
    }

    #[test]
    fn assigned_matrix_is_decomposed_lazily() {
        let mut scene = Scene::new();
        let n = scene.create_group();
        let m = Affine::new([0.0, 2.0, -3.0, 0.0, 5.0, 6.0]);
        scene.set_matrix(n, m);
        assert_eq!(scene.local_matrix(n), m);
        assert_eq!(scene.cache_stats(n).unwrap().decompositions, 0);

        assert!((scene.rotation(n) - FRAC_PI_2).abs() < 1e-9);
        assert!((scene.scale_x(n) - 2.0).abs() < 1e-9);
        assert!((scene.scale_y(n) - 3.0).abs() < 1e-9);
        assert_eq!(scene.position(n), Point::new(5.0, 6.0));
        assert_eq!(scene.cache_stats(n).unwrap().decompositions, 1);
    }

    #[test]
    fn interpolating_halfway_to_a_quarter_turn() {
        let mut scene = Scene::new();
        let n = scene.create_group();
        scene.set_from_interpolated(n, 0.5, Affine::IDENTITY, Affine::rotate(FRAC_PI_2));
        assert!((scene.rotation_degrees(n) - 45.0).abs() < 1e-6);

        scene.set_from_interpolated(n, 0.0, Affine::IDENTITY, Affine::rotate(FRAC_PI_2));
        assert_affine_eq(scene.local_matrix(n), Affine::IDENTITY);
        scene.set_from_interpolated(n, 1.0, Affine::IDENTITY, Affine::rotate(FRAC_PI_2));
        assert_affine_eq(scene.local_matrix(n), Affine::rotate(FRAC_PI_2));
    }

    #[test]
    fn reset_restores_identity() {
        let mut scene = Scene::new();
        let n = scene.create_group();
        scene.set_position(n, Point::new(3.0, 3.0));
        scene.set_rotation(n, 1.0);
        scene.set_alpha(n, 0.5);
        scene.reset(n);
        assert_eq!(scene.transform_parts(n), TransformParts::IDENTITY);
        assert_eq!(scene.local_matrix(n), Affine::IDENTITY);
        assert!((scene.alpha(n) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn global_position_round_trip() {
        let mut scene = Scene::new();
        let ids = chain(&mut scene, 2);
        scene.set_position(ids[0], Point::new(10.0, 0.0));
        scene.set_scale(ids[0], 2.0);
        scene.set_global_position(ids[1], Point::new(30.0, 4.0));
        assert_eq!(scene.position(ids[1]), Point::new(10.0, 2.0));
        assert_eq!(scene.global_position(ids[1]), Point::new(30.0, 4.0));

        let target = Affine::rotate(0.3).then_translate(Vec2::new(1.0, 2.0));
        scene.set_global_matrix(ids[1], target);
        assert_affine_eq(scene.global_matrix(ids[1]), target);
    }

    #[test]
    fn local_mouse_follows_the_pointer() {
        let mut scene = Scene::new();
        let n = scene.create_group();
        scene.add_child(scene.stage(), n);
        scene.set_position(n, Point::new(5.0, 5.0));
        scene.set_scale(n, 2.0);
        scene.set_pointer(Point::new(9.0, 11.0));
        assert_eq!(scene.pointer(), Point::new(9.0, 11.0));
        assert_eq!(scene.local_mouse(n), Point::new(2.0, 3.0));
    }

    #[test]
    fn singular_matrix_has_non_finite_inverse() {
        let mut scene = Scene::new();
        let n = scene.create_group();
        scene.set_scale(n, 0.0);
        let inv = scene.global_matrix_inverse(n);
        assert!(inv.as_coeffs().iter().any(|c| !c.is_finite()));
    }

    #[test]
    fn stale_ids_are_ignored_by_setters() {
        let mut scene = Scene::new();
        let n = scene.create_group();
        scene.remove_node(n);
        scene.set_x(n, 1.0);
        scene.set_matrix(n, Affine::IDENTITY);
        scene.set_alpha(n, 0.0);
        assert_eq!(scene.cache_stats(n), None);
        assert_eq!(scene.global_version(n), None);
    }
}
