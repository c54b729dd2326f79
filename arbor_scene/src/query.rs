// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounds and hit testing.
//!
//! Points handed to the hit tests are in root space, the space the global
//! matrices map into.

use arbor_geom::transform_rect_bbox;
use kurbo::{Affine, Point, Rect};

use crate::scene::Scene;
use crate::types::{HitTestKind, NodeFlags, NodeId};

impl Scene {
    /// Bounds of `id` in its own space, as reported by its behavior.
    pub fn local_bounds(&self, id: NodeId) -> Option<Rect> {
        Some(self.node_opt(id)?.behavior.local_bounds())
    }

    /// Axis-aligned bounds of `id` in the space `target`'s local matrix maps into.
    ///
    /// The local matrices from `id` up to and including `target` are composed.
    /// If `target` is not an ancestor of `id` the walk ends at the root, so the
    /// result is relative to the outermost ancestor instead.
    pub fn bounds(&self, id: NodeId, target: NodeId) -> Option<Rect> {
        let local = self.local_bounds(id)?;
        let mut m = Affine::IDENTITY;
        let mut cur = id;
        loop {
            let node = self.node(cur);
            m = node.local_matrix() * m;
            match node.parent {
                Some(p) if cur != target => cur = p,
                _ => break,
            }
        }
        Some(transform_rect_bbox(m, local))
    }

    /// Axis-aligned bounds of `id` in root space.
    ///
    /// Equivalent to `bounds(id, root(id))`, but reads the cached global matrix.
    pub fn global_bounds(&self, id: NodeId) -> Option<Rect> {
        let local = self.local_bounds(id)?;
        Some(transform_rect_bbox(self.global_matrix(id), local))
    }

    /// Tests `pt` (root space) against `id` alone.
    ///
    /// Returns `Some(id)` on a hit. Nodes with hit testing disabled never hit,
    /// and their geometry is not consulted.
    pub fn hit_test(&self, id: NodeId, pt: Point, kind: HitTestKind) -> Option<NodeId> {
        let node = self.node_opt(id)?;
        if !node.flags.contains(NodeFlags::MOUSE_ENABLED) {
            return None;
        }
        let hit = match kind {
            HitTestKind::Bounding => self.global_bounds(id)?.contains(pt),
            HitTestKind::Shape => {
                let local = self.global_matrix_inverse(id) * pt;
                node.behavior.hit_test_local(local)
            }
        };
        hit.then_some(id)
    }

    /// [`hit_test`](Self::hit_test) against the global bounds.
    pub fn hit_test_bounding(&self, id: NodeId, pt: Point) -> Option<NodeId> {
        self.hit_test(id, pt, HitTestKind::Bounding)
    }

    /// [`hit_test`](Self::hit_test) against the behavior's precise shape.
    pub fn hit_test_shape(&self, id: NodeId, pt: Point) -> Option<NodeId> {
        self.hit_test(id, pt, HitTestKind::Shape)
    }

    /// Finds the frontmost node under `pt` in `root`'s subtree.
    ///
    /// Children are tried last to first (front to back) before their parent,
    /// so the deepest hit wins. Invisible subtrees are skipped entirely.
    /// Disabling hit testing on a node only excludes the node itself.
    pub fn pick(&self, root: NodeId, pt: Point, kind: HitTestKind) -> Option<NodeId> {
        let node = self.node_opt(root)?;
        if !node.flags.contains(NodeFlags::VISIBLE) {
            return None;
        }
        node.children
            .iter()
            .rev()
            .find_map(|&c| self.pick(c, pt, kind))
            .or_else(|| self.hit_test(root, pt, kind))
    }
}
