// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node behaviors and the render entry points.
//!
//! A [`NodeBehavior`] supplies everything that depends on what kind of node
//! this is: its local bounds, its precise shape, its own per-tick hook, and
//! how it draws. The scene owns one behavior per node and dispatches through
//! it; the defaults describe a node with no area that draws nothing.

use alloc::vec::Vec;
use core::any::Any;

use arbor_geom::ColorTransform;
use kurbo::{Affine, Point, Rect, Size};

use crate::scene::Scene;
use crate::types::{BlendMode, NodeFlags, NodeId};

/// State resolved by the scene for one node before it is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderFrame {
    /// The node being drawn.
    pub node: NodeId,
    /// Global matrix: node space to root space.
    pub transform: Affine,
    /// Composed global color transform.
    pub color_transform: ColorTransform,
    /// Resolved blend mode, never [`BlendMode::Inherit`].
    pub blend_mode: BlendMode,
}

/// Drawing backend used by [`NodeBehavior::render`].
pub trait RenderContext {
    /// Fills `rect`, given in the node's local space, with a packed `0xRRGGBBAA` color.
    ///
    /// The color has already been tinted by `frame.color_transform`.
    fn fill_rect(&mut self, frame: &RenderFrame, rect: Rect, color: u32);
}

/// The kind-specific hooks of a node.
pub trait NodeBehavior: Any {
    /// Short name used by [`Scene::display`].
    fn type_name(&self) -> &'static str {
        "Node"
    }

    /// Bounds in the node's own space. Defaults to an empty rectangle at the origin.
    fn local_bounds(&self) -> Rect {
        Rect::ZERO
    }

    /// Precise shape test for a point in the node's own space. Defaults to no area.
    fn hit_test_local(&self, local: Point) -> bool {
        let _ = local;
        false
    }

    /// Runs after the node's components, with the same scaled delta.
    fn update(&mut self, dt_ms: i32) {
        let _ = dt_ms;
    }

    /// Draws the node. The default draws nothing.
    fn render(&self, frame: &RenderFrame, ctx: &mut dyn RenderContext) {
        let _ = (frame, ctx);
    }
}

/// A node with no content of its own.
#[derive(Clone, Copy, Debug, Default)]
pub struct Group;

impl NodeBehavior for Group {
    fn type_name(&self) -> &'static str {
        "Group"
    }
}

/// A filled rectangle anchored at the local origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Solid {
    /// Width and height.
    pub size: Size,
    /// Packed `0xRRGGBBAA` fill color.
    pub color: u32,
}

impl Solid {
    /// Creates a solid of the given size and color.
    pub fn new(size: impl Into<Size>, color: u32) -> Self {
        Self {
            size: size.into(),
            color,
        }
    }
}

impl NodeBehavior for Solid {
    fn type_name(&self) -> &'static str {
        "Solid"
    }

    fn local_bounds(&self) -> Rect {
        self.size.to_rect()
    }

    fn hit_test_local(&self, local: Point) -> bool {
        local.x >= 0.0 && local.y >= 0.0 && local.x < self.size.width && local.y < self.size.height
    }

    fn render(&self, frame: &RenderFrame, ctx: &mut dyn RenderContext) {
        let color = frame.color_transform.apply_packed(self.color);
        ctx.fill_rect(frame, self.size.to_rect(), color);
    }
}

impl Scene {
    /// Returns the behavior of `id` if it has concrete type `T`.
    pub fn behavior<T: NodeBehavior>(&self, id: NodeId) -> Option<&T> {
        let b: &dyn Any = &*self.node_opt(id)?.behavior;
        b.downcast_ref()
    }

    /// Mutable variant of [`behavior`](Self::behavior).
    ///
    /// Bounds are derived on demand, so resizing a behavior needs no invalidation.
    pub fn behavior_mut<T: NodeBehavior>(&mut self, id: NodeId) -> Option<&mut T> {
        let b: &mut dyn Any = &mut *self.node_opt_mut(id)?.behavior;
        b.downcast_mut()
    }

    /// The blend mode `id` draws with: its own, or the nearest explicit ancestor's.
    pub fn effective_blend_mode(&self, id: NodeId) -> BlendMode {
        let mut cur = Some(id);
        while let Some(n) = cur {
            let Some(node) = self.node_opt(n) else {
                break;
            };
            if node.blend_mode != BlendMode::Inherit {
                return node.blend_mode;
            }
            cur = node.parent;
        }
        BlendMode::Normal
    }

    /// Resolves the render state of `id`.
    pub fn render_frame(&self, id: NodeId) -> Option<RenderFrame> {
        if !self.is_alive(id) {
            return None;
        }
        Some(RenderFrame {
            node: id,
            transform: self.global_matrix(id),
            color_transform: self.global_color_transform(id),
            blend_mode: self.effective_blend_mode(id),
        })
    }

    /// Renders a single node through its behavior.
    ///
    /// Does not look at children or at the visibility flag.
    pub fn render(&self, id: NodeId, ctx: &mut dyn RenderContext) {
        if let Some(frame) = self.render_frame(id) {
            self.node(id).behavior.render(&frame, ctx);
        }
    }

    /// Renders `root` and its descendants in pre-order (parents below children,
    /// earlier siblings below later ones), skipping invisible subtrees.
    pub fn render_tree(&self, root: NodeId, ctx: &mut dyn RenderContext) {
        let mut stack: Vec<NodeId> = Vec::new();
        stack.push(root);
        while let Some(id) = stack.pop() {
            let Some(node) = self.node_opt(id) else {
                continue;
            };
            if !node.flags.contains(NodeFlags::VISIBLE) {
                continue;
            }
            self.render(id, ctx);
            stack.extend(node.children.iter().rev().copied());
        }
    }
}
