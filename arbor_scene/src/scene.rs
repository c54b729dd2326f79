// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scene arena: node allocation and tree bookkeeping.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use arbor_pump::Updatable;
use kurbo::Point;

use crate::behavior::{Group, NodeBehavior};
use crate::component::ComponentId;
use crate::events::Events;
use crate::extra::Extra;
use crate::node::{NO_INDEX, Node};
use crate::props::PropTriggers;
use crate::types::{BlendMode, NodeFlags, NodeId};

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

/// A tree of nodes with cached transforms, tints and components.
///
/// The scene owns every node. Nodes are addressed by [`NodeId`]; mutators
/// called with a stale id do nothing, and queries return `None` where their
/// return type allows it. Plain value getters (position, scale, matrices and
/// so on) panic on a stale id.
///
/// Every scene has a [`stage`](Self::stage): a root group created with the
/// scene, which [`Updatable::update`] drives.
pub struct Scene {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    next_serial: u64,
    pub(crate) next_component: u64,
    stage: NodeId,
    pub(crate) pointer: Point,
    pub(crate) prop_triggers: PropTriggers,
    pub(crate) scratch_components: Vec<ComponentId>,
    pub(crate) scratch_walk: Vec<NodeId>,
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Scene")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("stage", &self.stage)
            .field("pointer", &self.pointer)
            .field("prop_triggers", &self.prop_triggers)
            .finish_non_exhaustive()
    }
}

impl Scene {
    /// Creates a scene holding only its stage.
    pub fn new() -> Self {
        let mut scene = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            next_serial: 0,
            next_component: 0,
            stage: NodeId::new(0, 0),
            pointer: Point::ZERO,
            prop_triggers: PropTriggers::default(),
            scratch_components: Vec::new(),
            scratch_walk: Vec::new(),
        };
        let stage = scene.create_group();
        scene.set_name(stage, Some("stage"));
        scene.stage = stage;
        scene
    }

    /// The root group created with the scene.
    pub fn stage(&self) -> NodeId {
        self.stage
    }

    /// Creates a detached node with the given behavior.
    pub fn create_node(&mut self, behavior: impl NodeBehavior) -> NodeId {
        self.create_boxed_node(Box::new(behavior))
    }

    /// Creates a detached [`Group`].
    pub fn create_group(&mut self) -> NodeId {
        self.create_node(Group)
    }

    /// Boxed variant of [`create_node`](Self::create_node).
    #[expect(
        clippy::cast_possible_truncation,
        reason = "NodeId uses 32-bit indices."
    )]
    pub fn create_boxed_node(&mut self, behavior: Box<dyn NodeBehavior>) -> NodeId {
        let serial = self.next_serial;
        self.next_serial += 1;
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, serial, behavior));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, serial, behavior)));
            self.generations.push(generation);
            (self.nodes.len() - 1, generation)
        };
        NodeId::new(idx as u32, generation)
    }

    /// Destroys `id` and its whole subtree, dropping their components.
    ///
    /// The stage cannot be removed. No-op for a stale `id`.
    pub fn remove_node(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if id == self.stage {
            log::debug!("refusing to remove the stage");
            return;
        }
        self.remove_from_parent(id);
        let mut stack = Vec::new();
        stack.push(id);
        let mut destroyed = 0_usize;
        while let Some(n) = stack.pop() {
            if let Some(node) = self.nodes[n.idx()].take() {
                stack.extend(node.children);
                self.free_list.push(n.idx());
                destroyed += 1;
            }
        }
        log::debug!("removed {id:?} ({destroyed} nodes)");
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// See [`NodeId`] docs for the generational semantics.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// Number of live nodes, the stage included.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free_list.len()
    }

    /// Always false: a scene holds at least its stage.
    pub fn is_empty(&self) -> bool {
        false
    }

    // --- hierarchy ---

    /// Appends `child` to `parent`'s children, detaching it from its current parent first.
    ///
    /// No-op if either id is stale or if `child` is `parent` or one of its ancestors.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        let at = self.node_opt(parent).map_or(0, |p| p.children.len());
        self.insert_child(parent, at, child);
    }

    /// Inserts `child` at position `at` among `parent`'s children.
    ///
    /// `at` is clamped to the child count (after `child` is detached from its
    /// previous parent). Later siblings shift up by one.
    pub fn insert_child(&mut self, parent: NodeId, at: usize, child: NodeId) {
        if !self.is_alive(parent) || !self.is_alive(child) {
            return;
        }
        if self.has_ancestor(parent, child) {
            log::debug!("ignoring insertion of {child:?} under its own descendant {parent:?}");
            return;
        }
        self.remove_from_parent(child);
        let p = self.node_mut(parent);
        let at = at.min(p.children.len());
        p.children.insert(at, child);
        for i in at + 1..p.children.len() {
            let sibling = self.node(parent).children[i];
            self.node_mut(sibling).index = i;
        }
        let c = self.node_mut(child);
        c.parent = Some(parent);
        c.index = at;
        self.invalidate_global(child);
    }

    /// Detaches `id` from its parent, shifting later siblings down by one.
    ///
    /// No-op if `id` is stale or has no parent.
    pub fn remove_from_parent(&mut self, id: NodeId) {
        let Some(node) = self.node_opt(id) else {
            return;
        };
        let Some(parent) = node.parent else {
            return;
        };
        let index = node.index;
        let p = self.node_mut(parent);
        p.children.remove(index);
        for i in index..p.children.len() {
            let sibling = self.node(parent).children[i];
            self.node_mut(sibling).index = i;
        }
        let n = self.node_mut(id);
        n.parent = None;
        n.index = NO_INDEX;
        self.invalidate_global(id);
    }

    /// Puts `replacement` in `old`'s place under `old`'s parent, and detaches `old`.
    ///
    /// `replacement` is first detached from wherever it was. No-op if the ids
    /// are equal, either is stale, `old` has no parent, or `replacement` is an
    /// ancestor of `old`.
    pub fn replace_with(&mut self, old: NodeId, replacement: NodeId) {
        if old == replacement || !self.is_alive(old) || !self.is_alive(replacement) {
            return;
        }
        if self.node(old).parent.is_none() || self.has_ancestor(old, replacement) {
            return;
        }
        self.remove_from_parent(replacement);
        let old_node = self.node_mut(old);
        let (Some(parent), index) = (old_node.parent.take(), old_node.index) else {
            return;
        };
        old_node.index = NO_INDEX;
        self.node_mut(parent).children[index] = replacement;
        let r = self.node_mut(replacement);
        r.parent = Some(parent);
        r.index = index;
        self.invalidate_global(old);
        self.invalidate_global(replacement);
    }

    /// The parent of `id`, if any.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id)?.parent
    }

    /// Position of `id` among its parent's children; `None` when detached.
    pub fn index(&self, id: NodeId) -> Option<usize> {
        let node = self.node_opt(id)?;
        node.parent.map(|_| node.index)
    }

    /// The children of `id` in order. Empty for a stale `id`.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.node_opt(id) {
            Some(n) => &n.children,
            None => &[],
        }
    }

    /// The outermost ancestor of `id` (`id` itself when detached).
    pub fn root(&self, id: NodeId) -> NodeId {
        let mut cur = id;
        while let Some(p) = self.parent(cur) {
            cur = p;
        }
        cur
    }

    /// Returns true if `ancestor` is `id` or one of its ancestors.
    pub fn has_ancestor(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(n) = cur {
            if n == ancestor {
                return true;
            }
            cur = self.parent(n);
        }
        false
    }

    // --- identity and flags ---

    /// The monotonic serial number assigned to `id` at creation.
    pub fn serial(&self, id: NodeId) -> Option<u64> {
        Some(self.node_opt(id)?.serial)
    }

    /// The node's name, if set.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.node_opt(id)?.name.as_deref()
    }

    /// Sets or clears the node's name.
    pub fn set_name(&mut self, id: NodeId, name: Option<&str>) {
        if let Some(n) = self.node_opt_mut(id) {
            n.name = name.map(String::from);
        }
    }

    /// Finds the first node named `name` in `root`'s subtree, in pre-order.
    pub fn find_by_name(&self, root: NodeId, name: &str) -> Option<NodeId> {
        let mut stack = Vec::new();
        stack.push(root);
        while let Some(id) = stack.pop() {
            let Some(node) = self.node_opt(id) else {
                continue;
            };
            if node.name.as_deref() == Some(name) {
                return Some(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    /// The node's flags, or `None` for a stale id.
    pub fn flags(&self, id: NodeId) -> Option<NodeFlags> {
        Some(self.node_opt(id)?.flags)
    }

    /// Replaces the node's flags.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Some(n) = self.node_opt_mut(id) {
            n.flags = flags;
        }
    }

    /// Returns true if the node takes part in hit testing.
    pub fn mouse_enabled(&self, id: NodeId) -> bool {
        self.has_flag(id, NodeFlags::MOUSE_ENABLED)
    }

    /// Enables or disables hit testing on the node.
    pub fn set_mouse_enabled(&mut self, id: NodeId, on: bool) {
        self.set_flag(id, NodeFlags::MOUSE_ENABLED, on);
    }

    /// Returns true if the node is enabled.
    pub fn enabled(&self, id: NodeId) -> bool {
        self.has_flag(id, NodeFlags::ENABLED)
    }

    /// Sets the advisory enabled flag.
    pub fn set_enabled(&mut self, id: NodeId, on: bool) {
        self.set_flag(id, NodeFlags::ENABLED, on);
    }

    /// Returns true if the node is visible.
    pub fn visible(&self, id: NodeId) -> bool {
        self.has_flag(id, NodeFlags::VISIBLE)
    }

    /// Shows or hides the node (and, for the tree walkers, its subtree).
    pub fn set_visible(&mut self, id: NodeId, on: bool) {
        self.set_flag(id, NodeFlags::VISIBLE, on);
    }

    fn has_flag(&self, id: NodeId, flag: NodeFlags) -> bool {
        self.node_opt(id).is_some_and(|n| n.flags.contains(flag))
    }

    fn set_flag(&mut self, id: NodeId, flag: NodeFlags, on: bool) {
        if let Some(n) = self.node_opt_mut(id) {
            n.flags.set(flag, on);
        }
    }

    /// The node's own blend mode.
    pub fn blend_mode(&self, id: NodeId) -> Option<BlendMode> {
        Some(self.node_opt(id)?.blend_mode)
    }

    /// Sets the node's blend mode.
    pub fn set_blend_mode(&mut self, id: NodeId, mode: BlendMode) {
        if let Some(n) = self.node_opt_mut(id) {
            n.blend_mode = mode;
        }
    }

    /// Multiplier applied to the delta time of this node's own updates.
    ///
    /// # Panics
    ///
    /// Panics if `id` is stale.
    pub fn speed(&self, id: NodeId) -> f64 {
        self.node(id).speed
    }

    /// Sets the node's speed. It does not propagate to children.
    pub fn set_speed(&mut self, id: NodeId, speed: f64) {
        if let Some(n) = self.node_opt_mut(id) {
            n.speed = speed;
        }
    }

    // --- capabilities ---

    /// The node's extra-data store.
    pub fn extra(&self, id: NodeId) -> Option<&Extra> {
        Some(&self.node_opt(id)?.extra)
    }

    /// Mutable access to the node's extra-data store.
    pub fn extra_mut(&mut self, id: NodeId) -> Option<&mut Extra> {
        Some(&mut self.node_opt_mut(id)?.extra)
    }

    /// The node's event handlers.
    pub fn events(&self, id: NodeId) -> Option<&Events> {
        Some(&self.node_opt(id)?.events)
    }

    /// Mutable access to the node's event handlers, for subscribing and dispatching.
    pub fn events_mut(&mut self, id: NodeId) -> Option<&mut Events> {
        Some(&mut self.node_opt_mut(id)?.events)
    }

    /// Formats a one-line description of `id`, or `None` for a stale id.
    ///
    /// The description lists only parts that differ from their defaults, e.g.
    /// `Solid(3):pos=(10,0):scale=(2,2):name=(hero)`.
    pub fn display(&self, id: NodeId) -> Option<NodeDisplay<'_>> {
        self.node_opt(id).map(|node| NodeDisplay { node })
    }

    // --- internals ---

    /// Access a node; panics if `id` is stale.
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        self.node_opt(id).expect("dangling NodeId")
    }

    /// Access a node mutably; panics if `id` is stale.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.node_opt_mut(id).expect("dangling NodeId")
    }

    pub(crate) fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    pub(crate) fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }
}

impl Updatable for Scene {
    /// Updates the whole stage subtree.
    fn update(&mut self, dt_ms: i32) {
        let stage = self.stage;
        self.update_tree(stage, dt_ms);
    }
}

/// One-line description of a node, returned by [`Scene::display`].
#[derive(Debug)]
pub struct NodeDisplay<'a> {
    node: &'a Node,
}

impl fmt::Display for NodeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.node;
        let p = n.parts();
        write!(f, "{}({})", n.behavior.type_name(), n.serial)?;
        if p.x != 0.0 || p.y != 0.0 {
            write!(f, ":pos=({},{})", p.x, p.y)?;
        }
        if p.scale_x != 1.0 || p.scale_y != 1.0 {
            write!(f, ":scale=({},{})", p.scale_x, p.scale_y)?;
        }
        if p.skew_x != 0.0 || p.skew_y != 0.0 {
            write!(f, ":skew=({},{})", p.skew_x, p.skew_y)?;
        }
        if p.rotation != 0.0 {
            write!(f, ":rotation=({}º)", p.rotation_degrees())?;
        }
        if let Some(name) = &n.name {
            write!(f, ":name=({name})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::Solid;
    use alloc::string::ToString;

    fn assert_indices(scene: &Scene, parent: NodeId) {
        for (i, &c) in scene.children(parent).iter().enumerate() {
            assert_eq!(scene.index(c), Some(i), "child {c:?} of {parent:?}");
            assert_eq!(scene.parent(c), Some(parent));
        }
    }

    #[test]
    fn new_scene_has_a_stage() {
        let scene = Scene::new();
        let stage = scene.stage();
        assert!(scene.is_alive(stage));
        assert_eq!(scene.name(stage), Some("stage"));
        assert_eq!(scene.parent(stage), None);
        assert_eq!(scene.index(stage), None);
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn serials_are_monotonic() {
        let mut scene = Scene::new();
        let a = scene.create_group();
        let b = scene.create_group();
        scene.remove_node(a);
        let c = scene.create_group();
        assert_eq!(scene.serial(scene.stage()), Some(0));
        assert_eq!(scene.serial(b), Some(2));
        assert_eq!(scene.serial(c), Some(3), "serials are never reused");
        assert_eq!(scene.serial(a), None);
    }

    #[test]
    fn liveness_remove_and_reuse() {
        let mut scene = Scene::new();
        let stage = scene.stage();
        let a = scene.create_group();
        scene.add_child(stage, a);
        scene.remove_node(a);
        assert!(!scene.is_alive(a));
        assert!(scene.children(stage).is_empty());

        let b = scene.create_group();
        assert!(scene.is_alive(b));
        assert!(!scene.is_alive(a));
        if a.0 == b.0 {
            assert!(b.1 > a.1, "generation must increase on reuse");
        }
    }

    #[test]
    fn remove_node_destroys_subtree_but_not_stage() {
        let mut scene = Scene::new();
        let stage = scene.stage();
        let a = scene.create_group();
        let b = scene.create_group();
        scene.add_child(stage, a);
        scene.add_child(a, b);
        scene.remove_node(a);
        assert!(!scene.is_alive(b));
        scene.remove_node(stage);
        assert!(scene.is_alive(stage));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn sibling_indices_survive_attach_detach_sequences() {
        let mut scene = Scene::new();
        let stage = scene.stage();
        let other = scene.create_group();
        scene.add_child(stage, other);
        let nodes: Vec<NodeId> = (0..8).map(|_| scene.create_group()).collect();
        for &n in &nodes {
            scene.add_child(stage, n);
        }
        assert_indices(&scene, stage);

        scene.remove_from_parent(nodes[2]);
        scene.insert_child(stage, 0, nodes[2]);
        scene.remove_from_parent(nodes[5]);
        scene.add_child(other, nodes[5]);
        scene.add_child(other, nodes[7]);
        scene.insert_child(stage, 100, nodes[0]);
        scene.insert_child(other, 1, nodes[3]);
        scene.replace_with(nodes[4], nodes[6]);
        scene.replace_with(nodes[5], nodes[1]);
        scene.remove_node(nodes[3]);

        assert_indices(&scene, stage);
        assert_indices(&scene, other);
        for &n in &nodes {
            if let Some(i) = scene.index(n) {
                let parent = scene.parent(n).unwrap();
                assert_eq!(scene.children(parent)[i], n);
            }
        }
        assert_eq!(scene.index(nodes[4]), None);
        assert_eq!(scene.parent(nodes[5]), None);
    }

    #[test]
    fn remove_from_parent_without_parent_is_noop() {
        let mut scene = Scene::new();
        let a = scene.create_group();
        scene.remove_from_parent(a);
        assert_eq!(scene.parent(a), None);
        assert_eq!(scene.index(a), None);
    }

    #[test]
    fn cycles_are_refused() {
        let mut scene = Scene::new();
        let a = scene.create_group();
        let b = scene.create_group();
        scene.add_child(a, b);
        scene.add_child(b, a);
        scene.add_child(a, a);
        assert_eq!(scene.parent(a), None);
        assert_eq!(scene.children(a), [b]);
        assert!(scene.children(b).is_empty());
    }

    #[test]
    fn replace_with_takes_the_old_slot() {
        let mut scene = Scene::new();
        let stage = scene.stage();
        let a = scene.create_group();
        let b = scene.create_group();
        let c = scene.create_group();
        for n in [a, b, c] {
            scene.add_child(stage, n);
        }
        // `a` comes from the same parent, before `c`.
        scene.replace_with(c, a);
        assert_eq!(scene.children(stage), [b, a]);
        assert_indices(&scene, stage);
        assert_eq!(scene.parent(c), None);

        let loose = scene.create_group();
        scene.replace_with(loose, a);
        assert_eq!(scene.children(stage), [b, a], "old without parent is a no-op");
    }

    #[test]
    fn root_and_ancestry() {
        let mut scene = Scene::new();
        let stage = scene.stage();
        let a = scene.create_group();
        let b = scene.create_group();
        scene.add_child(stage, a);
        scene.add_child(a, b);
        assert_eq!(scene.root(b), stage);
        assert!(scene.has_ancestor(b, stage));
        assert!(scene.has_ancestor(b, b));
        assert!(!scene.has_ancestor(a, b));
        let loose = scene.create_group();
        assert_eq!(scene.root(loose), loose);
    }

    #[test]
    fn flags_toggle_independently() {
        let mut scene = Scene::new();
        let n = scene.create_group();
        assert_eq!(scene.flags(n), Some(NodeFlags::all()));
        scene.set_visible(n, false);
        assert!(scene.mouse_enabled(n));
        assert!(scene.enabled(n));
        assert!(!scene.visible(n));
        scene.set_mouse_enabled(n, false);
        scene.set_enabled(n, false);
        assert_eq!(scene.flags(n), Some(NodeFlags::empty()));
    }

    #[test]
    fn find_by_name_is_preorder() {
        let mut scene = Scene::new();
        let stage = scene.stage();
        let a = scene.create_group();
        let b = scene.create_group();
        scene.add_child(stage, a);
        scene.add_child(a, b);
        scene.set_name(b, Some("hero"));
        assert_eq!(scene.find_by_name(stage, "hero"), Some(b));
        assert_eq!(scene.find_by_name(b, "stage"), None);
    }

    #[test]
    fn display_lists_non_default_parts() {
        let mut scene = Scene::new();
        let n = scene.create_node(Solid::new((1.0, 1.0), 0));
        let serial = scene.serial(n).unwrap();
        assert_eq!(scene.display(n).unwrap().to_string(), alloc::format!("Solid({serial})"));
        scene.set_position(n, Point::new(10.0, 0.0));
        scene.set_scale(n, 2.0);
        scene.set_name(n, Some("hero"));
        assert_eq!(
            scene.display(n).unwrap().to_string(),
            alloc::format!("Solid({serial}):pos=(10,0):scale=(2,2):name=(hero)")
        );
        scene.set_rotation_degrees(n, 30.0);
        assert!(scene.display(n).unwrap().to_string().contains(":rotation=("));
    }

    #[test]
    fn scene_is_updatable() {
        let mut scene = Scene::new();
        let stage = scene.stage();
        let a = scene.create_group();
        scene.add_child(stage, a);
        let total = alloc::rc::Rc::new(core::cell::Cell::new(0));
        let t = total.clone();
        scene.add_updatable(a, move |dt| t.set(t.get() + dt));
        Updatable::update(&mut scene, 16);
        assert_eq!(total.get(), 16);
    }
}
