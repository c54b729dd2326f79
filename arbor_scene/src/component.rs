// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Components: per-tick behaviors attached to nodes.
//!
//! A node owns an ordered list of components. [`Scene::update`] runs each of
//! them once with the node's scaled delta, in attachment order, then runs the
//! node's own behavior hook.
//!
//! ## Iteration safety
//!
//! The component list is snapshotted by id before a tick. During the tick a
//! component may attach or detach components on any node, including itself,
//! through its [`UpdateCx`]:
//!
//! - every component that is still attached when its turn comes runs exactly once;
//! - a component detached earlier in the same tick is skipped (it has been dropped);
//! - a component attached during the tick first runs on the next tick (attaching
//!   already runs it once with a zero delta).
//!
//! ## Lookup by kind
//!
//! A [`ComponentKind`] is a capability tag built from a type token. A
//! component matches a kind when its concrete type is that type, or when it
//! lists the kind in [`Component::kinds`]. Tags for trait objects
//! (`ComponentKind::of::<dyn Tween>()`) let unrelated types share a capability.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::{Any, TypeId};

use crate::scene::Scene;
use crate::types::NodeId;

/// A capability tag identifying a kind of component.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ComponentKind {
    type_id: TypeId,
    name: &'static str,
}

impl ComponentKind {
    /// The tag for type `T`. `T` may be unsized, such as a `dyn Trait`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: core::any::type_name::<T>(),
        }
    }

    /// Diagnostic name of the tagged type.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Identifier of an attached component, unique within a scene.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ComponentId(u64);

/// A behavior attached to a node and run once per tick.
pub trait Component: Any {
    /// Runs one tick. `dt_ms` is already scaled by the node's speed.
    fn update(&mut self, cx: &mut UpdateCx<'_>, dt_ms: i32);

    /// Extra capability tags this component answers to, beyond its own type.
    fn kinds(&self) -> &[ComponentKind] {
        &[]
    }
}

/// What a running component can reach.
#[derive(Debug)]
pub struct UpdateCx<'a> {
    scene: &'a mut Scene,
    node: NodeId,
    component: ComponentId,
    remove_self: bool,
}

impl UpdateCx<'_> {
    /// The scene the component lives in.
    pub fn scene(&mut self) -> &mut Scene {
        self.scene
    }

    /// The node the component is attached to.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The running component's id.
    pub fn component(&self) -> ComponentId {
        self.component
    }

    /// Detaches the running component once this update returns.
    pub fn remove_self(&mut self) {
        self.remove_self = true;
    }
}

/// Storage for one attached component.
///
/// The component is taken out of its slot while it runs, so the slot keeps
/// what lookups need to match it.
pub(crate) struct ComponentSlot {
    id: ComponentId,
    type_id: TypeId,
    kinds: Vec<ComponentKind>,
    component: Option<Box<dyn Component>>,
}

impl ComponentSlot {
    fn matches(&self, kind: ComponentKind) -> bool {
        self.type_id == kind.type_id || self.kinds.contains(&kind)
    }
}

/// Handle that detaches a component created by [`Scene::add_updatable`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Cancellable {
    node: NodeId,
    component: ComponentId,
}

impl Cancellable {
    /// Detaches the component. Safe to call repeatedly or after the node is gone.
    pub fn cancel(&self, scene: &mut Scene) {
        scene.remove_component(self.node, self.component);
    }

    /// Returns true while the component is still attached.
    pub fn is_active(&self, scene: &Scene) -> bool {
        scene.has_component_id(self.node, self.component)
    }

    /// The component this handle controls.
    pub fn component(&self) -> ComponentId {
        self.component
    }
}

struct UpdateFn<F>(F);

impl<F: FnMut(i32) + 'static> Component for UpdateFn<F> {
    fn update(&mut self, _cx: &mut UpdateCx<'_>, dt_ms: i32) {
        (self.0)(dt_ms);
    }
}

impl Scene {
    /// Attaches `component` to `id` and runs it once with a zero delta.
    ///
    /// Returns `None` (and drops the component) if `id` is stale.
    pub fn add_component<C: Component>(&mut self, id: NodeId, component: C) -> Option<ComponentId> {
        self.add_boxed_component(id, Box::new(component))
    }

    /// Boxed variant of [`add_component`](Self::add_component).
    pub fn add_boxed_component(&mut self, id: NodeId, component: Box<dyn Component>) -> Option<ComponentId> {
        let cid = ComponentId(self.next_component);
        let c: &dyn Any = &*component;
        let slot = ComponentSlot {
            id: cid,
            type_id: c.type_id(),
            kinds: component.kinds().to_vec(),
            component: Some(component),
        };
        self.node_opt_mut(id)?.components.push(slot);
        self.next_component += 1;
        self.run_component(id, cid, 0);
        Some(cid)
    }

    /// Attaches a component that calls `f` with each scaled delta.
    ///
    /// The returned handle detaches it.
    pub fn add_updatable(&mut self, id: NodeId, f: impl FnMut(i32) + 'static) -> Option<Cancellable> {
        let component = self.add_component(id, UpdateFn(f))?;
        Some(Cancellable { node: id, component })
    }

    /// Returns the first component of `id` matching `kind`.
    pub fn find_component(&self, id: NodeId, kind: ComponentKind) -> Option<ComponentId> {
        self.node_opt(id)?
            .components
            .iter()
            .find(|s| s.matches(kind))
            .map(|s| s.id)
    }

    /// Returns the first component matching `kind`, attaching one made by `factory` if none does.
    pub fn get_or_create_component_of(
        &mut self,
        id: NodeId,
        kind: ComponentKind,
        factory: impl FnOnce() -> Box<dyn Component>,
    ) -> Option<ComponentId> {
        if !self.is_alive(id) {
            return None;
        }
        match self.find_component(id, kind) {
            Some(cid) => Some(cid),
            None => self.add_boxed_component(id, factory()),
        }
    }

    /// Returns the first component of concrete type `T`, attaching one made by `factory` if none exists.
    ///
    /// Returns `None` if `id` is stale, or if the component detached itself
    /// during its initial zero-delta update. A `T` that is currently running
    /// still counts as existing, so a component asking for its own type from
    /// inside its update gets `None` rather than a second instance.
    pub fn get_or_create_component<T: Component>(
        &mut self,
        id: NodeId,
        factory: impl FnOnce() -> T,
    ) -> Option<&mut T> {
        let kind = ComponentKind::of::<T>();
        let node = self.node_opt(id)?;
        let exists = node.components.iter().any(|s| s.type_id == kind.type_id);
        if !exists {
            self.add_component(id, factory())?;
        }
        self.component_mut::<T>(id)
    }

    /// Returns the first attached component of concrete type `T`.
    ///
    /// A component that is currently running is not visible to lookups.
    pub fn component<T: Component>(&self, id: NodeId) -> Option<&T> {
        self.node_opt(id)?.components.iter().find_map(|s| {
            let c: &dyn Any = &**s.component.as_ref()?;
            c.downcast_ref()
        })
    }

    /// Mutable variant of [`component`](Self::component).
    pub fn component_mut<T: Component>(&mut self, id: NodeId) -> Option<&mut T> {
        self.node_opt_mut(id)?.components.iter_mut().find_map(|s| {
            let c: &mut dyn Any = &mut **s.component.as_mut()?;
            c.downcast_mut()
        })
    }

    /// Returns true if `id` has any component matching `kind`.
    pub fn has_component(&self, id: NodeId, kind: ComponentKind) -> bool {
        self.find_component(id, kind).is_some()
    }

    /// Returns true if component `cid` is attached to `id`.
    pub fn has_component_id(&self, id: NodeId, cid: ComponentId) -> bool {
        self.node_opt(id)
            .is_some_and(|n| n.components.iter().any(|s| s.id == cid))
    }

    /// Number of components attached to `id`.
    pub fn component_count(&self, id: NodeId) -> usize {
        self.node_opt(id).map_or(0, |n| n.components.len())
    }

    /// Detaches component `cid` from `id`. Returns true if it was attached.
    ///
    /// Detaching a component that is currently running takes effect when its
    /// update returns.
    pub fn remove_component(&mut self, id: NodeId, cid: ComponentId) -> bool {
        let Some(node) = self.node_opt_mut(id) else {
            return false;
        };
        let before = node.components.len();
        node.components.retain(|s| s.id != cid);
        node.components.len() != before
    }

    /// Detaches every component of `id` matching `kind`. Returns how many were detached.
    pub fn remove_components_of(&mut self, id: NodeId, kind: ComponentKind) -> usize {
        let Some(node) = self.node_opt_mut(id) else {
            return 0;
        };
        let before = node.components.len();
        node.components.retain(|s| !s.matches(kind));
        before - node.components.len()
    }

    /// Detaches every component of `id`.
    pub fn remove_all_components(&mut self, id: NodeId) {
        if let Some(node) = self.node_opt_mut(id) {
            node.components.clear();
        }
    }

    /// Runs one tick on `id`: its components in order, then its behavior hook.
    ///
    /// `dt_ms` is scaled by the node's [`speed`](Self::speed) and rounded. This
    /// does not recurse; see [`update_tree`](Self::update_tree).
    pub fn update(&mut self, id: NodeId, dt_ms: i32) {
        let mut snapshot = core::mem::take(&mut self.scratch_components);
        snapshot.clear();
        let Some(node) = self.node_opt(id) else {
            self.scratch_components = snapshot;
            return;
        };
        let scaled = scale_delta(dt_ms, node.speed);
        snapshot.extend(node.components.iter().map(|s| s.id));
        for &cid in &snapshot {
            if !self.is_alive(id) {
                break;
            }
            self.run_component(id, cid, scaled);
        }
        if self.scratch_components.capacity() < snapshot.capacity() {
            self.scratch_components = snapshot;
        }
        if let Some(node) = self.node_opt_mut(id) {
            node.behavior.update(scaled);
        }
    }

    /// Runs [`update`](Self::update) on `root` and every descendant, parents first.
    ///
    /// Each node's child list is read after that node has updated. Nodes
    /// destroyed during the walk are skipped.
    pub fn update_tree(&mut self, root: NodeId, dt_ms: i32) {
        let mut stack = core::mem::take(&mut self.scratch_walk);
        stack.clear();
        stack.push(root);
        while let Some(id) = stack.pop() {
            if !self.is_alive(id) {
                continue;
            }
            self.update(id, dt_ms);
            if let Some(node) = self.node_opt(id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        if self.scratch_walk.capacity() < stack.capacity() {
            self.scratch_walk = stack;
        }
    }

    /// Runs a single component if it is still attached and not already running.
    fn run_component(&mut self, id: NodeId, cid: ComponentId, dt_ms: i32) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        let Some(mut component) = node
            .components
            .iter_mut()
            .find(|s| s.id == cid)
            .and_then(|s| s.component.take())
        else {
            return;
        };
        let mut cx = UpdateCx {
            scene: self,
            node: id,
            component: cid,
            remove_self: false,
        };
        component.update(&mut cx, dt_ms);
        let remove = cx.remove_self;
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        let Some(pos) = node.components.iter().position(|s| s.id == cid) else {
            // Detached while running.
            return;
        };
        if remove {
            node.components.remove(pos);
        } else {
            node.components[pos].component = Some(component);
        }
    }
}

impl core::fmt::Debug for ComponentSlot {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ComponentSlot")
            .field("id", &self.id)
            .field("kinds", &self.kinds)
            .field("running", &self.component.is_none())
            .finish_non_exhaustive()
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "saturating float-to-int conversion is the intended clamp"
)]
fn scale_delta(dt_ms: i32, speed: f64) -> i32 {
    #[cfg(not(feature = "std"))]
    use kurbo::common::FloatFuncs as _;
    (f64::from(dt_ms) * speed).round() as i32
}
