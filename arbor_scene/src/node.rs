// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node storage and the node-local half of the transform cache.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::Cell;

use arbor_geom::{ColorTransform, TransformParts};
use kurbo::Affine;

use crate::behavior::NodeBehavior;
use crate::component::ComponentSlot;
use crate::events::Events;
use crate::extra::Extra;
use crate::props::Props;
use crate::types::{BlendMode, CacheStats, NodeFlags, NodeId};

/// Derived state, recomputed lazily behind `&self`.
///
/// At least one of `parts_valid` and `local_valid` is always true. A valid
/// global cache on a node implies a valid global cache on its parent.
#[derive(Debug)]
pub(crate) struct NodeCache {
    pub(crate) parts_valid: Cell<bool>,
    pub(crate) local_valid: Cell<bool>,
    pub(crate) local: Cell<Affine>,
    pub(crate) global_valid: Cell<bool>,
    pub(crate) global: Cell<Affine>,
    pub(crate) global_color: Cell<ColorTransform>,
    pub(crate) global_version: Cell<u64>,
    pub(crate) inverse: Cell<Affine>,
    pub(crate) inverse_version: Cell<u64>,
    pub(crate) stats: Cell<CacheStats>,
}

impl Default for NodeCache {
    fn default() -> Self {
        Self {
            parts_valid: Cell::new(true),
            local_valid: Cell::new(false),
            local: Cell::new(Affine::IDENTITY),
            global_valid: Cell::new(false),
            global: Cell::new(Affine::IDENTITY),
            global_color: Cell::new(ColorTransform::IDENTITY),
            // The cached inverse starts out matching the cached identity global.
            global_version: Cell::new(0),
            inverse: Cell::new(Affine::IDENTITY),
            inverse_version: Cell::new(0),
            stats: Cell::new(CacheStats::default()),
        }
    }
}

impl NodeCache {
    pub(crate) fn bump(&self, f: impl FnOnce(&mut CacheStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }
}

pub(crate) struct Node {
    pub(crate) generation: u32,
    pub(crate) serial: u64,
    pub(crate) name: Option<String>,
    pub(crate) parent: Option<NodeId>,
    /// Position in the parent's child list, meaningless without a parent.
    pub(crate) index: usize,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parts: Cell<TransformParts>,
    pub(crate) color: ColorTransform,
    pub(crate) speed: f64,
    pub(crate) flags: NodeFlags,
    pub(crate) blend_mode: BlendMode,
    pub(crate) behavior: Box<dyn NodeBehavior>,
    pub(crate) components: Vec<ComponentSlot>,
    pub(crate) props: Props,
    pub(crate) extra: Extra,
    pub(crate) events: Events,
    pub(crate) cache: NodeCache,
}

impl core::fmt::Debug for Node {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Node")
            .field("serial", &self.serial)
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("children", &self.children.len())
            .field("components", &self.components.len())
            .finish_non_exhaustive()
    }
}

/// Index stored in detached nodes.
pub(crate) const NO_INDEX: usize = usize::MAX;

impl Node {
    pub(crate) fn new(generation: u32, serial: u64, behavior: Box<dyn NodeBehavior>) -> Self {
        Self {
            generation,
            serial,
            name: None,
            parent: None,
            index: NO_INDEX,
            children: Vec::new(),
            parts: Cell::new(TransformParts::IDENTITY),
            color: ColorTransform::IDENTITY,
            speed: 1.0,
            flags: NodeFlags::default(),
            blend_mode: BlendMode::Inherit,
            behavior,
            components: Vec::new(),
            props: Props::default(),
            extra: Extra::default(),
            events: Events::default(),
            cache: NodeCache::default(),
        }
    }

    /// Decomposed transform, recovered from the local matrix if it was assigned directly.
    pub(crate) fn parts(&self) -> TransformParts {
        if !self.cache.parts_valid.get() {
            self.parts.set(TransformParts::from_affine(self.cache.local.get()));
            self.cache.parts_valid.set(true);
            self.cache.bump(|s| s.decompositions += 1);
        }
        self.parts.get()
    }

    /// Local matrix, rebuilt from the decomposed parts if they changed.
    pub(crate) fn local_matrix(&self) -> Affine {
        if !self.cache.local_valid.get() {
            self.cache.local.set(self.parts.get().to_affine());
            self.cache.local_valid.set(true);
            self.cache.bump(|s| s.local_rebuilds += 1);
        }
        self.cache.local.get()
    }
}
