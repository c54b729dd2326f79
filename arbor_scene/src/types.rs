// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene: node identifiers, flags, and small enums.

/// Identifier for a node in a [`Scene`](crate::Scene).
///
/// This is a small, copyable handle that stays stable while the node lives
/// and becomes stale when the node is destroyed.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On creation, a fresh slot is allocated with generation `1`.
/// - On [`remove_node`](crate::Scene::remove_node), the slot is freed; any existing `NodeId` that pointed to it is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// Use [`Scene::is_alive`](crate::Scene::is_alive) to check whether a `NodeId` still refers to a live node.
/// Stale `NodeId`s never alias a different live node because the generation must match.
///
/// A `NodeId` is not the node's serial number. See [`Scene::serial`](crate::Scene::serial)
/// for the monotonic id handed out at creation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Per-node switches.
    ///
    /// Only [`MOUSE_ENABLED`](Self::MOUSE_ENABLED) is interpreted by node-level
    /// queries: it gates hit testing. [`VISIBLE`](Self::VISIBLE) is honored by the
    /// tree walkers ([`Scene::render_tree`](crate::Scene::render_tree) and
    /// [`Scene::pick`](crate::Scene::pick)). [`ENABLED`](Self::ENABLED) is advisory.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node takes part in hit testing.
        const MOUSE_ENABLED = 0b0000_0001;
        /// Node is enabled for interaction.
        const ENABLED       = 0b0000_0010;
        /// Node is visible.
        const VISIBLE       = 0b0000_0100;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::all()
    }
}

/// How a node's output is combined with what is already drawn.
///
/// The scene does not blend anything itself; the resolved mode is passed to the
/// [`RenderContext`](crate::RenderContext) in each [`RenderFrame`](crate::RenderFrame).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Use the nearest ancestor's mode, or [`Normal`](Self::Normal) at the root.
    #[default]
    Inherit,
    /// Overwrite without blending.
    None,
    /// Source-over alpha blending.
    Normal,
    /// Additive.
    Add,
    /// Multiplicative.
    Multiply,
    /// Subtractive.
    Subtract,
}

/// Hit-test mode for [`Scene::hit_test`](crate::Scene::hit_test).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HitTestKind {
    /// Point against the node's axis-aligned global bounds.
    Bounding,
    /// Point against the node's precise shape, as defined by its behavior.
    Shape,
}

/// Cache activity counters for a single node.
///
/// Counters only grow. They exist so callers (and tests) can check that
/// repeated reads do not redo work.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Times the local matrix was rebuilt from the decomposed parts.
    pub local_rebuilds: u64,
    /// Times the decomposed parts were recovered from an assigned matrix.
    pub decompositions: u64,
    /// Times the global matrix and color were recomputed.
    pub global_rebuilds: u64,
    /// Times the global inverse was recomputed.
    pub inversions: u64,
}
