// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbor Scene: scene-graph nodes with lazily cached global state.
//!
//! A [`Scene`] owns a tree of nodes addressed by generational [`NodeId`]s.
//! Every node carries
//! - a local transform, kept both as decomposed parts (position, scale, skew,
//!   rotation) and as a matrix, each rebuilt from the other on demand;
//! - a color transform (per-channel multiplier and offset) that composes down the tree;
//! - an ordered list of [`Component`]s driven by the per-frame update;
//! - a [`NodeBehavior`] supplying bounds, shape, and drawing for its kind;
//! - a property bag, an [`Extra`] data store, and typed [`Events`].
//!
//! ## Caching
//!
//! Global matrices, global tints, and inverse global matrices are derived
//! lazily and cached per node. Mutations mark the affected subtree stale;
//! reads revalidate only what is stale. The inverse is versioned against the
//! global matrix, so it is recomputed only when the matrix actually changed.
//! [`Scene::cache_stats`] exposes the counters.
//!
//! ## Tree bookkeeping
//!
//! Each attached node stores its index in its parent's child list, and the
//! scene keeps `children(parent)[index(child)] == child` across every insert,
//! detach, and replacement.
//!
//! ## Updates
//!
//! [`Scene::update`] runs a node's components in attachment order with the
//! delta scaled by the node's speed, then the behavior's own hook. Components
//! may attach or detach components (themselves included) while running.
//! [`Scene`] implements [`arbor_pump::Updatable`], so it can be driven by the
//! frame pump directly.
//!
//! ## Minimal usage
//!
//! ```
//! use arbor_scene::{HitTestKind, Scene, Solid};
//! use kurbo::{Point, Rect};
//!
//! let mut scene = Scene::new();
//! let stage = scene.stage();
//!
//! let panel = scene.create_group();
//! let button = scene.create_node(Solid::new((1.0, 1.0), 0xFF00_00FF));
//! scene.add_child(stage, panel);
//! scene.add_child(panel, button);
//!
//! scene.set_position(panel, Point::new(10.0, 0.0));
//! scene.set_scale(button, 2.0);
//!
//! assert_eq!(scene.global_bounds(button), Some(Rect::new(10.0, 0.0, 12.0, 2.0)));
//! assert_eq!(scene.pick(stage, Point::new(11.0, 1.0), HitTestKind::Shape), Some(button));
//!
//! scene.set_mouse_enabled(button, false);
//! assert_eq!(scene.hit_test_bounding(button, Point::new(11.0, 1.0)), None);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod behavior;
mod component;
mod events;
mod extra;
mod node;
mod props;
mod query;
mod scene;
mod transform;
mod types;

pub use behavior::{Group, NodeBehavior, RenderContext, RenderFrame, Solid};
pub use component::{Cancellable, Component, ComponentId, ComponentKind, UpdateCx};
pub use events::{Events, SubscriptionId};
pub use extra::Extra;
pub use props::PropTrigger;
pub use scene::{NodeDisplay, Scene};
pub use types::{BlendMode, CacheStats, HitTestKind, NodeFlags, NodeId};

pub use arbor_geom::{ColorTransform, TransformParts};
