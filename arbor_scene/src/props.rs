// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! String property bag and property triggers.
//!
//! Every node carries an insertion-ordered `String → String` bag. Setting a
//! property through [`Scene::add_prop`] also runs the trigger registered on the
//! scene for that key, if any. Triggers let declarative data (for example
//! attributes loaded from a level file) attach components or otherwise
//! configure a node without the scene knowing about concrete component types.

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use core::str::FromStr;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::scene::Scene;
use crate::types::NodeId;

/// Callback run when a property with a matching key is set on any node.
pub type PropTrigger = Rc<dyn Fn(&mut Scene, NodeId, &str, &str)>;

/// Insertion-ordered property storage of a single node.
#[derive(Clone, Debug, Default)]
pub(crate) struct Props {
    entries: IndexMap<String, String, FxBuildHasher>,
}

impl Props {
    /// Sets `key`, keeping its original position if it already exists.
    fn set(&mut self, key: &str, value: &str) {
        match self.entries.get_mut(key) {
            Some(v) => {
                v.clear();
                v.push_str(value);
            }
            None => {
                self.entries.insert(key.to_string(), value.to_string());
            }
        }
    }

    pub(crate) fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Registry of property triggers, keyed by property name.
#[derive(Clone, Default)]
pub(crate) struct PropTriggers {
    by_key: BTreeMap<String, PropTrigger>,
}

impl core::fmt::Debug for PropTriggers {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.by_key.keys()).finish()
    }
}

impl Scene {
    /// Registers `trigger` for properties named `key`, replacing any previous one.
    pub fn register_prop_trigger(
        &mut self,
        key: impl Into<String>,
        trigger: impl Fn(&mut Self, NodeId, &str, &str) + 'static,
    ) {
        self.prop_triggers.by_key.insert(key.into(), Rc::new(trigger));
    }

    /// Removes the trigger for `key`. Returns true if one was registered.
    pub fn unregister_prop_trigger(&mut self, key: &str) -> bool {
        self.prop_triggers.by_key.remove(key).is_some()
    }

    /// Sets property `key` on `id` and runs the matching trigger, if any.
    ///
    /// No-op for a stale `id`.
    pub fn add_prop(&mut self, id: NodeId, key: &str, value: &str) {
        let Some(node) = self.node_opt_mut(id) else {
            return;
        };
        node.props.set(key, value);
        if let Some(trigger) = self.prop_triggers.by_key.get(key).cloned() {
            log::debug!("prop trigger {key:?} fired on {id:?}");
            trigger(self, id, key, value);
        }
    }

    /// Sets every `(key, value)` pair in order, as if by [`add_prop`](Self::add_prop).
    pub fn add_props<'a>(&mut self, id: NodeId, values: impl IntoIterator<Item = (&'a str, &'a str)>) {
        for (key, value) in values {
            self.add_prop(id, key, value);
        }
    }

    /// Returns true if `id` has property `key`.
    pub fn has_prop(&self, id: NodeId, key: &str) -> bool {
        self.prop(id, key).is_some()
    }

    /// Returns the raw value of property `key`.
    pub fn prop(&self, id: NodeId, key: &str) -> Option<&str> {
        self.node_opt(id)?.props.get(key)
    }

    /// Returns property `key`, or `default` when absent.
    pub fn prop_string<'a>(&'a self, id: NodeId, key: &str, default: &'a str) -> &'a str {
        self.prop(id, key).unwrap_or(default)
    }

    /// Returns property `key` parsed as an integer, or `default` when absent or unparsable.
    pub fn prop_int(&self, id: NodeId, key: &str, default: i64) -> i64 {
        self.parsed_prop(id, key).unwrap_or(default)
    }

    /// Returns property `key` parsed as a float, or `default` when absent or unparsable.
    pub fn prop_f64(&self, id: NodeId, key: &str, default: f64) -> f64 {
        self.parsed_prop(id, key).unwrap_or(default)
    }

    /// Iterates the properties of `id` in insertion order. Empty for a stale `id`.
    pub fn props(&self, id: NodeId) -> impl Iterator<Item = (&str, &str)> {
        self.node_opt(id).into_iter().flat_map(|n| n.props.iter())
    }

    fn parsed_prop<T: FromStr>(&self, id: NodeId, key: &str) -> Option<T> {
        self.prop(id, key)?.trim().parse().ok()
    }
}
