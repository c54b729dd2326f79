// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Opaque per-node extra data.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use core::any::Any;

/// A string-keyed store of arbitrary values owned by a node.
///
/// The scene never reads these values. Each key holds one value of any
/// `'static` type; typed reads fail (return `None`) on a type mismatch.
#[derive(Default)]
pub struct Extra {
    entries: BTreeMap<String, Box<dyn Any>>,
}

impl core::fmt::Debug for Extra {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

impl Extra {
    /// Stores `value` under `key`. Returns true if a previous value was replaced.
    pub fn set<T: Any>(&mut self, key: impl Into<String>, value: T) -> bool {
        self.entries.insert(key.into(), Box::new(value)).is_some()
    }

    /// Returns the value under `key` if it exists and has type `T`.
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.entries.get(key)?.downcast_ref()
    }

    /// Mutable variant of [`get`](Self::get).
    pub fn get_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.entries.get_mut(key)?.downcast_mut()
    }

    /// Returns true if any value is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Removes the value under `key`. Returns true if there was one.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_get_checks_type() {
        let mut extra = Extra::default();
        assert!(!extra.set("hp", 10_u32));
        assert_eq!(extra.get::<u32>("hp"), Some(&10));
        assert_eq!(extra.get::<i32>("hp"), None);
        *extra.get_mut::<u32>("hp").unwrap() += 5;
        assert!(extra.set("hp", 1.5_f64), "replacing reports the old value");
        assert_eq!(extra.get::<f64>("hp"), Some(&1.5));
        assert_eq!(extra.len(), 1);
        assert!(extra.remove("hp"));
        assert!(extra.is_empty());
        assert!(!extra.contains("hp"));
    }
}
