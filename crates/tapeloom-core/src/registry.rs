//! Exclusive bidirectional identity maps.
//!
//! A [`Registry`] binds each key to exactly one value and each value to
//! exactly one key. The diagram keeps one registry per kind of model entity
//! (states to nodes, transitions to edges, heads to colors), and every
//! lookup that misses is reported as [`RegistryError::NotFound`] so callers
//! can treat it as a broken invariant instead of silently skipping.
//!
//! # Example
//!
//! ```
//! # use tapeloom_core::registry::{Registry, RegistryError};
//! let mut registry: Registry<u32, &str> = Registry::new();
//! registry.put(1, "node-a").unwrap();
//!
//! assert_eq!(registry.by_key(&1), Ok(&"node-a"));
//! assert_eq!(registry.by_value(&"node-a"), Ok(&1));
//! assert!(matches!(
//!     registry.put(2, "node-a"),
//!     Err(RegistryError::DuplicateBinding(_))
//! ));
//! ```

use std::{collections::HashMap, fmt, hash::Hash};

use log::debug;
use thiserror::Error;

/// Failure of a [`Registry`] operation.
///
/// The payload is the `Debug` rendering of the offending key or value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("binding already exists for {0}")]
    DuplicateBinding(String),

    #[error("no binding for {0}")]
    NotFound(String),
}

/// A one-to-one map that can be queried from either side.
///
/// Both directions are always updated together: there is no state in which
/// a key maps to a value whose reverse entry is missing.
#[derive(Debug, Clone)]
pub struct Registry<K, V> {
    forward: HashMap<K, V>,
    backward: HashMap<V, K>,
}

impl<K, V> Default for Registry<K, V> {
    fn default() -> Self {
        Self {
            forward: HashMap::new(),
            backward: HashMap::new(),
        }
    }
}

impl<K, V> Registry<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: Eq + Hash + Clone + fmt::Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `key` to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateBinding`] if either side is already
    /// bound. The registry is left untouched in that case.
    pub fn put(&mut self, key: K, value: V) -> Result<(), RegistryError> {
        if self.forward.contains_key(&key) {
            return Err(RegistryError::DuplicateBinding(format!("{key:?}")));
        }
        if self.backward.contains_key(&value) {
            return Err(RegistryError::DuplicateBinding(format!("{value:?}")));
        }

        debug!(key:? = key, value:? = value; "Registry binding added");
        self.forward.insert(key.clone(), value.clone());
        self.backward.insert(value, key);
        Ok(())
    }

    /// Looks up the value bound to `key`.
    pub fn by_key(&self, key: &K) -> Result<&V, RegistryError> {
        self.forward
            .get(key)
            .ok_or_else(|| RegistryError::NotFound(format!("{key:?}")))
    }

    /// Looks up the key bound to `value`.
    pub fn by_value(&self, value: &V) -> Result<&K, RegistryError> {
        self.backward
            .get(value)
            .ok_or_else(|| RegistryError::NotFound(format!("{value:?}")))
    }

    /// Removes the binding of `key` in both directions and returns its value.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if `key` is not bound.
    pub fn remove(&mut self, key: &K) -> Result<V, RegistryError> {
        let value = self
            .forward
            .remove(key)
            .ok_or_else(|| RegistryError::NotFound(format!("{key:?}")))?;
        self.backward.remove(&value);

        debug!(key:? = key, value:? = value; "Registry binding removed");
        Ok(value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.forward.contains_key(key)
    }

    pub fn contains_value(&self, value: &V) -> bool {
        self.backward.contains_key(value)
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Iterates over every binding in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.forward.iter()
    }
}
