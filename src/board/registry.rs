//! Two-level locking for named entries.
//!
//! The outer lock guards only the name index and listing order. Each entry
//! sits behind its own lock, reached through an `Arc` handle. Callers resolve
//! a handle under the outer lock, drop it, and then work under the entry lock
//! alone, so the outer lock is never held while an entry lock is waited on.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::Result;

/// Shared handle to one entry.
pub(crate) type Handle<T> = Arc<RwLock<T>>;

/// Acquire a read guard, recovering from poisoning.
///
/// Entries are only replaced after a successful write, so a panic in
/// another holder never leaves them half-updated.
pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Acquire a write guard, recovering from poisoning.
pub(crate) fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct Index<T> {
    order: Vec<String>,
    entries: HashMap<String, Handle<T>>,
}

/// Ordered collection of individually locked entries.
pub(crate) struct Registry<T> {
    index: RwLock<Index<T>>,
}

impl<T> Registry<T> {
    /// Build a registry from entries in listing order.
    ///
    /// Later duplicates of a name are ignored.
    pub(crate) fn new(entries: impl IntoIterator<Item = (String, T)>) -> Self {
        let mut order = Vec::new();
        let mut map = HashMap::new();
        for (name, value) in entries {
            if map.contains_key(&name) {
                continue;
            }
            order.push(name.clone());
            map.insert(name, Arc::new(RwLock::new(value)));
        }
        Self {
            index: RwLock::new(Index {
                order,
                entries: map,
            }),
        }
    }

    /// Resolve the handle for `name`.
    pub(crate) fn get(&self, name: &str) -> Option<Handle<T>> {
        read(&self.index).entries.get(name).cloned()
    }

    /// Resolve the handle for `name`, creating the entry if it is missing.
    ///
    /// For a new entry, `commit` receives the full name list including the
    /// new name and must succeed before the entry becomes visible. Returns
    /// the handle and whether it was created.
    pub(crate) fn get_or_insert_with<C, F>(
        &self,
        name: &str,
        commit: C,
        init: F,
    ) -> Result<(Handle<T>, bool)>
    where
        C: FnOnce(&[String]) -> Result<()>,
        F: FnOnce() -> T,
    {
        let mut index = write(&self.index);
        if let Some(handle) = index.entries.get(name) {
            return Ok((Arc::clone(handle), false));
        }

        let mut staged = index.order.clone();
        staged.push(name.to_string());
        commit(&staged)?;

        let handle = Arc::new(RwLock::new(init()));
        index.order = staged;
        index.entries.insert(name.to_string(), Arc::clone(&handle));
        Ok((handle, true))
    }

    /// Names in listing order.
    pub(crate) fn names(&self) -> Vec<String> {
        read(&self.index).order.clone()
    }

    /// Handles in listing order.
    pub(crate) fn snapshot(&self) -> Vec<(String, Handle<T>)> {
        let index = read(&self.index);
        index
            .order
            .iter()
            .filter_map(|name| {
                index
                    .entries
                    .get(name)
                    .map(|handle| (name.clone(), Arc::clone(handle)))
            })
            .collect()
    }

    /// Number of entries.
    pub(crate) fn len(&self) -> usize {
        read(&self.index).order.len()
    }
}
