//! Resolved-value caches.
//!
//! All four caches live behind a single lock so that clearing them is
//! atomic: a reader never sees a fresh raw value next to a stale import.
//!
//! Every clear starts a new generation. A resolution remembers the
//! generation it started in and its result is only stored if no clear
//! happened in between, so a value read before an override change never
//! lands in the cache emptied by that change.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock};

use super::lookup::ValueSource;
use crate::deprecation::DeprecationWarning;
use crate::source::{Model, Module, Object};
use crate::value::SettingValue;

/// Identifies one cached resolution.
///
/// The accepted deprecated name is part of the key, so lookups of the same
/// setting through different deprecated sources are cached separately.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct CacheKey {
    name: String,
    accept_deprecated: Option<String>,
}

impl CacheKey {
    pub(crate) fn new(name: &str, accept_deprecated: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            accept_deprecated: accept_deprecated.map(str::to_string),
        }
    }
}

/// A cached value plus the deprecation warnings its resolution produced.
#[derive(Debug, Clone)]
pub(crate) struct Entry<T> {
    pub(crate) value: T,
    pub(crate) warnings: Vec<DeprecationWarning>,
}

/// A cached raw value, remembering where it came from for error reporting.
#[derive(Debug, Clone)]
pub(crate) struct RawEntry {
    pub(crate) value: SettingValue,
    pub(crate) source: ValueSource,
    pub(crate) warnings: Vec<DeprecationWarning>,
}

/// Number of entries in each cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Raw values.
    pub raw: usize,
    /// Imported modules.
    pub modules: usize,
    /// Imported objects.
    pub objects: usize,
    /// Looked-up models.
    pub models: usize,
}

impl CacheStats {
    /// Total number of cached entries.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.raw + self.modules + self.objects + self.models
    }
}

#[derive(Default)]
struct CacheSet {
    generation: u64,
    raw: HashMap<CacheKey, RawEntry>,
    modules: HashMap<CacheKey, Entry<Arc<Module>>>,
    objects: HashMap<CacheKey, Entry<Object>>,
    models: HashMap<CacheKey, Entry<Arc<Model>>>,
}

/// The resolver's caches, shared with the override-change listener.
#[derive(Default)]
pub(crate) struct Caches {
    inner: RwLock<CacheSet>,
}

impl std::fmt::Debug for Caches {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Caches")
            .field("stats", &self.stats())
            .finish()
    }
}

fn lookup<K: Eq + Hash, V: Clone>(map: &HashMap<K, V>, key: &K) -> Option<V> {
    map.get(key).cloned()
}

impl Caches {
    pub(crate) fn raw(&self, key: &CacheKey) -> Option<RawEntry> {
        let set = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        lookup(&set.raw, key)
    }

    pub(crate) fn store_raw(&self, generation: u64, key: CacheKey, entry: RawEntry) -> bool {
        self.store(generation, |set| {
            set.raw.insert(key, entry);
        })
    }

    pub(crate) fn module(&self, key: &CacheKey) -> Option<Entry<Arc<Module>>> {
        let set = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        lookup(&set.modules, key)
    }

    pub(crate) fn store_module(
        &self,
        generation: u64,
        key: CacheKey,
        entry: Entry<Arc<Module>>,
    ) -> bool {
        self.store(generation, |set| {
            set.modules.insert(key, entry);
        })
    }

    pub(crate) fn object(&self, key: &CacheKey) -> Option<Entry<Object>> {
        let set = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        lookup(&set.objects, key)
    }

    pub(crate) fn store_object(
        &self,
        generation: u64,
        key: CacheKey,
        entry: Entry<Object>,
    ) -> bool {
        self.store(generation, |set| {
            set.objects.insert(key, entry);
        })
    }

    pub(crate) fn model(&self, key: &CacheKey) -> Option<Entry<Arc<Model>>> {
        let set = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        lookup(&set.models, key)
    }

    pub(crate) fn store_model(
        &self,
        generation: u64,
        key: CacheKey,
        entry: Entry<Arc<Model>>,
    ) -> bool {
        self.store(generation, |set| {
            set.models.insert(key, entry);
        })
    }

    /// Runs `insert` under the write lock if `generation` is still current.
    fn store(&self, generation: u64, insert: impl FnOnce(&mut CacheSet)) -> bool {
        let mut set = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if set.generation != generation {
            return false;
        }
        insert(&mut *set);
        true
    }

    /// The current generation; pass it to a `store_*` call after resolving.
    pub(crate) fn generation(&self) -> u64 {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .generation
    }

    /// Empties every cache at once and starts a new generation.
    pub(crate) fn clear(&self) {
        let mut set = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *set = CacheSet {
            generation: set.generation.wrapping_add(1),
            ..CacheSet::default()
        };
    }

    pub(crate) fn stats(&self) -> CacheStats {
        let set = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        CacheStats {
            raw: set.raw.len(),
            modules: set.modules.len(),
            objects: set.objects.len(),
            models: set.models.len(),
        }
    }
}
