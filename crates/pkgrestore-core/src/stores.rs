use indexmap::{IndexMap, IndexSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use crate::reference::{PackageReference, ResolvedPackageReference};
use pkgrestore_utils::{matches_pending_version, reference_key};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Outcome of asking the pending map for a reference.
#[derive(Debug, Clone)]
pub enum PendingLookup {
    Added(Arc<PackageReference>),
    Existing(Arc<PackageReference>),
    Conflict(Arc<PackageReference>),
}

/// Requested-but-unresolved references, keyed case insensitively, in request order.
#[derive(Default)]
pub struct RequestStore {
    entries: Mutex<IndexMap<String, Arc<PackageReference>>>,
}

impl RequestStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lookup and insert happen under one lock, so concurrent callers asking
    /// for the same name cannot both win with different versions.
    pub fn get_or_add(&self, name: &str, version: Option<&str>) -> PendingLookup {
        let key = reference_key(name);
        let mut entries = lock(&self.entries);

        if let Some(existing) = entries.get(&key) {
            return if matches_pending_version(existing.version.as_deref(), version) {
                PendingLookup::Existing(Arc::clone(existing))
            } else {
                PendingLookup::Conflict(Arc::clone(existing))
            };
        }

        let reference = Arc::new(PackageReference::new(name, version));
        entries.insert(key, Arc::clone(&reference));
        PendingLookup::Added(reference)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<PackageReference>> {
        lock(&self.entries).get(&reference_key(name)).cloned()
    }

    #[must_use]
    pub fn values(&self) -> Vec<Arc<PackageReference>> {
        lock(&self.entries).values().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolved references for the lifetime of a session. Entries are only ever added.
#[derive(Default)]
pub struct ResolvedStore {
    entries: RwLock<IndexMap<String, Arc<ResolvedPackageReference>>>,
}

impl ResolvedStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<ResolvedPackageReference>> {
        self.read().get(&reference_key(name)).cloned()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(&reference_key(name))
    }

    /// Adds the reference unless its key is already present; the first writer wins.
    pub fn try_add(&self, reference: Arc<ResolvedPackageReference>) -> bool {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let key = reference.key();
        if entries.contains_key(&key) {
            return false;
        }
        entries.insert(key, reference);
        true
    }

    #[must_use]
    pub fn keys(&self) -> IndexSet<String> {
        self.read().keys().cloned().collect()
    }

    #[must_use]
    pub fn values(&self) -> Vec<Arc<ResolvedPackageReference>> {
        self.read().values().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every assembly path of every resolved package, in resolution order.
    #[must_use]
    pub fn assembly_probing_paths(&self) -> Vec<PathBuf> {
        self.read()
            .values()
            .flat_map(|r| r.assembly_paths.iter().cloned())
            .collect()
    }

    /// Every native-library probing directory, in resolution order.
    #[must_use]
    pub fn native_probing_roots(&self) -> Vec<PathBuf> {
        self.read()
            .values()
            .flat_map(|r| r.probing_paths.iter().cloned())
            .collect()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, IndexMap<String, Arc<ResolvedPackageReference>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Restore sources with set semantics, kept in the order first added.
#[derive(Default)]
pub struct SourceSet {
    sources: Mutex<IndexSet<String>>,
}

impl SourceSet {
    pub fn add(&self, source: &str) -> bool {
        lock(&self.sources).insert(source.to_string())
    }

    #[must_use]
    pub fn values(&self) -> Vec<String> {
        lock(&self.sources).iter().cloned().collect()
    }
}
