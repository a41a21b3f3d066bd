//! Shared dataset registry.
//!
//! Tables are loaded once at page initialization and then only read. The
//! store hands out `Arc<Table>` clones so concurrent pipeline invocations
//! (one per connected user in the hosting app) alias the same immutable
//! snapshot instead of copying it. There is no reload or invalidation
//! path; replacing a dataset means inserting under the same name.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::types::Table;

#[derive(Default)]
pub struct DatasetStore {
    inner: RwLock<HashMap<String, Arc<Table>>>,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a loaded table and return the shared handle.
    pub fn insert(&self, name: impl Into<String>, table: Table) -> Arc<Table> {
        let handle = Arc::new(table);
        self.inner.write().insert(name.into(), Arc::clone(&handle));
        handle
    }

    /// Shared handle to a dataset, `None` when it was never loaded.
    pub fn get(&self, name: &str) -> Option<Arc<Table>> {
        self.inner.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.read().contains_key(name)
    }

    /// Registered dataset names, sorted for stable display.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}
