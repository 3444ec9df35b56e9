// src/storage/memory.rs

//! In-memory store backend for tests and dry runs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::Result;
use crate::models::StoredListing;
use crate::storage::{ListingStore, StoreTx};

/// Volatile listing store. Transactions stage on a copy of the map and swap
/// it in on commit.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    map: Arc<Mutex<HashMap<String, StoredListing>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of persisted listings (committed state).
    pub fn len(&self) -> usize {
        self.map.lock().expect("store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Committed snapshot, for assertions.
    pub fn snapshot(&self) -> Vec<StoredListing> {
        self.map
            .lock()
            .expect("store lock poisoned")
            .values()
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ListingStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn StoreTx + '_>> {
        let staged = self.map.lock().expect("store lock poisoned").clone();
        Ok(Box::new(MemoryTx {
            shared: Arc::clone(&self.map),
            staged,
        }))
    }
}

struct MemoryTx {
    shared: Arc<Mutex<HashMap<String, StoredListing>>>,
    staged: HashMap<String, StoredListing>,
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn get(&mut self, id: &str) -> Result<Option<StoredListing>> {
        Ok(self.staged.get(id).cloned())
    }

    async fn get_all(&mut self) -> Result<Vec<StoredListing>> {
        Ok(self.staged.values().cloned().collect())
    }

    async fn insert(&mut self, listing: StoredListing) -> Result<()> {
        self.staged.insert(listing.id.clone(), listing);
        Ok(())
    }

    async fn update(&mut self, listing: StoredListing) -> Result<()> {
        self.staged.insert(listing.id.clone(), listing);
        Ok(())
    }

    async fn delete(&mut self, id: &str) -> Result<()> {
        self.staged.remove(id);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        *self.shared.lock().expect("store lock poisoned") = self.staged;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}
