// src/storage/mod.rs

//! Persisted listing store abstractions.
//!
//! The reconciler only ever talks to [`ListingStore`]; every mutation happens
//! inside a [`StoreTx`] so that one reconciliation run commits or rolls back
//! as a unit. Schema management beyond this surface belongs to the backend.

pub mod local;
pub mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::StoredListing;

// Re-export for convenience
pub use local::JsonStore;
pub use memory::MemoryStore;

/// Store of persisted listings, keyed by listing id.
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Begin a transaction. Changes made through the returned handle become
    /// visible only on commit.
    async fn begin(&self) -> Result<Box<dyn StoreTx + '_>>;
}

/// One open store transaction.
#[async_trait]
pub trait StoreTx: Send {
    /// Fetch one listing by id.
    async fn get(&mut self, id: &str) -> Result<Option<StoredListing>>;

    /// Fetch every persisted listing.
    async fn get_all(&mut self) -> Result<Vec<StoredListing>>;

    /// Insert a new listing.
    async fn insert(&mut self, listing: StoredListing) -> Result<()>;

    /// Overwrite an existing listing.
    async fn update(&mut self, listing: StoredListing) -> Result<()>;

    /// Delete a listing by id.
    async fn delete(&mut self, id: &str) -> Result<()>;

    /// Make every staged change durable.
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Discard every staged change.
    async fn rollback(self: Box<Self>) -> Result<()>;
}
