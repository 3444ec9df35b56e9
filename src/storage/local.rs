// src/storage/local.rs

//! JSON file store backend.
//!
//! Persists the listing map as one pretty-printed JSON file. Commits write
//! to a temp file first and rename over the target, so a crashed run leaves
//! the previous state intact.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::StoredListing;
use crate::storage::{ListingStore, StoreTx};

/// File-backed listing store.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    /// Create a store persisting to the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> Result<HashMap<String, StoredListing>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[async_trait]
impl ListingStore for JsonStore {
    async fn begin(&self) -> Result<Box<dyn StoreTx + '_>> {
        let staged = self.load().await?;
        Ok(Box::new(JsonTx {
            path: self.path.clone(),
            staged,
        }))
    }
}

struct JsonTx {
    path: PathBuf,
    staged: HashMap<String, StoredListing>,
}

impl JsonTx {
    /// Write staged state atomically (write to temp, then rename).
    async fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec_pretty(&self.staged)?;

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl StoreTx for JsonTx {
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
        self.persist().await
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::Listing;

    fn entity(id: &str) -> StoredListing {
        let listing = Listing {
            region: "centre".to_string(),
            rooms: "2".to_string(),
            area: "45".to_string(),
            floor: "3/5".to_string(),
            series: "602.".to_string(),
            price: 350.0,
            link: format!("https://www.ss.lv/msg/en/flats/riga/centre/{id}.html"),
        };
        StoredListing::from_listing(&listing, Utc::now())
    }

    #[tokio::test]
    async fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("listings.json"));

        let mut tx = store.begin().await.unwrap();
        assert!(tx.get_all().await.unwrap().is_empty());
        tx.rollback().await.unwrap();
    }

    #[tokio::test]
    async fn test_commit_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listings.json");

        let store = JsonStore::new(&path);
        let mut tx = store.begin().await.unwrap();
        tx.insert(entity("aaa")).await.unwrap();
        tx.insert(entity("bbb")).await.unwrap();
        tx.commit().await.unwrap();

        // Fresh handle over the same file sees the committed rows.
        let reopened = JsonStore::new(&path);
        let mut tx = reopened.begin().await.unwrap();
        let all = tx.get_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(tx.get("aaa").await.unwrap().is_some());
        tx.rollback().await.unwrap();
    }

    #[tokio::test]
    async fn test_rollback_leaves_file_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listings.json");

        let store = JsonStore::new(&path);
        let mut tx = store.begin().await.unwrap();
        tx.insert(entity("aaa")).await.unwrap();
        tx.commit().await.unwrap();

        let mut tx = store.begin().await.unwrap();
        tx.delete("aaa").await.unwrap();
        tx.insert(entity("bbb")).await.unwrap();
        tx.rollback().await.unwrap();

        let mut tx = store.begin().await.unwrap();
        let all = tx.get_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, "aaa");
        tx.rollback().await.unwrap();
    }
}
