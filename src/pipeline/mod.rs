// src/pipeline/mod.rs

//! Pipeline entry points.
//!
//! - `reconcile`: diff a crawl result against the persisted store
//! - `sync`: full crawl → reconcile → notify run

pub mod reconcile;
pub mod sync;

pub use reconcile::{NewListings, Reconciler};
pub use sync::{SyncOutcome, run_sync};
