// src/utils/mod.rs

//! Shared helpers.

pub mod url;

pub use url::{listing_id, region_from_link, resolve};
