// src/models/entity.rs

//! Persisted listing entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Listing;

/// Durable counterpart of a [`Listing`], keyed by the same id.
///
/// Numeric sub-fields are stored parsed; a sub-field whose raw text could not
/// be parsed is stored as zero rather than blocking persistence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredListing {
    /// Stable listing id (last path segment of the URL, extension stripped)
    pub id: String,

    pub rooms: i32,
    pub area: f64,
    pub floor: i32,
    pub max_floor: i32,
    pub series: String,
    pub region: String,
    pub url: String,
    pub price: f64,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl StoredListing {
    /// Build a fresh entity from a crawled listing.
    pub fn from_listing(listing: &Listing, now: DateTime<Utc>) -> Self {
        Self {
            id: listing.id(),
            rooms: listing.rooms_count().map(|n| n as i32).unwrap_or(0),
            area: listing.area_m2().unwrap_or(0.0),
            floor: listing.floor_number().unwrap_or(0),
            max_floor: listing.max_floor().unwrap_or(0),
            series: listing.series.clone(),
            region: listing.region.clone(),
            url: listing.link.clone(),
            price: listing.price,
            created_at: now,
            updated_at: None,
        }
    }

    /// Overwrite every non-key field from `incoming`.
    ///
    /// `id` and `created_at` are preserved; `updated_at` is stamped with
    /// `now`. Each field is mapped explicitly so schema changes surface here.
    pub fn apply_update(&mut self, incoming: &StoredListing, now: DateTime<Utc>) {
        self.rooms = incoming.rooms;
        self.area = incoming.area;
        self.floor = incoming.floor;
        self.max_floor = incoming.max_floor;
        self.series = incoming.series.clone();
        self.region = incoming.region.clone();
        self.url = incoming.url.clone();
        self.price = incoming.price;
        self.updated_at = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_listing() -> Listing {
        Listing {
            region: "teika".to_string(),
            rooms: "3".to_string(),
            area: "62".to_string(),
            floor: "4/9".to_string(),
            series: "119.".to_string(),
            price: 520.0,
            link: "https://www.ss.lv/msg/en/real-estate/flats/riga/teika/qwert.html".to_string(),
        }
    }

    #[test]
    fn test_from_listing() {
        let now = Utc::now();
        let entity = StoredListing::from_listing(&sample_listing(), now);

        assert_eq!(entity.id, "qwert");
        assert_eq!(entity.rooms, 3);
        assert_eq!(entity.area, 62.0);
        assert_eq!(entity.floor, 4);
        assert_eq!(entity.max_floor, 9);
        assert_eq!(entity.region, "teika");
        assert_eq!(entity.price, 520.0);
        assert_eq!(entity.created_at, now);
        assert_eq!(entity.updated_at, None);
    }

    #[test]
    fn test_from_listing_unparseable_fields_become_zero() {
        let mut listing = sample_listing();
        listing.rooms = "Other".to_string();
        listing.area = "-".to_string();
        listing.floor = "?".to_string();

        let entity = StoredListing::from_listing(&listing, Utc::now());
        assert_eq!(entity.rooms, 0);
        assert_eq!(entity.area, 0.0);
        assert_eq!(entity.floor, 0);
        assert_eq!(entity.max_floor, 0);
    }

    #[test]
    fn test_apply_update_preserves_key_and_created_at() {
        let created = Utc::now();
        let mut existing = StoredListing::from_listing(&sample_listing(), created);

        let mut listing = sample_listing();
        listing.price = 480.0;
        listing.series = "New".to_string();
        let incoming = StoredListing::from_listing(&listing, Utc::now());

        let updated_at = Utc::now();
        existing.apply_update(&incoming, updated_at);

        assert_eq!(existing.id, "qwert");
        assert_eq!(existing.created_at, created);
        assert_eq!(existing.price, 480.0);
        assert_eq!(existing.series, "New");
        assert_eq!(existing.updated_at, Some(updated_at));
    }
}
