// src/models/listing.rs

//! Listing record extracted from one result-page row.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::url::listing_id;

/// One rental advertisement scraped from a result page.
///
/// Numeric sub-fields (`rooms`, `area`, `floor`) are kept as the raw cell
/// text; the derivation methods parse them independently so that one
/// unreadable value never invalidates the whole record. Only monthly-rate
/// listings become records, so `price` is always present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    /// District name, taken from the listing URL
    pub region: String,

    /// Room count as printed in the row (e.g. "2", "Other")
    pub rooms: String,

    /// Area in square meters as printed in the row
    pub area: String,

    /// Floor as printed in the row, "N/M" for floor N of M
    pub floor: String,

    /// Building series (e.g. "602.", "New")
    pub series: String,

    /// Monthly price in EUR
    pub price: f64,

    /// Absolute URL of the listing detail page
    pub link: String,
}

impl Listing {
    /// Stable identifier: the last non-empty path segment of the link with
    /// its extension stripped. Empty when the link is unparseable.
    pub fn id(&self) -> String {
        listing_id(&self.link).unwrap_or_default()
    }

    /// Parsed room count, if the row text is numeric.
    pub fn rooms_count(&self) -> Option<u32> {
        self.rooms.trim().parse().ok()
    }

    /// Parsed area in square meters.
    pub fn area_m2(&self) -> Option<f64> {
        self.area.trim().parse().ok()
    }

    /// Parsed floor number (the N of "N/M").
    pub fn floor_number(&self) -> Option<i32> {
        self.floor.split('/').next()?.trim().parse().ok()
    }

    /// Parsed top floor of the building (the M of "N/M").
    pub fn max_floor(&self) -> Option<i32> {
        self.floor.split('/').nth(1)?.trim().parse().ok()
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}eur {}r {}m2 {} {} {}",
            self.region, self.price, self.rooms, self.area, self.floor, self.series, self.link
        )
    }
}
