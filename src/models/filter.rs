// src/models/filter.rs

//! Listing filter criteria and the `/filter`-style expression grammar.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::Listing;

/// Numeric and categorical criteria a listing must satisfy.
///
/// Absent optional fields impose no constraint. A listing whose raw text for
/// a numeric sub-field cannot be parsed passes the corresponding check; the
/// other checks still apply.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ListingFilter {
    /// Minimum monthly price in EUR
    pub min_price: f64,

    /// Maximum monthly price in EUR
    pub max_price: Option<f64>,

    /// Acceptable room counts
    pub rooms: Option<Vec<u32>>,

    /// Minimum area in square meters
    pub min_area: f64,

    /// Maximum area in square meters
    pub max_area: Option<f64>,

    /// Acceptable regions, compared case-insensitively
    pub regions: Option<Vec<String>>,
}

impl ListingFilter {
    /// Parse a filter expression of the form
    /// `price[-maxPrice][;room,room,...[;area[-maxArea][;region,region,...]]]`.
    ///
    /// Every segment after the price is optional. A bare number for price or
    /// area means no upper bound. An unparseable numeric token is a format
    /// error; unparseable room or region tokens are dropped from their set,
    /// and a set left empty is treated as unconstrained.
    pub fn from_expression(expr: &str) -> Result<Self> {
        let segments: Vec<&str> = expr.trim().split(';').collect();

        let (min_price, max_price) = parse_bounds(segments[0])?;

        let rooms = segments.get(1).and_then(|segment| {
            let set: Vec<u32> = segment
                .split(',')
                .filter_map(|token| token.trim().parse().ok())
                .collect();
            if set.is_empty() { None } else { Some(set) }
        });

        let (min_area, max_area) = match segments.get(2) {
            Some(segment) => parse_bounds(segment)?,
            None => (0.0, None),
        };

        let regions = segments.get(3).and_then(|segment| {
            let set: Vec<String> = segment
                .split(',')
                .map(|token| token.trim().to_string())
                .filter(|token| !token.is_empty())
                .collect();
            if set.is_empty() { None } else { Some(set) }
        });

        Ok(Self {
            min_price,
            max_price,
            rooms,
            min_area,
            max_area,
            regions,
        })
    }

    /// Evaluate the listing against every configured constraint.
    pub fn matches(&self, listing: &Listing) -> bool {
        if listing.price < self.min_price {
            return false;
        }
        if let Some(max) = self.max_price {
            if listing.price > max {
                return false;
            }
        }

        if let Some(rooms) = &self.rooms {
            // Unparseable room text disables only this check.
            if let Some(count) = listing.rooms_count() {
                if !rooms.contains(&count) {
                    return false;
                }
            }
        }

        if let Some(area) = listing.area_m2() {
            if area < self.min_area {
                return false;
            }
            if let Some(max) = self.max_area {
                if area > max {
                    return false;
                }
            }
        }

        if let Some(regions) = &self.regions {
            if !regions
                .iter()
                .any(|region| region.eq_ignore_ascii_case(&listing.region))
            {
                return false;
            }
        }

        true
    }
}

/// Parse a `min[-max]` numeric segment.
fn parse_bounds(segment: &str) -> Result<(f64, Option<f64>)> {
    match segment.split_once('-') {
        Some((lo, hi)) => Ok((parse_number(lo, segment)?, Some(parse_number(hi, segment)?))),
        None => Ok((parse_number(segment, segment)?, None)),
    }
}

fn parse_number(token: &str, segment: &str) -> Result<f64> {
    token
        .trim()
        .parse()
        .map_err(|e| AppError::filter_format(segment, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(region: &str, rooms: &str, area: &str, price: f64) -> Listing {
        Listing {
            region: region.to_string(),
            rooms: rooms.to_string(),
            area: area.to_string(),
            floor: "2/5".to_string(),
            series: "602.".to_string(),
            price,
            link: format!("https://www.ss.lv/msg/en/flats/riga/{region}/abcde.html"),
        }
    }

    #[test]
    fn test_parse_full_expression() {
        let filter = ListingFilter::from_expression("100-200;1,2;35-45;centre,daugavgriva").unwrap();
        assert_eq!(filter.min_price, 100.0);
        assert_eq!(filter.max_price, Some(200.0));
        assert_eq!(filter.rooms, Some(vec![1, 2]));
        assert_eq!(filter.min_area, 35.0);
        assert_eq!(filter.max_area, Some(45.0));
        assert_eq!(
            filter.regions,
            Some(vec!["centre".to_string(), "daugavgriva".to_string()])
        );
    }

    #[test]
    fn test_parse_price_only() {
        let filter = ListingFilter::from_expression("150").unwrap();
        assert_eq!(filter.min_price, 150.0);
        assert_eq!(filter.max_price, None);
        assert_eq!(filter.rooms, None);
        assert_eq!(filter.min_area, 0.0);
        assert_eq!(filter.max_area, None);
        assert_eq!(filter.regions, None);
    }

    #[test]
    fn test_parse_bad_price_is_error() {
        assert!(ListingFilter::from_expression("cheap").is_err());
        assert!(ListingFilter::from_expression("100-").is_err());
        assert!(ListingFilter::from_expression("100;1,2;a-b").is_err());
    }

    #[test]
    fn test_parse_drops_bad_room_and_region_tokens() {
        let filter = ListingFilter::from_expression("100;1,two,3;30;centre,,").unwrap();
        assert_eq!(filter.rooms, Some(vec![1, 3]));
        assert_eq!(filter.regions, Some(vec!["centre".to_string()]));
    }

    #[test]
    fn test_parse_empty_sets_are_unconstrained() {
        let filter = ListingFilter::from_expression("100;x,y;30;,").unwrap();
        assert_eq!(filter.rooms, None);
        assert_eq!(filter.regions, None);
    }

    #[test]
    fn test_matches_price_bounds() {
        let filter = ListingFilter::from_expression("100-200").unwrap();
        assert!(filter.matches(&listing("centre", "2", "40", 100.0)));
        assert!(filter.matches(&listing("centre", "2", "40", 200.0)));
        assert!(!filter.matches(&listing("centre", "2", "40", 99.0)));
        assert!(!filter.matches(&listing("centre", "2", "40", 201.0)));
    }

    #[test]
    fn test_matches_rooms() {
        let filter = ListingFilter {
            rooms: Some(vec![1, 2]),
            ..ListingFilter::default()
        };
        assert!(filter.matches(&listing("centre", "2", "40", 100.0)));
        assert!(!filter.matches(&listing("centre", "3", "40", 100.0)));
        // Unparseable room text passes the room check.
        assert!(filter.matches(&listing("centre", "Other", "40", 100.0)));
    }

    #[test]
    fn test_matches_area() {
        let filter = ListingFilter {
            min_area: 35.0,
            max_area: Some(45.0),
            ..ListingFilter::default()
        };
        assert!(filter.matches(&listing("centre", "2", "40", 100.0)));
        assert!(!filter.matches(&listing("centre", "2", "30", 100.0)));
        assert!(!filter.matches(&listing("centre", "2", "50", 100.0)));
        // Unparseable area text passes both area checks.
        assert!(filter.matches(&listing("centre", "2", "-", 100.0)));
    }

    #[test]
    fn test_max_area_ignores_room_count() {
        // The upper area bound applies to the area value, not the room field.
        let filter = ListingFilter {
            max_area: Some(45.0),
            ..ListingFilter::default()
        };
        assert!(filter.matches(&listing("centre", "50", "40", 100.0)));
        assert!(!filter.matches(&listing("centre", "1", "50", 100.0)));
    }

    #[test]
    fn test_matches_region_case_insensitive() {
        let filter = ListingFilter {
            regions: Some(vec!["Centre".to_string()]),
            ..ListingFilter::default()
        };
        assert!(filter.matches(&listing("centre", "2", "40", 100.0)));
        assert!(filter.matches(&listing("CENTRE", "2", "40", 100.0)));
        assert!(!filter.matches(&listing("teika", "2", "40", 100.0)));
    }

    #[test]
    fn test_default_filter_matches_everything() {
        let filter = ListingFilter::default();
        assert!(filter.matches(&listing("anywhere", "x", "-", 1.0)));
    }
}
