//! Great-circle distance between profile locations.

use serde::{Deserialize, Serialize};

use crate::profile::Location;

/// Earth radius in miles.
const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Distance between two users.
///
/// `Unknown` means at least one side has no coordinates. Missing location
/// data must never be treated as zero distance: unknown-distance candidates
/// are exempt from radius filtering, not closest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Distance {
    Known { miles: f64 },
    Unknown,
}

impl Distance {
    /// Whether this distance exceeds the given radius.
    ///
    /// Unknown distances never exceed a radius; they are not filterable.
    pub fn exceeds(&self, radius_miles: f64) -> bool {
        match self {
            Distance::Known { miles } => *miles > radius_miles,
            Distance::Unknown => false,
        }
    }
}

/// Haversine great-circle distance in miles.
pub fn distance_between(a: Option<Location>, b: Option<Location>) -> Distance {
    let (a, b) = match (a, b) {
        (Some(a), Some(b)) => (a, b),
        _ => return Distance::Unknown,
    };

    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);
    let miles = 2.0 * EARTH_RADIUS_MILES * h.sqrt().asin();

    Distance::Known { miles }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_is_zero() {
        let p = Location { lat: 40.7128, lng: -74.0060 };
        match distance_between(Some(p), Some(p)) {
            Distance::Known { miles } => assert!(miles.abs() < 1e-9),
            Distance::Unknown => panic!("expected known distance"),
        }
    }

    #[test]
    fn test_nyc_to_la() {
        let nyc = Location { lat: 40.7128, lng: -74.0060 };
        let la = Location { lat: 34.0522, lng: -118.2437 };
        match distance_between(Some(nyc), Some(la)) {
            // Roughly 2,445 miles.
            Distance::Known { miles } => assert!((miles - 2445.0).abs() < 15.0),
            Distance::Unknown => panic!("expected known distance"),
        }
    }

    #[test]
    fn test_missing_coordinates_are_unknown() {
        let p = Location { lat: 40.0, lng: -74.0 };
        assert_eq!(distance_between(None, Some(p)), Distance::Unknown);
        assert_eq!(distance_between(Some(p), None), Distance::Unknown);
        assert_eq!(distance_between(None, None), Distance::Unknown);
    }

    #[test]
    fn test_unknown_never_exceeds_radius() {
        assert!(!Distance::Unknown.exceeds(0.0));
        assert!(Distance::Known { miles: 26.0 }.exceeds(25.0));
        assert!(!Distance::Known { miles: 24.0 }.exceeds(25.0));
    }
}
