//! Geographic coordinates and great-circle distance.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the Haversine formula
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Radius used by nearby-store lookups when the caller gives none
pub const DEFAULT_NEARBY_RADIUS_KM: f64 = 10.0;

/// Stored coordinate scale, DECIMAL(10,8) / DECIMAL(11,8)
const COORDINATE_SCALE: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Fallback used when geocoding a new store fails
    pub fn origin() -> Self {
        Self::new(0.0, 0.0)
    }

    pub fn from_decimal(latitude: Decimal, longitude: Decimal) -> Option<Self> {
        Some(Self::new(latitude.to_f64()?, longitude.to_f64()?))
    }

    /// Converts to the persisted representation, rounded to 8 decimal places
    pub fn to_decimal(&self) -> (Decimal, Decimal) {
        let convert = |value: f64| {
            Decimal::from_f64(value)
                .unwrap_or_default()
                .round_dp(COORDINATE_SCALE)
        };
        (convert(self.latitude), convert(self.longitude))
    }

    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        haversine_km(*self, *other)
    }

    pub fn is_within(&self, center: &Coordinates, radius_km: f64) -> bool {
        self.distance_km(center) <= radius_km
    }
}

/// Great-circle distance in kilometres.
///
/// `a = sin²(Δφ/2) + cos φ1 · cos φ2 · sin²(Δλ/2)`, `d = 2R · atan2(√a, √(1−a))`
pub fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
    let phi1 = from.latitude.to_radians();
    let phi2 = to.latitude.to_radians();
    let delta_phi = (to.latitude - from.latitude).to_radians();
    let delta_lambda = (to.longitude - from.longitude).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_degree_of_longitude_at_equator() {
        let distance = haversine_km(Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 1.0));
        assert!((distance - 111.19).abs() < 0.01, "got {distance}");
    }

    #[test]
    fn test_distance_is_symmetric_and_zero_for_same_point() {
        let cairo = Coordinates::new(30.0444, 31.2357);
        let giza = Coordinates::new(30.0131, 31.2089);

        assert_eq!(haversine_km(cairo, cairo), 0.0);
        assert!((haversine_km(cairo, giza) - haversine_km(giza, cairo)).abs() < 1e-9);
        assert!(giza.is_within(&cairo, 10.0));
        assert!(!giza.is_within(&cairo, 1.0));
    }

    #[test]
    fn test_to_decimal_rounds_to_eight_places() {
        let (lat, lon) = Coordinates::new(30.123456789123, -97.1).to_decimal();

        assert_eq!(lat, Decimal::new(3012345679, 8));
        assert_eq!(lon, Decimal::new(-971, 1));
    }
}
