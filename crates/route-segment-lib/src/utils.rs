//! Utility functions for coordinate checks and distances

use geo::Coord;

/// Earth's mean radius in meters
pub const EARTH_RADIUS_M: f64 = 6371000.0;

/// Valid longitude range in degrees
pub const MAX_LONGITUDE: f64 = 180.0;

/// Valid latitude range in degrees
pub const MAX_LATITUDE: f64 = 90.0;

/// Check that both components are neither NaN nor infinite
#[inline(always)]
pub fn is_finite_coord(coord: &Coord<f64>) -> bool {
    coord.x.is_finite() && coord.y.is_finite()
}

/// Check if a coordinate, read as (lon, lat), lies within WGS84 bounds
#[inline(always)]
pub fn is_valid_wgs84(coord: &Coord<f64>) -> bool {
    is_finite_coord(coord) && coord.x.abs() <= MAX_LONGITUDE && coord.y.abs() <= MAX_LATITUDE
}

/// Calculate the Haversine distance between two (lon, lat) coordinates in meters
#[inline]
pub fn haversine_distance(from: Coord<f64>, to: Coord<f64>) -> f64 {
    let lat1 = from.y.to_radians();
    let lat2 = to.y.to_radians();
    let delta_lat = (to.y - from.y).to_radians();
    let delta_lon = (to.x - from.x).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_finite_coord() {
        assert!(is_finite_coord(&Coord { x: 1.0, y: -2.0 }));
        assert!(!is_finite_coord(&Coord { x: f64::NAN, y: 0.0 }));
        assert!(!is_finite_coord(&Coord {
            x: 0.0,
            y: f64::NEG_INFINITY
        }));
    }

    #[test]
    fn test_is_valid_wgs84() {
        assert!(is_valid_wgs84(&Coord { x: 0.0, y: 0.0 }));
        assert!(is_valid_wgs84(&Coord { x: -180.0, y: 90.0 }));
        assert!(!is_valid_wgs84(&Coord { x: 180.5, y: 0.0 }));
        assert!(!is_valid_wgs84(&Coord { x: 0.0, y: -91.0 }));
        assert!(!is_valid_wgs84(&Coord { x: f64::NAN, y: 0.0 }));
    }

    #[test]
    fn test_haversine_same_point() {
        let p = Coord { x: -0.1278, y: 51.5074 };
        assert!(haversine_distance(p, p) < 0.001);
    }

    #[test]
    fn test_haversine_known_distance() {
        // London (51.5074, -0.1278) to Paris (48.8566, 2.3522), roughly 344 km
        let london = Coord { x: -0.1278, y: 51.5074 };
        let paris = Coord { x: 2.3522, y: 48.8566 };
        let dist = haversine_distance(london, paris);
        assert!(dist > 330_000.0 && dist < 360_000.0, "got {}", dist);
    }
}
