use crate::models::GeoPoint;

/// Earth's radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate the Haversine distance between two points in kilometers
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lon1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lon2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in kilometers. NaN inputs yield NaN.
#[inline]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Great-circle distance between two points in kilometers
#[inline]
pub fn distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    haversine_distance(a.latitude(), a.longitude(), b.latitude(), b.longitude())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::HaversineDistance;

    #[test]
    fn test_haversine_distance() {
        // Distance from London to Paris (approximately 344 km)
        let london_lat = 51.5074;
        let london_lon = -0.1278;
        let paris_lat = 48.8566;
        let paris_lon = 2.3522;

        let distance = haversine_distance(london_lat, london_lon, paris_lat, paris_lon);
        assert!((distance - 344.0).abs() < 10.0, "Distance should be ~344km, got {}", distance);
    }

    #[test]
    fn test_beirut_to_byblos() {
        // Beirut to Byblos is roughly 32 km along the coast
        let beirut = GeoPoint::new(33.8938, 35.5018);
        let byblos = GeoPoint::new(34.1236, 35.6511);

        let d = distance(&beirut, &byblos);
        assert!(d > 25.0 && d < 35.0, "Expected ~29km, got {}", d);
    }

    #[test]
    fn test_identity_is_zero() {
        let p = GeoPoint::new(33.8938, 35.5018);
        assert_eq!(distance(&p, &p), 0.0);
    }

    #[test]
    fn test_nan_propagates() {
        let good = GeoPoint::new(33.8938, 35.5018);
        let bad = GeoPoint::new(f64::NAN, 35.5018);
        assert!(distance(&good, &bad).is_nan());
    }

    #[test]
    fn test_agrees_with_geo_crate() {
        // geo uses a mean radius of 6371.0088 km, so allow a small relative drift
        let a = GeoPoint::new(33.8938, 35.5018);
        let b = GeoPoint::new(33.8547, 35.4863);

        let ours = distance(&a, &b);
        let theirs_m = geo::Point::from(a).haversine_distance(&geo::Point::from(b));
        let theirs = theirs_m / 1000.0;

        assert!((ours - theirs).abs() / theirs < 1e-5, "ours={} geo={}", ours, theirs);
    }
}
