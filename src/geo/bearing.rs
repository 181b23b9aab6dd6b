use super::GeoCoordinate;

/// Initial great-circle bearing from `from` towards `to`, in degrees within
/// `[0, 360)` with 0 pointing north. Identical points yield 0.
pub fn bearing_deg(from: &GeoCoordinate, to: &GeoCoordinate) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

    let bearing = y.atan2(x).to_degrees().rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if bearing >= 360.0 {
        0.0
    } else {
        bearing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn cardinal_directions() {
        let origin = GeoCoordinate::new(0.0, 0.0);
        assert!(close(bearing_deg(&origin, &GeoCoordinate::new(1.0, 0.0)), 0.0));
        assert!(close(bearing_deg(&origin, &GeoCoordinate::new(0.0, 1.0)), 90.0));
        assert!(close(bearing_deg(&origin, &GeoCoordinate::new(-1.0, 0.0)), 180.0));
        assert!(close(bearing_deg(&origin, &GeoCoordinate::new(0.0, -1.0)), 270.0));
    }

    #[test]
    fn same_point_is_zero() {
        let p = GeoCoordinate::new(51.5, -0.12);
        assert_eq!(bearing_deg(&p, &p), 0.0);
    }

    #[test]
    fn always_in_range() {
        let points = [
            GeoCoordinate::new(37.7749, -122.4194),
            GeoCoordinate::new(-33.8688, 151.2093),
            GeoCoordinate::new(89.9, 179.9),
            GeoCoordinate::new(-89.9, -179.9),
            GeoCoordinate::new(0.0, 180.0),
            GeoCoordinate::new(0.0, -180.0),
            GeoCoordinate::new(40.0, -74.00001),
        ];
        for a in &points {
            for b in &points {
                let bearing = bearing_deg(a, b);
                assert!((0.0..360.0).contains(&bearing), "{a:?} -> {b:?} = {bearing}");
            }
        }
    }

    #[test]
    fn known_city_pair() {
        // San Francisco to Los Angeles heads roughly south-east.
        let sf = GeoCoordinate::new(37.7749, -122.4194);
        let la = GeoCoordinate::new(34.0522, -118.2437);
        let bearing = bearing_deg(&sf, &la);
        assert!((135.0..138.0).contains(&bearing), "{bearing}");
    }
}
