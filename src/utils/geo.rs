// utils/geo.rs

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two points in meters (haversine, spherical
/// Earth). Either coordinate missing yields `f64::INFINITY` so technicians
/// with an unknown position always sort to the back of a ranked pool.
pub fn haversine_distance_m(from: Option<(f64, f64)>, to: Option<(f64, f64)>) -> f64 {
    let ((lat1, lng1), (lat2, lng2)) = match (from, to) {
        (Some(a), Some(b)) => (a, b),
        _ => return f64::INFINITY,
    };

    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::haversine_distance_m;

    #[test]
    fn zero_distance_for_same_point() {
        let p = Some((6.5244, 3.3792));
        assert_eq!(haversine_distance_m(p, p), 0.0);
    }

    #[test]
    fn lagos_to_ibadan_is_roughly_128_km() {
        let lagos = Some((6.5244, 3.3792));
        let ibadan = Some((7.3775, 3.9470));
        let d = haversine_distance_m(lagos, ibadan);
        assert!((110_000.0..145_000.0).contains(&d), "got {d}");
    }

    #[test]
    fn missing_coordinates_rank_infinitely_far() {
        let known = Some((6.5244, 3.3792));
        assert_eq!(haversine_distance_m(None, known), f64::INFINITY);
        assert_eq!(haversine_distance_m(known, None), f64::INFINITY);
        assert_eq!(haversine_distance_m(None, None), f64::INFINITY);
    }

    #[test]
    fn symmetric() {
        let a = Some((6.6018, 3.3515));
        let b = Some((6.4550, 3.3841));
        let forward = haversine_distance_m(a, b);
        let backward = haversine_distance_m(b, a);
        assert!((forward - backward).abs() < 1e-6);
    }
}
