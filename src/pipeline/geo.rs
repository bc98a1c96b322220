/// Mean Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two WGS84 coordinates, in meters (haversine).
pub fn haversine_meters(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lng2 - lng1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    haversine_meters(lat1, lng1, lat2, lng2) / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_for_same_point() {
        assert_eq!(haversine_meters(36.75, 3.05, 36.75, 3.05), 0.0);
    }

    #[test]
    fn five_hundredths_of_a_degree_of_latitude_is_about_5_5km() {
        // 0.05 deg of latitude is ~5.56 km regardless of longitude
        let d = haversine_meters(36.75, 3.05, 36.80, 3.05);
        assert!((d - 5560.0).abs() < 20.0, "got {d}");
    }

    #[test]
    fn algiers_to_paris_is_about_1340km() {
        let d = haversine_km(36.7538, 3.0588, 48.8566, 2.3522);
        assert!((d - 1346.0).abs() < 15.0, "got {d}");
    }
}
