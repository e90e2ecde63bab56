/// Calculate distance between two coordinates using Haversine formula
/// Returns distance in statute miles
pub fn haversine_miles(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    const EARTH_RADIUS_MILES: f64 = 3959.0;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_MILES * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_manhattan_to_jfk() {
        // Midtown Manhattan
        let midtown = (40.7549, -73.9840);
        // JFK airport
        let jfk = (40.6413, -73.7781);

        let distance = haversine_miles(midtown.0, midtown.1, jfk.0, jfk.1);
        // Should be approximately 13-14 miles
        assert!(distance > 12.0 && distance < 15.0);
    }

    #[test]
    fn test_zero_distance() {
        let d = haversine_miles(40.7457, -73.9883, 40.7457, -73.9883);
        assert!(d.abs() < 1e-9);
    }

    #[test]
    fn test_nearby_points_stay_under_a_mile() {
        let midtown = (40.7457, -73.9883);
        let chelsea = (40.7443, -73.9959);

        let d = haversine_miles(midtown.0, midtown.1, chelsea.0, chelsea.1);
        assert!(d < 1.0);
    }
}
