use super::Coordinate;

/// Mean Earth radius in meters
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance between two points in meters (haversine)
pub fn haversine_distance(from: &Coordinate, to: &Coordinate) -> f64 {
    let lat1 = from.lat().to_radians();
    let lat2 = to.lat().to_radians();
    let delta_lat = (to.lat() - from.lat()).to_radians();
    let delta_lng = (to.lng() - from.lng()).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}
