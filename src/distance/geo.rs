use crate::config::constant::EARTH_RADIUS_M;
use crate::domain::types::Coordinate;

/// Great-circle distance in metres between two coordinates (haversine).
///
/// Non-negative, symmetric, and zero iff both coordinates are equal.
pub fn haversine(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}
