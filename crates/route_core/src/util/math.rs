use crate::{constants::EARTH_RADIUS_KM, graph::Coordinate};

/// Great-circle distance between two coordinates in kilometers (Haversine
/// formula).
pub fn haversine_km(src: &Coordinate, dst: &Coordinate) -> f64 {
    let lat1 = src.lat.to_radians();
    let lat2 = dst.lat.to_radians();
    let lon1 = src.lng.to_radians();
    let lon2 = dst.lng.to_radians();
    let a = (lat2 - lat1) / 2.0;
    let b = (lon2 - lon1) / 2.0;
    let c = a.sin().powi(2) + lat1.cos() * lat2.cos() * b.sin().powi(2);
    let d = 2.0 * c.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * d
}
