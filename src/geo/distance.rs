use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const TRANSIT_BUFFER_MINUTES: i64 = 5;

const WALKING_SPEED_KM_H: f64 = 5.0;
const TRANSIT_FALLBACK_SPEED_KM_H: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Great-circle distance between two points on the sphere.
pub fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + from.latitude.to_radians().cos()
            * to.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

pub fn distance_meters(from: Coordinates, to: Coordinates) -> i64 {
    (haversine_km(from, to) * 1000.0).round() as i64
}

/// Minutes on foot at a constant 5 km/h, rounded to the nearest minute.
pub fn walking_minutes(from: Coordinates, to: Coordinates) -> i64 {
    (haversine_km(from, to) / WALKING_SPEED_KM_H * 60.0).round() as i64
}

/// Offline transit estimate: 30 km/h effective speed plus a fixed
/// boarding/walking buffer. Used whenever the routing service is
/// unavailable.
pub fn fallback_transit_minutes(from: Coordinates, to: Coordinates) -> i64 {
    (haversine_km(from, to) / TRANSIT_FALLBACK_SPEED_KM_H * 60.0).round() as i64
        + TRANSIT_BUFFER_MINUTES
}
