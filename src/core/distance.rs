use crate::models::Location;

/// Earth's radius in miles
const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Calculate the Haversine distance between two points in miles
///
/// # Arguments
/// * `lat1` - Latitude of first point in degrees
/// * `lng1` - Longitude of first point in degrees
/// * `lat2` - Latitude of second point in degrees
/// * `lng2` - Longitude of second point in degrees
///
/// # Returns
/// Distance in miles
#[inline]
pub fn haversine_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_MILES * c
}

/// Haversine distance between two locations in miles
#[inline]
pub fn distance_between(from: &Location, to: &Location) -> f64 {
    haversine_distance(from.lat, from.lng, to.lat, to.lng)
}

/// Approximate travel time in whole minutes at a constant average speed
///
/// Fractional minutes are truncated. Returns `None` when the speed is not a
/// positive finite number, leaving the caller to pick a fallback.
pub fn approximate_travel_minutes(from: &Location, to: &Location, speed_mph: f64) -> Option<u32> {
    if !speed_mph.is_finite() || speed_mph <= 0.0 {
        return None;
    }

    let minutes = distance_between(from, to) / speed_mph * 60.0;
    if minutes.is_finite() {
        Some(minutes as u32)
    } else {
        None
    }
}
