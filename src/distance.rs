// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

/// Radius of Earth used by the distance function, in miles.
pub const EARTH_RADIUS_MILES: f64 = 3963.0;

/// Calculates the great-circle distance between two lon-lat positions
/// on Earth using the [haversine formula](https://en.wikipedia.org/wiki/Haversine_formula).
/// Returns the result in miles.
///
/// The same function weighs [graph](crate::Graph) edges and serves as the A* heuristic,
/// which keeps the heuristic admissible and consistent.
pub fn earth_distance(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let lat1 = lat1.to_radians();
    let lon1 = lon1.to_radians();
    let lat2 = lat2.to_radians();
    let lon2 = lon2.to_radians();

    let sin_dlat_half = ((lat2 - lat1) * 0.5).sin();
    let sin_dlon_half = ((lon2 - lon1) * 0.5).sin();

    let h = sin_dlat_half * sin_dlat_half + lat1.cos() * lat2.cos() * sin_dlon_half * sin_dlon_half;

    // Rounding may push h slightly above 1 for antipodal points
    2.0 * EARTH_RADIUS_MILES * h.sqrt().min(1.0).asin()
}

/// Calculates the initial [bearing](https://www.movable-type.co.uk/scripts/latlong.html#bearing)
/// when travelling from the first to the second position.
///
/// The result is in degrees, in the range (-180, 180]: 0 is north, 90 is east
/// and -90 is west. Turn classification in [crate::directions] relies on this range.
pub fn initial_bearing(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

    let bearing = y.atan2(x).to_degrees();
    if bearing <= -180.0 {
        bearing + 360.0
    } else {
        bearing
    }
}
