//! Geometry utilities: haversine distance, centroid/radius, and
//! straight-line transport-time estimation.
//!
//! Great-circle distance ignores the road network, so travel times here are
//! estimates, not routed values. Fetching real travel times from an external
//! routing provider is explicitly out of scope for this core.

/// Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Effective speed for short hops (local transit / walking mix), km/h.
const SHORT_HOP_SPEED_KMH: f64 = 30.0;

/// Effective speed for long hops (car / rail), km/h.
const LONG_HOP_SPEED_KMH: f64 = 40.0;

/// Distance threshold separating short and long hops, meters.
const LONG_HOP_THRESHOLD_M: f64 = 5_000.0;

/// Haversine distance between two (lat, lng) points in meters.
pub fn haversine_m(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lng1) = from;
    let (lat2, lng2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_M * c
}

/// Estimated transport time between two points, in minutes.
///
/// Below 5 km assumes 30 km/h (local transit / walking mix); at or above
/// 5 km assumes 40 km/h (car / rail).
pub fn transport_minutes(from: (f64, f64), to: (f64, f64)) -> f64 {
    let meters = haversine_m(from, to);
    let speed_kmh = if meters < LONG_HOP_THRESHOLD_M {
        SHORT_HOP_SPEED_KMH
    } else {
        LONG_HOP_SPEED_KMH
    };
    (meters / 1000.0) / speed_kmh * 60.0
}

/// Arithmetic mean of a set of (lat, lng) points.
///
/// Not geodesically correct for very large extents, but acceptable at city
/// scale. Returns `(0.0, 0.0)` for an empty slice.
pub fn centroid(points: &[(f64, f64)]) -> (f64, f64) {
    if points.is_empty() {
        return (0.0, 0.0);
    }
    let n = points.len() as f64;
    let (lat_sum, lng_sum) = points
        .iter()
        .fold((0.0, 0.0), |(la, ln), p| (la + p.0, ln + p.1));
    (lat_sum / n, lng_sum / n)
}

/// Max haversine distance from `center` to any of `points`, in meters.
pub fn max_radius_m(center: (f64, f64), points: &[(f64, f64)]) -> f64 {
    points
        .iter()
        .map(|p| haversine_m(center, *p))
        .fold(0.0, f64::max)
}
