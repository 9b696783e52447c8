//! Strict time-window solver (VRPTW).
//!
//! Selected when hard time windows must be respected: greedy
//! earliest-feasible construction, then first-improvement 2-opt that only
//! accepts fully feasible, strictly shorter routes. Infeasibility is not an
//! error — the result carries `feasible = false` and the full violation
//! list so callers can decide to accept, relax windows, or reject.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error;
use crate::geo;
use crate::model::PlaceNode;

/// Max 2-opt refinement passes.
const MAX_TWO_OPT_PASSES: usize = 100;

/// Service duration assumed when nothing better is known, minutes.
const DEFAULT_SERVICE_MIN: i64 = 60;

/// One routable location: an optional hard arrival window plus the time
/// spent on site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VrptwLocation {
    pub name: String,
    /// Earliest/latest allowed arrival. `None` means unconstrained.
    pub window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub service_min: i64,
}

/// Solver input: a square time-cost matrix (minutes) over the locations,
/// plus the start position and departure instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VrptwInput {
    pub time_matrix_min: Vec<Vec<f64>>,
    pub locations: Vec<VrptwLocation>,
    pub start_index: usize,
    pub start_time: DateTime<Utc>,
}

/// How an arrival missed its window.
///
/// The replay waits when it arrives before a window opens, so `Early` is
/// never produced by [`solve`]; it stays in the taxonomy because callers
/// consuming the result shape expect both kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationKind {
    Early,
    Late,
}

/// A time-window miss observed while replaying a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowViolation {
    pub location_index: usize,
    pub name: String,
    pub expected_window: (DateTime<Utc>, DateTime<Utc>),
    pub actual_arrival: DateTime<Utc>,
    pub kind: ViolationKind,
}

/// Solver output. `arrival_times` and `departure_times` parallel `order`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VrptwResult {
    /// Visited location indices, starting with the start index. May be a
    /// partial route when construction ran out of reachable windows.
    pub order: Vec<usize>,
    pub arrival_times: Vec<DateTime<Utc>>,
    pub departure_times: Vec<DateTime<Utc>>,
    pub feasible: bool,
    pub violations: Vec<WindowViolation>,
}

/// Solve the time-window routing problem.
///
/// Fails with [`Error::MatrixShape`] when the matrix is not square or does
/// not match the location count, and [`Error::LocationIndexOutOfRange`] when
/// the start index does not name a location.
pub fn solve(input: &VrptwInput) -> Result<VrptwResult, Error> {
    validate(input)?;

    let mut order = greedy_construct(input);
    debug!(
        constructed = order.len(),
        locations = input.locations.len(),
        "greedy construction done"
    );

    let improvements = two_opt(&mut order, input);
    debug!(improvements, "2-opt refinement done");

    let (arrival_times, departure_times, violations) = replay(&order, input);
    let feasible = violations.is_empty();

    Ok(VrptwResult {
        order,
        arrival_times,
        departure_times,
        feasible,
        violations,
    })
}

/// Replay a caller-supplied visiting order and report its feasibility.
///
/// Useful for judging an order the greedy construction would have refused
/// to build (it skips stops whose windows have already passed); the replay
/// visits everything and surfaces every violation instead.
pub fn check_feasibility(input: &VrptwInput, order: &[usize]) -> Result<VrptwResult, Error> {
    validate(input)?;
    for &location_index in order {
        if location_index >= input.locations.len() {
            return Err(Error::LocationIndexOutOfRange {
                index: location_index,
                count: input.locations.len(),
            });
        }
    }

    let (arrival_times, departure_times, violations) = replay(order, input);
    let feasible = violations.is_empty();
    Ok(VrptwResult {
        order: order.to_vec(),
        arrival_times,
        departure_times,
        feasible,
        violations,
    })
}

fn validate(input: &VrptwInput) -> Result<(), Error> {
    let expected = input.locations.len();
    if input.time_matrix_min.len() != expected {
        return Err(Error::MatrixShape {
            expected,
            found: input.time_matrix_min.len(),
        });
    }
    for row in &input.time_matrix_min {
        if row.len() != expected {
            return Err(Error::MatrixShape {
                expected,
                found: row.len(),
            });
        }
    }
    if input.start_index >= expected {
        return Err(Error::LocationIndexOutOfRange {
            index: input.start_index,
            count: expected,
        });
    }
    Ok(())
}

fn travel(input: &VrptwInput, from: usize, to: usize) -> Duration {
    minutes(input.time_matrix_min[from][to])
}

fn minutes(min: f64) -> Duration {
    Duration::seconds((min * 60.0).round() as i64)
}

/// Earliest-feasible greedy construction.
///
/// Repeatedly picks the unvisited location with the earliest feasible
/// service start (waiting for windows to open counts), tie-broken by the
/// earliest window opening. Halts with a partial route once no remaining
/// location can be reached before its window closes.
fn greedy_construct(input: &VrptwInput) -> Vec<usize> {
    let n = input.locations.len();
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);

    let start = input.start_index;
    visited[start] = true;
    order.push(start);
    let mut clock = input.start_time + Duration::minutes(input.locations[start].service_min);
    let mut position = start;

    while order.len() < n {
        let mut best: Option<(DateTime<Utc>, DateTime<Utc>, usize)> = None;

        for candidate in 0..n {
            if visited[candidate] {
                continue;
            }
            let arrival = clock + travel(input, position, candidate);
            let (earliest, latest) = match input.locations[candidate].window {
                Some((open, close)) => (open, close),
                None => (DateTime::<Utc>::MIN_UTC, DateTime::<Utc>::MAX_UTC),
            };
            if arrival > latest {
                continue;
            }
            let begin = arrival.max(earliest);
            let key = (begin, earliest, candidate);
            if best.map_or(true, |b| key < b) {
                best = Some(key);
            }
        }

        // Every remaining window has irrecoverably passed: partial route.
        let Some((begin, _, next)) = best else {
            break;
        };

        visited[next] = true;
        order.push(next);
        clock = begin + Duration::minutes(input.locations[next].service_min);
        position = next;
    }

    order
}

fn total_travel(order: &[usize], input: &VrptwInput) -> f64 {
    order
        .windows(2)
        .map(|pair| input.time_matrix_min[pair[0]][pair[1]])
        .sum()
}

/// First-improvement 2-opt. A reversal is only taken when the route stays
/// fully feasible and its total travel time strictly drops; equal-time
/// moves are rejected, so iteration order cannot flip the outcome.
fn two_opt(order: &mut Vec<usize>, input: &VrptwInput) -> usize {
    let n = order.len();
    if n < 3 {
        return 0;
    }

    let mut improvements = 0;
    for _ in 0..MAX_TWO_OPT_PASSES {
        if !two_opt_pass(order, input) {
            break;
        }
        improvements += 1;
    }
    improvements
}

fn two_opt_pass(order: &mut Vec<usize>, input: &VrptwInput) -> bool {
    let n = order.len();
    let current_cost = total_travel(order, input);

    // Position 0 is the fixed start; reversals begin at 1.
    for i in 1..n - 1 {
        for j in i + 1..n {
            let mut candidate = order.clone();
            candidate[i..=j].reverse();

            if total_travel(&candidate, input) < current_cost {
                let (_, _, violations) = replay(&candidate, input);
                if violations.is_empty() {
                    order[i..=j].reverse();
                    return true;
                }
            }
        }
    }

    false
}

/// Replay arrival times along `order`.
///
/// Waits when a window has not opened yet; records a LATE violation when a
/// window has already closed but keeps replaying (without shifting the
/// clock past the bound) so every violation of the candidate is visible.
fn replay(
    order: &[usize],
    input: &VrptwInput,
) -> (Vec<DateTime<Utc>>, Vec<DateTime<Utc>>, Vec<WindowViolation>) {
    let mut arrivals = Vec::with_capacity(order.len());
    let mut departures = Vec::with_capacity(order.len());
    let mut violations = Vec::new();
    let mut clock = input.start_time;

    for (position, &location_index) in order.iter().enumerate() {
        let arrival = if position == 0 {
            clock
        } else {
            clock + travel(input, order[position - 1], location_index)
        };

        let location = &input.locations[location_index];
        let begin = match location.window {
            Some((open, close)) => {
                if arrival > close {
                    violations.push(WindowViolation {
                        location_index,
                        name: location.name.clone(),
                        expected_window: (open, close),
                        actual_arrival: arrival,
                        kind: ViolationKind::Late,
                    });
                    arrival
                } else {
                    arrival.max(open)
                }
            }
            None => arrival,
        };

        let departure = begin + Duration::minutes(location.service_min);
        arrivals.push(arrival);
        departures.push(departure);
        clock = departure;
    }

    (arrivals, departures, violations)
}

// ============================================================================
// Input conversion
// ============================================================================

/// Square transport-time matrix (minutes) estimated from haversine
/// distance, indexed by the input order.
pub fn haversine_time_matrix(places: &[PlaceNode]) -> Vec<Vec<f64>> {
    let n = places.len();
    let mut matrix = vec![vec![0.0; n]; n];
    for (i, from) in places.iter().enumerate() {
        for (j, to) in places.iter().enumerate() {
            if i != j {
                matrix[i][j] = geo::transport_minutes(from.location, to.location);
            }
        }
    }
    matrix
}

/// Derive solver input from place data.
///
/// Windows come from the explicit `time_window` field, else from
/// `opening_hours` resolved on `date`. Service minutes come from
/// `service_time_min`, else `estimated_duration_min`, else a hiking-time
/// estimate for trail stops, else 60.
pub fn build_input(
    places: &[PlaceNode],
    time_matrix_min: Vec<Vec<f64>>,
    start_time: DateTime<Utc>,
    date: NaiveDate,
) -> VrptwInput {
    let locations = places
        .iter()
        .map(|place| VrptwLocation {
            name: place.name.clone(),
            window: place.time_window.or_else(|| {
                place
                    .opening_hours
                    .map(|(open, close)| {
                        (date.and_time(open).and_utc(), date.and_time(close).and_utc())
                    })
            }),
            service_min: service_minutes(place),
        })
        .collect();

    VrptwInput {
        time_matrix_min,
        locations,
        start_index: 0,
        start_time,
    }
}

fn service_minutes(place: &PlaceNode) -> i64 {
    if let Some(service) = place.service_time_min {
        return service;
    }
    if let Some(duration) = place.estimated_duration_min {
        return duration;
    }
    if let Some(trail) = &place.trail {
        // Naismith-style hiking estimate: 4 km/h plus 1 min per 10 m gain.
        return (60.0 * (trail.distance_km / 4.0 + trail.elevation_gain_m / 600.0)).round()
            as i64;
    }
    DEFAULT_SERVICE_MIN
}
