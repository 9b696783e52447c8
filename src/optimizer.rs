//! Simulated-annealing route optimizer.
//!
//! Builds zones, seeds an initial feasible ordering, then anneals over
//! position swaps with the happiness score as the objective. The best-seen
//! ordering is tracked separately from the (possibly worse, probabilistically
//! accepted) current ordering and is always what gets returned.
//!
//! Randomness is injected: callers own the PRNG, so concurrent calls never
//! interleave draws and tests can assert determinism with a seeded source.

use chrono::Duration;
use rand::Rng;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::clustering;
use crate::error::Error;
use crate::model::{
    OptimizationConfig, PlaceNode, RouteSolution, ScheduleEntry, ScoreBreakdown, Zone,
};
use crate::scorer;

/// Initial annealing temperature.
const INITIAL_TEMPERATURE: f64 = 1000.0;

/// Geometric cooling rate per iteration.
const COOLING_RATE: f64 = 0.99;

/// Temperature floor; annealing stops once reached.
const MIN_TEMPERATURE: f64 = 1.0;

/// Hard cap on annealing iterations.
const MAX_ITERATIONS: usize = 10_000;

/// On-site duration assumed for nodes without an estimate, minutes.
const DEFAULT_DURATION_MIN: i64 = 60;

/// Fixed slack added between consecutive stops, minutes.
const INTER_STOP_BUFFER_MIN: f64 = 15.0;

/// Optimize the visiting order for a single day.
///
/// Fails with [`Error::EmptyPlaces`] on an empty input and
/// [`Error::InvalidCoordinate`] on non-finite coordinates; every other
/// input produces a solution. Nodes that cannot fit before
/// `config.end_time` remain in the returned ordering but get no schedule
/// entry (silent truncation — compare `schedule.len()` to `nodes.len()`).
pub fn optimize<R: Rng>(
    places: &[PlaceNode],
    config: &OptimizationConfig,
    rng: &mut R,
) -> Result<RouteSolution, Error> {
    if places.is_empty() {
        return Err(Error::EmptyPlaces);
    }
    check_coordinates(places)?;

    let zones = clustering::cluster(places, config.clustering.unwrap_or_default());
    debug!(zones = zones.len(), places = places.len(), "clustered input");

    let initial = initial_order(places, rng);
    let solution = anneal(initial, config, &zones, rng);
    Ok(solution)
}

/// Reject non-finite coordinates before any geometry runs on them.
pub(crate) fn check_coordinates(places: &[PlaceNode]) -> Result<(), Error> {
    for place in places {
        let (lat, lng) = place.location;
        if !lat.is_finite() || !lng.is_finite() {
            return Err(Error::InvalidCoordinate { id: place.id });
        }
    }
    Ok(())
}

/// `optimize` with a self-contained PRNG seeded from `seed`.
pub fn optimize_seeded(
    places: &[PlaceNode],
    config: &OptimizationConfig,
    seed: u64,
) -> Result<RouteSolution, Error> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    optimize(places, config, &mut rng)
}

/// Shuffle non-restaurants, drop the first restaurant at the midpoint so
/// it lands near lunch, and append any remaining restaurants.
fn initial_order<R: Rng>(places: &[PlaceNode], rng: &mut R) -> Vec<PlaceNode> {
    let (restaurants, mut order): (Vec<PlaceNode>, Vec<PlaceNode>) =
        places.iter().cloned().partition(|p| p.is_restaurant);

    order.shuffle(rng);

    let mut restaurants = restaurants.into_iter();
    if let Some(first) = restaurants.next() {
        let midpoint = order.len() / 2;
        order.insert(midpoint, first);
    }
    order.extend(restaurants);

    order
}

/// Derive the day's schedule for an ordering.
///
/// Walks from `config.start_time`; a node whose on-site interval would end
/// after `config.end_time` stops the walk, dropping it and everything after
/// it from the schedule. Between stops the clock advances by
/// `duration + transport * pacing + 15 min`.
pub fn derive_schedule(order: &[PlaceNode], config: &OptimizationConfig) -> Vec<ScheduleEntry> {
    let mut schedule = Vec::with_capacity(order.len());
    let mut current = config.start_time;

    for (idx, node) in order.iter().enumerate() {
        let duration = node.estimated_duration_min.unwrap_or(DEFAULT_DURATION_MIN);
        let end = current + Duration::minutes(duration);
        if end > config.end_time {
            break;
        }

        let transport_min = match order.get(idx + 1) {
            Some(next) => crate::geo::transport_minutes(node.location, next.location),
            None => 0.0,
        };

        schedule.push(ScheduleEntry {
            start: current,
            end,
            transport_to_next_min: transport_min,
        });

        let advance_min = transport_min * config.pacing_factor + INTER_STOP_BUFFER_MIN;
        current = end + Duration::seconds((advance_min * 60.0).round() as i64);
    }

    schedule
}

struct Candidate {
    order: Vec<PlaceNode>,
    schedule: Vec<ScheduleEntry>,
    breakdown: ScoreBreakdown,
    total: f64,
}

fn evaluate(order: Vec<PlaceNode>, config: &OptimizationConfig, zones: &[Zone]) -> Candidate {
    let schedule = derive_schedule(&order, config);
    let breakdown = scorer::score(&order, &schedule, config, zones);
    let total = breakdown.total();
    Candidate {
        order,
        schedule,
        breakdown,
        total,
    }
}

fn anneal<R: Rng>(
    initial: Vec<PlaceNode>,
    config: &OptimizationConfig,
    zones: &[Zone],
    rng: &mut R,
) -> RouteSolution {
    anneal_observed(initial, config, zones, rng, |_| {})
}

/// `anneal` with a hook invoked at every best-ordering update (including
/// the initial one), receiving the new best total.
fn anneal_observed<R: Rng>(
    initial: Vec<PlaceNode>,
    config: &OptimizationConfig,
    zones: &[Zone],
    rng: &mut R,
    mut on_best: impl FnMut(f64),
) -> RouteSolution {
    let n = initial.len();
    let mut current = evaluate(initial, config, zones);
    debug!(score = current.total, "initial ordering scored");

    // Best and current are separate owned states; best only ever improves.
    let mut best = Candidate {
        order: current.order.clone(),
        schedule: current.schedule.clone(),
        breakdown: current.breakdown,
        total: current.total,
    };
    on_best(best.total);

    if n >= 2 {
        let mut temperature = INITIAL_TEMPERATURE;
        let mut iterations = 0;

        while temperature > MIN_TEMPERATURE && iterations < MAX_ITERATIONS {
            let mut order = current.order.clone();
            let i = rng.gen_range(0..n);
            let mut j = rng.gen_range(0..n - 1);
            if j >= i {
                j += 1;
            }
            order.swap(i, j);

            let candidate = evaluate(order, config, zones);
            let delta = candidate.total - current.total;
            let accept = delta > 0.0 || rng.gen_range(0.0..1.0) < (delta / temperature).exp();

            if accept {
                if candidate.total > best.total {
                    trace!(
                        iteration = iterations,
                        score = candidate.total,
                        "new best ordering"
                    );
                    best = Candidate {
                        order: candidate.order.clone(),
                        schedule: candidate.schedule.clone(),
                        breakdown: candidate.breakdown,
                        total: candidate.total,
                    };
                    on_best(best.total);
                }
                current = candidate;
            }

            temperature *= COOLING_RATE;
            iterations += 1;
        }

        debug!(
            iterations,
            best_score = best.total,
            "annealing finished"
        );
    }

    RouteSolution {
        nodes: best.order,
        schedule: best.schedule,
        total_score: best.total,
        breakdown: best.breakdown,
        zones: zones.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::model::{Category, ClusteringParams};

    fn place(id: u64, lat: f64, lng: f64) -> PlaceNode {
        let mut p = PlaceNode::new(id, format!("p{id}"), Category::Attraction, lat, lng);
        p.estimated_duration_min = Some(60);
        p
    }

    fn config() -> OptimizationConfig {
        OptimizationConfig::new(
            NaiveDate::from_ymd_opt(2025, 6, 14).unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 14, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 14, 19, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_best_score_only_ever_improves() {
        // Spread the places out so swaps actually move the score and the
        // best ordering gets replaced a few times along the way.
        let places: Vec<PlaceNode> = (0..6)
            .map(|i| {
                place(
                    i as u64 + 1,
                    50.0 + i as f64 * 0.01,
                    14.0 + (i % 2) as f64 * 0.02,
                )
            })
            .collect();
        let config = config();
        let zones = crate::clustering::cluster(&places, ClusteringParams::default());
        let mut rng = ChaCha8Rng::seed_from_u64(13);

        let mut bests = Vec::new();
        let solution =
            anneal_observed(places, &config, &zones, &mut rng, |total| bests.push(total));

        assert!(!bests.is_empty());
        for pair in bests.windows(2) {
            assert!(
                pair[1] > pair[0],
                "best must strictly improve, got {} then {}",
                pair[0],
                pair[1]
            );
        }
        assert_eq!(solution.total_score, *bests.last().unwrap());
    }
}
