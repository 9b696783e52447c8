//! Multi-day balancer.
//!
//! Splits a place set across N days with a k-means-style assignment pass
//! plus duration rebalancing, then runs the single-day optimizer on each
//! day. Days are independent, so they are optimized in parallel; each day
//! derives its own PRNG from the master seed, keeping the whole plan
//! deterministic and the random draws unshared.

use chrono::{Days, Duration};
use rayon::prelude::*;
use tracing::debug;

use crate::error::Error;
use crate::geo;
use crate::model::{OptimizationConfig, PlaceNode, RouteSolution, ScoreBreakdown};
use crate::optimizer;

/// Max k-means reassignment rounds.
const MAX_ASSIGNMENT_ROUNDS: usize = 20;

/// On-site duration assumed for nodes without an estimate, minutes.
const DEFAULT_DURATION_MIN: i64 = 60;

/// Plan a trip of `days` days over `places`.
///
/// `config` describes day one; subsequent days reuse its daily start/end
/// hours shifted by whole days. Returns one solution per day, in day
/// order. A day left without places (more days than places) yields an
/// empty solution rather than an error.
pub fn plan_days(
    places: &[PlaceNode],
    days: u32,
    config: &OptimizationConfig,
    seed: u64,
) -> Result<Vec<RouteSolution>, Error> {
    if places.is_empty() {
        return Err(Error::EmptyPlaces);
    }
    if days == 0 {
        return Err(Error::ZeroDays);
    }

    let mut groups = assign_days(places, days as usize);
    rebalance(&mut groups, places);
    debug!(
        days,
        sizes = ?groups.iter().map(Vec::len).collect::<Vec<_>>(),
        "day assignment done"
    );

    groups
        .into_par_iter()
        .enumerate()
        .map(|(day, group)| {
            if group.is_empty() {
                return Ok(empty_day());
            }
            let day_config = shift_config(config, day as u64);
            optimizer::optimize_seeded(&group, &day_config, day_seed(seed, day))
        })
        .collect()
}

fn empty_day() -> RouteSolution {
    RouteSolution {
        nodes: Vec::new(),
        schedule: Vec::new(),
        total_score: 0.0,
        breakdown: ScoreBreakdown::default(),
        zones: Vec::new(),
    }
}

fn shift_config(config: &OptimizationConfig, day: u64) -> OptimizationConfig {
    let mut shifted = config.clone();
    shifted.date = config.date.checked_add_days(Days::new(day)).unwrap_or(config.date);
    shifted.start_time = config.start_time + Duration::days(day as i64);
    shifted.end_time = config.end_time + Duration::days(day as i64);
    shifted
}

fn day_seed(master: u64, day: usize) -> u64 {
    master ^ (day as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// K-means-style assignment with deterministic farthest-point seeding.
fn assign_days(places: &[PlaceNode], days: usize) -> Vec<Vec<PlaceNode>> {
    let k = days.min(places.len());
    let mut centroids = farthest_point_seeds(places, k);
    let mut assignment = vec![0usize; places.len()];

    for _ in 0..MAX_ASSIGNMENT_ROUNDS {
        let mut changed = false;

        for (idx, place) in places.iter().enumerate() {
            let nearest = nearest_centroid(place.location, &centroids);
            if assignment[idx] != nearest {
                assignment[idx] = nearest;
                changed = true;
            }
        }

        for (day, centroid) in centroids.iter_mut().enumerate() {
            let members: Vec<(f64, f64)> = places
                .iter()
                .zip(&assignment)
                .filter(|(_, a)| **a == day)
                .map(|(p, _)| p.location)
                .collect();
            if !members.is_empty() {
                *centroid = geo::centroid(&members);
            }
        }

        if !changed {
            break;
        }
    }

    let mut groups = vec![Vec::new(); days];
    for (place, day) in places.iter().zip(&assignment) {
        groups[*day].push(place.clone());
    }
    groups
}

fn farthest_point_seeds(places: &[PlaceNode], k: usize) -> Vec<(f64, f64)> {
    let mut seeds = vec![places[0].location];
    while seeds.len() < k {
        let farthest = places
            .iter()
            .map(|p| {
                let nearest = seeds
                    .iter()
                    .map(|s| geo::haversine_m(p.location, *s))
                    .fold(f64::INFINITY, f64::min);
                (p.location, nearest)
            })
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(location, _)| location)
            .unwrap_or(places[0].location);
        seeds.push(farthest);
    }
    seeds
}

fn nearest_centroid(location: (f64, f64), centroids: &[(f64, f64)]) -> usize {
    centroids
        .iter()
        .enumerate()
        .min_by(|a, b| {
            geo::haversine_m(location, *a.1).total_cmp(&geo::haversine_m(location, *b.1))
        })
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}

fn group_minutes(group: &[PlaceNode]) -> i64 {
    group
        .iter()
        .map(|p| p.estimated_duration_min.unwrap_or(DEFAULT_DURATION_MIN))
        .sum()
}

/// Move stops from the heaviest day toward the lightest until the spread
/// drops below one average stop.
fn rebalance(groups: &mut [Vec<PlaceNode>], places: &[PlaceNode]) {
    if groups.len() < 2 {
        return;
    }
    let avg_stop = group_minutes(places) / places.len() as i64;

    // Each move shrinks the spread, but bound the loop anyway.
    for _ in 0..places.len() * groups.len() {
        let weights: Vec<i64> = groups.iter().map(|g| group_minutes(g)).collect();
        let Some(heaviest) = (0..groups.len()).max_by_key(|&i| weights[i]) else {
            return;
        };
        let Some(lightest) = (0..groups.len()).min_by_key(|&i| weights[i]) else {
            return;
        };

        let spread = weights[heaviest] - weights[lightest];
        if spread <= avg_stop || groups[heaviest].len() < 2 {
            break;
        }

        let light_center = geo::centroid(
            &groups[lightest]
                .iter()
                .map(|p| p.location)
                .collect::<Vec<_>>(),
        );
        let move_idx = groups[heaviest]
            .iter()
            .enumerate()
            .min_by(|a, b| {
                geo::haversine_m(a.1.location, light_center)
                    .total_cmp(&geo::haversine_m(b.1.location, light_center))
            })
            .map(|(idx, _)| idx)
            .unwrap_or(0);

        let moved = groups[heaviest].remove(move_idx);
        groups[lightest].push(moved);
    }
}
