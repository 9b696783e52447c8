//! Happiness scoring for an ordered, scheduled route.
//!
//! total = interest − distance − tired − bored − starve + clustering + buffer
//!
//! Scoring only considers the scheduled prefix of the ordering: nodes that
//! were truncated off the schedule contribute nothing.

use chrono::{DateTime, NaiveTime, Utc};

use crate::geo;
use crate::model::{
    Intensity, OptimizationConfig, PlaceNode, ScheduleEntry, ScoreBreakdown, Zone,
};

/// Flat reward per scheduled stop. Placeholder for a per-POI interest
/// weight.
const INTEREST_PER_STOP: f64 = 100.0;

/// Penalty for missing a configured meal window entirely.
const MEAL_MISS_PENALTY: f64 = 100.0;

/// Bonus for a spatially cohesive half-day.
const HALF_DAY_COHESION_BONUS: f64 = 50.0;

/// Required slack on top of paced transport time, minutes.
const MIN_BUFFER_MIN: f64 = 15.0;

/// Score an ordered route against its derived schedule.
///
/// `zones` is the partition the route was clustered into; pass an empty
/// slice to skip the cohesion bonus.
pub fn score(
    nodes: &[PlaceNode],
    schedule: &[ScheduleEntry],
    config: &OptimizationConfig,
    zones: &[Zone],
) -> ScoreBreakdown {
    let visited = schedule.len().min(nodes.len());
    let nodes = &nodes[..visited];
    let schedule = &schedule[..visited];

    ScoreBreakdown {
        interest_score: INTEREST_PER_STOP * visited as f64,
        distance_penalty: distance_penalty(nodes),
        tired_penalty: tired_penalty(nodes),
        bored_penalty: bored_penalty(nodes),
        starve_penalty: starve_penalty(nodes, schedule, config),
        clustering_bonus: clustering_bonus(nodes, schedule, config, zones),
        buffer_bonus: buffer_bonus(schedule, config.pacing_factor),
    }
}

/// Penalize a single conspicuously long backtrack leg, not overall length.
fn distance_penalty(nodes: &[PlaceNode]) -> f64 {
    if nodes.len() < 2 {
        return 0.0;
    }

    let legs: Vec<f64> = nodes
        .windows(2)
        .map(|pair| geo::haversine_m(pair[0].location, pair[1].location))
        .collect();
    let avg = legs.iter().sum::<f64>() / legs.len() as f64;
    let max = legs.iter().fold(0.0, |acc: f64, leg| acc.max(*leg));

    if max > 2.0 * avg {
        (max - 2.0 * avg) / 100.0
    } else {
        0.0
    }
}

fn tired_penalty(nodes: &[PlaceNode]) -> f64 {
    let mut penalty = 0.0;

    for pair in nodes.windows(2) {
        if pair[0].resolved_intensity() == Intensity::High
            && pair[1].resolved_intensity() == Intensity::High
        {
            penalty += 50.0;
        }
    }

    for run in nodes.windows(3) {
        if run
            .iter()
            .all(|node| node.resolved_intensity() == Intensity::Medium)
        {
            penalty += 30.0;
        }
    }

    for node in nodes {
        if let Some(trail) = &node.trail {
            let base = trail.distance_km * 5.0 + (trail.elevation_gain_m / 100.0) * 3.0;
            let altitude = if trail.max_elevation_m > 4000.0 {
                1.5
            } else if trail.max_elevation_m > 3000.0 {
                1.3
            } else {
                1.0
            };
            penalty += base * trail.difficulty.multiplier() * altitude;
        }
    }

    penalty
}

/// Same-category adjacency reads as monotony, unless a meal or rest stop
/// sits on either side of the pair.
fn bored_penalty(nodes: &[PlaceNode]) -> f64 {
    nodes
        .windows(2)
        .filter(|pair| {
            pair[0].category == pair[1].category
                && !pair.iter().any(|n| n.is_restaurant || n.is_rest)
        })
        .count() as f64
        * 30.0
}

/// Flat penalty per configured meal window with no restaurant interval
/// overlapping it. Missing a meal is binary, not proportional.
fn starve_penalty(
    nodes: &[PlaceNode],
    schedule: &[ScheduleEntry],
    config: &OptimizationConfig,
) -> f64 {
    let mut penalty = 0.0;
    for window in [config.lunch_window, config.dinner_window]
        .into_iter()
        .flatten()
    {
        if !meal_window_covered(nodes, schedule, config, window) {
            penalty += MEAL_MISS_PENALTY;
        }
    }
    penalty
}

fn meal_window_covered(
    nodes: &[PlaceNode],
    schedule: &[ScheduleEntry],
    config: &OptimizationConfig,
    (open, close): (NaiveTime, NaiveTime),
) -> bool {
    let window_start = config.date.and_time(open).and_utc();
    let window_end = config.date.and_time(close).and_utc();

    nodes
        .iter()
        .zip(schedule)
        .any(|(node, entry)| {
            node.is_restaurant && entry.start < window_end && entry.end > window_start
        })
}

/// +50 per half-day whose scheduled stops all resolve to one shared zone.
fn clustering_bonus(
    nodes: &[PlaceNode],
    schedule: &[ScheduleEntry],
    config: &OptimizationConfig,
    zones: &[Zone],
) -> f64 {
    if zones.is_empty() {
        return 0.0;
    }

    let noon = config
        .date
        .and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default())
        .and_utc();

    let morning: Vec<&PlaceNode> = half_day(nodes, schedule, |entry| entry.start < noon);
    let afternoon: Vec<&PlaceNode> = half_day(nodes, schedule, |entry| entry.start >= noon);

    let mut bonus = 0.0;
    if single_zone(&morning, zones) {
        bonus += HALF_DAY_COHESION_BONUS;
    }
    if single_zone(&afternoon, zones) {
        bonus += HALF_DAY_COHESION_BONUS;
    }
    bonus
}

fn half_day<'a>(
    nodes: &'a [PlaceNode],
    schedule: &[ScheduleEntry],
    keep: impl Fn(&ScheduleEntry) -> bool,
) -> Vec<&'a PlaceNode> {
    nodes
        .iter()
        .zip(schedule)
        .filter(|(_, entry)| keep(entry))
        .map(|(node, _)| node)
        .collect()
}

fn single_zone(group: &[&PlaceNode], zones: &[Zone]) -> bool {
    if group.is_empty() {
        return false;
    }
    let mut shared: Option<usize> = None;
    for node in group {
        let Some(zone) = zones.iter().find(|z| z.contains(node.id)) else {
            return false;
        };
        match shared {
            None => shared = Some(zone.id),
            Some(id) if id == zone.id => {}
            Some(_) => return false,
        }
    }
    true
}

/// Reward comfortable slack between stops, punish rushed transitions.
fn buffer_bonus(schedule: &[ScheduleEntry], pacing_factor: f64) -> f64 {
    let mut bonus = 0.0;

    for pair in schedule.windows(2) {
        let gap_min = interval_minutes(pair[0].end, pair[1].start);
        let transport = pair[0].transport_to_next_min;
        let idle = gap_min - transport;
        let required = transport * pacing_factor + MIN_BUFFER_MIN;

        if idle >= required {
            bonus += 10.0;
        } else if idle < required * 0.5 {
            bonus -= 20.0;
        }
    }

    bonus
}

fn interval_minutes(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_seconds() as f64 / 60.0
}
