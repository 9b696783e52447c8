//! Domain model for itinerary optimization.
//!
//! All values are built fresh per optimization call from caller-supplied
//! data and live only for the duration of that call.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of a visitable place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Attraction,
    Restaurant,
    TransitHub,
    Viewpoint,
    Museum,
    Park,
    Shop,
    Other,
}

/// Physical intensity classification of a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intensity {
    Low,
    Medium,
    High,
}

/// Trail difficulty grade, drives the fatigue multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrailDifficulty {
    Easy,
    Moderate,
    Hard,
    Extreme,
}

impl TrailDifficulty {
    /// Fatigue multiplier for this grade.
    pub fn multiplier(self) -> f64 {
        match self {
            TrailDifficulty::Easy => 0.8,
            TrailDifficulty::Moderate => 1.0,
            TrailDifficulty::Hard => 1.3,
            TrailDifficulty::Extreme => 1.8,
        }
    }
}

/// Fatigue data for a physically demanding stop (hike, climb).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailProfile {
    pub distance_km: f64,
    pub elevation_gain_m: f64,
    pub difficulty: TrailDifficulty,
    pub max_elevation_m: f64,
}

/// A single visitable point of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceNode {
    /// Stable identifier, unique within a single optimization call.
    pub id: u64,
    pub name: String,
    pub category: Category,
    /// (lat, lng) in WGS84 degrees. Must be finite.
    pub location: (f64, f64),
    /// Explicit intensity classification; overrides derivation.
    pub intensity: Option<Intensity>,
    /// Physical-intensity factor; >=1.5 reads HIGH, <=0.5 reads LOW.
    pub physical_intensity: Option<f64>,
    /// Estimated on-site duration in minutes.
    pub estimated_duration_min: Option<i64>,
    /// Daily opening hours, used by the VRPTW input builder.
    pub opening_hours: Option<(NaiveTime, NaiveTime)>,
    /// Explicit hard time window (earliest/latest arrival). VRPTW only.
    pub time_window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    /// Service time in minutes. VRPTW only.
    pub service_time_min: Option<i64>,
    pub is_restaurant: bool,
    pub is_rest: bool,
    pub trail: Option<TrailProfile>,
}

impl PlaceNode {
    /// New node with the given identity and position; everything else
    /// defaults to absent.
    pub fn new(id: u64, name: impl Into<String>, category: Category, lat: f64, lng: f64) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            location: (lat, lng),
            intensity: None,
            physical_intensity: None,
            estimated_duration_min: None,
            opening_hours: None,
            time_window: None,
            service_time_min: None,
            is_restaurant: category == Category::Restaurant,
            is_rest: false,
            trail: None,
        }
    }

    /// Resolve the node's intensity: explicit field first, then the
    /// physical-intensity factor, then the category.
    pub fn resolved_intensity(&self) -> Intensity {
        if let Some(intensity) = self.intensity {
            return intensity;
        }
        if let Some(factor) = self.physical_intensity {
            if factor >= 1.5 {
                return Intensity::High;
            }
            if factor <= 0.5 {
                return Intensity::Low;
            }
            return Intensity::Medium;
        }
        if self.is_restaurant || self.is_rest {
            Intensity::Low
        } else {
            Intensity::Medium
        }
    }
}

/// A geographically compact cluster of places. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: usize,
    /// Arithmetic mean of member coordinates.
    pub centroid: (f64, f64),
    /// Member place ids, in input order.
    pub members: Vec<u64>,
    /// Max member distance from the centroid, meters.
    pub radius_m: f64,
}

impl Zone {
    pub fn contains(&self, place_id: u64) -> bool {
        self.members.contains(&place_id)
    }
}

/// Clustering parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusteringParams {
    /// Absorption radius in meters.
    pub epsilon_m: f64,
    /// Inputs smaller than this collapse into a single zone.
    pub min_points: usize,
}

impl Default for ClusteringParams {
    fn default() -> Self {
        Self {
            epsilon_m: 2000.0,
            min_points: 2,
        }
    }
}

/// Immutable per-call optimization configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationConfig {
    pub date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Transport-time multiplier for required buffer; >1 = more slack.
    pub pacing_factor: f64,
    /// Reserved for future scoring weight changes.
    pub has_children: bool,
    /// Reserved for future scoring weight changes.
    pub has_elderly: bool,
    pub lunch_window: Option<(NaiveTime, NaiveTime)>,
    pub dinner_window: Option<(NaiveTime, NaiveTime)>,
    pub clustering: Option<ClusteringParams>,
    /// Select the strict time-window solver instead of annealing.
    pub use_vrptw: bool,
}

impl OptimizationConfig {
    /// Config for a single day with default pacing and no meal windows.
    pub fn new(date: NaiveDate, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            date,
            start_time,
            end_time,
            pacing_factor: 1.0,
            has_children: false,
            has_elderly: false,
            lunch_window: None,
            dinner_window: None,
            clustering: None,
            use_vrptw: false,
        }
    }
}

/// One scheduled stop: when it starts, when it ends, and the estimated
/// transport time to the next stop (zero for the last scheduled stop).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub transport_to_next_min: f64,
}

/// The seven named terms of the happiness score.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub interest_score: f64,
    pub distance_penalty: f64,
    pub tired_penalty: f64,
    pub bored_penalty: f64,
    pub starve_penalty: f64,
    pub clustering_bonus: f64,
    pub buffer_bonus: f64,
}

impl ScoreBreakdown {
    /// interest − distance − tired − bored − starve + clustering + buffer.
    pub fn total(&self) -> f64 {
        self.interest_score - self.distance_penalty - self.tired_penalty - self.bored_penalty
            - self.starve_penalty
            + self.clustering_bonus
            + self.buffer_bonus
    }
}

/// Result of a single-day optimization.
///
/// `schedule.len() <= nodes.len()`: nodes that could not fit before the
/// configured end time stay in `nodes` but have no schedule entry, so
/// callers can detect the truncation and warn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSolution {
    /// The visiting order (the decision variable searched over).
    pub nodes: Vec<PlaceNode>,
    /// Parallel schedule for the prefix of `nodes` that fits the day.
    pub schedule: Vec<ScheduleEntry>,
    pub total_score: f64,
    pub breakdown: ScoreBreakdown,
    /// Zone partition the score was computed against.
    pub zones: Vec<Zone>,
}
