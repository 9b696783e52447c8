//! Test fixtures for itinerary-optimizer.
//!
//! Provides realistic test data including:
//! - Real Prague locations (from OpenStreetMap)
//! - A builder for place nodes with sensible defaults
//! - Date/time helpers for a fixed trip day

pub mod prague_locations;

pub use prague_locations::*;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

use itinerary_optimizer::model::{
    Category, Intensity, OptimizationConfig, PlaceNode, TrailDifficulty, TrailProfile,
};

/// The fixed trip day all fixtures schedule against.
pub fn trip_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 14).unwrap()
}

/// An instant on the trip day.
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 14, hour, minute, 0).unwrap()
}

/// A wall-clock time, for meal windows and opening hours.
pub fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

/// A 09:00-19:00 day with default pacing and no meal windows.
pub fn day_config() -> OptimizationConfig {
    OptimizationConfig::new(trip_date(), at(9, 0), at(19, 0))
}

/// Builder for place nodes with sensible defaults.
#[derive(Debug, Clone)]
pub struct PlaceBuilder {
    node: PlaceNode,
}

impl PlaceBuilder {
    pub fn new(id: u64, name: &str, category: Category, lat: f64, lng: f64) -> Self {
        let mut node = PlaceNode::new(id, name, category, lat, lng);
        node.estimated_duration_min = Some(60);
        Self { node }
    }

    /// Attraction at a named fixture location.
    pub fn attraction(id: u64, location: &Location) -> Self {
        Self::new(id, location.name, Category::Attraction, location.lat, location.lng)
    }

    /// Restaurant at a named fixture location.
    pub fn restaurant(id: u64, location: &Location) -> Self {
        Self::new(id, location.name, Category::Restaurant, location.lat, location.lng)
    }

    pub fn category(mut self, category: Category) -> Self {
        self.node.category = category;
        self
    }

    pub fn duration(mut self, minutes: i64) -> Self {
        self.node.estimated_duration_min = Some(minutes);
        self
    }

    pub fn no_duration(mut self) -> Self {
        self.node.estimated_duration_min = None;
        self
    }

    pub fn intensity(mut self, intensity: Intensity) -> Self {
        self.node.intensity = Some(intensity);
        self
    }

    pub fn physical(mut self, factor: f64) -> Self {
        self.node.physical_intensity = Some(factor);
        self
    }

    pub fn rest(mut self) -> Self {
        self.node.is_rest = true;
        self
    }

    pub fn opening_hours(mut self, open: NaiveTime, close: NaiveTime) -> Self {
        self.node.opening_hours = Some((open, close));
        self
    }

    pub fn time_window(mut self, earliest: DateTime<Utc>, latest: DateTime<Utc>) -> Self {
        self.node.time_window = Some((earliest, latest));
        self
    }

    pub fn service_time(mut self, minutes: i64) -> Self {
        self.node.service_time_min = Some(minutes);
        self
    }

    pub fn trail(
        mut self,
        distance_km: f64,
        elevation_gain_m: f64,
        difficulty: TrailDifficulty,
        max_elevation_m: f64,
    ) -> Self {
        self.node.trail = Some(TrailProfile {
            distance_km,
            elevation_gain_m,
            difficulty,
            max_elevation_m,
        });
        self
    }

    pub fn build(self) -> PlaceNode {
        self.node
    }
}
