//! Real Prague locations for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap. Grouped so tests can rely on
//! the geography: Old Town sights sit within a few hundred meters of each
//! other, Castle-district sights likewise, and the two districts are
//! roughly 1.5 km apart across the river.

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

// ============================================================================
// Old Town (right bank, compact cluster)
// ============================================================================

pub const OLD_TOWN: &[Location] = &[
    Location::new("Old Town Square", 50.0875, 14.4213),
    Location::new("Astronomical Clock", 50.0870, 14.4208),
    Location::new("Charles Bridge", 50.0865, 14.4114),
    Location::new("Rudolfinum", 50.0899, 14.4151),
    Location::new("Municipal House", 50.0879, 14.4283),
    Location::new("Powder Tower", 50.0872, 14.4277),
];

// ============================================================================
// Castle district (left bank, compact cluster)
// ============================================================================

pub const CASTLE_DISTRICT: &[Location] = &[
    Location::new("Prague Castle", 50.0909, 14.4005),
    Location::new("St Vitus Cathedral", 50.0906, 14.4003),
    Location::new("Golden Lane", 50.0922, 14.4039),
    Location::new("Strahov Monastery", 50.0862, 14.3899),
];

// ============================================================================
// Restaurants (one per district)
// ============================================================================

pub const RESTAURANTS: &[Location] = &[
    Location::new("Mlejnice", 50.0857, 14.4198),
    Location::new("Kuchyn", 50.0904, 14.3988),
];

// ============================================================================
// Outliers
// ============================================================================

/// Petrin hill, a hike on the left bank.
pub const PETRIN_HILL: Location = Location::new("Petrin Hill", 50.0833, 14.3950);

/// Vysehrad fort, ~2.5 km south of the center.
pub const VYSEHRAD: Location = Location::new("Vysehrad", 50.0645, 14.4180);
