//! itinerary-optimizer core
//!
//! Computes a day's (or multi-day's) visiting order over geographic points
//! of interest, maximizing a composite happiness score under time, pacing,
//! and meal-time constraints. Pure computation: POI data arrives already
//! resolved, travel times are estimated from straight-line distance, and
//! nothing is persisted between calls.

pub mod model;
pub mod error;
pub mod geo;
pub mod clustering;
pub mod scorer;
pub mod optimizer;
pub mod vrptw;
pub mod multiday;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::{OptimizationConfig, PlaceNode, RouteSolution};
use crate::vrptw::VrptwResult;

/// A planned day, from whichever solver the config selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DayPlan {
    /// Annealed best-score solution (the default path).
    Annealed(RouteSolution),
    /// Strict time-window solution, chosen via `use_vrptw`.
    Windowed(VrptwResult),
}

/// Plan a single day, dispatching on `config.use_vrptw`.
///
/// The default path runs the simulated-annealing optimizer seeded from
/// `seed`. With `use_vrptw` set, travel times are estimated from
/// straight-line distance and the strict time-window solver runs instead;
/// `seed` is unused there, as that path is fully deterministic.
pub fn plan_day(
    places: &[PlaceNode],
    config: &OptimizationConfig,
    seed: u64,
) -> Result<DayPlan, Error> {
    if places.is_empty() {
        return Err(Error::EmptyPlaces);
    }
    optimizer::check_coordinates(places)?;

    if config.use_vrptw {
        let matrix = vrptw::haversine_time_matrix(places);
        let input = vrptw::build_input(places, matrix, config.start_time, config.date);
        Ok(DayPlan::Windowed(vrptw::solve(&input)?))
    } else {
        Ok(DayPlan::Annealed(optimizer::optimize_seeded(
            places, config, seed,
        )?))
    }
}
