//! Error taxonomy for the optimization core.
//!
//! Only invalid inputs are errors. VRPTW infeasibility is reported through
//! a normal result (`feasible = false` plus violations), and schedule
//! truncation is a deliberate soft degradation, not an error.

use thiserror::Error;

/// Invalid-input errors raised by the optimizers.
#[derive(Debug, Error)]
pub enum Error {
    /// The optimizer was called with no places.
    #[error("cannot optimize an empty place list")]
    EmptyPlaces,
    /// The multi-day balancer was asked to plan zero days.
    #[error("cannot balance places across zero days")]
    ZeroDays,
    /// A place carried a non-finite coordinate.
    #[error("place {id} has a non-finite coordinate")]
    InvalidCoordinate {
        /// Identifier of the offending place.
        id: u64,
    },
    /// A start or order index does not name a location.
    #[error("location index {index} is out of range for {count} locations")]
    LocationIndexOutOfRange {
        /// Offending index.
        index: usize,
        /// Number of locations supplied.
        count: usize,
    },
    /// The VRPTW time matrix is not square or does not match the
    /// location count.
    #[error("time matrix must be {expected}x{expected}, got a row of length {found}")]
    MatrixShape {
        /// Expected dimension (the location count).
        expected: usize,
        /// Offending dimension found.
        found: usize,
    },
}
