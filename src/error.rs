use std::io;
use thiserror::Error;

/// Errors raised by the junction core.
///
/// None of these stop a running simulation. `InvalidConfig` and `Io` are only
/// fatal while the junction is being set up.
#[derive(Debug, Error)]
pub enum JunctionError {
    /// The lane queue was at capacity; the vehicle was not added.
    #[error("lane {lane} is full, vehicle {vehicle} could not be added")]
    QueueFull { lane: String, vehicle: String },

    /// The lane queue has been closed for shutdown.
    #[error("lane {lane} is closed")]
    QueueClosed { lane: String },

    /// No destination lane exists for the given source lane.
    #[error("no destination lane for source lane {lane}")]
    RoutingFailure { lane: String },

    #[error("unknown road: {0}")]
    UnknownRoad(String),

    #[error("lane {lane} does not exist")]
    UnknownLane { lane: String },

    #[error("road index {0} is outside the junction")]
    InvalidRoadIndex(usize),

    /// An intake record that is not `<vehicleId>:<roadLetter>`.
    #[error("invalid intake record: {0:?}")]
    InvalidRecord(String),

    #[error("invalid vehicle id: {0:?}")]
    InvalidVehicleId(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, JunctionError>;
