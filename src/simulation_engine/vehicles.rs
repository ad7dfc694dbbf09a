use crate::error::{JunctionError, Result};
use crate::global_variables::MAX_VEHICLE_ID_LEN;
use crate::simulation_engine::lanes::LaneId;
use crate::simulation_engine::roads::RoadId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Plate-like vehicle identifier: 1 to 8 ASCII letters or digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VehicleId(String);

impl VehicleId {
    pub fn new(id: &str) -> Result<Self> {
        let valid = !id.is_empty()
            && id.len() <= MAX_VEHICLE_ID_LEN
            && id.chars().all(|c| c.is_ascii_alphanumeric());
        if valid {
            Ok(Self(id.to_string()))
        } else {
            Err(JunctionError::InvalidVehicleId(id.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A vehicle waiting at, or crossing, the junction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    /// The road the vehicle arrived on.
    pub road: RoadId,
    /// Set when the vehicle is queued on a lane.
    pub current_lane: Option<LaneId>,
    /// Set by the routing table when the vehicle is released.
    pub destination: Option<LaneId>,
}

impl Vehicle {
    pub fn new(id: VehicleId, road: RoadId) -> Self {
        Self {
            id,
            road,
            current_lane: None,
            destination: None,
        }
    }

    pub fn is_routed(&self) -> bool {
        self.destination.is_some()
    }
}
