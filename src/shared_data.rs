// src/shared_data.rs

use crate::simulation_engine::lanes::LaneId;
use crate::simulation_engine::vehicles::Vehicle;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Queue occupancy of one lane.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaneSnapshot {
    pub name: String,
    pub queued: usize,
    pub is_priority: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadSnapshot {
    pub name: String,
    pub lanes: Vec<LaneSnapshot>,
}

/// Point-in-time view of every lane queue in the junction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JunctionSnapshot {
    pub roads: Vec<RoadSnapshot>,
}

impl JunctionSnapshot {
    pub fn total_queued(&self) -> usize {
        self.roads
            .iter()
            .flat_map(|road| road.lanes.iter())
            .map(|lane| lane.queued)
            .sum()
    }
}

/// A vehicle let into the intersection by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub vehicle: Vehicle,
    pub source: LaneId,
    pub destination: LaneId,
}

/// One row of the release log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseRecord {
    pub timestamp: u64,
    pub vehicle: String,
    pub source_lane: String,
    pub destination_lane: String,
}

impl ReleaseRecord {
    pub fn from_release(release: &Release, timestamp: u64) -> Self {
        Self {
            timestamp,
            vehicle: release.vehicle.id.to_string(),
            source_lane: release.source.name(),
            destination_lane: release.destination.name(),
        }
    }
}

/// Seconds since the Unix epoch.
pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
