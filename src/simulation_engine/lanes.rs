use crate::error::{JunctionError, Result};
use crate::global_variables::LANES_PER_ROAD;
use crate::simulation_engine::queue::{EnqueueError, VehicleQueue};
use crate::simulation_engine::roads::RoadId;
use crate::simulation_engine::vehicles::Vehicle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Address of a lane: road index (0..4) and lane index within the road (0..3).
///
/// The fields are plain indices so that out-of-range addresses can be
/// expressed and rejected by lookups instead of by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LaneId {
    pub road: usize,
    pub lane: usize,
}

impl LaneId {
    pub const fn new(road: usize, lane: usize) -> Self {
        Self { road, lane }
    }

    pub fn road_id(&self) -> Result<RoadId> {
        RoadId::from_index(self.road)
    }

    /// The movement this lane serves, if the lane index is valid.
    pub fn kind(&self) -> Option<LaneKind> {
        LaneKind::from_index(self.lane)
    }

    /// Human readable name such as "Road A1"; falls back to the raw indices.
    pub fn name(&self) -> String {
        match self.road_id() {
            Ok(road) if self.lane < LANES_PER_ROAD => format!("{}{}", road.name(), self.lane + 1),
            _ => format!("lane ({}, {})", self.road, self.lane),
        }
    }
}

impl fmt::Display for LaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// The movement a lane is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneKind {
    /// Lane 0.
    RightTurn,
    /// Lane 1.
    Through,
    /// Lane 2.
    LeftTurn,
}

impl LaneKind {
    pub fn from_index(index: usize) -> Option<LaneKind> {
        match index {
            0 => Some(LaneKind::RightTurn),
            1 => Some(LaneKind::Through),
            2 => Some(LaneKind::LeftTurn),
            _ => None,
        }
    }
}

/// One traffic channel of a road, with its own bounded vehicle queue.
#[derive(Debug)]
pub struct Lane {
    pub id: LaneId,
    pub name: String,
    /// Reserved; every lane is created without priority.
    pub is_priority: bool,
    pub queue: VehicleQueue,
}

impl Lane {
    pub fn new(id: LaneId, road_name: &str, queue_capacity: usize) -> Self {
        Self {
            id,
            name: format!("{}{}", road_name, id.lane + 1),
            is_priority: false,
            queue: VehicleQueue::new(queue_capacity),
        }
    }

    /// Tags the vehicle with this lane and appends it to the queue.
    pub fn enqueue(&self, mut vehicle: Vehicle) -> Result<()> {
        vehicle.current_lane = Some(self.id);
        self.queue.enqueue(vehicle).map_err(|err| match err {
            EnqueueError::Full(vehicle) => JunctionError::QueueFull {
                lane: self.name.clone(),
                vehicle: vehicle.id.to_string(),
            },
            EnqueueError::Closed(_) => JunctionError::QueueClosed {
                lane: self.name.clone(),
            },
        })
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation_engine::vehicles::VehicleId;

    fn vehicle(id: &str) -> Vehicle {
        Vehicle::new(VehicleId::new(id).unwrap(), RoadId::A)
    }

    #[test]
    fn enqueue_sets_current_lane() {
        let lane = Lane::new(LaneId::new(0, 1), "Road A", 2);
        lane.enqueue(vehicle("AB1")).unwrap();
        let queued = lane.queue.try_dequeue().unwrap();
        assert_eq!(queued.current_lane, Some(LaneId::new(0, 1)));
        assert_eq!(queued.destination, None);
    }

    #[test]
    fn full_lane_reports_lane_and_vehicle() {
        let lane = Lane::new(LaneId::new(2, 0), "Road C", 1);
        lane.enqueue(vehicle("X1")).unwrap();
        match lane.enqueue(vehicle("X2")) {
            Err(JunctionError::QueueFull { lane, vehicle }) => {
                assert_eq!(lane, "Road C1");
                assert_eq!(vehicle, "X2");
            }
            other => panic!("expected QueueFull, got {:?}", other),
        }
    }

    #[test]
    fn closed_lane_rejects_vehicles() {
        let lane = Lane::new(LaneId::new(3, 2), "Road D", 1);
        lane.queue.close();
        assert!(matches!(
            lane.enqueue(vehicle("Z9")),
            Err(JunctionError::QueueClosed { .. })
        ));
    }

    #[test]
    fn lane_ids_name_themselves() {
        assert_eq!(LaneId::new(0, 0).name(), "Road A1");
        assert_eq!(LaneId::new(3, 2).to_string(), "Road D3");
        assert_eq!(LaneId::new(0, 3).name(), "lane (0, 3)");
        assert_eq!(LaneId::new(1, 1).kind(), Some(LaneKind::Through));
        assert_eq!(LaneId::new(1, 5).kind(), None);
    }
}
