use crate::error::{JunctionError, Result};
use crate::global_variables::LANES_PER_ROAD;
use crate::shared_data::{JunctionSnapshot, LaneSnapshot, RoadSnapshot};
use crate::simulation_engine::lanes::{Lane, LaneId};
use crate::simulation_engine::roads::{Road, RoadId};
use crate::simulation_engine::vehicles::{Vehicle, VehicleId};
use log::{info, warn};
use rand::Rng;

/// The four roads of the junction, stored in the fixed order A, B, C, D.
///
/// Built once before any task starts; afterwards only the lane queues
/// change, and each of those carries its own lock.
#[derive(Debug)]
pub struct Junction {
    roads: [Road; 4],
    queue_capacity: usize,
}

impl Junction {
    pub fn new(queue_capacity: usize) -> Result<Self> {
        if queue_capacity == 0 {
            return Err(JunctionError::InvalidConfig(
                "lane queue capacity must be at least 1".to_string(),
            ));
        }
        let roads = RoadId::ALL.map(|id| Road::new(id, queue_capacity));
        info!(
            "Junction initialised: {} roads x {} lanes, queue capacity {}",
            roads.len(),
            LANES_PER_ROAD,
            queue_capacity
        );
        Ok(Self {
            roads,
            queue_capacity,
        })
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    /// Looks a road up by its display name, e.g. "Road A".
    pub fn find_road(&self, name: &str) -> Option<&Road> {
        self.roads.iter().find(|road| road.name == name)
    }

    pub fn road(&self, id: RoadId) -> &Road {
        &self.roads[id.index()]
    }

    pub fn lane(&self, id: LaneId) -> Option<&Lane> {
        self.roads.get(id.road)?.lane(id.lane)
    }

    pub fn roads(&self) -> impl Iterator<Item = &Road> {
        self.roads.iter()
    }

    /// Every lane, road by road, lane 0 first.
    pub fn lanes(&self) -> impl Iterator<Item = &Lane> {
        self.roads.iter().flat_map(|road| road.lanes.iter())
    }

    pub fn queued(&self) -> usize {
        self.roads.iter().map(Road::queued).sum()
    }

    /// Queues a vehicle arriving on `road_letter` on one of that road's lanes,
    /// picked uniformly at random.
    pub fn ingest(&self, road_letter: char, vehicle_id: &str) -> Result<LaneId> {
        self.ingest_with_rng(road_letter, vehicle_id, &mut rand::rng())
    }

    pub fn ingest_with_rng<R: Rng + ?Sized>(
        &self,
        road_letter: char,
        vehicle_id: &str,
        rng: &mut R,
    ) -> Result<LaneId> {
        let road = RoadId::from_letter(road_letter)?;
        let lane = rng.random_range(0..LANES_PER_ROAD);
        self.ingest_into_lane(road, lane, vehicle_id)
    }

    /// Queues a vehicle on a specific lane of `road`.
    pub fn ingest_into_lane(&self, road: RoadId, lane: usize, vehicle_id: &str) -> Result<LaneId> {
        let id = VehicleId::new(vehicle_id)?;
        let lane_id = LaneId::new(road.index(), lane);
        let target = self.lane(lane_id).ok_or_else(|| JunctionError::UnknownLane {
            lane: lane_id.name(),
        })?;
        match target.enqueue(Vehicle::new(id, road)) {
            Ok(()) => {
                info!("Vehicle {} added to {}", vehicle_id, target.name);
                Ok(lane_id)
            }
            Err(err) => {
                warn!("{}", err);
                Err(err)
            }
        }
    }

    /// Closes every lane queue, waking any task blocked in `dequeue`.
    pub fn close(&self) {
        for lane in self.lanes() {
            lane.queue.close();
        }
        info!("All lane queues closed");
    }

    pub fn snapshot(&self) -> JunctionSnapshot {
        JunctionSnapshot {
            roads: self
                .roads
                .iter()
                .map(|road| RoadSnapshot {
                    name: road.name.clone(),
                    lanes: road
                        .lanes
                        .iter()
                        .map(|lane| LaneSnapshot {
                            name: lane.name.clone(),
                            queued: lane.queued(),
                            is_priority: lane.is_priority,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn builds_four_roads_in_fixed_order() {
        let junction = Junction::new(10).unwrap();
        let names: Vec<&str> = junction.roads().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Road A", "Road B", "Road C", "Road D"]);
        assert_eq!(junction.lanes().count(), 12);
        assert!(junction.lanes().all(|lane| lane.queue.capacity() == 10));
        assert_eq!(junction.queued(), 0);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(matches!(
            Junction::new(0),
            Err(JunctionError::InvalidConfig(_))
        ));
    }

    #[test]
    fn finds_roads_by_name() {
        let junction = Junction::new(3).unwrap();
        assert_eq!(junction.find_road("Road C").map(|r| r.id), Some(RoadId::C));
        assert!(junction.find_road("Road E").is_none());
        assert!(junction.find_road("C").is_none());
    }

    #[test]
    fn lane_lookup_rejects_out_of_range() {
        let junction = Junction::new(3).unwrap();
        assert_eq!(junction.lane(LaneId::new(3, 2)).unwrap().name, "Road D3");
        assert!(junction.lane(LaneId::new(4, 0)).is_none());
        assert!(junction.lane(LaneId::new(0, 3)).is_none());
    }

    #[test]
    fn ingest_spreads_vehicles_over_the_road() {
        let junction = Junction::new(30).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for n in 0..30 {
            let lane = junction
                .ingest_with_rng('B', &format!("B{n}"), &mut rng)
                .unwrap();
            assert_eq!(lane.road, RoadId::B.index());
        }
        let road = junction.road(RoadId::B);
        assert_eq!(road.queued(), 30);
        assert!(road.lanes.iter().all(|lane| lane.queued() > 0));
    }

    #[test]
    fn ingest_rejects_unknown_roads_and_bad_ids() {
        let junction = Junction::new(3).unwrap();
        assert!(matches!(
            junction.ingest('E', "AB1"),
            Err(JunctionError::UnknownRoad(_))
        ));
        assert!(matches!(
            junction.ingest('A', "TOOLONG123"),
            Err(JunctionError::InvalidVehicleId(_))
        ));
        assert_eq!(junction.queued(), 0);
    }

    #[test]
    fn snapshot_reports_queued_counts() {
        let junction = Junction::new(5).unwrap();
        junction.ingest_into_lane(RoadId::C, 2, "C1").unwrap();
        junction.ingest_into_lane(RoadId::C, 2, "C2").unwrap();
        let snapshot = junction.snapshot();
        assert_eq!(snapshot.roads[2].lanes[2].name, "Road C3");
        assert_eq!(snapshot.roads[2].lanes[2].queued, 2);
        assert_eq!(snapshot.total_queued(), 2);
    }

    #[test]
    fn forced_lane_must_exist() {
        let junction = Junction::new(5).unwrap();
        assert!(matches!(
            junction.ingest_into_lane(RoadId::A, 3, "A1"),
            Err(JunctionError::UnknownLane { .. })
        ));
    }

    #[test]
    fn close_rejects_further_intake() {
        let junction = Junction::new(5).unwrap();
        junction.close();
        assert!(matches!(
            junction.ingest_into_lane(RoadId::A, 0, "A1"),
            Err(JunctionError::QueueClosed { .. })
        ));
    }
}
