use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, error, info};
use rand::Rng;

use crate::control_system::traffic_light_controller::Signal;
use crate::shared_data::Release;
use crate::simulation_engine::junction::Junction;
use crate::simulation_engine::roads::RoadId;
use crate::simulation_engine::route_generation::RoutingTable;
use crate::simulation_engine::vehicles::{Vehicle, VehicleId};

/// Running totals kept by the scheduler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Vehicles currently inside the intersection.
    pub active: usize,
    pub released: u64,
    pub completed: u64,
    /// Vehicles dropped because no destination could be found.
    pub discarded: u64,
}

/// Totals plus the vehicles currently inside, keyed by id. Two vehicles may
/// share a plate, so each id carries a count.
#[derive(Debug, Default)]
struct SchedulerState {
    stats: SchedulerStats,
    in_flight: HashMap<VehicleId, usize>,
}

/// Lets queued vehicles from green roads into the intersection.
///
/// The state lock is held for a whole tick, so the in-flight cap is checked
/// and updated by one tick at a time. Lane queue locks are only taken while
/// it is held, never the other way round.
#[derive(Debug)]
pub struct IntersectionScheduler {
    junction: Arc<Junction>,
    routing: RoutingTable,
    max_active: usize,
    state: Mutex<SchedulerState>,
}

impl IntersectionScheduler {
    pub fn new(junction: Arc<Junction>, routing: RoutingTable, max_active: usize) -> Self {
        Self {
            junction,
            routing,
            max_active,
            state: Mutex::new(SchedulerState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SchedulerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn junction(&self) -> &Arc<Junction> {
        &self.junction
    }

    pub fn max_active(&self) -> usize {
        self.max_active
    }

    pub fn active(&self) -> usize {
        self.lock().stats.active
    }

    pub fn stats(&self) -> SchedulerStats {
        self.lock().stats
    }

    pub fn tick(&self, signal: Signal) -> Vec<Release> {
        self.tick_with_rng(signal, &mut rand::rng())
    }

    /// Releases at most one vehicle per lane of each green road, in road
    /// order then lane order, until the in-flight cap is reached.
    pub fn tick_with_rng<R: Rng + ?Sized>(&self, signal: Signal, rng: &mut R) -> Vec<Release> {
        let green = signal.green_mask();
        let mut state = self.lock();
        let mut released = Vec::new();

        for road in RoadId::ALL.into_iter().filter(|road| green[road.index()]) {
            for lane in self.junction.road(road).lanes.iter() {
                if state.stats.active >= self.max_active {
                    debug!(
                        "Intersection full ({} vehicles), deferring {}",
                        state.stats.active, lane.name
                    );
                    return released;
                }
                let Some(mut vehicle) = lane.queue.try_dequeue() else {
                    continue;
                };
                vehicle.current_lane = Some(lane.id);
                match self.routing.generate_destination_with_rng(lane.id, rng) {
                    Ok(destination) => {
                        vehicle.destination = Some(destination);
                        *state.in_flight.entry(vehicle.id.clone()).or_insert(0) += 1;
                        state.stats.active += 1;
                        state.stats.released += 1;
                        info!(
                            "Vehicle {} released from {} towards {}",
                            vehicle.id, lane.name, destination
                        );
                        released.push(Release {
                            vehicle,
                            source: lane.id,
                            destination,
                        });
                    }
                    Err(err) => {
                        state.stats.discarded += 1;
                        error!("Discarding vehicle {}: {}", vehicle.id, err);
                    }
                }
            }
        }
        released
    }

    /// Called by the consumer once a released vehicle has left the
    /// intersection. Returns `false` and frees nothing if the vehicle is not
    /// in flight, e.g. it was never released or has already completed.
    pub fn complete(&self, vehicle: &Vehicle) -> bool {
        let mut state = self.lock();
        let remaining = match state.in_flight.get_mut(&vehicle.id) {
            Some(count) => {
                *count -= 1;
                *count
            }
            None => {
                error!("Vehicle {} completed but is not in flight", vehicle.id);
                return false;
            }
        };
        if remaining == 0 {
            state.in_flight.remove(&vehicle.id);
        }
        state.stats.active -= 1;
        state.stats.completed += 1;
        debug!(
            "Vehicle {} left the intersection, {} still inside",
            vehicle.id, state.stats.active
        );
        true
    }
}
