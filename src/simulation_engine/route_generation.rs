// route_generation.rs
//
// Destination lanes for vehicles leaving the junction. Every source lane maps
// to an entry in a fixed 4x3 table built from the compass layout of the roads:
//
//   lane 0 (right turn) -> lane 0 of the road clockwise from the source
//   lane 1 (through)    -> lane 1 of the opposite road, or lane 1 of the
//                          clockwise road, picked uniformly at random
//   lane 2 (left turn)  -> lane 0 of the road counter-clockwise from the source
//
// Individual movements can be closed, after which routing from that lane fails
// until it is reopened.

use crate::error::{JunctionError, Result};
use crate::global_variables::{LANES_PER_ROAD, MAX_ROADS};
use crate::simulation_engine::lanes::{LaneId, LaneKind};
use crate::simulation_engine::roads::RoadId;
use rand::seq::IndexedRandom;
use rand::Rng;

/// Where vehicles from one source lane may go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Fixed(LaneId),
    /// Two equally valid exits.
    Either(LaneId, LaneId),
    Closed,
}

impl Route {
    pub fn candidates(&self) -> Vec<LaneId> {
        match *self {
            Route::Fixed(lane) => vec![lane],
            Route::Either(first, second) => vec![first, second],
            Route::Closed => Vec::new(),
        }
    }
}

/// Standard route for a movement, derived from the road adjacency.
fn standard_route(road: RoadId, kind: LaneKind) -> Route {
    match kind {
        LaneKind::RightTurn => Route::Fixed(LaneId::new(road.clockwise().index(), 0)),
        LaneKind::Through => Route::Either(
            LaneId::new(road.opposite().index(), 1),
            LaneId::new(road.clockwise().index(), 1),
        ),
        LaneKind::LeftTurn => Route::Fixed(LaneId::new(road.counter_clockwise().index(), 0)),
    }
}

#[derive(Debug, Clone)]
pub struct RoutingTable {
    routes: [[Route; LANES_PER_ROAD]; MAX_ROADS],
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RoutingTable {
    pub fn new() -> Self {
        let routes = RoadId::ALL.map(|road| {
            [LaneKind::RightTurn, LaneKind::Through, LaneKind::LeftTurn]
                .map(|kind| standard_route(road, kind))
        });
        Self { routes }
    }

    pub fn route(&self, source: LaneId) -> Option<Route> {
        self.routes.get(source.road)?.get(source.lane).copied()
    }

    /// Possible destinations from `source`; empty for unknown or closed lanes.
    pub fn candidates(&self, source: LaneId) -> Vec<LaneId> {
        self.route(source)
            .map(|route| route.candidates())
            .unwrap_or_default()
    }

    /// Stops routing vehicles out of `source`. Returns false for unknown lanes.
    pub fn close_movement(&mut self, source: LaneId) -> bool {
        match self.slot(source) {
            Some(slot) => {
                *slot = Route::Closed;
                true
            }
            None => false,
        }
    }

    /// Restores the standard route for `source`. Returns false for unknown lanes.
    pub fn reopen_movement(&mut self, source: LaneId) -> bool {
        let standard = match (source.road_id(), source.kind()) {
            (Ok(road), Some(kind)) => standard_route(road, kind),
            _ => return false,
        };
        match self.slot(source) {
            Some(slot) => {
                *slot = standard;
                true
            }
            None => false,
        }
    }

    fn slot(&mut self, source: LaneId) -> Option<&mut Route> {
        self.routes.get_mut(source.road)?.get_mut(source.lane)
    }

    pub fn generate_destination(&self, source: LaneId) -> Result<LaneId> {
        self.generate_destination_with_rng(source, &mut rand::rng())
    }

    pub fn generate_destination_with_rng<R: Rng + ?Sized>(
        &self,
        source: LaneId,
        rng: &mut R,
    ) -> Result<LaneId> {
        let candidates = self.candidates(source);
        candidates
            .choose(rng)
            .copied()
            .ok_or_else(|| JunctionError::RoutingFailure {
                lane: source.name(),
            })
    }
}
