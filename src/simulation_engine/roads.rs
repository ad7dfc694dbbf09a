use crate::error::{JunctionError, Result};
use crate::global_variables::{LANES_PER_ROAD, MAX_ROADS};
use crate::simulation_engine::lanes::{Lane, LaneId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The compass side a road approaches the junction from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Compass {
    North,
    East,
    South,
    West,
}

impl Compass {
    /// Clockwise order, starting at north.
    const CLOCKWISE: [Compass; 4] = [Compass::North, Compass::East, Compass::South, Compass::West];

    fn position(self) -> usize {
        match self {
            Compass::North => 0,
            Compass::East => 1,
            Compass::South => 2,
            Compass::West => 3,
        }
    }

    pub fn clockwise(self) -> Compass {
        Self::CLOCKWISE[(self.position() + 1) % 4]
    }

    pub fn counter_clockwise(self) -> Compass {
        Self::CLOCKWISE[(self.position() + 3) % 4]
    }

    pub fn opposite(self) -> Compass {
        Self::CLOCKWISE[(self.position() + 2) % 4]
    }
}

/// One of the four roads, in the fixed junction order A, B, C, D.
///
/// The position of a road in the junction never changes, so `index()` is a
/// stable address for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoadId {
    A,
    B,
    C,
    D,
}

impl RoadId {
    pub const ALL: [RoadId; MAX_ROADS] = [RoadId::A, RoadId::B, RoadId::C, RoadId::D];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Result<RoadId> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(JunctionError::InvalidRoadIndex(index))
    }

    /// Parses the single-letter road code used by the intake feed.
    pub fn from_letter(letter: char) -> Result<RoadId> {
        match letter {
            'A' => Ok(RoadId::A),
            'B' => Ok(RoadId::B),
            'C' => Ok(RoadId::C),
            'D' => Ok(RoadId::D),
            other => Err(JunctionError::UnknownRoad(other.to_string())),
        }
    }

    pub fn letter(self) -> char {
        match self {
            RoadId::A => 'A',
            RoadId::B => 'B',
            RoadId::C => 'C',
            RoadId::D => 'D',
        }
    }

    /// Display name, e.g. "Road A".
    pub fn name(self) -> String {
        format!("Road {}", self.letter())
    }

    /// A comes in from the south, B from the north, C from the east and D from the west.
    pub fn compass(self) -> Compass {
        match self {
            RoadId::A => Compass::South,
            RoadId::B => Compass::North,
            RoadId::C => Compass::East,
            RoadId::D => Compass::West,
        }
    }

    pub fn from_compass(compass: Compass) -> RoadId {
        match compass {
            Compass::South => RoadId::A,
            Compass::North => RoadId::B,
            Compass::East => RoadId::C,
            Compass::West => RoadId::D,
        }
    }

    pub fn clockwise(self) -> RoadId {
        Self::from_compass(self.compass().clockwise())
    }

    pub fn counter_clockwise(self) -> RoadId {
        Self::from_compass(self.compass().counter_clockwise())
    }

    pub fn opposite(self) -> RoadId {
        Self::from_compass(self.compass().opposite())
    }
}

impl fmt::Display for RoadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Road {}", self.letter())
    }
}

/// A road approaching the junction, with its three lanes.
#[derive(Debug)]
pub struct Road {
    pub id: RoadId,
    pub name: String,
    pub lanes: [Lane; LANES_PER_ROAD],
}

impl Road {
    pub fn new(id: RoadId, queue_capacity: usize) -> Self {
        let name = id.name();
        let lanes = std::array::from_fn(|lane| {
            Lane::new(LaneId::new(id.index(), lane), &name, queue_capacity)
        });
        Self { id, name, lanes }
    }

    pub fn lane(&self, index: usize) -> Option<&Lane> {
        self.lanes.get(index)
    }

    /// Total number of vehicles waiting across the road's lanes.
    pub fn queued(&self) -> usize {
        self.lanes.iter().map(|lane| lane.queue.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_round_trip_through_index() {
        for road in RoadId::ALL {
            assert_eq!(RoadId::from_letter(road.letter()).unwrap(), road);
            assert_eq!(RoadId::from_index(road.index()).unwrap(), road);
        }
        assert!(matches!(
            RoadId::from_letter('E'),
            Err(JunctionError::UnknownRoad(_))
        ));
        assert!(matches!(
            RoadId::from_index(4),
            Err(JunctionError::InvalidRoadIndex(4))
        ));
    }

    #[test]
    fn adjacency_follows_the_compass() {
        assert_eq!(RoadId::A.opposite(), RoadId::B);
        assert_eq!(RoadId::C.opposite(), RoadId::D);
        assert_eq!(RoadId::A.clockwise(), RoadId::D);
        assert_eq!(RoadId::A.counter_clockwise(), RoadId::C);
        for road in RoadId::ALL {
            assert_eq!(road.clockwise().counter_clockwise(), road);
            assert_eq!(road.opposite().opposite(), road);
        }
    }

    #[test]
    fn lanes_are_named_after_their_road() {
        let road = Road::new(RoadId::B, 4);
        let names: Vec<&str> = road.lanes.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Road B1", "Road B2", "Road B3"]);
        assert!(road.lanes.iter().all(|l| l.id.road == 1 && !l.is_priority));
        assert_eq!(road.queued(), 0);
    }
}
