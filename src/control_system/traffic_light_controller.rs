use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::time::{sleep, Duration};

use crate::error::Result;
use crate::global_variables::MAX_ROADS;
use crate::simulation_engine::roads::RoadId;

/// Which road, if any, currently has a green light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Signal {
    #[default]
    AllRed,
    Green(RoadId),
}

impl Signal {
    pub fn is_green(&self, road: RoadId) -> bool {
        *self == Signal::Green(road)
    }

    /// One flag per road, in junction order.
    pub fn green_mask(&self) -> [bool; MAX_ROADS] {
        RoadId::ALL.map(|road| self.is_green(road))
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::AllRed => f.write_str("all red"),
            Signal::Green(road) => write!(f, "{} green", road),
        }
    }
}

#[derive(Debug, Default)]
struct LightState {
    current: Signal,
    next: Signal,
}

/// Shared light state for the junction.
///
/// The light-cycle task writes `next`; the render/scheduler loop calls
/// `refresh` to move `current` onto it. Both halves sit behind one lock.
#[derive(Debug, Default)]
pub struct TrafficLightController {
    state: Mutex<LightState>,
}

impl TrafficLightController {
    /// Starts with every light red.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, LightState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Requests a green light for the road at `next_index`.
    pub fn advance_light(&self, next_index: usize) -> Result<()> {
        let road = RoadId::from_index(next_index)?;
        self.request(Signal::Green(road));
        Ok(())
    }

    pub fn set_all_red(&self) {
        self.request(Signal::AllRed);
    }

    pub fn request(&self, next: Signal) {
        self.lock().next = next;
    }

    /// Applies a pending change. Returns `(previous, current)` when the light
    /// actually switched, so the caller can redraw.
    pub fn refresh(&self) -> Option<(Signal, Signal)> {
        let mut state = self.lock();
        if state.next == state.current {
            return None;
        }
        let previous = state.current;
        state.current = state.next;
        info!("Light updated from {} to {}", previous, state.current);
        Some((previous, state.current))
    }

    pub fn current(&self) -> Signal {
        self.lock().current
    }

    pub fn next(&self) -> Signal {
        self.lock().next
    }

    pub fn is_green(&self, road: RoadId) -> bool {
        self.current().is_green(road)
    }

    pub fn green_mask(&self) -> [bool; MAX_ROADS] {
        self.current().green_mask()
    }

    /// Cycles `next` through `phases`, holding each for `green_duration`,
    /// until `shutdown` is set. Lights are left all red on exit.
    pub async fn run_light_cycle(
        controller: Arc<Self>,
        phases: Vec<RoadId>,
        green_duration: Duration,
        mut shutdown: watch::Receiver<bool>,
    ) {
        if phases.is_empty() {
            info!("Light cycle has no phases, lights stay red");
            return;
        }
        info!(
            "Light cycle started: {:?}, {:?} per phase",
            phases, green_duration
        );
        for road in phases.iter().cycle() {
            if *shutdown.borrow() {
                break;
            }
            controller.request(Signal::Green(*road));
            debug!("Next light: {} green", road);
            tokio::select! {
                _ = sleep(green_duration) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        controller.set_all_red();
        info!("Light cycle stopped");
    }
}
