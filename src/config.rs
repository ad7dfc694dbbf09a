use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::global_variables::*;
use crate::simulation_engine::roads::RoadId;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Settings for a simulation run, read from `junction.toml`.
///
/// Every field has a default, so an empty file (or no file) is valid.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub junction: JunctionConfig,
    pub lights: LightConfig,
    pub timing: TimingConfig,
    pub files: FileConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct JunctionConfig {
    pub queue_capacity: usize,
    pub max_active_vehicles: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LightConfig {
    /// Road letters that get a green light, in order.
    pub phases: Vec<char>,
    pub green_duration_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimingConfig {
    pub tick_millis: u64,
    /// How long a released vehicle takes to clear the intersection.
    pub crossing_millis: u64,
    pub intake_poll_millis: u64,
    /// Stop after this many seconds; run until Ctrl-C when absent.
    pub run_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FileConfig {
    pub vehicle_file: String,
    pub release_log: Option<String>,
}

impl Default for JunctionConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            max_active_vehicles: DEFAULT_MAX_ACTIVE_VEHICLES,
        }
    }
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            phases: DEFAULT_LIGHT_PHASES.to_vec(),
            green_duration_secs: DEFAULT_GREEN_DURATION_SECS,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_millis: DEFAULT_TICK_MILLIS,
            crossing_millis: DEFAULT_CROSSING_MILLIS,
            intake_poll_millis: DEFAULT_INTAKE_POLL_MILLIS,
            run_secs: None,
        }
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            vehicle_file: DEFAULT_VEHICLE_FILE.to_string(),
            release_log: Some(DEFAULT_RELEASE_LOG.to_string()),
        }
    }
}

impl SimulationConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Loads `path` if it exists, otherwise falls back to the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_from_file(path)
        } else {
            log::info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }
}

impl LightConfig {
    pub fn phase_roads(&self) -> Result<Vec<RoadId>> {
        self.phases
            .iter()
            .map(|&letter| RoadId::from_letter(letter).map_err(anyhow::Error::from))
            .collect()
    }

    pub fn green_duration(&self) -> Duration {
        Duration::from_secs(self.green_duration_secs)
    }
}

impl TimingConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }

    pub fn crossing(&self) -> Duration {
        Duration::from_millis(self.crossing_millis)
    }

    pub fn intake_poll(&self) -> Duration {
        Duration::from_millis(self.intake_poll_millis)
    }
}

impl Validate for SimulationConfig {
    fn validate(&self) -> Result<()> {
        let junction = &self.junction;
        if junction.queue_capacity == 0 {
            return Err(anyhow!("Lane queue capacity must be greater than zero"));
        }
        if junction.max_active_vehicles == 0 {
            return Err(anyhow!("Max active vehicles must be greater than zero"));
        }

        let lights = &self.lights;
        if lights.phases.is_empty() {
            return Err(anyhow!("At least one light phase must be defined"));
        }
        lights.phase_roads()?;
        if lights.green_duration_secs == 0 {
            return Err(anyhow!("Green duration must be positive"));
        }

        let timing = &self.timing;
        if timing.tick_millis == 0 || timing.intake_poll_millis == 0 {
            return Err(anyhow!("Tick and intake poll intervals must be positive"));
        }

        if self.files.vehicle_file.trim().is_empty() {
            return Err(anyhow!("Vehicle file path must not be empty"));
        }
        Ok(())
    }
}
