// simulation.rs
use crate::config::{SimulationConfig, Validate};
use crate::control_system::traffic_light_controller::TrafficLightController;
use crate::monitoring::traffic_monitoring_system::run_release_logger;
use crate::shared_data::Release;
use crate::simulation_engine::intake::IntakeFollower;
use crate::simulation_engine::junction::Junction;
use crate::simulation_engine::route_generation::RoutingTable;
use crate::simulation_engine::scheduler::IntersectionScheduler;

use anyhow::Result;
use log::{debug, error, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tokio::time::{interval, sleep, MissedTickBehavior};

/// Totals reported when a run ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationSummary {
    pub released: u64,
    pub completed: u64,
    pub discarded: u64,
    /// Vehicles still waiting in lane queues at shutdown.
    pub still_queued: usize,
    pub logged: usize,
}

/// A junction, its lights and its scheduler, ready to be driven by `run`.
pub struct Simulation {
    config: SimulationConfig,
    junction: Arc<Junction>,
    controller: Arc<TrafficLightController>,
    scheduler: Arc<IntersectionScheduler>,
}

impl Simulation {
    /// Builds the junction and its controllers. Fails if `config` does not
    /// validate.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let junction = Arc::new(Junction::new(config.junction.queue_capacity)?);
        let scheduler = Arc::new(IntersectionScheduler::new(
            Arc::clone(&junction),
            RoutingTable::new(),
            config.junction.max_active_vehicles,
        ));
        Ok(Self {
            config,
            junction,
            controller: Arc::new(TrafficLightController::new()),
            scheduler,
        })
    }

    pub fn junction(&self) -> &Arc<Junction> {
        &self.junction
    }

    pub fn controller(&self) -> &Arc<TrafficLightController> {
        &self.controller
    }

    pub fn scheduler(&self) -> &Arc<IntersectionScheduler> {
        &self.scheduler
    }

    /// One frame: apply any pending light change, then release vehicles.
    pub fn step(&self) -> Vec<Release> {
        if let Some((previous, current)) = self.controller.refresh() {
            info!("Lights switched: {} -> {}", previous, current);
            if let Ok(snapshot) = serde_json::to_string(&self.junction.snapshot()) {
                debug!("Queues: {}", snapshot);
            }
        }
        self.scheduler.tick(self.controller.current())
    }

    /// Runs intake, light cycling, scheduling and release logging until
    /// `shutdown` is set, then closes the lanes and waits for every task.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> Result<SimulationSummary> {
        let phases = self.config.lights.phase_roads()?;
        let timing = self.config.timing.clone();

        let light_task = tokio::spawn(TrafficLightController::run_light_cycle(
            Arc::clone(&self.controller),
            phases,
            self.config.lights.green_duration(),
            shutdown.clone(),
        ));
        let intake_task = tokio::spawn(
            IntakeFollower::new(&self.config.files.vehicle_file).run(
                Arc::clone(&self.junction),
                timing.intake_poll(),
                shutdown.clone(),
            ),
        );
        let (release_tx, release_rx) = mpsc::unbounded_channel();
        let log_path = self.config.files.release_log.as_ref().map(PathBuf::from);
        let logger_task = tokio::spawn(run_release_logger(release_rx, log_path));

        let mut crossings = JoinSet::new();
        let mut ticker = interval(timing.tick());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!("Simulation running");

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
            }
            for release in self.step() {
                if release_tx.send(release.clone()).is_err() {
                    warn!("Release logger has stopped");
                }
                let scheduler = Arc::clone(&self.scheduler);
                let crossing = timing.crossing();
                crossings.spawn(async move {
                    sleep(crossing).await;
                    info!(
                        "Vehicle {} reached {}",
                        release.vehicle.id, release.destination
                    );
                    scheduler.complete(&release.vehicle);
                });
            }
            reap_crossings(&mut crossings);
        }

        info!("Shutting down simulation");
        self.junction.close();
        light_task.await?;
        intake_task.await?;
        while let Some(joined) = crossings.join_next().await {
            joined?;
        }
        drop(release_tx);
        let logged = logger_task.await?;

        let stats = self.scheduler.stats();
        let summary = SimulationSummary {
            released: stats.released,
            completed: stats.completed,
            discarded: stats.discarded,
            still_queued: self.junction.queued(),
            logged,
        };
        info!("Simulation finished: {:?}", summary);
        Ok(summary)
    }
}

/// Collects finished crossing tasks without waiting. Returns how many failed.
fn reap_crossings(crossings: &mut JoinSet<()>) -> usize {
    let mut failed = 0;
    while let Some(joined) = crossings.try_join_next() {
        if let Err(err) = joined {
            error!("Crossing task failed: {}", err);
            failed += 1;
        }
    }
    failed
}
