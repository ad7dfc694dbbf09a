// simulation_main.rs
use anyhow::Result;
use junction_sim::config::SimulationConfig;
use junction_sim::global_variables::DEFAULT_CONFIG_FILE;
use junction_sim::simulation_engine::simulation::Simulation;
use log::{error, info};
use std::time::Duration;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());
    let config = SimulationConfig::load_or_default(&config_path)?;
    info!(
        "Starting junction simulation: feed {}, queue capacity {}, cap {}",
        config.files.vehicle_file,
        config.junction.queue_capacity,
        config.junction.max_active_vehicles
    );

    let run_secs = config.timing.run_secs;
    let simulation = Simulation::new(config)?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        match run_secs {
            Some(secs) => {
                tokio::select! {
                    _ = tokio::time::sleep(Duration::from_secs(secs)) => {}
                    _ = tokio::signal::ctrl_c() => {}
                }
            }
            None => {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!("Could not listen for Ctrl-C: {}", e);
                    return;
                }
            }
        }
        info!("Stop requested");
        let _ = shutdown_tx.send(true);
    });

    let summary = simulation.run(shutdown_rx).await?;
    println!(
        "Released {} vehicles ({} completed, {} discarded), {} still queued",
        summary.released, summary.completed, summary.discarded, summary.still_queued
    );
    Ok(())
}
