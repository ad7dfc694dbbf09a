// traffic_generator.rs
//
// Appends random `<plate>:<road>` records to the vehicle feed every 1-3 seconds.
use anyhow::{Context, Result};
use junction_sim::global_variables::DEFAULT_VEHICLE_FILE;
use junction_sim::simulation_engine::roads::RoadId;
use log::info;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::fs::OpenOptions;
use std::io::Write;
use std::time::Duration;

const PLATE_PATTERN: &str = "AA0AA000";

/// Random plate following `PLATE_PATTERN`: `A` is a letter, `0` a digit.
fn generate_vehicle_number<R: Rng + ?Sized>(rng: &mut R) -> String {
    PLATE_PATTERN
        .chars()
        .map(|slot| match slot {
            'A' => char::from(b'A' + rng.random_range(0..26u8)),
            _ => char::from(b'0' + rng.random_range(0..10u8)),
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_VEHICLE_FILE.to_string());
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening {}", path))?;
    info!("Appending vehicles to {}", path);

    loop {
        let (record, delay) = {
            let mut rng = rand::rng();
            let vehicle = generate_vehicle_number(&mut rng);
            let road = RoadId::ALL.choose(&mut rng).copied().unwrap_or(RoadId::A);
            (
                format!("{}:{}", vehicle, road.letter()),
                rng.random_range(1000..3000),
            )
        };
        writeln!(file, "{}", record)?;
        file.flush()?;
        println!("Generated: {}", record);

        tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(delay)) => {}
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    Ok(())
}
