use crate::shared_data::{current_timestamp, Release, ReleaseRecord};
use log::{error, info};
use serde::Serialize;
use std::error::Error;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

/// Generic helper to append a record to a CSV file.
fn log_to_csv<T: Serialize>(path: &Path, record: &T) -> Result<(), Box<dyn Error>> {
    let file_exists = path.exists();
    let file = OpenOptions::new().append(true).create(true).open(path)?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);
    wtr.serialize(record)?;
    wtr.flush()?;
    Ok(())
}

pub fn log_release(path: &Path, record: &ReleaseRecord) {
    if let Err(e) = log_to_csv(path, record) {
        error!("Error logging release to {}: {}", path.display(), e);
    }
}

/// Reads back every record of a release log.
pub fn read_release_log(path: &Path) -> Result<Vec<ReleaseRecord>, Box<dyn Error>> {
    let file = File::open(path)?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut records = Vec::new();
    for result in rdr.deserialize() {
        records.push(result?);
    }
    Ok(records)
}

/// Consumes releases until every sender is gone, logging each one and
/// appending it to `log_path` when set. Returns the number of releases seen.
pub async fn run_release_logger(
    mut releases: mpsc::UnboundedReceiver<Release>,
    log_path: Option<PathBuf>,
) -> usize {
    let mut seen = 0;
    while let Some(release) = releases.recv().await {
        seen += 1;
        let record = ReleaseRecord::from_release(&release, current_timestamp());
        info!(
            "[Monitor] {} crossed {} -> {}",
            record.vehicle, record.source_lane, record.destination_lane
        );
        if let Some(path) = &log_path {
            log_release(path, &record);
        }
    }
    info!("[Monitor] Release log closed after {} vehicles", seen);
    seen
}
