//! Vehicle intake from a line-oriented feed of `<vehicleId>:<roadLetter>` records.
//!
//! The feed file is treated as append-only: the follower remembers how far it
//! has read and only consumes newline-terminated lines, so a record that is
//! still being written is picked up on a later poll.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio::sync::watch;
use tokio::time::{sleep, Duration};

use crate::error::{JunctionError, Result};
use crate::simulation_engine::junction::Junction;
use crate::simulation_engine::roads::RoadId;
use crate::simulation_engine::vehicles::VehicleId;

/// Parses one record. Surrounding whitespace is ignored.
pub fn parse_record(line: &str) -> Result<(VehicleId, RoadId)> {
    let line = line.trim();
    let (id, road) = line
        .split_once(':')
        .filter(|(_, road)| !road.contains(':'))
        .ok_or_else(|| JunctionError::InvalidRecord(line.to_string()))?;
    let mut letters = road.trim().chars();
    let road = match (letters.next(), letters.next()) {
        (Some(letter), None) => RoadId::from_letter(letter)?,
        (None, _) => return Err(JunctionError::InvalidRecord(line.to_string())),
        _ => return Err(JunctionError::UnknownRoad(road.trim().to_string())),
    };
    let id = VehicleId::new(id.trim())?;
    Ok((id, road))
}

/// Counts from one pass over the feed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IntakeSummary {
    pub queued: usize,
    pub rejected: usize,
    pub dropped: usize,
}

/// Feeds every record in `text` to the junction.
///
/// Malformed records are rejected here and never reach the junction; records
/// for a full lane are dropped.
pub fn ingest_lines(junction: &Junction, text: &str) -> IntakeSummary {
    let mut summary = IntakeSummary::default();
    for line in text.lines().filter(|line| !line.trim().is_empty()) {
        let (id, road) = match parse_record(line) {
            Ok(record) => record,
            Err(err) => {
                warn!("Skipping record: {}", err);
                summary.rejected += 1;
                continue;
            }
        };
        match junction.ingest(road.letter(), id.as_str()) {
            Ok(_) => summary.queued += 1,
            Err(_) => summary.dropped += 1,
        }
    }
    summary
}

/// Follows a growing feed file from a remembered byte offset.
#[derive(Debug)]
pub struct IntakeFollower {
    path: PathBuf,
    offset: usize,
}

impl IntakeFollower {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            offset: 0,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the complete lines appended since the last call.
    ///
    /// A missing file reads as empty; a file shorter than the offset is
    /// assumed to have been replaced and is read from the start.
    pub async fn read_new(&mut self) -> Result<String> {
        let mut file = match File::open(&self.path).await {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(String::new()),
            Err(err) => return Err(err.into()),
        };
        let len = file.metadata().await?.len() as usize;
        if len < self.offset {
            info!("{} was truncated, reading from the start", self.path.display());
            self.offset = 0;
        }
        if len == self.offset {
            return Ok(String::new());
        }

        file.seek(SeekFrom::Start(self.offset as u64)).await?;
        let mut fresh = Vec::with_capacity(len - self.offset);
        file.read_to_end(&mut fresh).await?;
        let complete = match fresh.iter().rposition(|&b| b == b'\n') {
            Some(last_newline) => last_newline + 1,
            None => return Ok(String::new()),
        };
        self.offset += complete;
        Ok(String::from_utf8_lossy(&fresh[..complete]).into_owned())
    }

    /// Polls the feed every `interval` until `shutdown` is set.
    pub async fn run(
        mut self,
        junction: std::sync::Arc<Junction>,
        interval: Duration,
        mut shutdown: watch::Receiver<bool>,
    ) {
        info!("Following vehicle feed {}", self.path.display());
        loop {
            match self.read_new().await {
                Ok(text) if !text.is_empty() => {
                    let summary = ingest_lines(&junction, &text);
                    debug!("Intake pass: {:?}", summary);
                }
                Ok(_) => {}
                Err(err) => warn!("Could not read {}: {}", self.path.display(), err),
            }
            tokio::select! {
                _ = sleep(interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("Vehicle intake stopped");
    }
}
