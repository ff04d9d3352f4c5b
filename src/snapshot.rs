//! # Arrival Snapshot Loading
//!
//! The two fetchers (GTFS-realtime for the subway, SIRI stop-monitoring for the bus)
//! run on their own schedule and drop a small JSON document next to the binary:
//!
//! ```json
//! { "timestamp": 1718550000, "subway": { "UPTOWN": [2, 9, 14], "DOWNTOWN": [5] } }
//! { "timestamp": 1718550012, "bus":    { "UPTOWN": [4],        "DOWNTOWN": [] } }
//! ```
//!
//! ## Error Handling
//!
//! Nothing in here is allowed to take the display down. A missing file, a file the
//! fetcher is halfway through rewriting, or a document with an unexpected shape all
//! collapse to "no arrivals" for that feed, which the panel shows as `--`. The
//! [`SnapshotError`] values only exist so the reason can be logged.
//!
//! ## Caching
//!
//! None. Every render re-reads both files so a fresh fetch shows up on the next
//! timer tick or button press.

use crate::{config::FeedConfig, Direction, Feed};
use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::{fs, io};
use thiserror::Error;

/// Reasons a snapshot could not be used. Always absorbed by [`SnapshotLoader`].
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// File missing or unreadable
    #[error("snapshot IO: {0}")]
    Io(#[from] io::Error),

    /// Not JSON, or a field had the wrong type
    #[error("snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Valid JSON without the feed's top-level object
    #[error("snapshot has no \"{0}\" section")]
    MissingFeed(&'static str),
}

/// Point-in-time arrivals for one feed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArrivalSnapshot {
    /// Capture time in seconds since the epoch, when the fetcher recorded one
    pub timestamp: Option<i64>,
    /// Minutes until arrival, per direction, in file order
    pub arrivals: HashMap<Direction, Vec<i64>>,
}

impl ArrivalSnapshot {
    /// Parse a snapshot document for `feed`.
    ///
    /// Directions whose value is not a list of integers are left out rather than
    /// failing the whole snapshot, so a bad `DOWNTOWN` list does not hide `UPTOWN`.
    pub fn parse(bytes: &[u8], feed: Feed) -> Result<Self, SnapshotError> {
        let doc: Value = serde_json::from_slice(bytes)?;

        let section = doc
            .get(feed.key())
            .and_then(Value::as_object)
            .ok_or(SnapshotError::MissingFeed(feed.key()))?;

        let mut arrivals = HashMap::new();
        for direction in [Direction::Uptown, Direction::Downtown] {
            let Some(raw) = section.get(direction.label()) else {
                continue;
            };
            match serde_json::from_value::<Vec<i64>>(raw.clone()) {
                Ok(minutes) => {
                    arrivals.insert(direction, minutes);
                }
                Err(e) => {
                    log::warn!("Ignoring malformed {} {} list: {}", feed.key(), direction, e);
                }
            }
        }

        Ok(ArrivalSnapshot {
            timestamp: doc.get("timestamp").and_then(Value::as_i64),
            arrivals,
        })
    }

    /// Read and parse a snapshot file.
    pub fn load<P: AsRef<Path>>(path: P, feed: Feed) -> Result<Self, SnapshotError> {
        let data = fs::read(path)?;
        Self::parse(&data, feed)
    }

    /// Arrivals for `direction`, empty when the fetcher wrote none.
    pub fn for_direction(&self, direction: Direction) -> Vec<i64> {
        self.arrivals.get(&direction).cloned().unwrap_or_default()
    }

    /// Seconds between capture and `now`, if the snapshot carries a usable timestamp.
    ///
    /// `None` when the timestamp is absent or too far from `now` to subtract.
    pub fn age_secs(&self, now: i64) -> Option<i64> {
        self.timestamp.and_then(|ts| now.checked_sub(ts))
    }

    /// Older than `max_age_secs` at `now`. Snapshots from the future are never stale.
    pub fn is_stale(&self, now: i64, max_age_secs: u64) -> bool {
        match self.age_secs(now) {
            Some(age) if age > 0 => age as u64 > max_age_secs,
            _ => false,
        }
    }
}

/// Best-effort arrivals for one feed and direction.
///
/// Never fails: anything that goes wrong yields an empty list.
pub fn read_arrivals<P: AsRef<Path>>(path: P, feed: Feed, direction: Direction) -> Vec<i64> {
    read_snapshot(path.as_ref(), feed)
        .map(|snapshot| snapshot.for_direction(direction))
        .unwrap_or_default()
}

fn read_snapshot(path: &Path, feed: Feed) -> Option<ArrivalSnapshot> {
    match ArrivalSnapshot::load(path, feed) {
        Ok(snapshot) => Some(snapshot),
        Err(SnapshotError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("No {} snapshot at {}", feed.key(), path.display());
            None
        }
        Err(e) => {
            log::warn!(
                "Unusable {} snapshot {}: {}",
                feed.key(),
                path.display(),
                e
            );
            None
        }
    }
}

/// Reads the rail and bus snapshots for the controller.
#[derive(Clone, Debug)]
pub struct SnapshotLoader {
    subway_file: PathBuf,
    bus_file: PathBuf,
    stale_after_secs: u64,
}

impl SnapshotLoader {
    pub fn new(subway_file: impl Into<PathBuf>, bus_file: impl Into<PathBuf>) -> Self {
        Self {
            subway_file: subway_file.into(),
            bus_file: bus_file.into(),
            stale_after_secs: u64::MAX,
        }
    }

    pub fn from_config(feeds: &FeedConfig) -> Self {
        Self {
            subway_file: feeds.subway_file.clone(),
            bus_file: feeds.bus_file.clone(),
            stale_after_secs: feeds.stale_after_secs,
        }
    }

    /// `(rail, bus)` arrivals for `direction`, read fresh from disk.
    pub fn arrivals(&self, direction: Direction) -> (Vec<i64>, Vec<i64>) {
        (
            self.feed_arrivals(&self.subway_file, Feed::Rail, direction),
            self.feed_arrivals(&self.bus_file, Feed::Bus, direction),
        )
    }

    fn feed_arrivals(&self, path: &Path, feed: Feed, direction: Direction) -> Vec<i64> {
        let Some(snapshot) = read_snapshot(path, feed) else {
            return Vec::new();
        };

        let now = Utc::now().timestamp();
        if snapshot.is_stale(now, self.stale_after_secs) {
            log::warn!(
                "{} snapshot is {}s old (fetcher stalled?)",
                feed.key(),
                snapshot.age_secs(now).unwrap_or_default()
            );
        }

        snapshot.for_direction(direction)
    }
}
