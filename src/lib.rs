//! # Transit Ticker Core Library
//!
//! This library provides the data types and the display pipeline for the transit
//! ticker: a 128x64 monochrome OLED on a Raspberry Pi showing the next subway and
//! bus arrivals for one direction of travel, with a push button that flips the
//! direction.
//!
//! ## Data Flow
//! 1. **Fetchers** (external cron jobs) write `subway_data.json` and `bus_data.json`
//! 2. **Snapshot loading**: [`snapshot::SnapshotLoader`] re-reads both files on every
//!    render and degrades anything missing or corrupt to "no arrivals"
//! 3. **Formatting**: [`format::format_arrivals`] turns minute counts into `"3 & 7 min"`
//! 4. **Rendering**: [`renderer::render`] lays out a [`frame::Frame`] deterministically
//! 5. **Display**: the [`controller::DisplayController`] pushes each frame into a
//!    [`sink::FrameSink`]
//!
//! ## Concurrency
//! The refresh timer and the button are both producers on a single channel. The
//! controller is the only consumer, so renders never overlap and a toggle is always
//! followed by its own render before anything else is drawn.

use serde::{Deserialize, Serialize};
use std::fmt;

// Module declarations
pub mod config;
pub mod controller;
pub mod format;
pub mod frame;
pub mod input;
pub mod renderer;
#[cfg(feature = "hardware")]
pub mod sh1106;
pub mod sink;
pub mod snapshot;

/// Direction of travel whose arrivals are on screen.
///
/// Serialized with the upper-case names used as keys in the snapshot files and
/// as values in `transit-config.toml`.
///
/// # Example
/// ```
/// use transit_ticker_lib::Direction;
///
/// let shown = Direction::Downtown;
/// assert_eq!(shown.toggled(), Direction::Uptown);
/// assert_eq!(shown.toggled().toggled(), shown);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Uptown,
    Downtown,
}

impl Direction {
    /// The other direction.
    pub fn toggled(self) -> Self {
        match self {
            Direction::Uptown => Direction::Downtown,
            Direction::Downtown => Direction::Uptown,
        }
    }

    /// Label used both as the snapshot key and as the on-screen heading.
    pub fn label(self) -> &'static str {
        match self {
            Direction::Uptown => "UPTOWN",
            Direction::Downtown => "DOWNTOWN",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One of the two upstream arrival feeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feed {
    /// Subway arrivals from the GTFS-realtime fetcher
    Rail,
    /// Bus arrivals from the SIRI stop-monitoring fetcher
    Bus,
}

impl Feed {
    /// Top-level key the fetcher writes its arrivals under.
    pub fn key(self) -> &'static str {
        match self {
            Feed::Rail => "subway",
            Feed::Bus => "bus",
        }
    }
}
