//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the transit-config.toml
//! file. It provides a centralized way to configure the snapshot file locations, the
//! line badges, the refresh cadence and the GPIO/I2C wiring.

use crate::Direction;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default configuration file, relative to the working directory
pub const CONFIG_FILE: &str = "transit-config.toml";

/// Application configuration loaded from transit-config.toml
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Snapshot files written by the fetchers
    pub feeds: FeedConfig,
    /// Display and UI configuration
    pub display: DisplayConfig,
    /// Panel and button wiring
    pub hardware: HardwareConfig,
}

/// Snapshot file locations
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Rail snapshot written by the GTFS-realtime fetcher
    pub subway_file: PathBuf,
    /// Bus snapshot written by the stop-monitoring fetcher
    pub bus_file: PathBuf,
    /// Snapshots older than this are still shown but logged as stale
    pub stale_after_secs: u64,
}

/// Display and interaction configuration
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Glyph drawn inside the round subway badge (e.g. "1")
    pub subway_line: String,
    /// Route code drawn inside the square bus badge (e.g. "M104")
    pub bus_line: String,
    /// Seconds between timer-driven redraws
    pub refresh_secs: u64,
    /// Direction shown after boot
    pub default_direction: Direction,
}

/// GPIO and I2C wiring for the `hardware` feature
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct HardwareConfig {
    /// I2C character device the panel hangs off
    pub i2c_bus: String,
    /// 7-bit I2C address of the SH1106 (0x3C or 0x3D)
    pub i2c_address: u8,
    /// BCM pin number of the direction button
    pub button_pin: u8,
    /// Edges closer together than this are treated as contact bounce
    pub debounce_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            subway_file: PathBuf::from("subway_data.json"),
            bus_file: PathBuf::from("bus_data.json"),
            stale_after_secs: 300,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            subway_line: "1".to_string(),
            bus_line: "M104".to_string(),
            refresh_secs: 30,
            default_direction: Direction::Downtown,
        }
    }
}

impl Default for HardwareConfig {
    fn default() -> Self {
        HardwareConfig {
            i2c_bus: "/dev/i2c-1".to_string(),
            i2c_address: 0x3C,
            button_pin: 26,
            debounce_ms: 200,
        }
    }
}

impl DisplayConfig {
    /// Timer period, never shorter than one second
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_secs.max(1))
    }
}

impl Config {
    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    log::info!(
                        "Loaded configuration from {} (lines {} / {})",
                        path.display(),
                        config.display.subway_line,
                        config.display.bus_line
                    );
                    config
                }
                Err(e) => {
                    log::warn!("Invalid config file format in {}: {}", path.display(), e);
                    log::warn!("Using default configuration");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!(
                    "No config file at {}, using default configuration",
                    path.display()
                );
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.feeds.subway_file, PathBuf::from("subway_data.json"));
        assert_eq!(config.feeds.bus_file, PathBuf::from("bus_data.json"));
        assert_eq!(config.display.subway_line, "1");
        assert_eq!(config.display.bus_line, "M104");
        assert_eq!(config.display.refresh_secs, 30);
        assert_eq!(config.display.default_direction, Direction::Downtown);
        assert_eq!(config.hardware.i2c_address, 0x3C);
        assert_eq!(config.hardware.button_pin, 26);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("default_direction = \"DOWNTOWN\""));
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.display.bus_line, parsed.display.bus_line);
        assert_eq!(config.feeds.bus_file, parsed.feeds.bus_file);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[display]\nbus_line = \"M5\"\ndefault_direction = \"UPTOWN\""
        )
        .unwrap();

        let config = Config::load_from_path(file.path());
        assert_eq!(config.display.bus_line, "M5");
        assert_eq!(config.display.default_direction, Direction::Uptown);
        assert_eq!(config.display.subway_line, "1");
        assert_eq!(config.hardware.debounce_ms, 200);
    }

    #[test]
    fn test_invalid_config_falls_back() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[display]\ndefault_direction = \"SIDEWAYS\"").unwrap();

        let config = Config::load_from_path(file.path());
        assert_eq!(config.display.default_direction, Direction::Downtown);
    }

    #[test]
    fn test_example_config_parses() {
        let config: Config =
            toml::from_str(include_str!("../transit-config.example.toml")).unwrap();
        assert_eq!(config.hardware.i2c_address, 0x3C);
        assert_eq!(config.display.default_direction, Direction::Downtown);
        assert_eq!(config.feeds.stale_after_secs, 300);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let config = Config::load_from_path("/nonexistent/path");
        // Should fallback to default
        assert_eq!(config.display.bus_line, "M104");
    }

    #[test]
    fn test_refresh_interval_is_clamped() {
        let mut display = DisplayConfig::default();
        assert_eq!(display.refresh_interval(), Duration::from_secs(30));
        display.refresh_secs = 0;
        assert_eq!(display.refresh_interval(), Duration::from_secs(1));
    }
}
