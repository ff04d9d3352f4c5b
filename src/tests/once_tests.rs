//! Single-shot mode of the ticker binary.

use crate::show_once;
use std::fs;
use tempfile::TempDir;
use transit_ticker_lib::{
    config::Config,
    frame::Frame,
    renderer::{render, RenderInputs},
    sink::{FrameSink, SinkError},
    Direction,
};

#[derive(Default)]
struct CollectingSink {
    frames: Vec<Frame>,
}

impl FrameSink for CollectingSink {
    fn show(&mut self, frame: &Frame) -> Result<(), SinkError> {
        self.frames.push(frame.clone());
        Ok(())
    }
}

struct UnpluggedSink;

impl FrameSink for UnpluggedSink {
    fn show(&mut self, _frame: &Frame) -> Result<(), SinkError> {
        Err(SinkError::Bus("NoAcknowledge(Address)".to_string()))
    }
}

#[test]
fn once_renders_exactly_one_frame_for_start_direction() {
    let dir = TempDir::new().unwrap();
    let bus = dir.path().join("bus_data.json");
    fs::write(&bus, r#"{"bus":{"UPTOWN":[2,9],"DOWNTOWN":[5]}}"#).unwrap();

    let mut config = Config::default();
    config.feeds.subway_file = dir.path().join("subway_data.json");
    config.feeds.bus_file = bus;
    config.display.default_direction = Direction::Uptown;

    let sink = show_once(&config, CollectingSink::default()).unwrap();

    let expected = render(&RenderInputs {
        direction: Direction::Uptown,
        rail_label: "1".to_string(),
        bus_label: "M104".to_string(),
        rail_text: "--".to_string(),
        bus_text: "2 & 9 min".to_string(),
    });
    assert_eq!(sink.frames, vec![expected]);
}

#[test]
fn once_reports_display_failure() {
    let err = show_once(&Config::default(), UnpluggedSink).err().unwrap();
    assert!(err.to_string().contains("display write failed"));
}
