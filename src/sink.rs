//! Frame sinks: where finished frames go.
//!
//! The panel is a single physical device, so a sink is only ever driven from the
//! controller's render worker. A failed write is not something the ticker can
//! work around, so [`SinkError`] ends the process.

use crate::frame::Frame;
use chrono::Local;
use std::io::{self, Write};
use thiserror::Error;

/// Fatal display-side failures.
#[derive(Error, Debug)]
pub enum SinkError {
    /// Writing to a file, pipe or terminal failed
    #[error("display IO: {0}")]
    Io(#[from] io::Error),

    /// The panel's bus rejected a transfer
    #[error("display bus error: {0}")]
    Bus(String),
}

/// Anything that can show a [`Frame`].
pub trait FrameSink {
    fn show(&mut self, frame: &Frame) -> Result<(), SinkError>;
}

/// Development sink: prints each frame as ASCII art (`--stdout` mode).
pub struct TerminalSink<W: Write> {
    out: W,
}

impl TerminalSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FrameSink for TerminalSink<W> {
    fn show(&mut self, frame: &Frame) -> Result<(), SinkError> {
        let rule = "-".repeat(frame.width() as usize);
        writeln!(self.out, "{}", rule)?;
        write!(self.out, "{}", frame.to_ascii())?;
        // e.g. "7/23 8:14PM"
        writeln!(self.out, "{} {}", rule, Local::now().format("%-m/%-d %-I:%M%p"))?;
        self.out.flush()?;
        Ok(())
    }
}
