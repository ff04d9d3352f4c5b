//! # Display Controller
//!
//! Owns the selected [`Direction`] and turns triggers into frames.
//!
//! ## Triggers
//! - [`Trigger::Tick`]: the refresh timer fired; redraw the current direction
//! - [`Trigger::Toggle`]: the button was pressed; flip direction, then redraw
//!
//! Both producers (a tokio interval task and the button's interrupt thread) post
//! onto one unbounded channel. [`DisplayController::run`] is the only consumer and
//! the only code that touches the sink, so:
//! - renders never overlap
//! - a toggle and its render happen back to back, with no other render between
//! - a slow panel write never blocks the button thread, which only enqueues
//!
//! Every edge is processed on its own; two quick presses give two renders and end
//! on the starting direction.

use crate::config::Config;
use crate::format::format_arrivals;
use crate::input::EdgeCallback;
use crate::renderer::{render, RenderInputs};
use crate::sink::{FrameSink, SinkError};
use crate::snapshot::SnapshotLoader;
use crate::Direction;
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// A request for one render
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    Tick,
    Toggle,
}

/// The controller's only mutable state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayState {
    current: Direction,
}

impl DisplayState {
    pub fn new(initial: Direction) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> Direction {
        self.current
    }

    /// Flip direction and return the new one
    pub fn toggle(&mut self) -> Direction {
        self.current = self.current.toggled();
        self.current
    }
}

/// Static badge text, from configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineLabels {
    pub subway: String,
    pub bus: String,
}

pub struct DisplayController<S: FrameSink> {
    state: DisplayState,
    loader: SnapshotLoader,
    labels: LineLabels,
    sink: S,
}

impl<S: FrameSink> DisplayController<S> {
    pub fn new(initial: Direction, loader: SnapshotLoader, labels: LineLabels, sink: S) -> Self {
        Self {
            state: DisplayState::new(initial),
            loader,
            labels,
            sink,
        }
    }

    pub fn from_config(config: &Config, sink: S) -> Self {
        Self::new(
            config.display.default_direction,
            SnapshotLoader::from_config(&config.feeds),
            LineLabels {
                subway: config.display.subway_line.clone(),
                bus: config.display.bus_line.clone(),
            },
            sink,
        )
    }

    pub fn direction(&self) -> Direction {
        self.state.current()
    }

    /// Load and format both feeds for the current direction
    pub fn render_inputs(&self) -> RenderInputs {
        let direction = self.state.current();
        let (rail, bus) = self.loader.arrivals(direction);
        RenderInputs {
            direction,
            rail_label: self.labels.subway.clone(),
            bus_label: self.labels.bus.clone(),
            rail_text: format_arrivals(&rail),
            bus_text: format_arrivals(&bus),
        }
    }

    /// Draw the current direction once
    pub fn render_once(&mut self) -> Result<(), SinkError> {
        let inputs = self.render_inputs();
        log::debug!(
            "Rendering {}: rail {:?}, bus {:?}",
            inputs.direction,
            inputs.rail_text,
            inputs.bus_text
        );
        let frame = render(&inputs);
        self.sink.show(&frame)
    }

    /// Apply one trigger and render. Returns the direction that was drawn.
    pub fn handle(&mut self, trigger: Trigger) -> Result<Direction, SinkError> {
        if trigger == Trigger::Toggle {
            let direction = self.state.toggle();
            log::info!("Button pressed, showing {}", direction);
        }
        self.render_once()?;
        Ok(self.state.current())
    }

    /// Consume triggers until every sender is gone or the sink fails.
    ///
    /// Blocks the calling thread; run it on a dedicated thread or through
    /// `tokio::task::spawn_blocking`.
    pub fn run(mut self, mut triggers: UnboundedReceiver<Trigger>) -> Result<S, SinkError> {
        while let Some(trigger) = triggers.blocking_recv() {
            self.handle(trigger)?;
        }
        log::debug!("All trigger sources closed, render worker exiting");
        Ok(self.sink)
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

/// Post a [`Trigger::Tick`] every `period`, starting immediately.
///
/// Must be called from inside a tokio runtime. Ends once the receiver is dropped.
pub fn spawn_ticker(triggers: UnboundedSender<Trigger>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if triggers.send(Trigger::Tick).is_err() {
                break;
            }
        }
    })
}

/// Button callback that posts a [`Trigger::Toggle`] per edge
pub fn toggle_on_edge(triggers: UnboundedSender<Trigger>) -> EdgeCallback {
    Box::new(move || {
        if triggers.send(Trigger::Toggle).is_err() {
            log::debug!("Button press after render worker exited");
        }
    })
}
