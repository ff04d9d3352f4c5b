//! Button edge sources.
//!
//! The physical button fires from a GPIO interrupt thread owned by the driver. The
//! controller never sees that thread directly: an [`EdgeSource`] is handed a
//! callback and calls it once per press, from whatever context it likes.

use std::io::{self, BufRead};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Callback invoked once per debounced press
pub type EdgeCallback = Box<dyn FnMut() + Send + 'static>;

/// Errors while wiring up an edge source.
#[derive(Error, Debug)]
pub enum InputError {
    /// GPIO line could not be claimed or configured
    #[error("GPIO setup failed: {0}")]
    Gpio(String),

    /// Background reader thread could not be started
    #[error("input thread: {0}")]
    Io(#[from] io::Error),
}

/// Something that produces button edges.
pub trait EdgeSource {
    /// Start delivering edges to `on_edge`. Edges keep arriving for as long as the
    /// source is alive.
    fn register(&mut self, on_edge: EdgeCallback) -> Result<(), InputError>;
}

/// Drops edges that follow an accepted edge within `window` (contact bounce).
#[derive(Clone, Copy, Debug)]
pub struct Debouncer {
    window: Duration,
    last: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// Whether an edge seen at `now` counts as a new press
    pub fn accept(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last {
            if now.saturating_duration_since(last) < self.window {
                return false;
            }
        }
        self.last = Some(now);
        true
    }
}

/// Development edge source: every line read from stdin counts as one press.
pub struct StdinEdges;

impl EdgeSource for StdinEdges {
    fn register(&mut self, on_edge: EdgeCallback) -> Result<(), InputError> {
        thread::Builder::new()
            .name("stdin-edges".to_string())
            .spawn(move || pump_lines(io::stdin().lock(), on_edge))?;
        Ok(())
    }
}

/// Call `on_edge` once per line until `reader` hits EOF or fails
fn pump_lines<R: BufRead>(reader: R, mut on_edge: EdgeCallback) {
    for line in reader.lines() {
        if line.is_err() {
            break;
        }
        on_edge();
    }
    log::debug!("Edge input closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_debouncer_drops_bounce() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(200));

        assert!(debouncer.accept(start));
        assert!(!debouncer.accept(start + Duration::from_millis(5)));
        assert!(!debouncer.accept(start + Duration::from_millis(199)));
        assert!(debouncer.accept(start + Duration::from_millis(200)));
        // Window restarts from the last accepted edge
        assert!(!debouncer.accept(start + Duration::from_millis(350)));
        assert!(debouncer.accept(start + Duration::from_millis(401)));
    }

    #[test]
    fn test_zero_window_accepts_everything() {
        let now = Instant::now();
        let mut debouncer = Debouncer::new(Duration::ZERO);
        assert!(debouncer.accept(now));
        assert!(debouncer.accept(now));
    }

    #[test]
    fn test_each_line_is_one_edge() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);

        pump_lines(
            io::Cursor::new("\n\nflip\n"),
            Box::new(move || {
                seen.fetch_add(1, Ordering::SeqCst);
            }),
        );

        assert_eq!(count.load(Ordering::SeqCst), 3);
    }
}
