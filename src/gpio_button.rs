// src/gpio_button.rs
use rppal::gpio::{Gpio, InputPin, Level, Trigger};
use std::time::{Duration, Instant};
use transit_ticker_lib::input::{Debouncer, EdgeCallback, EdgeSource, InputError};

/// Active-low push button on a BCM pin with the internal pull-up enabled.
///
/// The interrupt stays armed for as long as this value is alive.
pub struct GpioButton {
    pin: InputPin,
    debounce: Duration,
}

impl GpioButton {
    pub fn new(bcm_pin: u8, debounce: Duration) -> Result<Self, InputError> {
        let pin = Gpio::new()
            .map_err(|e| InputError::Gpio(e.to_string()))?
            .get(bcm_pin)
            .map_err(|e| InputError::Gpio(e.to_string()))?
            .into_input_pullup();
        Ok(Self { pin, debounce })
    }
}

impl EdgeSource for GpioButton {
    fn register(&mut self, mut on_edge: EdgeCallback) -> Result<(), InputError> {
        let mut debouncer = Debouncer::new(self.debounce);
        // Runs on rppal's interrupt thread
        self.pin
            .set_async_interrupt(Trigger::FallingEdge, move |_level: Level| {
                if debouncer.accept(Instant::now()) {
                    on_edge();
                }
            })
            .map_err(|e| InputError::Gpio(e.to_string()))
    }
}
