//! # Transit Ticker Application Entry Point
//!
//! Wires configuration, the frame sink, the button and the refresh timer into a
//! [`DisplayController`]. Supports production mode (SH1106 OLED + GPIO button) and
//! development mode (ASCII frames on stdout, Enter toggles direction).
//!
//! ```text
//! transit-ticker [--stdout] [--once] [--config <path>]
//! ```

// Test modules
#[cfg(test)]
mod tests;

#[cfg(all(target_os = "linux", feature = "hardware"))]
mod gpio_button;
#[cfg(all(target_os = "linux", feature = "hardware"))]
mod i2c_panel;

use anyhow::Context;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use transit_ticker_lib::{
    config::{Config, CONFIG_FILE},
    controller::{spawn_ticker, toggle_on_edge, DisplayController},
    input::{EdgeSource, StdinEdges},
    sink::{FrameSink, TerminalSink},
};

/// Command line flags
#[derive(Debug, PartialEq, Eq)]
struct Args {
    /// Render to stdout instead of the panel
    stdout: bool,
    /// Render a single frame and exit
    once: bool,
    config: PathBuf,
}

impl Args {
    fn parse<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Self> {
        let mut parsed = Args {
            stdout: false,
            once: false,
            config: PathBuf::from(CONFIG_FILE),
        };
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--stdout" => parsed.stdout = true,
                "--once" => parsed.once = true,
                "--config" => {
                    parsed.config = args
                        .next()
                        .map(PathBuf::from)
                        .context("--config needs a path")?;
                }
                other => anyhow::bail!("unknown argument: {}", other),
            }
        }
        Ok(parsed)
    }
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse(env::args().skip(1))?;
    let config = Config::load_from_path(&args.config);

    // Development mode: ASCII output, Enter acts as the button
    if args.stdout {
        if args.once {
            return show_once(&config, TerminalSink::stdout()).map(drop);
        }
        return run(&config, TerminalSink::stdout(), StdinEdges);
    }

    // Production mode: SH1106 over I2C, button on a GPIO pin
    #[cfg(all(target_os = "linux", feature = "hardware"))]
    {
        let hw = &config.hardware;
        log::info!(
            "Panel on {} @ 0x{:02X}, button on GPIO {} ({} ms debounce)",
            hw.i2c_bus,
            hw.i2c_address,
            hw.button_pin,
            hw.debounce_ms
        );

        let panel = i2c_panel::open_panel(hw)?;
        if args.once {
            return show_once(&config, panel).map(drop);
        }
        let button =
            gpio_button::GpioButton::new(hw.button_pin, Duration::from_millis(hw.debounce_ms))
                .context("set up direction button")?;
        return run(&config, panel, button);
    }

    #[cfg(not(all(target_os = "linux", feature = "hardware")))]
    {
        log::error!("Panel support not enabled. Rebuild on Linux with --features hardware.");
        log::error!("Use --stdout for development mode.");
        Err(anyhow::anyhow!("Hardware mode not supported in this build"))
    }
}

/// Render a single frame for the configured start direction.
fn show_once<S: FrameSink>(config: &Config, sink: S) -> anyhow::Result<S> {
    let mut controller = DisplayController::from_config(config, sink);
    log::info!("Showing {} once", controller.direction());
    controller.render_once().context("display write failed")?;
    Ok(controller.into_sink())
}

/// Drive `sink` until the render worker fails or the process is interrupted.
fn run<S, E>(config: &Config, sink: S, edges: E) -> anyhow::Result<()>
where
    S: FrameSink + Send + 'static,
    E: EdgeSource,
{
    let controller = DisplayController::from_config(config, sink);
    log::info!(
        "Starting on {}, refreshing every {}s",
        controller.direction(),
        config.display.refresh_interval().as_secs()
    );

    let rt = tokio::runtime::Runtime::new()?;
    let result = rt.block_on(serve(controller, edges, config.display.refresh_interval()));
    // The button thread still holds a sender, so the render worker never sees the
    // channel close; don't wait for it.
    rt.shutdown_timeout(Duration::from_millis(500));
    result
}

async fn serve<S, E>(
    controller: DisplayController<S>,
    mut edges: E,
    refresh: Duration,
) -> anyhow::Result<()>
where
    S: FrameSink + Send + 'static,
    E: EdgeSource,
{
    let (triggers, rx) = mpsc::unbounded_channel();

    edges
        .register(toggle_on_edge(triggers.clone()))
        .context("register button handler")?;
    let ticker = spawn_ticker(triggers, refresh);
    let worker = tokio::task::spawn_blocking(move || controller.run(rx));

    tokio::select! {
        result = worker => {
            ticker.abort();
            result
                .context("render worker panicked")?
                .context("display write failed")?;
            log::info!("Render worker finished");
            Ok(())
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("listen for Ctrl-C")?;
            log::info!("Interrupted, shutting down");
            Ok(())
        }
    }
}
