// src/i2c_panel.rs
use anyhow::Context;
use linux_embedded_hal::I2cdev;
use transit_ticker_lib::config::HardwareConfig;
use transit_ticker_lib::sh1106::Sh1106;

/// Open the I2C character device and bring the SH1106 up.
pub fn open_panel(hw: &HardwareConfig) -> anyhow::Result<Sh1106<I2cdev>> {
    let i2c = I2cdev::new(&hw.i2c_bus).with_context(|| format!("open {}", hw.i2c_bus))?;
    let mut panel = Sh1106::new(i2c, hw.i2c_address);
    panel
        .init()
        .with_context(|| format!("initialise SH1106 at 0x{:02X}", hw.i2c_address))?;
    Ok(panel)
}
