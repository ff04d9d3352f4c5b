//! SH1106 OLED Display Driver
//!
//! Blocking driver for 128x64 SH1106 panels over embedded-hal 1.0 I2C. The
//! controller has 132 columns of RAM; the visible 128 start at column 2.

use crate::frame::{Frame, PANEL_HEIGHT, PANEL_WIDTH};
use crate::sink::{FrameSink, SinkError};
use embedded_hal::i2c::{Error as _, I2c};

/// Default I2C address (0x3D on some modules)
pub const DEFAULT_ADDRESS: u8 = 0x3C;

const PAGES: usize = (PANEL_HEIGHT / 8) as usize;
const COLUMN_OFFSET: u8 = 2;

/// Control bytes preceding each I2C write
const CONTROL_COMMAND: u8 = 0x00;
const CONTROL_DATA: u8 = 0x40;

/// SH1106 commands
mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_LOW_COLUMN: u8 = 0x00;
    pub const SET_HIGH_COLUMN: u8 = 0x10;
    pub const SET_PAGE_ADDR: u8 = 0xB0;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_CHARGE_PUMP: u8 = 0xAD;
}

/// SH1106 OLED driver
pub struct Sh1106<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Sh1106<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Power-on sequence; leaves the panel on with RAM contents undefined
    pub fn init(&mut self) -> Result<(), SinkError> {
        let init_cmds: &[u8] = &[
            cmd::DISPLAY_OFF,
            cmd::SET_CLOCK_DIV,
            0x80, // Default clock
            cmd::SET_MUX_RATIO,
            0x3F, // 64 lines
            cmd::SET_DISPLAY_OFFSET,
            0x00,
            cmd::SET_START_LINE,
            cmd::SET_CHARGE_PUMP,
            0x8B,                  // DC-DC on
            cmd::SET_SEG_REMAP,    // Flip horizontally
            cmd::SET_COM_SCAN_DEC, // Flip vertically
            cmd::SET_COM_PINS,
            0x12, // Alternative COM config
            cmd::SET_CONTRAST,
            0xCF, // High contrast
            cmd::SET_PRECHARGE,
            0xF1,
            cmd::SET_VCOM_DETECT,
            0x40,
            cmd::SET_NORMAL,
            cmd::DISPLAY_ON,
        ];

        for &c in init_cmds {
            self.command(c)?;
        }
        log::info!("SH1106 initialised at 0x{:02X}", self.address);
        Ok(())
    }

    fn command(&mut self, byte: u8) -> Result<(), SinkError> {
        let address = self.address;
        self.i2c
            .write(address, &[CONTROL_COMMAND, byte])
            .map_err(|e| SinkError::Bus(format!("{:?}", e.kind())))
    }

    /// Push a whole frame, one page (8 pixel rows) at a time
    pub fn flush(&mut self, frame: &Frame) -> Result<(), SinkError> {
        for (page, strip) in frame.pages().iter().enumerate().take(PAGES) {
            self.command(cmd::SET_PAGE_ADDR | page as u8)?;
            self.command(cmd::SET_LOW_COLUMN | (COLUMN_OFFSET & 0x0F))?;
            self.command(cmd::SET_HIGH_COLUMN | (COLUMN_OFFSET >> 4))?;

            let mut data = [0u8; PANEL_WIDTH as usize + 1];
            data[0] = CONTROL_DATA;
            data[1..].copy_from_slice(strip);
            let address = self.address;
            self.i2c
                .write(address, &data)
                .map_err(|e| SinkError::Bus(format!("{:?}", e.kind())))?;
        }
        Ok(())
    }

    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> FrameSink for Sh1106<I2C> {
    fn show(&mut self, frame: &Frame) -> Result<(), SinkError> {
        self.flush(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Canvas;
    use embedded_hal::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource, Operation};

    #[derive(Debug)]
    struct MockError;

    impl embedded_hal::i2c::Error for MockError {
        fn kind(&self) -> ErrorKind {
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
        }
    }

    /// Records every write; optionally NACKs everything
    #[derive(Default)]
    struct MockI2c {
        writes: Vec<(u8, Vec<u8>)>,
        nack: bool,
    }

    impl ErrorType for MockI2c {
        type Error = MockError;
    }

    impl I2c for MockI2c {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.nack {
                return Err(MockError);
            }
            for op in operations {
                if let Operation::Write(bytes) = op {
                    self.writes.push((address, bytes.to_vec()));
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_init_sends_commands() {
        let mut panel = Sh1106::new(MockI2c::default(), DEFAULT_ADDRESS);
        panel.init().unwrap();
        let i2c = panel.release();

        assert!(i2c
            .writes
            .iter()
            .all(|(addr, bytes)| *addr == 0x3C && bytes.len() == 2 && bytes[0] == 0x00));
        assert_eq!(i2c.writes.first().unwrap().1[1], cmd::DISPLAY_OFF);
        assert_eq!(i2c.writes.last().unwrap().1[1], cmd::DISPLAY_ON);
    }

    #[test]
    fn test_flush_writes_eight_pages_with_offset() {
        let mut canvas = Canvas::new(PANEL_WIDTH, PANEL_HEIGHT);
        canvas.set_pixel(0, 0, true);
        let frame = Frame::centered(&canvas);

        let mut panel = Sh1106::new(MockI2c::default(), 0x3D);
        panel.show(&frame).unwrap();
        let i2c = panel.release();

        let data: Vec<_> = i2c
            .writes
            .iter()
            .filter(|(_, bytes)| bytes[0] == CONTROL_DATA)
            .collect();
        assert_eq!(data.len(), 8);
        assert!(data.iter().all(|(addr, bytes)| *addr == 0x3D && bytes.len() == 129));
        assert_eq!(data[0].1[1], 0x01);

        // page 0 addressing: B0, column low 2, column high 0
        assert_eq!(i2c.writes[0].1, vec![0x00, 0xB0]);
        assert_eq!(i2c.writes[1].1, vec![0x00, 0x02]);
        assert_eq!(i2c.writes[2].1, vec![0x00, 0x10]);
    }

    #[test]
    fn test_bus_error_is_reported() {
        let mut panel = Sh1106::new(
            MockI2c {
                nack: true,
                ..Default::default()
            },
            DEFAULT_ADDRESS,
        );
        let frame = Frame::centered(&Canvas::new(PANEL_WIDTH, PANEL_HEIGHT));
        assert!(matches!(panel.show(&frame), Err(SinkError::Bus(_))));
    }
}
