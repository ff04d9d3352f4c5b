//! Monochrome pixel buffers.
//!
//! [`Canvas`] is the mutable drawing surface handed to embedded-graphics. [`Frame`]
//! is the finished, read-only 128x64 image that goes to the panel. Both pack
//! pixels row-major, 8 horizontal pixels per byte, MSB first.

use core::convert::Infallible;
use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};

/// Physical panel dimensions (SH1106 128x64)
pub const PANEL_WIDTH: u32 = 128;
pub const PANEL_HEIGHT: u32 = 64;

/// Mutable 1-bit drawing surface
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    bits: Vec<u8>,
}

impl Canvas {
    /// New canvas with every pixel off
    pub fn new(width: u32, height: u32) -> Self {
        let bytes_per_row = width.div_ceil(8);
        Self {
            width,
            height,
            bits: vec![0x00; (bytes_per_row * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Set one pixel; out-of-bounds writes are ignored
    pub fn set_pixel(&mut self, x: u32, y: u32, on: bool) {
        if x >= self.width || y >= self.height {
            return;
        }

        let (index, mask) = bit_position(self.width, x, y);
        if on {
            self.bits[index] |= mask;
        } else {
            self.bits[index] &= !mask;
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let (index, mask) = bit_position(self.width, x, y);
        self.bits[index] & mask != 0
    }

    /// Copy `src` onto this canvas with its top-left corner at (`x`, `y`).
    /// Pixels falling outside are clipped.
    pub fn paste(&mut self, src: &Canvas, x: u32, y: u32) {
        for sy in 0..src.height {
            for sx in 0..src.width {
                self.set_pixel(x + sx, y + sy, src.pixel(sx, sy));
            }
        }
    }
}

fn bit_position(width: u32, x: u32, y: u32) -> (usize, u8) {
    let bytes_per_row = width.div_ceil(8);
    let index = (y * bytes_per_row + x / 8) as usize;
    (index, 0x80 >> (x % 8))
}

impl DrawTarget for Canvas {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            if x < 0 || y < 0 {
                continue;
            }
            self.set_pixel(x as u32, y as u32, color.is_on());
        }
        Ok(())
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// A finished panel image. Immutable; compare with `==` for byte equality.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    panel: Canvas,
}

impl Frame {
    /// Paste a working canvas into the middle of an otherwise blank panel buffer.
    ///
    /// The horizontal inset is `(PANEL_WIDTH - canvas width) / 2`; the canvas is
    /// placed at the top edge.
    pub fn centered(canvas: &Canvas) -> Self {
        let mut panel = Canvas::new(PANEL_WIDTH, PANEL_HEIGHT);
        let inset = PANEL_WIDTH.saturating_sub(canvas.width()) / 2;
        panel.paste(canvas, inset, 0);
        Self { panel }
    }

    pub fn width(&self) -> u32 {
        self.panel.width
    }

    pub fn height(&self) -> u32 {
        self.panel.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> bool {
        self.panel.pixel(x, y)
    }

    /// Packed row-major bits, 16 bytes per row
    pub fn as_bytes(&self) -> &[u8] {
        &self.panel.bits
    }

    /// Number of lit pixels
    pub fn lit_pixels(&self) -> u32 {
        self.panel.bits.iter().map(|b| b.count_ones()).sum()
    }

    /// Column-major page layout used by SH1106/SSD1306 controllers: 8 pages of
    /// 128 bytes, each byte a vertical strip of 8 pixels with bit 0 on top.
    pub fn pages(&self) -> Vec<[u8; PANEL_WIDTH as usize]> {
        (0..self.height() / 8)
            .map(|page| {
                let mut strip = [0u8; PANEL_WIDTH as usize];
                for (x, byte) in strip.iter_mut().enumerate() {
                    for bit in 0..8 {
                        if self.pixel(x as u32, page * 8 + bit) {
                            *byte |= 1 << bit;
                        }
                    }
                }
                strip
            })
            .collect()
    }

    /// Render as text, one line per pixel row (`#` on, space off)
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(((self.width() + 1) * self.height()) as usize);
        for y in 0..self.height() {
            for x in 0..self.width() {
                out.push(if self.pixel(x, y) { '#' } else { ' ' });
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    #[test]
    fn test_set_and_read_pixel() {
        let mut canvas = Canvas::new(125, 64);
        canvas.set_pixel(0, 0, true);
        canvas.set_pixel(124, 63, true);
        canvas.set_pixel(125, 0, true); // out of bounds, ignored

        assert!(canvas.pixel(0, 0));
        assert!(canvas.pixel(124, 63));
        assert!(!canvas.pixel(1, 0));

        canvas.set_pixel(0, 0, false);
        assert!(!canvas.pixel(0, 0));
    }

    #[test]
    fn test_draw_target_clips_negative_coordinates() {
        let mut canvas = Canvas::new(8, 8);
        Rectangle::new(Point::new(-2, -2), Size::new(4, 4))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut canvas)
            .ok();

        assert!(canvas.pixel(0, 0));
        assert!(canvas.pixel(1, 1));
        assert!(!canvas.pixel(2, 2));
    }

    #[test]
    fn test_centered_frame_inset() {
        let mut canvas = Canvas::new(125, 64);
        canvas.set_pixel(0, 0, true);
        canvas.set_pixel(124, 10, true);

        let frame = Frame::centered(&canvas);
        assert_eq!((frame.width(), frame.height()), (PANEL_WIDTH, PANEL_HEIGHT));
        assert!(!frame.pixel(0, 0));
        assert!(frame.pixel(1, 0));
        assert!(frame.pixel(125, 10));
        assert_eq!(frame.lit_pixels(), 2);
        assert_eq!(frame.as_bytes().len(), 16 * 64);
    }

    #[test]
    fn test_pages_layout() {
        let mut canvas = Canvas::new(PANEL_WIDTH, PANEL_HEIGHT);
        canvas.set_pixel(3, 0, true);
        canvas.set_pixel(3, 7, true);
        canvas.set_pixel(127, 63, true);

        let pages = Frame::centered(&canvas).pages();
        assert_eq!(pages.len(), 8);
        assert_eq!(pages[0][3], 0b1000_0001);
        assert_eq!(pages[7][127], 0b1000_0000);
        assert_eq!(pages[1][3], 0);
    }

    #[test]
    fn test_ascii_dump() {
        let mut canvas = Canvas::new(PANEL_WIDTH, PANEL_HEIGHT);
        canvas.set_pixel(0, 0, true);
        let ascii = Frame::centered(&canvas).to_ascii();
        let first = ascii.lines().next().unwrap();
        assert_eq!(first.len(), 128);
        assert!(first.starts_with('#'));
        assert_eq!(ascii.lines().count(), 64);
    }
}
