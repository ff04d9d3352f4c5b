//! # Arrival Board Rendering
//!
//! Turns a direction, the two line badges and the two formatted countdowns into a
//! [`Frame`]. Rendering is a pure function: the same [`RenderInputs`] always give
//! the same bytes, so the layout is tested without a panel attached.
//!
//! ## Layout (working canvas, 125x64)
//!
//! ```text
//! +-------------------------------------+
//! |              DOWNTOWN               |
//! |  (1)     3 & 7 min                  |
//! | [M104]      4 min                   |
//! +-------------------------------------+
//! ```
//!
//! The canvas is narrower than the SH1106's 128 columns (the outer columns are
//! hard to see behind most bezels) and is centered into the panel buffer at the
//! end.

use crate::frame::{Canvas, Frame};
use crate::Direction;
use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Circle, PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};

/// Working canvas size
pub const CANVAS_WIDTH: u32 = 125;
pub const CANVAS_HEIGHT: u32 = 64;

// Spacing, in canvas pixels
const TOP_PADDING: i32 = 4;
const ARRIVAL_PADDING: i32 = 10;
const CIRCLE_RADIUS: i32 = 6;
const CIRCLE_LEFT: i32 = 10;
const BUS_RECT_X: i32 = 5;
const BUS_RECT_W: i32 = 30;
const BUS_RECT_H: i32 = 12;
const BUS_LEFT_PADDING: i32 = 2;
const BUS_RIGHT_PADDING: i32 = 1;
const SUBWAY_ROW_Y: i32 = TOP_PADDING + 16;
const BUS_ROW_Y: i32 = TOP_PADDING + 34;

/// Everything one frame depends on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderInputs {
    pub direction: Direction,
    /// Subway line glyph for the round badge
    pub rail_label: String,
    /// Bus route code for the square badge
    pub bus_label: String,
    pub rail_text: String,
    pub bus_text: String,
}

/// Lay out one frame.
pub fn render(inputs: &RenderInputs) -> Frame {
    let mut canvas = Canvas::new(CANVAS_WIDTH, CANVAS_HEIGHT);
    let ink = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    let knockout = MonoTextStyle::new(&FONT_6X10, BinaryColor::Off);

    // Direction heading
    let heading = inputs.direction.label();
    let heading_size = text_size(heading, ink);
    let heading_x = (CANVAS_WIDTH as i32 - heading_size.width as i32).div_euclid(2);
    draw_text(&mut canvas, heading, Point::new(heading_x, TOP_PADDING), ink);

    // Subway badge: filled circle with the line glyph knocked out of it
    let circle_center = Point::new(CIRCLE_LEFT + CIRCLE_RADIUS, SUBWAY_ROW_Y + CIRCLE_RADIUS);
    Circle::with_center(circle_center, (2 * CIRCLE_RADIUS + 1) as u32)
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(&mut canvas)
        .ok();
    let rail_label_size = text_size(&inputs.rail_label, knockout);
    draw_text(
        &mut canvas,
        &inputs.rail_label,
        center_on(circle_center, rail_label_size),
        knockout,
    );

    // Bus badge: filled rectangle, corners inclusive
    let rect_x1 = BUS_RECT_X + BUS_RECT_W;
    Rectangle::new(
        Point::new(BUS_RECT_X, BUS_ROW_Y),
        Size::new((BUS_RECT_W + 1) as u32, (BUS_RECT_H + 1) as u32),
    )
    .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
    .draw(&mut canvas)
    .ok();
    let bus_label_size = text_size(&inputs.bus_label, knockout);
    let inner_w = BUS_RECT_W - BUS_LEFT_PADDING - BUS_RIGHT_PADDING;
    let bus_label_pos = Point::new(
        BUS_RECT_X + BUS_LEFT_PADDING + (inner_w - bus_label_size.width as i32).div_euclid(2),
        BUS_ROW_Y + (BUS_RECT_H - bus_label_size.height as i32).div_euclid(2),
    );
    draw_text(&mut canvas, &inputs.bus_label, bus_label_pos, knockout);

    // Countdowns, each to the right of its own badge
    let circle_x1 = circle_center.x + CIRCLE_RADIUS;
    draw_text(
        &mut canvas,
        &inputs.rail_text,
        Point::new(circle_x1 + ARRIVAL_PADDING, SUBWAY_ROW_Y),
        ink,
    );
    draw_text(
        &mut canvas,
        &inputs.bus_text,
        Point::new(rect_x1 + ARRIVAL_PADDING, BUS_ROW_Y),
        ink,
    );

    // Border
    Rectangle::new(Point::zero(), Size::new(CANVAS_WIDTH, CANVAS_HEIGHT))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(&mut canvas)
        .ok();

    Frame::centered(&canvas)
}

/// Glyph bounding box of `text` in `style`
fn text_size(text: &str, style: MonoTextStyle<'_, BinaryColor>) -> Size {
    Text::with_baseline(text, Point::zero(), style, Baseline::Top)
        .bounding_box()
        .size
}

/// Top-left corner that puts the center of a `size` box on `anchor`
fn center_on(anchor: Point, size: Size) -> Point {
    Point::new(
        anchor.x - (size.width as i32).div_euclid(2),
        anchor.y - (size.height as i32).div_euclid(2),
    )
}

fn draw_text(canvas: &mut Canvas, text: &str, top_left: Point, style: MonoTextStyle<'_, BinaryColor>) {
    Text::with_baseline(text, top_left, style, Baseline::Top)
        .draw(canvas)
        .ok();
}
