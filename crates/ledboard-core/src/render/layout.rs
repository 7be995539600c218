use embedded_graphics::prelude::*;

use super::fonts::FontSet;

/// Left margin of the static fields, in pixels.
const MARGIN_X: i32 = 1;

/// Top-left corners of each field.
///
/// Fields are stacked top to bottom (time, date, weather, ticker) and any
/// rows the fonts leave unused are spread evenly between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub time: Point,
    pub date: Point,
    pub weather: Point,
    /// Top row of the ticker; its x comes from the scroll offset.
    pub ticker_y: i32,
}

impl Layout {
    pub fn stack(fonts: &FontSet, panel_height: u32) -> Self {
        let heights = [
            fonts.time.line_height(),
            fonts.date.line_height(),
            fonts.detail.line_height(),
            fonts.detail.line_height(),
        ];
        let used: u32 = heights.iter().sum();
        let gap = panel_height.saturating_sub(used) / (heights.len() as u32 - 1);

        let mut tops = [0_i32; 4];
        let mut y = 0_u32;
        for (top, height) in tops.iter_mut().zip(heights) {
            *top = y as i32;
            y += height + gap;
        }

        Self {
            time: Point::new(MARGIN_X, tops[0]),
            date: Point::new(MARGIN_X, tops[1]),
            weather: Point::new(MARGIN_X, tops[2]),
            ticker_y: tops[3],
        }
    }
}
