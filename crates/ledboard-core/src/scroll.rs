//! Horizontal scroll position of the news ticker
//!
//! The ticker enters at the right edge of the panel, moves one pixel left per
//! frame, and restarts at the right edge once its last column has left the
//! panel. For a `text_width`-pixel line on a `panel_width`-pixel panel the
//! offsets run from `panel_width` down to `-text_width`, so one pass lasts
//! `panel_width + text_width + 1` frames.

/// Next ticker offset after one frame.
pub fn advance(offset: i32, text_width: u32, panel_width: u32) -> i32 {
    let next = offset - 1;
    if next + (text_width as i32) < 0 {
        panel_width as i32
    } else {
        next
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollOffset {
    offset: i32,
    panel_width: u32,
}

impl ScrollOffset {
    /// Start just off the right edge of the panel.
    pub const fn new(panel_width: u32) -> Self {
        Self {
            offset: panel_width as i32,
            panel_width,
        }
    }

    /// Current x coordinate of the ticker's first column.
    pub const fn get(&self) -> i32 {
        self.offset
    }

    /// Advance one frame for a ticker `text_width` pixels wide.
    pub fn advance(&mut self, text_width: u32) -> i32 {
        self.offset = advance(self.offset, text_width, self.panel_width);
        self.offset
    }
}
