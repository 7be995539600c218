//! Field colors
//!
//! HUB75 panels take 8 bits per channel, so everything here is `Rgb888`.
//! Saturated primaries read best at a distance on an LED matrix.

use embedded_graphics::pixelcolor::Rgb888;

/// Clock face while showing UTC
pub const UTC_TIME: Rgb888 = Rgb888::new(0, 0, 255);

/// Clock face while showing local time
pub const LOCAL_TIME: Rgb888 = Rgb888::new(255, 0, 0);

pub const DATE: Rgb888 = Rgb888::new(0, 255, 0);

pub const WEATHER: Rgb888 = Rgb888::new(0, 255, 255);

/// News ticker - yellow
pub const TICKER: Rgb888 = Rgb888::new(255, 255, 0);

pub const BACKGROUND: Rgb888 = Rgb888::new(0, 0, 0);
