//! Wall-clock access and the time/date lines
//!
//! The clock face alternates between UTC and local time every ten seconds:
//! when the tens digit of the current second is even (0, 2, 4) UTC is shown,
//! otherwise local time. The full cycle repeats every twenty seconds.

use core::fmt::Display;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use embassy_time::Instant;
use embedded_graphics::pixelcolor::Rgb888;

use crate::colors;
use crate::text::bounded_line;

pub const TIME_LINE_CAPACITY: usize = 32;
pub const DATE_LINE_CAPACITY: usize = 40;

pub type TimeLine = heapless::String<TIME_LINE_CAPACITY>;
pub type DateLine = heapless::String<DATE_LINE_CAPACITY>;

/// Source of wall-clock and monotonic time for the board.
pub trait Clock {
    /// Zone of the local clock face
    type Zone: TimeZone<Offset: Display>;

    fn now_utc(&self) -> DateTime<Utc>;

    fn zone(&self) -> &Self::Zone;

    /// Monotonic instant used for staleness bookkeeping.
    fn instant(&self) -> Instant;
}

/// Which clock the time field currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockFace {
    Utc,
    Local,
}

impl ClockFace {
    /// Pick the face for a second-of-minute (0..=59).
    pub const fn for_second(second_of_minute: u32) -> Self {
        if (second_of_minute / 10) % 2 == 0 {
            Self::Utc
        } else {
            Self::Local
        }
    }

    pub const fn color(self) -> Rgb888 {
        match self {
            Self::Utc => colors::UTC_TIME,
            Self::Local => colors::LOCAL_TIME,
        }
    }
}

/// Date line, e.g. `Friday October 16, 2026`.
pub fn format_date(today: NaiveDate) -> DateLine {
    bounded_line(format_args!("{}", today.format("%A %B %d, %Y")))
}

/// Time line and its color for the given second-of-minute.
///
/// Output is `HH:MM:SS:ZONE` of whichever clock [`ClockFace::for_second`]
/// selects.
pub fn format_time_alternating<Tz>(
    now_utc: &DateTime<Utc>,
    now_local: &DateTime<Tz>,
    second_of_minute: u32,
) -> (Rgb888, TimeLine)
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let face = ClockFace::for_second(second_of_minute);
    let line = match face {
        ClockFace::Utc => bounded_line(format_args!("{}", now_utc.format("%H:%M:%S:%Z"))),
        ClockFace::Local => bounded_line(format_args!("{}", now_local.format("%H:%M:%S:%Z"))),
    };
    (face.color(), line)
}
