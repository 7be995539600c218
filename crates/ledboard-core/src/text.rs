//! Bounded display lines

use core::fmt::{self, Write};
use heapless::String;
use log::warn;

/// Format `args` into a fixed-capacity line.
///
/// A line that does not fit keeps whatever was written before the overflow;
/// the panel clips long lines anyway.
pub(crate) fn bounded_line<const N: usize>(args: fmt::Arguments<'_>) -> String<N> {
    let mut line = String::new();
    if line.write_fmt(args).is_err() {
        warn!("Display line truncated to {} bytes", N);
    }
    line
}
