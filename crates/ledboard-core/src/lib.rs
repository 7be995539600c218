//! Hardware-independent core library for ledboard
//!
//! This crate contains the platform-agnostic logic of the LED matrix clock:
//! time/date/weather formatting, staleness-gated refresh of remote data,
//! the news ticker scroll position, frame composition, and the driver loop.
//!
//! It is `#![no_std]` with `extern crate alloc` so it compiles on embedded
//! targets as well as desktop hosts (for the simulator and tests). Hardware
//! panels, clocks and HTTP clients plug in through the [`panel::MatrixPanel`],
//! [`clock::Clock`], [`sources::WeatherSource`] and [`sources::NewsSource`]
//! traits.

#![no_std]

extern crate alloc;

pub mod board;
pub mod clock;
pub mod colors;
pub mod config;
pub mod framebuffer;
pub mod panel;
pub mod refresh;
pub mod render;
pub mod scroll;
pub mod sources;
mod text;
