//! Remote data sources
//!
//! The board polls two remote APIs: current weather for a location and the
//! top news stories. Both are consumed through async traits so the driver
//! loop can bound every fetch with a deadline; concrete HTTP clients live in
//! the device binary.

mod news;
mod weather;

pub use news::*;
pub use weather::*;

use alloc::string::String;
use alloc::vec::Vec;
use thiserror_no_std::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("request exceeded its deadline")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("server answered with status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Current-conditions provider.
pub trait WeatherSource {
    /// Fetch the current weather for `location`.
    fn fetch(&mut self, location: &str) -> impl Future<Output = Result<Weather, FetchError>>;
}

/// Headline provider for the ticker.
pub trait NewsSource {
    /// Fetch the current top stories, most important first.
    fn fetch_top_stories(&mut self) -> impl Future<Output = Result<Vec<Headline>, FetchError>>;
}
