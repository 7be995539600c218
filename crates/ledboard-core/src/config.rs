//! Board configuration
//!
//! Defaults mirror the stock build: three 64x64 panels chained into a
//! 192x64 strip, Los Angeles local time, and hourly weather and news
//! refreshes. Every field is optional when deserializing; missing fields
//! fall back to these defaults.

use alloc::string::String;
use embassy_time::Duration;
use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

use crate::sources::Units;

pub const DEFAULT_TIME_ZONE: &str = "America/Los_Angeles";
pub const DEFAULT_LOCATION: &str = "Los Angeles";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown font '{0}'")]
    UnknownFont(String),
    #[error("cannot load font {path}: {reason}")]
    FontFile { path: String, reason: String },
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BoardConfig {
    pub panel: PanelConfig,
    /// IANA time zone name used for the local clock face
    pub time_zone: String,
    /// Location string handed to the weather source
    pub location: String,
    pub units: Units,
    pub refresh: RefreshConfig,
    pub fonts: FontConfig,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            panel: PanelConfig::default(),
            time_zone: String::from(DEFAULT_TIME_ZONE),
            location: String::from(DEFAULT_LOCATION),
            units: Units::Imperial,
            refresh: RefreshConfig::default(),
            fonts: FontConfig::default(),
        }
    }
}

impl BoardConfig {
    /// Reject configurations the driver loop cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.panel.rows == 0 || self.panel.cols == 0 || self.panel.chain_length == 0 {
            return Err(ConfigError::Invalid("panel dimensions must be non-zero"));
        }
        if self.refresh.frame_period_ms == 0 {
            return Err(ConfigError::Invalid("frame period must be non-zero"));
        }
        if self.refresh.fetch_timeout_secs == 0 {
            return Err(ConfigError::Invalid("fetch timeout must be non-zero"));
        }
        if self.location.trim().is_empty() {
            return Err(ConfigError::Invalid("weather location must not be empty"));
        }
        Ok(())
    }
}

/// Physical layout of the HUB75 panel chain.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct PanelConfig {
    /// Rows of a single panel
    pub rows: u32,
    /// Columns of a single panel
    pub cols: u32,
    /// Number of panels daisy-chained horizontally
    pub chain_length: u32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            rows: 64,
            cols: 64,
            chain_length: 3,
        }
    }
}

impl PanelConfig {
    /// Width of the whole chain in pixels.
    pub const fn width(&self) -> u32 {
        self.cols * self.chain_length
    }

    /// Height of the whole chain in pixels.
    pub const fn height(&self) -> u32 {
        self.rows
    }
}

/// Refresh cadence of the remote data and the render loop.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct RefreshConfig {
    pub weather_interval_secs: u64,
    pub news_interval_secs: u64,
    /// Cooldown before a failed source is tried again
    pub retry_interval_secs: u64,
    /// Deadline for a single remote fetch
    pub fetch_timeout_secs: u64,
    pub frame_period_ms: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            weather_interval_secs: 3600,
            news_interval_secs: 3600,
            retry_interval_secs: 60,
            fetch_timeout_secs: 10,
            frame_period_ms: 50,
        }
    }
}

impl RefreshConfig {
    pub const fn weather_interval(&self) -> Duration {
        Duration::from_secs(self.weather_interval_secs)
    }

    pub const fn news_interval(&self) -> Duration {
        Duration::from_secs(self.news_interval_secs)
    }

    pub const fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_secs)
    }

    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub const fn frame_period(&self) -> Duration {
        Duration::from_millis(self.frame_period_ms)
    }
}

/// Fonts by `.bdf` path, or by the X11 name of a built-in font (`7x13`).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct FontConfig {
    pub time: String,
    pub date: String,
    /// Font for the weather line and the news ticker
    pub detail: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            time: String::from("fonts/9x15B.bdf"),
            date: String::from("fonts/7x13.bdf"),
            detail: String::from("fonts/7x13.bdf"),
        }
    }
}

impl FontConfig {
    /// The default faces, taken from the fonts compiled into the binary.
    pub fn builtin() -> Self {
        Self {
            time: String::from("9x15B"),
            date: String::from("7x13"),
            detail: String::from("7x13"),
        }
    }
}
