//! Runtime settings
//!
//! Built-in defaults, replaced by `LEDBOARD_*` values embedded at build time
//! (see `build.rs`), replaced in turn by an optional JSON config file named on
//! the command line. The file holds the [`BoardConfig`] fields at top level
//! plus optional `weather` and `news` sections:
//!
//! ```json
//! { "location": "Portland", "units": "metric", "news": { "country": "gb" } }
//! ```
//!
//! Font paths in `fonts` are relative to the working directory; every named
//! BDF file must exist at startup.

use std::fs;
use std::path::Path;

use ledboard_core::config::{BoardConfig, DEFAULT_LOCATION, DEFAULT_TIME_ZONE, FontConfig};
use ledboard_core::render::FontSet;
use log::info;
use serde::Deserialize;

use crate::error::DeviceError;

const BUILD_NEWS_API_KEY: Option<&str> = option_env!("LEDBOARD_NEWS_API_KEY");
const BUILD_LOCATION: Option<&str> = option_env!("LEDBOARD_LOCATION");
const BUILD_TIME_ZONE: Option<&str> = option_env!("LEDBOARD_TIME_ZONE");

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Settings {
    #[serde(flatten)]
    pub board: BoardConfig,
    pub weather: WeatherSettings,
    pub news: NewsSettings,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct WeatherSettings {
    pub endpoint: String,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            endpoint: String::from("https://wttr.in"),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct NewsSettings {
    pub endpoint: String,
    /// Two-letter country code of the edition
    pub country: String,
    pub page_size: u8,
    pub api_key: Option<String>,
}

impl Default for NewsSettings {
    fn default() -> Self {
        Self {
            endpoint: String::from("https://newsapi.org/v2/top-headlines"),
            country: String::from("us"),
            page_size: 20,
            api_key: None,
        }
    }
}

impl Settings {
    /// Parse a config file body.
    pub fn from_json(text: &str) -> Result<Self, DeviceError> {
        let mut settings: Self =
            serde_json::from_str(text).map_err(|e| DeviceError::ConfigParse(e.to_string()))?;
        settings.apply_build_env(BUILD_LOCATION, BUILD_TIME_ZONE, BUILD_NEWS_API_KEY);
        Ok(settings)
    }

    /// Fill in build-time values wherever the built-in default is still in place.
    fn apply_build_env(
        &mut self,
        location: Option<&str>,
        time_zone: Option<&str>,
        api_key: Option<&str>,
    ) {
        if let Some(location) = location
            && self.board.location == DEFAULT_LOCATION
        {
            self.board.location = location.to_owned();
        }
        if let Some(time_zone) = time_zone
            && self.board.time_zone == DEFAULT_TIME_ZONE
        {
            self.board.time_zone = time_zone.to_owned();
        }
        if self.news.api_key.is_none() {
            self.news.api_key = api_key.map(str::to_owned);
        }
    }
}

/// Load settings from `path`, or the defaults when no file is given.
pub fn load(path: Option<&Path>) -> Result<Settings, DeviceError> {
    let Some(path) = path else {
        info!("No config file given, using built-in defaults");
        return Settings::from_json("{}");
    };

    info!("Loading config from {}", path.display());
    let text = fs::read_to_string(path).map_err(|e| DeviceError::ConfigRead {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Settings::from_json(&text)
}

/// Read and parse every font named in `config` from disk.
pub fn load_fonts(config: &FontConfig) -> Result<FontSet, DeviceError> {
    FontSet::load(config, |path| fs::read(path).map_err(|e| e.to_string())).map_err(DeviceError::Font)
}
