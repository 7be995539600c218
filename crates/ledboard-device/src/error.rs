use ledboard_core::config::ConfigError;
use thiserror_no_std::Error;

/// Startup and fatal runtime errors of the device binary.
#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("cannot read config file {path}: {reason}")]
    ConfigRead { path: String, reason: String },
    #[error("invalid config file: {0}")]
    ConfigParse(String),
    #[error("unknown time zone '{0}'")]
    TimeZone(String),
    #[error(
        "no NewsAPI key: set LEDBOARD_NEWS_API_KEY in .env before building, \
         or news.api_key in the config file"
    )]
    MissingNewsKey,
    #[error("{0}")]
    Font(ConfigError),
    #[error("panel error: {0}")]
    Panel(String),
    #[error("{0}")]
    Board(String),
}
