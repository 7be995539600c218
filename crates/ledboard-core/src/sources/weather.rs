use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::text::bounded_line;

/// Longest weather line the renderer will hold.
pub const WEATHER_LINE_CAPACITY: usize = 48;

pub type WeatherLine = heapless::String<WEATHER_LINE_CAPACITY>;

/// Measurement system for temperature and wind speed
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// °F and mph
    #[default]
    Imperial,
    /// °C and km/h
    Metric,
}

impl Units {
    pub const fn temperature_suffix(self) -> &'static str {
        match self {
            Self::Imperial => "°F",
            Self::Metric => "°C",
        }
    }

    pub const fn speed_suffix(self) -> &'static str {
        match self {
            Self::Imperial => "mph",
            Self::Metric => "km/h",
        }
    }
}

/// Current conditions as reported by the weather source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Weather {
    pub temperature: i16,
    pub wind_direction: CompassPoint,
    pub wind_speed: u16,
    pub kind: WeatherKind,
    /// Units `temperature` and `wind_speed` are expressed in
    pub units: Units,
}

/// Sixteen-point compass rose used for wind direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompassPoint {
    N,
    NNE,
    NE,
    ENE,
    E,
    ESE,
    SE,
    SSE,
    S,
    SSW,
    SW,
    WSW,
    W,
    WNW,
    NW,
    NNW,
}

impl CompassPoint {
    pub const ALL: [Self; 16] = [
        Self::N,
        Self::NNE,
        Self::NE,
        Self::ENE,
        Self::E,
        Self::ESE,
        Self::SE,
        Self::SSE,
        Self::S,
        Self::SSW,
        Self::SW,
        Self::WSW,
        Self::W,
        Self::WNW,
        Self::NW,
        Self::NNW,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::N => "N",
            Self::NNE => "NNE",
            Self::NE => "NE",
            Self::ENE => "ENE",
            Self::E => "E",
            Self::ESE => "ESE",
            Self::SE => "SE",
            Self::SSE => "SSE",
            Self::S => "S",
            Self::SSW => "SSW",
            Self::SW => "SW",
            Self::WSW => "WSW",
            Self::W => "W",
            Self::WNW => "WNW",
            Self::NW => "NW",
            Self::NNW => "NNW",
        }
    }

    /// Nearest compass point for a bearing in degrees (0 = north, clockwise).
    pub fn from_degrees(degrees: u16) -> Self {
        // 22.5° sectors centred on each point; work in tenths to stay integral.
        let tenths = (degrees % 360) as u32 * 10;
        let index = ((tenths + 112) / 225) % 16;
        Self::ALL[index as usize]
    }
}

impl FromStr for CompassPoint {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

/// Broad sky condition, following the World Weather Online condition codes
/// that wttr.in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherKind {
    Sunny,
    PartlyCloudy,
    Cloudy,
    VeryCloudy,
    Fog,
    LightShowers,
    LightSleetShowers,
    LightSleet,
    ThunderyShowers,
    LightSnow,
    HeavySnow,
    LightRain,
    HeavyShowers,
    HeavyRain,
    LightSnowShowers,
    HeavySnowShowers,
    ThunderyHeavyRain,
    ThunderySnowShowers,
    Unknown,
}

impl WeatherKind {
    /// Map a World Weather Online condition code.
    pub const fn from_wwo_code(code: u16) -> Self {
        match code {
            113 => Self::Sunny,
            116 => Self::PartlyCloudy,
            119 => Self::Cloudy,
            122 => Self::VeryCloudy,
            143 | 248 | 260 => Self::Fog,
            176 | 263 | 353 => Self::LightShowers,
            179 | 362 | 365 | 374 => Self::LightSleetShowers,
            182 | 185 | 281 | 284 | 311 | 314 | 317 | 350 | 377 => Self::LightSleet,
            200 | 386 => Self::ThunderyShowers,
            227 | 320 => Self::LightSnow,
            230 | 329 | 332 | 338 => Self::HeavySnow,
            266 | 293 | 296 => Self::LightRain,
            299 | 305 | 356 => Self::HeavyShowers,
            302 | 308 | 359 => Self::HeavyRain,
            323 | 326 | 368 => Self::LightSnowShowers,
            335 | 371 | 395 => Self::HeavySnowShowers,
            389 => Self::ThunderyHeavyRain,
            392 => Self::ThunderySnowShowers,
            _ => Self::Unknown,
        }
    }

    /// Short label sized for a single panel row.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sunny => "Sunny",
            Self::PartlyCloudy => "Partly cloudy",
            Self::Cloudy => "Cloudy",
            Self::VeryCloudy => "Overcast",
            Self::Fog => "Fog",
            Self::LightShowers => "Showers",
            Self::LightSleetShowers => "Sleet showers",
            Self::LightSleet => "Sleet",
            Self::ThunderyShowers => "T-storms",
            Self::LightSnow => "Light snow",
            Self::HeavySnow => "Heavy snow",
            Self::LightRain => "Light rain",
            Self::HeavyShowers => "Heavy showers",
            Self::HeavyRain => "Heavy rain",
            Self::LightSnowShowers => "Snow showers",
            Self::HeavySnowShowers => "Snow squalls",
            Self::ThunderyHeavyRain => "Severe storms",
            Self::ThunderySnowShowers => "Thundersnow",
            Self::Unknown => "--",
        }
    }
}

/// Render the weather line, e.g. `72°F NNW 8mph Sunny`.
pub fn format_weather(weather: &Weather) -> WeatherLine {
    bounded_line(format_args!(
        "{}{} {} {}{} {}",
        weather.temperature,
        weather.units.temperature_suffix(),
        weather.wind_direction.as_str(),
        weather.wind_speed,
        weather.units.speed_suffix(),
        weather.kind.label(),
    ))
}
