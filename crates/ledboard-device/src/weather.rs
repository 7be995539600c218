//! wttr.in current-conditions client
//!
//! `GET <endpoint>/<location>?format=j1` answers with a JSON report whose
//! `current_condition[0]` object carries every number as a string.

use std::str::FromStr;

use ledboard_core::sources::{
    CompassPoint, FetchError, Units, Weather, WeatherKind, WeatherSource,
};
use log::debug;
use serde::Deserialize;

use crate::http::{decode_error, fetch_body};
use crate::settings::WeatherSettings;

pub struct WttrClient {
    agent: ureq::Agent,
    endpoint: String,
    units: Units,
}

impl WttrClient {
    pub fn new(agent: ureq::Agent, settings: &WeatherSettings, units: Units) -> Self {
        Self {
            agent,
            endpoint: settings.endpoint.trim_end_matches('/').to_owned(),
            units,
        }
    }

    fn url(&self, location: &str) -> String {
        let location = location.split_whitespace().collect::<Vec<_>>().join("+");
        format!("{}/{}?format=j1", self.endpoint, location)
    }
}

impl WeatherSource for WttrClient {
    async fn fetch(&mut self, location: &str) -> Result<Weather, FetchError> {
        let url = self.url(location);
        debug!("Requesting weather from {}", url);
        let body = fetch_body(self.agent.get(&url))?;
        parse_report(&body, self.units)
    }
}

#[derive(Deserialize)]
struct Report {
    current_condition: Vec<Conditions>,
}

#[derive(Deserialize)]
struct Conditions {
    #[serde(rename = "temp_F")]
    temp_f: String,
    #[serde(rename = "temp_C")]
    temp_c: String,
    #[serde(rename = "winddir16Point")]
    wind_point: String,
    #[serde(rename = "winddirDegree", default)]
    wind_degree: Option<String>,
    #[serde(rename = "windspeedMiles")]
    wind_mph: String,
    #[serde(rename = "windspeedKmph")]
    wind_kmph: String,
    #[serde(rename = "weatherCode")]
    weather_code: String,
}

/// Decode a `format=j1` report into [`Weather`] in the requested units.
pub fn parse_report(body: &str, units: Units) -> Result<Weather, FetchError> {
    let report: Report = serde_json::from_str(body).map_err(decode_error)?;
    let current = report
        .current_condition
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::Decode("report has no current conditions".into()))?;

    let (temperature, wind_speed) = match units {
        Units::Imperial => (&current.temp_f, &current.wind_mph),
        Units::Metric => (&current.temp_c, &current.wind_kmph),
    };

    Ok(Weather {
        temperature: number("temperature", temperature)?,
        wind_direction: wind_direction(&current)?,
        wind_speed: number("wind speed", wind_speed)?,
        kind: WeatherKind::from_wwo_code(number("weather code", &current.weather_code)?),
        units,
    })
}

/// The 16-point label, falling back to the bearing in degrees.
fn wind_direction(current: &Conditions) -> Result<CompassPoint, FetchError> {
    current
        .wind_point
        .parse::<CompassPoint>()
        .ok()
        .or_else(|| {
            current
                .wind_degree
                .as_deref()
                .and_then(|degrees| degrees.trim().parse::<u16>().ok())
                .map(CompassPoint::from_degrees)
        })
        .ok_or_else(|| {
            FetchError::Decode(format!("unknown wind direction '{}'", current.wind_point))
        })
}

fn number<T: FromStr>(field: &str, value: &str) -> Result<T, FetchError> {
    value
        .trim()
        .parse()
        .map_err(|_| FetchError::Decode(format!("{field} is not a number: '{value}'")))
}
