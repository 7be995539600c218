use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use embassy_time::Instant;
use ledboard_core::clock::Clock;

use crate::error::DeviceError;

/// Host system clock with the local face in an IANA time zone.
pub struct SystemClock {
    zone: Tz,
}

impl SystemClock {
    pub fn new(time_zone: &str) -> Result<Self, DeviceError> {
        let zone = time_zone
            .parse::<Tz>()
            .map_err(|_| DeviceError::TimeZone(time_zone.to_owned()))?;
        Ok(Self { zone })
    }
}

impl Clock for SystemClock {
    type Zone = Tz;

    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn zone(&self) -> &Tz {
        &self.zone
    }

    fn instant(&self) -> Instant {
        Instant::now()
    }
}
