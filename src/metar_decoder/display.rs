// metar_decoder - Decoder and Prometheus exporter for METAR weather reports
//
// Copyright 2022 Nick Pillitteri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

use crate::report::{StationRecord, WindDirection};
use crate::units::{self, LocalClock};
use std::fmt;

/// Human readable values for a decoded station, in imperial units.
///
/// Fields missing from the record are shown as zero. This is the only place that
/// happens, `StationRecord` keeps missing fields as `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct StationSummary {
    pub station_id: String,
    pub local_time: Option<LocalClock>,
    pub temperature_f: i32,
    pub dewpoint_f: i32,
    pub wind_direction: String,
    pub wind_speed: String,
    pub gust_mph: u32,
    pub visibility_miles: f64,
    pub altimeter_in_hg: f64,
}

impl StationSummary {
    pub fn from_record(record: &StationRecord, offset_hours: i32) -> Self {
        let (direction, speed, gust) = match &record.wind {
            Some(w) => (Some(w.direction), w.speed_knots, w.gust_knots.unwrap_or(0)),
            None => (None, 0, 0),
        };

        let wind_direction = match direction {
            Some(WindDirection::Degrees(d)) => format!("{:03}", d),
            Some(WindDirection::Variable) => "VRB".to_owned(),
            Some(WindDirection::Calm) | None => "Calm".to_owned(),
        };

        let wind_speed = if speed == 0 {
            "Calm".to_owned()
        } else {
            format!("{} MPH", units::knots_to_mph(speed))
        };

        StationSummary {
            station_id: record.station_id.clone(),
            local_time: record
                .report_time_utc
                .as_deref()
                .and_then(|t| units::utc_to_local_clock(t, offset_hours)),
            temperature_f: units::celsius_to_fahrenheit(record.temperature_c.unwrap_or(0)),
            dewpoint_f: units::celsius_to_fahrenheit(record.dewpoint_c.unwrap_or(0)),
            wind_direction,
            wind_speed,
            gust_mph: units::knots_to_mph(gust),
            visibility_miles: record.visibility_statute_miles.unwrap_or(0.0),
            altimeter_in_hg: record.altimeter_in_hg.unwrap_or(0.0),
        }
    }
}

impl fmt::Display for StationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.station_id)?;
        if let Some(t) = &self.local_time {
            write!(f, " {}", t)?;
        }

        write!(
            f,
            " temp {}°F dewpoint {}°F wind {} {} gust {} MPH visibility {} SM altimeter {:.2} inHg",
            self.temperature_f,
            self.dewpoint_f,
            self.wind_direction,
            self.wind_speed,
            self.gust_mph,
            self.visibility_miles,
            self.altimeter_in_hg,
        )
    }
}
