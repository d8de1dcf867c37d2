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

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Visibility below this many statute miles results in an advisory.
pub const LOW_VISIBILITY_MILES: f64 = 1.0;

/// Altimeter settings below this many inches of mercury result in an advisory.
pub const LOW_PRESSURE_IN_HG: f64 = 29.80;

/// Direction the wind is blowing from.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindDirection {
    Degrees(u16),
    Variable,
    Calm,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WindInfo {
    pub direction: WindDirection,
    pub speed_knots: u32,
    pub gust_knots: Option<u32>,
}

/// Fields decoded from a single METAR line.
///
/// Only the station ID is required. Every other field is `None` when the report
/// didn't contain a token that could be recognized and parsed for it. Callers that
/// want to display a default value (e.g. zero) for missing fields need to pick one
/// themselves, see `crate::display`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StationRecord {
    pub station_id: String,
    pub report_day: Option<String>,
    pub report_time_utc: Option<String>,
    pub wind: Option<WindInfo>,
    pub visibility_statute_miles: Option<f64>,
    pub temperature_c: Option<i32>,
    pub dewpoint_c: Option<i32>,
    pub altimeter_in_hg: Option<f64>,
}

impl StationRecord {
    pub fn new<S: Into<String>>(station_id: S) -> Self {
        StationRecord {
            station_id: station_id.into(),
            report_day: None,
            report_time_utc: None,
            wind: None,
            visibility_statute_miles: None,
            temperature_c: None,
            dewpoint_c: None,
            altimeter_in_hg: None,
        }
    }

    /// Threshold conditions present in this record. Evaluating them has no effect on the record.
    pub fn advisories(&self) -> Vec<Advisory> {
        let mut out = Vec::new();

        if let Some(miles) = self.visibility_statute_miles {
            if miles < LOW_VISIBILITY_MILES {
                out.push(Advisory::LowVisibility {
                    station: self.station_id.clone(),
                    miles,
                });
            }
        }

        if let Some(in_hg) = self.altimeter_in_hg {
            if in_hg < LOW_PRESSURE_IN_HG {
                out.push(Advisory::LowPressure {
                    station: self.station_id.clone(),
                    in_hg,
                });
            }
        }

        out
    }
}

/// Informational notice about a decoded record. Never an error.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Advisory {
    LowVisibility { station: String, miles: f64 },
    LowPressure { station: String, in_hg: f64 },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LowVisibility { station, miles } => write!(f, "low visibility at {}: {} miles", station, miles),
            Self::LowPressure { station, in_hg } => {
                write!(f, "low pressure at {}: altimeter setting {} inHg", station, in_hg)
            }
        }
    }
}

/// Station records from a single bulletin, keyed by station ID.
///
/// Records are kept in the order their station first appeared in the bulletin. Inserting a
/// record for a station that is already present replaces the earlier record but keeps its
/// position.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(from = "Vec<StationRecord>", into = "Vec<StationRecord>")]
pub struct BatchResult {
    records: Vec<StationRecord>,
    index: HashMap<String, usize>,
}

impl BatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record, returning the record it replaced if the station was already present.
    pub fn insert(&mut self, record: StationRecord) -> Option<StationRecord> {
        match self.index.get(&record.station_id) {
            Some(&i) => Some(std::mem::replace(&mut self.records[i], record)),
            None => {
                self.index.insert(record.station_id.clone(), self.records.len());
                self.records.push(record);
                None
            }
        }
    }

    pub fn get(&self, station_id: &str) -> Option<&StationRecord> {
        self.index.get(station_id).map(|&i| &self.records[i])
    }

    /// Record of the first station in the bulletin, `None` when nothing was decoded.
    pub fn first(&self) -> Option<&StationRecord> {
        self.records.first()
    }

    /// Station IDs in the order they first appeared in the bulletin.
    pub fn station_ids(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.station_id.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StationRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<StationRecord>> for BatchResult {
    fn from(records: Vec<StationRecord>) -> Self {
        let mut batch = Self::new();
        for r in records {
            batch.insert(r);
        }
        batch
    }
}

impl From<BatchResult> for Vec<StationRecord> {
    fn from(batch: BatchResult) -> Self {
        batch.records
    }
}

impl<'a> IntoIterator for &'a BatchResult {
    type Item = &'a StationRecord;
    type IntoIter = std::slice::Iter<'a, StationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
