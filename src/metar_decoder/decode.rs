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

use crate::extract::{self, WindGroup};
use crate::numeric;
use crate::report::{BatchResult, StationRecord, WindDirection, WindInfo};

const CALM_CODE: &str = "000";
const MAX_DEGREES: u16 = 360;

/// Decode every line of a bulletin, keyed by station ID.
///
/// Lines without a station ID are skipped. If a station appears more than once, the
/// record from the last line for it is kept. An empty result is not an error but callers
/// that need at least one station (to select by default, for example) must check for it.
pub fn decode_bulletin(bulletin: &str) -> BatchResult {
    let mut batch = BatchResult::new();
    let mut lines = 0;

    for line in bulletin.lines() {
        lines += 1;
        if let Some(record) = decode_line(line) {
            if batch.insert(record).is_some() {
                tracing::debug!(message = "replaced earlier record for station", line = lines);
            }
        }
    }

    tracing::debug!(message = "decoded bulletin", lines = lines, stations = batch.len());
    batch
}

/// Decode a single report line, `None` if it doesn't start with a station ID.
///
/// Advisories for the record (low visibility, low pressure) are emitted as warning events.
pub fn decode_line(line: &str) -> Option<StationRecord> {
    let tokens = extract::tokenize(line);
    let mut record = StationRecord::new(extract::extract_station(&tokens)?);

    if let Some(ts) = extract::extract_timestamp(&tokens) {
        record.report_day = Some(ts.day);
        record.report_time_utc = Some(ts.time);
    }

    if let Some(group) = extract::extract_wind(&tokens) {
        record.wind = wind_info(&record.station_id, &group);
    }

    if let Some(vis) = extract::extract_visibility(&tokens) {
        record.visibility_statute_miles = to_number(&record.station_id, "visibility", &vis);
    }

    if let Some(temp) = extract::extract_temperature(&tokens) {
        record.temperature_c = temp.temperature;
        record.dewpoint_c = temp.dewpoint;
    }

    if let Some(alt) = extract::extract_altimeter(&tokens) {
        record.altimeter_in_hg = to_number(&record.station_id, "altimeter", &alt);
    }

    for advisory in record.advisories() {
        tracing::warn!(message = "weather advisory", station = %record.station_id, advisory = %advisory);
    }

    Some(record)
}

fn to_number(station: &str, field: &str, text: &str) -> Option<f64> {
    match numeric::normalize(text) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(message = "unable to parse numeric field", station = %station, field = field, error = %e);
            None
        }
    }
}

/// Interpret the raw codes of a wind group. Direction `VRB` is variable and `000` is calm.
fn wind_info(station: &str, group: &WindGroup) -> Option<WindInfo> {
    let direction = if group.variable {
        WindDirection::Variable
    } else if group.direction == CALM_CODE {
        WindDirection::Calm
    } else {
        match parse_digits::<u16>(&group.direction).filter(|d| *d <= MAX_DEGREES) {
            Some(d) => WindDirection::Degrees(d),
            None => {
                tracing::warn!(message = "invalid wind direction", station = %station, direction = %group.direction);
                return None;
            }
        }
    };

    let speed_knots = match parse_digits::<u32>(&group.speed) {
        Some(s) => s,
        None => {
            tracing::warn!(message = "invalid wind speed", station = %station, speed = %group.speed);
            return None;
        }
    };

    let gust_knots = group.gust.as_deref().and_then(|g| {
        let gust = parse_digits::<u32>(g);
        if gust.is_none() {
            tracing::warn!(message = "invalid wind gust", station = %station, gust = %g);
        }
        gust
    });

    Some(WindInfo {
        direction,
        speed_knots,
        gust_knots,
    })
}

fn parse_digits<T: std::str::FromStr>(s: &str) -> Option<T> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    s.parse::<T>().ok()
}

#[cfg(test)]
mod tests {
    use super::{decode_bulletin, decode_line};
    use crate::report::{StationRecord, WindDirection, WindInfo};

    #[test]
    fn test_decode_line_full_report() {
        let record = decode_line("KTYS 211751Z 24008KT 10SM 28/19 A2992").unwrap();

        assert_eq!(
            StationRecord {
                station_id: "KTYS".to_owned(),
                report_day: Some("21".to_owned()),
                report_time_utc: Some("1751".to_owned()),
                wind: Some(WindInfo {
                    direction: WindDirection::Degrees(240),
                    speed_knots: 8,
                    gust_knots: None,
                }),
                visibility_statute_miles: Some(10.0),
                temperature_c: Some(28),
                dewpoint_c: Some(19),
                altimeter_in_hg: Some(29.92),
            },
            record
        );
    }

    #[test]
    fn test_decode_line_empty() {
        assert_eq!(None, decode_line(""));
        assert_eq!(None, decode_line("   \t"));
    }

    #[test]
    fn test_decode_line_station_only() {
        assert_eq!(Some(StationRecord::new("KTYS")), decode_line("KTYS"));
    }

    #[test]
    fn test_decode_line_missing_fields_are_independent() {
        let record = decode_line("KTYS 211751Z AUTO 10SM M05/M10 A2992").unwrap();

        assert_eq!(None, record.wind);
        assert_eq!(Some(10.0), record.visibility_statute_miles);
        assert_eq!(Some(-5), record.temperature_c);
        assert_eq!(Some(-10), record.dewpoint_c);
        assert_eq!(Some(29.92), record.altimeter_in_hg);
    }

    #[test]
    fn test_decode_line_wind_gust() {
        let record = decode_line("KTYS 211751Z 24015G25KT 10SM 28/19 A2992").unwrap();
        assert_eq!(
            Some(WindInfo {
                direction: WindDirection::Degrees(240),
                speed_knots: 15,
                gust_knots: Some(25),
            }),
            record.wind
        );
    }

    #[test]
    fn test_decode_line_wind_variable() {
        let record = decode_line("KTYS 211751Z VRB04KT 10SM 28/19 A2992").unwrap();
        assert_eq!(
            Some(WindInfo {
                direction: WindDirection::Variable,
                speed_knots: 4,
                gust_knots: None,
            }),
            record.wind
        );
    }

    #[test]
    fn test_decode_line_wind_calm() {
        let record = decode_line("KTYS 211751Z 00000KT 10SM 28/19 A2992").unwrap();
        assert_eq!(
            Some(WindInfo {
                direction: WindDirection::Calm,
                speed_knots: 0,
                gust_knots: None,
            }),
            record.wind
        );
    }

    #[test]
    fn test_decode_line_wind_invalid_direction() {
        let record = decode_line("KTYS 211751Z 99908KT 10SM 28/19 A2992").unwrap();
        assert_eq!(None, record.wind);
        assert_eq!(Some(28), record.temperature_c);
    }

    #[test]
    fn test_decode_line_mixed_fraction_visibility() {
        let record = decode_line("KTYS 211751Z 24008KT 1 1/2SM BR 08/06 A2992").unwrap();
        assert_eq!(Some(1.5), record.visibility_statute_miles);
        assert_eq!(Some(8), record.temperature_c);
    }

    #[test]
    fn test_decode_line_malformed_visibility() {
        let record = decode_line("KTYS 211751Z 24008KT 1/0SM 28/19 A2992").unwrap();
        assert_eq!(None, record.visibility_statute_miles);
        assert_eq!(Some(29.92), record.altimeter_in_hg);
    }

    #[test]
    fn test_decode_line_advisories_leave_record_unchanged() {
        let record = decode_line("KTYS 211751Z 24008KT 1/4SM FG 12/12 A2975").unwrap();
        assert_eq!(Some(0.25), record.visibility_statute_miles);
        assert_eq!(Some(29.75), record.altimeter_in_hg);
        assert_eq!(2, record.advisories().len());
    }

    #[test]
    fn test_decode_bulletin_order_and_last_wins() {
        let bulletin = "KTYS 211751Z 24008KT 10SM 28/19 A2992\n\
                        \n\
                        KBOS 211754Z 09012KT 8SM 18/12 A3001\n\
                        KTYS 211853Z 25010KT 9SM 29/18 A2990\n";
        let batch = decode_bulletin(bulletin);

        assert_eq!(vec!["KTYS", "KBOS"], batch.station_ids());
        assert_eq!(
            decode_line("KTYS 211853Z 25010KT 9SM 29/18 A2990").as_ref(),
            batch.get("KTYS")
        );
    }

    #[test]
    fn test_decode_bulletin_empty() {
        assert!(decode_bulletin("").is_empty());
        assert!(decode_bulletin("\n\n  \n").is_empty());
    }

    #[test]
    fn test_decode_bulletin_idempotent() {
        let bulletin = "KTYS 211751Z 24008KT 10SM 28/19 A2992\nKBOS 211754Z VRB03KT 1/2SM M02/M04 A2975";
        assert_eq!(decode_bulletin(bulletin), decode_bulletin(bulletin));
    }
}
