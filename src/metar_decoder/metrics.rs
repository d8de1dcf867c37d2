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
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;
use std::sync::atomic::AtomicU64;

type StationGauge = Family<StationLabels, Gauge<f64, AtomicU64>>;

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
struct StationLabels {
    station: String,
}

/// Holder for metrics that can be set from a decoded `StationRecord`.
///
/// All metrics are created and registered upon call to `StationMetrics::new()`. Metrics
/// all share the prefix "metar_" and have a "station" label that will be set to the ID
/// of the station (e.g. `{station="KTYS"}`)
#[derive(Debug)]
pub struct StationMetrics {
    temperature: StationGauge,
    dewpoint: StationGauge,
    altimeter: StationGauge,
    visibility: StationGauge,
    wind_direction: StationGauge,
    wind_speed: StationGauge,
    wind_gust: StationGauge,
}

impl StationMetrics {
    /// Create a new `StationMetrics` and register each metric with the provided `Registry`.
    pub fn new(reg: &mut Registry) -> Self {
        let temperature = StationGauge::default();
        let dewpoint = StationGauge::default();
        let altimeter = StationGauge::default();
        let visibility = StationGauge::default();
        let wind_direction = StationGauge::default();
        let wind_speed = StationGauge::default();
        let wind_gust = StationGauge::default();

        reg.register("metar_temperature_degrees", "Temperature in celsius", temperature.clone());
        reg.register("metar_dewpoint_degrees", "Dewpoint in celsius", dewpoint.clone());
        reg.register(
            "metar_altimeter_inches_hg",
            "Altimeter setting in inches of mercury",
            altimeter.clone(),
        );
        reg.register("metar_visibility_miles", "Visibility in statute miles", visibility.clone());
        reg.register(
            "metar_wind_direction_degrees",
            "Wind direction in degrees, absent when variable",
            wind_direction.clone(),
        );
        reg.register("metar_wind_speed_knots", "Wind speed in knots", wind_speed.clone());
        reg.register("metar_wind_gust_knots", "Wind gust speed in knots", wind_gust.clone());

        Self {
            temperature,
            dewpoint,
            altimeter,
            visibility,
            wind_direction,
            wind_speed,
            wind_gust,
        }
    }

    /// Set metrics from the provided record if the relevant value exists.
    ///
    /// If the record doesn't contain a value for a particular metric, the metric will
    /// not be updated.
    pub fn observe(&self, record: &StationRecord) {
        let station = &record.station_id;
        self.set(station, &self.temperature, record.temperature_c.map(f64::from));
        self.set(station, &self.dewpoint, record.dewpoint_c.map(f64::from));
        self.set(station, &self.altimeter, record.altimeter_in_hg);
        self.set(station, &self.visibility, record.visibility_statute_miles);

        if let Some(wind) = &record.wind {
            let direction = match wind.direction {
                WindDirection::Degrees(d) => Some(f64::from(d)),
                WindDirection::Calm => Some(0.0),
                WindDirection::Variable => None,
            };

            // Direction and gust come and go between reports, drop a stale value instead of
            // leaving it in place.
            self.set_or_clear(station, &self.wind_direction, direction);
            self.set(station, &self.wind_speed, Some(f64::from(wind.speed_knots)));
            self.set_or_clear(station, &self.wind_gust, wind.gust_knots.map(f64::from));
        }
    }

    fn set_or_clear(&self, station: &str, gauge: &StationGauge, value: Option<f64>) {
        if value.is_some() {
            self.set(station, gauge, value);
        } else {
            let labels = StationLabels {
                station: station.to_owned(),
            };
            gauge.remove(&labels);
        }
    }

    fn set(&self, station: &str, gauge: &StationGauge, value: Option<f64>) {
        if let Some(v) = value {
            let labels = StationLabels {
                station: station.to_owned(),
            };
            gauge.get_or_create(&labels).set(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::StationMetrics;
    use crate::decode::decode_line;
    use prometheus_client::encoding::text::encode;
    use prometheus_client::registry::Registry;

    #[test]
    fn test_observe_sets_present_values() {
        let mut registry = Registry::default();
        let metrics = StationMetrics::new(&mut registry);
        metrics.observe(&decode_line("KTYS 211751Z 24008KT 10SM 28/19 A2992").unwrap());

        let mut buf = String::new();
        encode(&mut buf, &registry).unwrap();

        assert!(buf.contains("metar_temperature_degrees{station=\"KTYS\"}"));
        assert!(buf.contains("metar_altimeter_inches_hg{station=\"KTYS\"}"));
        assert!(buf.contains("metar_wind_direction_degrees{station=\"KTYS\"}"));
        assert!(!buf.contains("metar_wind_gust_knots{"));
    }

    #[test]
    fn test_observe_skips_missing_values() {
        let mut registry = Registry::default();
        let metrics = StationMetrics::new(&mut registry);
        metrics.observe(&decode_line("KTYS 211751Z VRB04KT").unwrap());

        let mut buf = String::new();
        encode(&mut buf, &registry).unwrap();

        assert!(buf.contains("metar_wind_speed_knots{station=\"KTYS\"}"));
        assert!(!buf.contains("metar_wind_direction_degrees{"));
        assert!(!buf.contains("metar_temperature_degrees{"));
        assert!(!buf.contains("metar_visibility_miles{"));
    }

    #[test]
    fn test_observe_clears_wind_after_variable_report() {
        let mut registry = Registry::default();
        let metrics = StationMetrics::new(&mut registry);
        metrics.observe(&decode_line("KTYS 211751Z 24015G35KT 10SM 28/19 A2992").unwrap());
        metrics.observe(&decode_line("KTYS 211851Z VRB03KT 10SM 28/19 A2992").unwrap());

        let mut buf = String::new();
        encode(&mut buf, &registry).unwrap();

        assert!(buf.contains("metar_wind_speed_knots{station=\"KTYS\"}"));
        assert!(!buf.contains("metar_wind_direction_degrees{"));
        assert!(!buf.contains("metar_wind_gust_knots{"));
    }
}
