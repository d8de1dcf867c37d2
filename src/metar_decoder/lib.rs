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

//! Decoder and Prometheus exporter for METAR aviation weather reports
//!
//! ## Features
//!
//! `metar_decoder` decodes raw [METAR] reports, one per line, into structured records. Only a
//! subset of the fields in a report are decoded. Each is optional since not every station
//! reports every field.
//!
//! * Day of month and UTC time of the observation.
//! * Wind direction (degrees, variable, or calm), speed and gust speed in knots.
//! * Visibility in statute miles, including fractional values like `1 1/2SM`.
//! * Temperature and dewpoint in degrees celsius.
//! * Altimeter setting in inches of mercury.
//!
//! Conversions to imperial units and a local 12-hour clock are provided by the [`units`]
//! module. Low visibility (less than one mile) and low pressure (less than 29.80 inHg) are
//! logged as advisories when a report is decoded.
//!
//! [METAR]: https://www.weather.gov/media/wrh/mesowest/metar_decode_key.pdf
//!
//! ```text
//! use metar_decoder::decode::decode_bulletin;
//!
//! let batch = decode_bulletin("KTYS 211751Z 24008KT 10SM 28/19 A2992");
//! let ktys = batch.get("KTYS").unwrap();
//! assert_eq!(Some(28), ktys.temperature_c);
//! ```
//!
//! ## Build
//!
//! `metar_decoder` is a Rust program and must be built from source using a [Rust toolchain](https://rustup.rs/).
//!
//! ```text
//! cargo build --release
//! ```
//!
//! ## Usage
//!
//! ### Decode once
//!
//! Fetch the latest reports for one or more stations from [aviationweather.gov], print a
//! summary of each, and exit. Times are displayed using the given offset from UTC in hours.
//!
//! ```text
//! ./metar_decoder --station KTYS --station KBOS --once --timezone-offset=-5
//! ```
//!
//! Reports can also be decoded from a local file, one report per line.
//!
//! ```text
//! ./metar_decoder --input reports.txt
//! ```
//!
//! ### Prometheus
//!
//! Without `--once`, reports are fetched every `--refresh-secs` seconds and decoded values
//! are exposed as Prometheus metrics on port `9783` at `/metrics`.
//!
//! * `metar_temperature_degrees{station=$STATION}` - Temperature, in degrees celsius.
//! * `metar_dewpoint_degrees{station=$STATION}` - Dewpoint, in degrees celsius.
//! * `metar_altimeter_inches_hg{station=$STATION}` - Altimeter setting, in inches of mercury.
//! * `metar_visibility_miles{station=$STATION}` - Visibility, in statute miles.
//! * `metar_wind_direction_degrees{station=$STATION}` - Wind direction, in degrees.
//! * `metar_wind_speed_knots{station=$STATION}` - Wind speed, in knots.
//! * `metar_wind_gust_knots{station=$STATION}` - Wind gust speed, in knots.
//!
//! [aviationweather.gov]: https://aviationweather.gov/data/api/
//!

pub mod client;
pub mod decode;
pub mod display;
pub mod extract;
pub mod http;
pub mod metrics;
pub mod numeric;
pub mod report;
pub mod units;
