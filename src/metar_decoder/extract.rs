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

//! Scanners that pick individual fields out of the tokens of a METAR line.
//!
//! Fields are recognized by the shape of a token (its prefix or suffix) rather than a
//! fixed position since reports are often irregular. Each scanner ignores tokens before
//! a minimum index so that the station ID, timestamp, or wind group can't be mistaken
//! for a later field that happens to share a suffix.

/// Wind may appear anywhere after the station, whose ID can itself end in "KT" (e.g. `PAKT`).
pub const WIND_MIN_INDEX: usize = 1;

/// Visibility follows the station, timestamp, and wind tokens.
pub const VISIBILITY_MIN_INDEX: usize = 3;

/// Temperature follows at least one visibility token.
pub const TEMPERATURE_MIN_INDEX: usize = 4;

/// The altimeter comes after temperature. Starting here also keeps a station ID
/// beginning with 'A' from being read as an altimeter setting.
pub const ALTIMETER_MIN_INDEX: usize = 5;

const TIMESTAMP_INDEX: usize = 1;
const TIMESTAMP_SUFFIX: char = 'Z';
const WIND_SUFFIX: &str = "KT";
const GUST_MARKER: char = 'G';
const VARIABLE_MARKER: char = 'V';
const VARIABLE_CODE: &str = "VRB";
const VISIBILITY_SUFFIX: &str = "SM";
const NEGATIVE_MARKER: char = 'M';
const ALTIMETER_PREFIX: char = 'A';

/// Day of month and UTC time of a report, as written in the report (`21`, `1751`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    pub day: String,
    pub time: String,
}

/// Raw codes of a wind group, before direction and speed are interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindGroup {
    pub direction: String,
    pub speed: String,
    pub gust: Option<String>,
    pub variable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Temperature {
    pub temperature: Option<i32>,
    pub dewpoint: Option<i32>,
}

/// Split a line into non-empty whitespace delimited tokens.
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// The station identifier is always the first token.
pub fn extract_station(tokens: &[&str]) -> Option<String> {
    tokens.first().map(|s| (*s).to_owned())
}

/// Find the `DDHHMMZ` token. Usually second, but some reports insert an extra token
/// (e.g. `METAR` or `SPECI`) before it.
pub fn extract_timestamp(tokens: &[&str]) -> Option<Timestamp> {
    let second = tokens.get(TIMESTAMP_INDEX)?;
    if second.ends_with(TIMESTAMP_SUFFIX) {
        return split_timestamp(second);
    }

    tokens
        .iter()
        .skip(TIMESTAMP_INDEX + 1)
        .find(|t| t.ends_with(TIMESTAMP_SUFFIX) && t.starts_with(|c: char| c.is_ascii_digit()))
        .and_then(|t| split_timestamp(t))
}

fn split_timestamp(token: &str) -> Option<Timestamp> {
    let end = token.len() - TIMESTAMP_SUFFIX.len_utf8();
    Some(Timestamp {
        day: token.get(..2)?.to_owned(),
        time: token.get(2..end)?.to_owned(),
    })
}

/// Find the first token ending in `KT` and split it into direction, speed, and gust codes.
pub fn extract_wind(tokens: &[&str]) -> Option<WindGroup> {
    let token = tokens
        .iter()
        .skip(WIND_MIN_INDEX)
        .find(|t| t.ends_with(WIND_SUFFIX))?;
    let body = &token[..token.len() - WIND_SUFFIX.len()];

    // A gust marker needs at least one character after it within the body. A bare `G`
    // right before the `KT` suffix (`24015GKT`) is treated as no gust at all rather than
    // an empty gust value.
    let (base, gust, variable) = match body.find(GUST_MARKER) {
        Some(i) if i + 1 < body.len() => (&body[..i], Some(body[i + 1..].to_owned()), false),
        _ => {
            // The variable marker is the start of "VRB" which doubles as the direction code
            // so the whole body is kept as the base group. It needs the "RB" and at least
            // one speed digit after it.
            let variable = body
                .find(VARIABLE_MARKER)
                .map(|i| i + 2 < body.len())
                .unwrap_or(false);
            (body, None, variable)
        }
    };

    Some(WindGroup {
        direction: base.get(..3).unwrap_or(base).to_owned(),
        speed: base.get(3..5).or_else(|| base.get(3..)).unwrap_or("").to_owned(),
        gust,
        variable: variable || base.starts_with(VARIABLE_CODE),
    })
}

/// Find the first token ending in `SM` and return the visibility text without the suffix.
///
/// Whitespace splitting turns a mixed fraction like `1 1/2SM` into two tokens so when the
/// visibility is a bare fraction, a whole number immediately before it is joined back on.
pub fn extract_visibility(tokens: &[&str]) -> Option<String> {
    let (i, token) = tokens
        .iter()
        .enumerate()
        .skip(VISIBILITY_MIN_INDEX)
        .find(|(_, t)| t.ends_with(VISIBILITY_SUFFIX))?;

    let value = &token[..token.len() - VISIBILITY_SUFFIX.len()];
    let whole = if value.contains('/') && i > VISIBILITY_MIN_INDEX {
        Some(tokens[i - 1]).filter(|w| !w.is_empty() && w.bytes().all(|b| b.is_ascii_digit()))
    } else {
        None
    };

    match whole {
        Some(w) => Some(format!("{} {}", w, value)),
        None => Some(value.to_owned()),
    }
}

/// Find the first `TT/DD` token and parse the temperature and dewpoint from it.
pub fn extract_temperature(tokens: &[&str]) -> Option<Temperature> {
    let token = tokens
        .iter()
        .skip(TEMPERATURE_MIN_INDEX)
        .find(|t| t.contains('/') && !t.contains(VISIBILITY_SUFFIX))?;

    let (temperature, dewpoint) = token.split_once('/')?;
    Some(Temperature {
        temperature: parse_temperature(temperature),
        dewpoint: parse_temperature(dewpoint),
    })
}

/// Parse a temperature code like `05` or `M05`, where a leading `M` means negative.
fn parse_temperature(code: &str) -> Option<i32> {
    let (negative, digits) = match code.strip_prefix(NEGATIVE_MARKER) {
        Some(rest) => (true, rest),
        None => (false, code),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let trimmed = digits.trim_start_matches('0');
    let value = if trimmed.is_empty() { 0 } else { trimmed.parse::<i32>().ok()? };
    Some(if negative { -value } else { value })
}

/// Find the first `ADDDD` token and return the setting with a decimal point inserted (`29.92`).
pub fn extract_altimeter(tokens: &[&str]) -> Option<String> {
    tokens
        .iter()
        .skip(ALTIMETER_MIN_INDEX)
        .filter_map(|t| t.strip_prefix(ALTIMETER_PREFIX))
        .find(|digits| digits.len() == 4 && digits.bytes().all(|b| b.is_ascii_digit()))
        .map(|digits| format!("{}.{}", &digits[..2], &digits[2..]))
}
