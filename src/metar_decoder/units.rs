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
use std::fmt;

/// Convert knots to miles per hour, truncating any fractional part (`10` -> `11`).
///
/// Results too large for a `u32` saturate at `u32::MAX`.
pub fn knots_to_mph(knots: u32) -> u32 {
    // 1 knot = 1.15 mph, computed in hundredths so the result doesn't depend on float rounding
    let mph = u64::from(knots) * 115 / 100;
    u32::try_from(mph).unwrap_or(u32::MAX)
}

/// Convert celsius to fahrenheit, truncating toward zero (`-5` -> `23`).
///
/// Results outside the range of an `i32` saturate at `i32::MIN` or `i32::MAX`.
pub fn celsius_to_fahrenheit(celsius: i32) -> i32 {
    let fahrenheit = (i64::from(celsius) * 9 + 160) / 5;
    fahrenheit.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

impl fmt::Display for Meridiem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Am => write!(f, "AM"),
            Self::Pm => write!(f, "PM"),
        }
    }
}

/// Time of day on a 12-hour clock.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalClock {
    pub hour: u32,
    pub minute: u32,
    pub meridiem: Meridiem,
}

impl fmt::Display for LocalClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02} {}", self.hour, self.minute, self.meridiem)
    }
}

/// Convert a UTC `HHMM` report time to a 12-hour clock with the given offset in hours.
///
/// AM or PM is picked from the offset hour *before* it's wrapped: only values in `[0, 12)`
/// are AM. An offset that moves the time into the previous day (a negative hour) is PM,
/// as is one that moves it into the next day (24 or more). Returns `None` if the time
/// doesn't start with four digits.
pub fn utc_to_local_clock(hhmm: &str, offset_hours: i32) -> Option<LocalClock> {
    let digits = hhmm.get(..4).filter(|s| s.bytes().all(|b| b.is_ascii_digit()))?;
    let hours: i64 = digits[..2].parse().ok()?;
    let minute: u32 = digits[2..].parse().ok()?;

    let adjusted = hours + i64::from(offset_hours);
    let meridiem = if (0..12).contains(&adjusted) {
        Meridiem::Am
    } else {
        Meridiem::Pm
    };

    let hour = match adjusted.rem_euclid(12) {
        0 => 12,
        h => h as u32,
    };

    Some(LocalClock { hour, minute, meridiem })
}

#[cfg(test)]
mod tests {
    use super::{celsius_to_fahrenheit, knots_to_mph, utc_to_local_clock, LocalClock, Meridiem};
    use rstest::rstest;

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(8, 9)]
    #[case(10, 11)]
    #[case(20, 23)]
    #[case(100, 115)]
    #[case(u32::MAX, u32::MAX)]
    fn test_knots_to_mph(#[case] knots: u32, #[case] mph: u32) {
        assert_eq!(mph, knots_to_mph(knots));
    }

    #[rstest]
    #[case(0, 32)]
    #[case(-5, 23)]
    #[case(28, 82)]
    #[case(100, 212)]
    #[case(-40, -40)]
    #[case(-1, 30)]
    #[case(-43, -45)]
    #[case(i32::MAX, i32::MAX)]
    #[case(i32::MIN, i32::MIN)]
    fn test_celsius_to_fahrenheit(#[case] celsius: i32, #[case] fahrenheit: i32) {
        assert_eq!(fahrenheit, celsius_to_fahrenheit(celsius));
    }

    fn clock(hour: u32, minute: u32, meridiem: Meridiem) -> Option<LocalClock> {
        Some(LocalClock { hour, minute, meridiem })
    }

    #[rstest]
    #[case("1751", 0, clock(5, 51, Meridiem::Pm))]
    #[case("1751", -5, clock(12, 51, Meridiem::Pm))]
    #[case("0230", -5, clock(9, 30, Meridiem::Pm))]
    #[case("0000", 0, clock(12, 0, Meridiem::Am))]
    #[case("1159", 0, clock(11, 59, Meridiem::Am))]
    #[case("1200", 0, clock(12, 0, Meridiem::Pm))]
    #[case("2230", 5, clock(3, 30, Meridiem::Pm))]
    #[case("0915", 2, clock(11, 15, Meridiem::Am))]
    #[case("1751", i32::MAX, clock(12, 51, Meridiem::Pm))]
    #[case("1751", i32::MIN, clock(9, 51, Meridiem::Pm))]
    fn test_utc_to_local_clock(#[case] hhmm: &str, #[case] offset: i32, #[case] expected: Option<LocalClock>) {
        assert_eq!(expected, utc_to_local_clock(hhmm, offset));
    }

    #[test]
    fn test_utc_to_local_clock_invalid() {
        assert_eq!(None, utc_to_local_clock("", 0));
        assert_eq!(None, utc_to_local_clock("17", 0));
        assert_eq!(None, utc_to_local_clock("17x1", 0));
    }

    #[test]
    fn test_local_clock_display() {
        assert_eq!("12:51 PM", utc_to_local_clock("1751", -5).unwrap().to_string());
        assert_eq!("9:05 AM", utc_to_local_clock("1405", -5).unwrap().to_string());
    }
}
