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

//! Conversion of numeric report text (integers, decimals, fractions and mixed fractions
//! like `1 1/2`) into `f64` values.

use std::error;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumericError {
    Empty,
    ZeroDenominator(String),
    Malformed(String),
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "no numeric content"),
            Self::ZeroDenominator(s) => write!(f, "zero denominator in '{}'", s),
            Self::Malformed(s) => write!(f, "malformed number '{}'", s),
        }
    }
}

impl error::Error for NumericError {}

/// Parse report text into a number.
///
/// Any characters other than digits, spaces, `/`, and `.` are discarded first, so prefixes
/// like `P` in `P6` or `M` in `M1/4` don't prevent parsing. What remains must be one of:
///
/// * `digits` or `digits.digits`
/// * `digits/digits`
/// * `digits digits/digits`, the whole and fractional parts of a mixed number
pub fn normalize(text: &str) -> Result<f64, NumericError> {
    let kept: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ' ' || *c == '/' || *c == '.')
        .collect();

    let trimmed = kept.trim();
    if !trimmed.bytes().any(|b| b.is_ascii_digit()) {
        return Err(NumericError::Empty);
    }

    match trimmed.split_once(' ') {
        Some((whole, fraction)) => {
            let whole = parse_digits(whole, trimmed)?;
            let fraction = parse_fraction(fraction, trimmed)?.ok_or_else(|| malformed(trimmed))?;
            Ok(whole + fraction)
        }
        None => match parse_fraction(trimmed, trimmed)? {
            Some(v) => Ok(v),
            None => parse_decimal(trimmed, trimmed),
        },
    }
}

/// Parse `digits/digits`, or `None` if the text has no `/` at all.
fn parse_fraction(s: &str, original: &str) -> Result<Option<f64>, NumericError> {
    let (num, den) = match s.split_once('/') {
        Some(parts) => parts,
        None => return Ok(None),
    };

    let num = parse_digits(num, original)?;
    let den = parse_digits(den, original)?;
    if den == 0.0 {
        return Err(NumericError::ZeroDenominator(original.to_owned()));
    }

    Ok(Some(num / den))
}

fn parse_decimal(s: &str, original: &str) -> Result<f64, NumericError> {
    match s.split_once('.') {
        Some((whole, frac)) => {
            if !is_digits(whole) || !is_digits(frac) {
                return Err(malformed(original));
            }
            s.parse::<f64>().map_err(|_| malformed(original))
        }
        None => parse_digits(s, original),
    }
}

fn parse_digits(s: &str, original: &str) -> Result<f64, NumericError> {
    if !is_digits(s) {
        return Err(malformed(original));
    }

    s.parse::<f64>().map_err(|_| malformed(original))
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn malformed(s: &str) -> NumericError {
    NumericError::Malformed(s.to_owned())
}
