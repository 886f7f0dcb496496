//! Fixed-point line parser.
//!
//! A line is `<station>;<value>` where `<value>` is `-?digits.digit`: exactly one
//! digit after the decimal point, no exponent, no separators. The value is read
//! as an integer count of tenths and only then converted to `f64`, so the result
//! is the nearest double to the decimal text, the same as a general parser
//! would produce. Values too long for an exact count are checked against the
//! same format and converted by the standard parser.

use crate::error::{Error, Result};
use memchr::memchr;

/// Separator between the station name and the measurement.
pub const DELIMITER: u8 = b';';

/// Tenths below this magnitude convert to `f64` without rounding.
const MAX_EXACT_TENTHS: i64 = 1 << 53;

/// Split a line at its first `;` into `(station, value_text)`.
///
/// # Errors
/// [`Error::MalformedLine`] if there is no delimiter or the station is empty.
#[inline]
pub fn split_line(line: &[u8]) -> Result<(&[u8], &[u8])> {
    let Some(at) = memchr(DELIMITER, line) else {
        return Err(Error::malformed_line(line, "missing `;` delimiter"));
    };
    if at == 0 {
        return Err(Error::malformed_line(line, "empty station name"));
    }
    Ok((&line[..at], &line[at + 1..]))
}

/// A validated measurement: exact tenths, or too many digits for them.
enum Fixed {
    Tenths(i64),
    Wide,
}

/// Validate `-?digits.digit` and accumulate tenths while they stay exact.
#[inline]
fn scan(text: &[u8]) -> Result<Fixed> {
    let (negative, unsigned) = match text.split_first() {
        Some((b'-', rest)) => (true, rest),
        _ => (false, text),
    };

    let Some(dot) = memchr(b'.', unsigned) else {
        return Err(Error::malformed_value(text, "missing decimal point"));
    };
    let (whole, fraction) = (&unsigned[..dot], &unsigned[dot + 1..]);
    if whole.is_empty() {
        return Err(Error::malformed_value(text, "missing integer digits"));
    }
    let &[tenth] = fraction else {
        return Err(Error::malformed_value(
            text,
            "expected exactly one fractional digit",
        ));
    };
    if !tenth.is_ascii_digit() {
        return Err(Error::malformed_value(text, "non-digit character"));
    }

    // `None` once the integer part no longer fits the exact range; the rest of
    // the digits are still validated.
    let mut tenths = Some(0_i64);
    for &b in whole {
        if !b.is_ascii_digit() {
            return Err(Error::malformed_value(text, "non-digit character"));
        }
        tenths = tenths
            .map(|t| t * 10 + i64::from(b - b'0'))
            .filter(|t| *t < MAX_EXACT_TENTHS / 10);
    }

    Ok(match tenths {
        Some(t) => {
            let t = t * 10 + i64::from(tenth - b'0');
            Fixed::Tenths(if negative { -t } else { t })
        }
        None => Fixed::Wide,
    })
}

/// Parse `-?digits.digit` into a signed count of tenths (`"-12.3"` is `-123`).
///
/// # Errors
/// [`Error::MalformedValue`] if the text violates the fixed-point format or the
/// count of tenths reaches 2^53.
#[inline]
pub fn parse_tenths(text: &[u8]) -> Result<i64> {
    match scan(text)? {
        Fixed::Tenths(t) => Ok(t),
        Fixed::Wide => Err(Error::malformed_value(text, "value out of range")),
    }
}

/// Parse the measurement text into an `f64`.
///
/// Values with up to 2^53 tenths go through integer arithmetic; longer ones
/// are handed to the standard parser once the format has been checked. Both
/// give the nearest double to the decimal text.
///
/// # Errors
/// [`Error::MalformedValue`] if the text violates the fixed-point format.
#[inline]
#[allow(clippy::cast_precision_loss)]
pub fn parse_measurement(text: &[u8]) -> Result<f64> {
    match scan(text)? {
        Fixed::Tenths(t) => Ok(t as f64 / 10.0),
        Fixed::Wide => std::str::from_utf8(text)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| Error::malformed_value(text, "not a number")),
    }
}

/// Parse one line into `(station, measurement)`.
///
/// The line must not include its terminating newline.
///
/// # Errors
/// [`Error::MalformedLine`] for a missing delimiter, an empty or non UTF-8
/// station name; [`Error::MalformedValue`] for a bad measurement.
#[inline]
pub fn parse_line(line: &[u8]) -> Result<(&str, f64)> {
    let (station, value) = split_line(line)?;
    let station = std::str::from_utf8(station)
        .map_err(|_| Error::malformed_line(line, "station name is not valid UTF-8"))?;
    Ok((station, parse_measurement(value)?))
}
