//! Custom `WIDTHxHEIGHT` validation against the service's geometric limits.

use super::{Dimension, SizeError, SizeSpec};

pub const MIN_DIMENSION: u64 = 1024;
pub const MAX_DIMENSION: u64 = 2048;
pub const DIVISOR: u64 = 32;
/// 2^22 pixels.
pub const MAX_TOTAL_PIXELS: u64 = 1 << 22;

/// Splits `<digits>x<digits>` into (width, height).
///
/// Only ASCII digits and a lowercase `x` are accepted. Digit runs too long
/// for `u64` saturate so they fail the range check instead of the format check.
pub fn parse_size(s: &str) -> Option<(u64, u64)> {
    let (w, h) = s.split_once('x')?;
    Some((parse_digits(w)?, parse_digits(h)?))
}

fn parse_digits(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(s.parse().unwrap_or(u64::MAX))
}

/// Validates a custom size. Checks run in a fixed order and the first
/// violation is returned: format, range, divisibility, pixel budget.
pub fn validate_custom_size(s: &str) -> Result<SizeSpec, SizeError> {
    let (width, height) = parse_size(s).ok_or_else(|| SizeError::Format(s.to_string()))?;

    for (dimension, value) in [(Dimension::Width, width), (Dimension::Height, height)] {
        if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&value) {
            return Err(SizeError::OutOfRange { dimension, value });
        }
    }

    for (dimension, value) in [(Dimension::Width, width), (Dimension::Height, height)] {
        if value % DIVISOR != 0 {
            return Err(SizeError::NotDivisible {
                dimension,
                value,
                suggested: nearest_multiple(value),
            });
        }
    }

    let total = width * height;
    if total > MAX_TOTAL_PIXELS {
        return Err(SizeError::TooManyPixels { total });
    }

    Ok(SizeSpec { width, height })
}

/// `round(value / 32) * 32`, halves rounding up.
fn nearest_multiple(value: u64) -> u64 {
    (value + DIVISOR / 2) / DIVISOR * DIVISOR
}

/// Renders `n` with `,` between groups of three digits.
pub(crate) fn group_thousands(n: &u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
