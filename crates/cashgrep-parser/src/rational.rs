//! Rational monetary values
//!
//! GnuCash encodes split values as `numerator/denominator` strings. A
//! denominator of 10^k is a fixed-point value with k decimal places, so
//! `50/100` renders `0.50` and `-150/100` renders `-1.50` with the sign
//! kept. Anything else is divided exactly.

use rust_decimal::Decimal;

use crate::error::ParseError;

/// Convert a rational value text into a `Decimal`.
///
/// A plain decimal number (no slash) is accepted as-is.
pub fn parse_rational(text: &str, line: usize) -> Result<Decimal, ParseError> {
    let bad = || ParseError::BadAmount {
        value: text.to_string(),
        line,
    };

    let trimmed = text.trim();
    let (num_text, den_text) = match trimmed.split_once('/') {
        Some(pair) => pair,
        None => return trimmed.parse::<Decimal>().map_err(|_| bad()),
    };

    let numerator: i64 = num_text.parse().map_err(|_| bad())?;
    let denominator: i64 = den_text.parse().map_err(|_| bad())?;
    if denominator <= 0 {
        return Err(bad());
    }

    if let Some(scale) = power_of_ten(denominator) {
        return Ok(Decimal::new(numerator, scale));
    }

    Decimal::from(numerator)
        .checked_div(Decimal::from(denominator))
        .ok_or_else(bad)
}

/// k when n == 10^k, None otherwise
fn power_of_ten(mut n: i64) -> Option<u32> {
    let mut scale = 0;
    while n % 10 == 0 {
        n /= 10;
        scale += 1;
    }
    if n == 1 {
        Some(scale)
    } else {
        None
    }
}
