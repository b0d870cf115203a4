//! Fixed-point decimal type with 2 decimal places for rendered output.
//!
//! Floating values are converted through their shortest round-trip decimal
//! representation before rounding, so `39.995` rounds to `40.00` instead of
//! following the binary value `39.99499...` down to `39.99`.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use std::str::FromStr;

/// A decimal value rounded half-up to exactly 2 decimal places.
///
/// # Examples
///
/// ```
/// use listing_pipeline::Fixed2;
///
/// assert_eq!(Fixed2::from_f64(39.995).to_string(), "40.00");
/// assert_eq!(Fixed2::from_f64(7.0).to_string(), "7.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Fixed2(Decimal);

impl Fixed2 {
    /// The number of decimal places to render.
    pub const SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Fixed2(Decimal::ZERO);

    /// Creates a new `Fixed2`, rounding half away from zero to 2 places.
    pub fn new(value: Decimal) -> Self {
        let mut rounded =
            value.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(Self::SCALE);
        Fixed2(rounded)
    }

    /// Creates a `Fixed2` from a float via its shortest decimal representation.
    pub fn from_f64(value: f64) -> Self {
        Fixed2::new(decimal_from_f64(value))
    }
}

impl fmt::Display for Fixed2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Converts a float to a `Decimal` using its shortest round-trip string.
///
/// Values outside the `Decimal` range saturate at `Decimal::MAX`/`Decimal::MIN`;
/// NaN and magnitudes too small to represent become zero.
pub fn decimal_from_f64(value: f64) -> Decimal {
    if let Ok(decimal) = Decimal::from_str(&value.to_string()) {
        return decimal;
    }
    if let Some(decimal) = Decimal::from_f64(value) {
        return decimal;
    }

    if value.is_nan() || value.abs() < 1.0 {
        Decimal::ZERO
    } else if value.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    }
}

/// Arithmetic mean accumulated in `Decimal`; zero for an empty input.
pub fn decimal_mean(values: &[f64]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }

    let sum = values
        .iter()
        .fold(Decimal::ZERO, |acc, v| acc.saturating_add(decimal_from_f64(*v)));

    sum.checked_div(Decimal::from(values.len()))
        .unwrap_or(Decimal::ZERO)
}
