//! Provides a safe, self-contained type for representing rupee prices.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::ops::AddAssign;

use num_traits::Zero;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Number of decimal digits of the rupee (paise).
const DECIMALS: u32 = 2;
const MINOR_PER_MAJOR: i64 = 10_i64.pow(DECIMALS);

/// An error that can occur when parsing a string into a `Price`.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParsePriceError {
    /// The string is not in a valid numeric format (e.g., "abc", "1.2.3").
    #[error("invalid price format")]
    InvalidFormat,
    /// The string has more than two decimal places (e.g., "1.234").
    #[error("too many decimal places for a price")]
    TooManyDecimals,
}

/// A price in Indian rupees.
///
/// Internally, the amount is stored as a signed 64-bit count of paise to
/// prevent floating-point inaccuracies. The default `Display` implementation
/// formats this as a plain numeric string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price {
    paise: i64,
}

impl Price {
    /// Returns the raw amount in paise.
    pub fn as_minor_units(&self) -> i64 {
        self.paise
    }

    /// Creates a new `Price` from a floating-point value, typically a
    /// `doubleValue` read from the document store.
    ///
    /// ```
    /// let price = api::Price::new_from_float(123.456);
    /// assert_eq!(price.as_minor_units(), 12346);
    /// ```
    pub fn new_from_float(value: f64) -> Self {
        let paise = (value * MINOR_PER_MAJOR as f64).round() as i64;
        Self { paise }
    }

    /// Creates a new `Price` directly from paise.
    pub fn new_from_minor(paise: i64) -> Self {
        Self { paise }
    }

    /// Creates a new `Price` from whole rupees.
    pub fn from_rupees(rupees: i64) -> Self {
        Self {
            paise: rupees * MINOR_PER_MAJOR,
        }
    }

    /// Creates a new `Price` by parsing a string such as `"150"` or `"2.99"`.
    ///
    /// ```
    /// let price = api::Price::new_from_str("150").unwrap();
    /// assert_eq!(price.as_minor_units(), 15000);
    ///
    /// let err = api::Price::new_from_str("1.234").unwrap_err();
    /// assert_eq!(err, api::price::ParsePriceError::TooManyDecimals);
    /// ```
    pub fn new_from_str(s: &str) -> Result<Self, ParsePriceError> {
        let s = s.trim();
        let s = s.strip_prefix('₹').unwrap_or(s);

        let (is_negative, s) = if let Some(stripped) = s.strip_prefix('-') {
            (true, stripped)
        } else {
            (false, s)
        };

        let mut parts = s.split('.');
        let major_str = parts.next().unwrap_or("");
        let minor_str = parts.next().unwrap_or("");

        if parts.next().is_some() || (major_str.is_empty() && minor_str.is_empty()) {
            return Err(ParsePriceError::InvalidFormat);
        }

        if minor_str.len() > DECIMALS as usize {
            return Err(ParsePriceError::TooManyDecimals);
        }

        let major_units = if major_str.is_empty() {
            0
        } else {
            major_str
                .parse::<i64>()
                .map_err(|_| ParsePriceError::InvalidFormat)?
        };

        let minor_units = if minor_str.is_empty() {
            0
        } else {
            minor_str
                .parse::<i64>()
                .map_err(|_| ParsePriceError::InvalidFormat)?
        };

        let scaling_factor = 10_i64.pow(DECIMALS - minor_str.len() as u32);
        let mut paise = major_units
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|major| major.checked_add(minor_units * scaling_factor))
            .ok_or(ParsePriceError::InvalidFormat)?;

        if is_negative {
            paise = -paise;
        }

        Ok(Self::new_from_minor(paise))
    }

    /// Price of `quantity` units at this unit price.
    pub fn times(&self, quantity: u32) -> Self {
        Self {
            paise: self.paise.saturating_mul(i64::from(quantity)),
        }
    }

    /// Formats the price with the rupee symbol (e.g., "₹25.34").
    pub fn to_string_with_symbol(&self) -> String {
        format!("₹{}", self)
    }
}

/// Formats the amount as a numeric string (e.g., "25.34").
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.paise < 0 { "-" } else { "" };
        let major_units = (self.paise / MINOR_PER_MAJOR).abs();
        let minor_units = self.paise.abs() % MINOR_PER_MAJOR;

        write!(
            f,
            "{sign}{}.{:0width$}",
            major_units,
            minor_units,
            width = DECIMALS as usize
        )
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            paise: self.paise + rhs.paise,
        }
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        self.paise += rhs.paise;
    }
}

impl Zero for Price {
    fn zero() -> Self {
        Self { paise: 0 }
    }

    fn is_zero(&self) -> bool {
        self.paise == 0
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, p| acc + p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_and_fractional_rupees() {
        assert_eq!(Price::new_from_str("150").unwrap(), Price::from_rupees(150));
        assert_eq!(Price::new_from_str("₹2.5").unwrap().as_minor_units(), 250);
        assert_eq!(Price::new_from_str(".99").unwrap().as_minor_units(), 99);
        assert_eq!(
            Price::new_from_str("1.2.3"),
            Err(ParsePriceError::InvalidFormat)
        );
        assert_eq!(
            Price::new_from_str("abc"),
            Err(ParsePriceError::InvalidFormat)
        );
    }

    #[test]
    fn display_pads_paise() {
        assert_eq!(Price::new_from_minor(15005).to_string(), "150.05");
        assert_eq!(Price::new_from_minor(-250).to_string(), "-2.50");
        assert_eq!(Price::new_from_minor(-5).to_string(), "-0.05");
        assert_eq!(Price::from_rupees(3).to_string_with_symbol(), "₹3.00");
    }

    #[test]
    fn line_totals_sum() {
        let total: Price = [Price::from_rupees(40).times(2), Price::new_from_float(19.99)]
            .into_iter()
            .sum();
        assert_eq!(total.as_minor_units(), 9999);
        assert!(Price::zero().is_zero());
    }
}
