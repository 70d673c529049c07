use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Most significant digits an amount may carry. Any decimal this short
/// survives the trip through an `f64` JSON number unchanged.
pub const MAX_SIGNIFICANT_DIGITS: u32 = 15;

/// Most digits allowed after the decimal point.
pub const MAX_DECIMAL_PLACES: u32 = 6;

/// A strictly positive cash amount in major units (e.g. 500 or 12.50).
///
/// Held as a decimal so sums are exact. Persisted as a plain JSON number, so
/// the value is bounded to what an `f64` reproduces exactly: at most
/// `MAX_SIGNIFICANT_DIGITS` digits, `MAX_DECIMAL_PLACES` of them fractional.
/// Amounts stay below 10^15, far from the point where a sum could overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value <= Decimal::ZERO {
            return Err(AmountError::NotPositive);
        }

        let value = value.normalize();
        if value.scale() > MAX_DECIMAL_PLACES {
            return Err(AmountError::TooManyDecimals);
        }
        if significant_digits(value) > MAX_SIGNIFICANT_DIGITS {
            return Err(AmountError::TooManyDigits);
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_decimal(self.0))
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_amount(s)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = rust_decimal::serde::float::deserialize(deserializer)?;
        Amount::new(value).map_err(serde::de::Error::custom)
    }
}

/// Parse user-entered text into an amount.
/// Example: "500" -> 500, " 12.5 " -> 12.5, "" / "abc" / "0" -> error
pub fn parse_amount(input: &str) -> Result<Amount, AmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AmountError::Empty);
    }
    let value = Decimal::from_str(input).map_err(|_| AmountError::NotNumeric)?;
    Amount::new(value)
}

/// Digits in the mantissa of a normalized, non-zero decimal.
fn significant_digits(value: Decimal) -> u32 {
    value.mantissa().unsigned_abs().ilog10() + 1
}

/// Render a decimal without trailing zeros.
/// Example: 500.00 -> "500", 12.50 -> "12.5", -300 -> "-300"
pub fn format_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    Empty,
    NotNumeric,
    NotPositive,
    TooManyDigits,
    TooManyDecimals,
}

impl fmt::Display for AmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::Empty => write!(f, "amount is required"),
            AmountError::NotNumeric => write!(f, "amount must be a number"),
            AmountError::NotPositive => write!(f, "amount must be greater than zero"),
            AmountError::TooManyDigits => write!(
                f,
                "amount must have at most {} significant digits",
                MAX_SIGNIFICANT_DIGITS
            ),
            AmountError::TooManyDecimals => write!(
                f,
                "amount must have at most {} decimal places",
                MAX_DECIMAL_PLACES
            ),
        }
    }
}

impl std::error::Error for AmountError {}
