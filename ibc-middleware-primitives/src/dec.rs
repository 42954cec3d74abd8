//! Fixed-point decimal with 18 fractional digits, encoded the way the Cosmos
//! SDK encodes `LegacyDec` on the wire (the raw scaled integer as a string).
use core::fmt::{Display, Error as FmtError, Formatter};
use core::str::FromStr;

use displaydoc::Display;
use primitive_types::U256;

use crate::prelude::*;

/// Number of fractional digits carried by [`Dec`].
pub const DEC_PRECISION: usize = 18;

fn precision_multiplier() -> U256 {
    U256::exp10(DEC_PRECISION)
}

#[derive(Debug, Display, PartialEq, Eq)]
pub enum DecError {
    /// invalid decimal `{0}`
    InvalidDecimal(String),
    /// decimal `{0}` has more than 18 fractional digits
    TooManyDecimals(String),
    /// decimal arithmetic overflow
    Overflow,
}

#[cfg(feature = "std")]
impl std::error::Error for DecError {}

/// A non-negative decimal number with 18 digits of precision.
///
/// Internally it holds the value multiplied by `10^18`.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dec(U256);

impl Dec {
    pub fn zero() -> Self {
        Self(U256::zero())
    }

    pub fn one() -> Self {
        Self(precision_multiplier())
    }

    /// Builds the decimal `value.000000000000000000`.
    pub fn from_integer(value: u64) -> Self {
        // u64::MAX * 10^18 always fits into 256 bits
        Self(U256::from(value) * precision_multiplier())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// The scaled integer representation.
    pub fn raw(&self) -> U256 {
        self.0
    }

    /// Decodes the wire form: the scaled integer rendered in base ten. An
    /// empty string is the zero value.
    pub fn from_scaled_str(s: &str) -> Result<Self, DecError> {
        if s.is_empty() {
            return Ok(Self::zero());
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DecError::InvalidDecimal(s.to_string()));
        }
        U256::from_dec_str(s)
            .map(Self)
            .map_err(|_| DecError::InvalidDecimal(s.to_string()))
    }

    /// Encodes the wire form, see [`Dec::from_scaled_str`].
    pub fn to_scaled_string(&self) -> String {
        self.0.to_string()
    }

    /// The human readable form without trailing fractional zeros, so that
    /// integral values render as plain integers (`"10"`, `"0.5"`).
    pub fn to_trimmed_string(&self) -> String {
        let padded = self.to_string();
        let trimmed = padded.trim_end_matches('0');
        trimmed.strip_suffix('.').unwrap_or(trimmed).to_string()
    }

    /// `floor(amount × self)`.
    pub fn mul_truncate(&self, amount: U256) -> Result<U256, DecError> {
        let product = amount.checked_mul(self.0).ok_or(DecError::Overflow)?;
        Ok(product / precision_multiplier())
    }

    /// `amount × self` rounded to the nearest integer, ties to even.
    pub fn mul_round_half_even(&self, amount: U256) -> Result<U256, DecError> {
        let product = amount.checked_mul(self.0).ok_or(DecError::Overflow)?;
        let multiplier = precision_multiplier();
        let quotient = product / multiplier;
        let remainder = product % multiplier;
        let half = multiplier / 2;

        let round_up = remainder > half || (remainder == half && quotient.bit(0));
        if round_up {
            quotient.checked_add(U256::one()).ok_or(DecError::Overflow)
        } else {
            Ok(quotient)
        }
    }
}

impl FromStr for Dec {
    type Err = DecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DecError::InvalidDecimal(s.to_string());

        let (integer, fraction) = match s.split_once('.') {
            Some((integer, fraction)) if !fraction.is_empty() => (integer, fraction),
            Some(_) => return Err(invalid()),
            None => (s, ""),
        };

        if integer.is_empty()
            || !integer.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        if fraction.len() > DEC_PRECISION {
            return Err(DecError::TooManyDecimals(s.to_string()));
        }

        let integer = U256::from_dec_str(integer).map_err(|_| invalid())?;
        let fraction = if fraction.is_empty() {
            U256::zero()
        } else {
            U256::from_dec_str(fraction).map_err(|_| invalid())?
                * U256::exp10(DEC_PRECISION - fraction.len())
        };

        integer
            .checked_mul(precision_multiplier())
            .and_then(|scaled| scaled.checked_add(fraction))
            .map(Self)
            .ok_or(DecError::Overflow)
    }
}

impl Display for Dec {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        let multiplier = precision_multiplier();
        let integer = self.0 / multiplier;
        // the remainder is below 10^18 and fits into a u64
        let fraction = (self.0 % multiplier).low_u64();
        write!(f, "{integer}.{fraction:018}")
    }
}

impl TryFrom<String> for Dec {
    type Error = DecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Dec> for String {
    fn from(value: Dec) -> Self {
        value.to_string()
    }
}
