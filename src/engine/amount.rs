use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const SCALE: i64 = 10_000;

/// Largest magnitude in 1/10000 units. Below 2^50, so `store / 10000` as an
/// f64 always rounds back to the same value.
const LIMIT: i64 = 999_999_999_999_999;

/// Store a money amount.
/// It is using internally an i64 in order to avoid floating point rounding error.
/// The Amount precision is four places past the decimal.
///
/// Persisted as a plain JSON number, so the value goes through `f64` at the
/// serde boundary. Every amount stays within `±Amount::MAX`, where that
/// conversion is exact in both directions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Amount {
    store: i64,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Amount parsing error: {0}")]
    Parse(String),

    #[error("Amount has more than four decimal places: {0}")]
    Precision(String),

    #[error("Amount must be a finite number")]
    NotFinite,

    #[error("Amount above the supported maximum of {}", Amount::MAX)]
    Overflow,

    #[error("Amount below the supported minimum of -{}", Amount::MAX)]
    Underflow,
}

impl Amount {
    pub const ZERO: Amount = Amount { store: 0 };

    /// 99999999999.9999
    pub const MAX: Amount = Amount { store: LIMIT };

    /// Whole currency units, e.g. `Amount::from_units(5000)` is 5000.0000.
    pub const fn from_units(units: i64) -> Self {
        Amount {
            store: units * SCALE,
        }
    }

    fn bounded(store: i64) -> Result<Amount, AmountError> {
        if store > LIMIT {
            Err(AmountError::Overflow)?
        }
        if store < -LIMIT {
            Err(AmountError::Underflow)?
        }
        Ok(Amount { store })
    }

    pub fn is_positive(&self) -> bool {
        self.store > 0
    }

    pub fn add(&self, other: &Amount) -> Result<Amount, AmountError> {
        match self.store.checked_add(other.store) {
            Some(total) => Amount::bounded(total),
            None => Err(AmountError::Overflow)?,
        }
    }

    pub fn sub(&self, other: &Amount) -> Result<Amount, AmountError> {
        match self.store.checked_sub(other.store) {
            Some(total) => Amount::bounded(total),
            None => Err(AmountError::Underflow)?,
        }
    }

    /// Two-decimal rendering with the rupee sign, rounded half away from zero.
    pub fn currency(&self) -> String {
        let cents = (self.store.unsigned_abs() / 50 + 1) / 2;
        let sign = if self.store < 0 && cents > 0 { "-" } else { "" };
        format!("{sign}₹{}.{:02}", cents / 100, cents % 100)
    }
}

impl TryFrom<f64> for Amount {
    type Error = AmountError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            Err(AmountError::NotFinite)?
        }

        let scaled = (value * SCALE as f64).round();
        if scaled > LIMIT as f64 {
            Err(AmountError::Overflow)?
        }
        if scaled < -LIMIT as f64 {
            Err(AmountError::Underflow)?
        }

        Ok(Amount {
            store: scaled as i64,
        })
    }
}

impl From<Amount> for f64 {
    fn from(amount: Amount) -> f64 {
        amount.store as f64 / SCALE as f64
    }
}

/// Accepts `12`, `12.5`, `.5`, `+3`, `-0.25` and exponent forms such as
/// `1e3` or `2.5E-2`. Digits beyond the fourth decimal place must be zero.
impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parse_err = || AmountError::Parse(s.into());

        let (negative, unsigned) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        let out_of_range = if negative {
            AmountError::Underflow
        } else {
            AmountError::Overflow
        };

        let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
            Some((m, e)) => (m, e.parse::<i32>().map_err(|_| parse_err())?),
            None => (unsigned, 0),
        };

        let (left_part, decimal_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));

        // ".05" and "5." are accepted, "." and "" are not
        if left_part.is_empty() && decimal_part.is_empty() {
            Err(parse_err())?
        }
        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if !all_digits(left_part) || !all_digits(decimal_part) {
            Err(parse_err())?
        }

        let joined = format!("{left_part}{decimal_part}");
        let digits = joined.trim_start_matches('0');
        // Power of ten that turns `digits` into 1/10000 units
        let shift = 4 + i64::from(exponent) - decimal_part.len() as i64;

        let magnitude: i64 = if digits.is_empty() {
            0
        } else if shift >= 0 {
            let base = digits.parse::<i64>().map_err(|_| out_of_range.clone())?;
            u32::try_from(shift)
                .ok()
                .and_then(|shift| 10i64.checked_pow(shift))
                .and_then(|factor| base.checked_mul(factor))
                .ok_or_else(|| out_of_range.clone())?
        } else {
            let cut = usize::try_from(-shift).unwrap_or(usize::MAX);
            // `digits` has no leading zero, so it is non-zero below the precision
            if cut >= digits.len() {
                Err(AmountError::Precision(s.into()))?
            }
            let (kept, dropped) = digits.split_at(digits.len() - cut);
            if dropped.bytes().any(|b| b != b'0') {
                Err(AmountError::Precision(s.into()))?
            }
            kept.parse::<i64>().map_err(|_| out_of_range.clone())?
        };

        Amount::bounded(if negative { -magnitude } else { magnitude })
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.store;
        let negative = value < 0;
        let abs_val = value.unsigned_abs();

        let left_part = abs_val / SCALE as u64;
        let decimal_part = abs_val % SCALE as u64;

        if negative {
            write!(f, "-{}.{:04}", left_part, decimal_part)
        } else {
            write!(f, "{}.{:04}", left_part, decimal_part)
        }
    }
}
