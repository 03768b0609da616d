//! Dirham amounts.
//!
//! Amounts are held as an integer number of centimes (1 DH = 100 centimes) so
//! that sums over a session never accumulate floating point drift. The AI
//! service and the spreadsheet both speak `f64` dirhams; conversion happens at
//! those edges only.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

const CENTIMES_PER_DH: i64 = 100;

/// Monetary amount in Moroccan dirhams (DH), stored in centimes.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl ValueObject for Amount {}

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub const fn from_centimes(centimes: i64) -> Self {
        Self(centimes)
    }

    /// Whole dirhams, no fractional part.
    pub const fn from_dh_units(dh: i64) -> Self {
        Self(dh.saturating_mul(CENTIMES_PER_DH))
    }

    /// Convert a floating point DH value, rounding to the nearest centime.
    pub fn from_dh(value: f64) -> DomainResult<Self> {
        if !value.is_finite() {
            return Err(DomainError::validation("amount must be a finite number"));
        }

        let scaled = (value * CENTIMES_PER_DH as f64).round();
        if scaled.abs() >= i64::MAX as f64 {
            return Err(DomainError::validation("amount out of range"));
        }

        Ok(Self(scaled as i64))
    }

    pub const fn centimes(self) -> i64 {
        self.0
    }

    /// Value in DH, as written into spreadsheet cells and JSON.
    pub fn to_dh(self) -> f64 {
        self.0 as f64 / CENTIMES_PER_DH as f64
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub const fn saturating_add(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_add(rhs.0))
    }

    pub const fn saturating_sub(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_sub(rhs.0))
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        self.saturating_add(rhs)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        *self = self.saturating_add(rhs);
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Amount {
        iter.copied().sum()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per = CENTIMES_PER_DH as u64;
        write!(f, "{sign}{}.{:02}", abs / per, abs % per)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_dh())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Amount::from_dh(value).map_err(serde::de::Error::custom)
    }
}
