//! Exact point arithmetic.
//!
//! Wagers are whole units, but the 3-for-2 solo multiplier produces half
//! units, so points are stored as a count of halves and never as floats.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::domain::{GameError, ValidationKind};

/// A whole-unit wager amount.
pub type Wager = u64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Points {
    halves: i64,
}

impl Points {
    pub const ZERO: Points = Points { halves: 0 };

    pub const fn from_units(units: i64) -> Self {
        Self { halves: units * 2 }
    }

    pub const fn from_halves(halves: i64) -> Self {
        Self { halves }
    }

    pub const fn halves(self) -> i64 {
        self.halves
    }

    pub fn from_wager(wager: Wager) -> Result<Self, GameError> {
        i64::try_from(wager)
            .ok()
            .and_then(|w| w.checked_mul(2))
            .map(Self::from_halves)
            .ok_or_else(|| GameError::consistency(format!("wager {wager} overflows points")))
    }

    pub fn checked_mul(self, factor: i64) -> Result<Self, GameError> {
        self.halves
            .checked_mul(factor)
            .map(Self::from_halves)
            .ok_or_else(|| GameError::consistency("point multiplication overflow"))
    }

    /// Multiply by 3/2. Always exact because the input is an integral number
    /// of halves times three, halved only when the result stays integral.
    pub fn three_for_two(self) -> Result<Self, GameError> {
        let tripled = self
            .halves
            .checked_mul(3)
            .ok_or_else(|| GameError::consistency("point multiplication overflow"))?;
        if tripled % 2 != 0 {
            return Err(GameError::consistency(format!(
                "3-for-2 of {self} is not representable in half units"
            )));
        }
        Ok(Self::from_halves(tripled / 2))
    }

    pub fn checked_add(self, rhs: Points) -> Result<Self, GameError> {
        self.halves
            .checked_add(rhs.halves)
            .map(Self::from_halves)
            .ok_or_else(|| GameError::consistency(format!("{self} + {rhs} overflows points")))
    }

    pub fn checked_sub(self, rhs: Points) -> Result<Self, GameError> {
        self.halves
            .checked_sub(rhs.halves)
            .map(Self::from_halves)
            .ok_or_else(|| GameError::consistency(format!("{self} - {rhs} overflows points")))
    }

    pub fn checked_neg(self) -> Result<Self, GameError> {
        self.checked_mul(-1)
    }

    pub fn checked_sum(items: impl IntoIterator<Item = Points>) -> Result<Self, GameError> {
        items
            .into_iter()
            .try_fold(Points::ZERO, |acc, p| acc.checked_add(p))
    }

    pub fn is_zero(self) -> bool {
        self.halves == 0
    }

    pub fn as_f64(self) -> f64 {
        self.halves as f64 / 2.0
    }
}

impl From<Points> for f64 {
    fn from(p: Points) -> f64 {
        p.as_f64()
    }
}

impl TryFrom<f64> for Points {
    type Error = GameError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        let doubled = value * 2.0;
        if !doubled.is_finite() || doubled.fract() != 0.0 || doubled.abs() > (i64::MAX / 4) as f64 {
            return Err(GameError::validation(
                ValidationKind::Snapshot,
                format!("{value} is not a whole or half point amount"),
            ));
        }
        Ok(Points::from_halves(doubled as i64))
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.halves < 0 { "-" } else { "" };
        let abs = self.halves.unsigned_abs();
        if abs % 2 == 0 {
            write!(f, "{sign}{}", abs / 2)
        } else {
            write!(f, "{sign}{}.5", abs / 2)
        }
    }
}
